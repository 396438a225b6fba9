// grid.rs - Uniform spatial hash over the simulation canvas
//
// Rebuilt from scratch every tick; holds no state between ticks. Buckets
// store caller keys (the engine uses arena indices), positions are only
// used to pick a bucket.

/// Smallest cell edge accepted; degenerate sizes clamp to this.
const MIN_CELL: f32 = 1.0;

pub struct SpatialHashGrid<K = usize> {
    cells: Vec<Vec<K>>,
    cell_size: f32,
    cols: i64,
    rows: i64,
}

impl<K: Copy + PartialEq> SpatialHashGrid<K> {
    /// Negative or non-finite extents give an empty grid that indexes nothing.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size >= MIN_CELL {
            cell_size
        } else {
            log::warn!("grid cell size {cell_size} clamped to {MIN_CELL}");
            MIN_CELL
        };
        let cols = span_cells(width, cell_size);
        let rows = span_cells(height, cell_size);
        let mut cells = Vec::new();
        cells.resize_with((cols * rows) as usize, Vec::new);
        Self { cells, cell_size, cols, rows }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// (cols, rows)
    pub fn shape(&self) -> (usize, usize) {
        (self.cols as usize, self.rows as usize)
    }

    /// Empties every bucket, keeping allocations.
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Out-of-bounds points are silently not indexed; returns whether the
    /// point landed in a bucket.
    pub fn insert(&mut self, key: K, x: f32, y: f32) -> bool {
        let (col, row) = self.cell_of(x, y);
        if col < 0 || col >= self.cols || row < 0 || row >= self.rows {
            return false;
        }
        self.cells[(row * self.cols + col) as usize].push(key);
        true
    }

    /// Candidates from the 3x3 block of cells around (x, y), excluding `key`.
    /// May contain keys farther away than the caller's threshold.
    pub fn neighbors(&self, key: K, x: f32, y: f32) -> Vec<K> {
        let mut out = Vec::new();
        self.neighbors_into(key, x, y, &mut out);
        out
    }

    /// Allocation-free variant of `neighbors`; `out` is cleared first.
    pub fn neighbors_into(&self, key: K, x: f32, y: f32, out: &mut Vec<K>) {
        out.clear();
        let (col, row) = self.cell_of(x, y);

        let c0 = (col - 1).max(0);
        let c1 = (col + 1).min(self.cols - 1);
        let r0 = (row - 1).max(0);
        let r1 = (row + 1).min(self.rows - 1);

        for r in r0..=r1 {
            for c in c0..=c1 {
                let cell = &self.cells[(r * self.cols + c) as usize];
                out.extend(cell.iter().copied().filter(|&other| other != key));
            }
        }
    }

    #[inline]
    fn cell_of(&self, x: f32, y: f32) -> (i64, i64) {
        // NaN saturates to 0 in the cast; keep it out of the grid instead
        if !x.is_finite() || !y.is_finite() {
            return (-2, -2);
        }
        // Anything past the border is one cell outside it, so the 3x3
        // block arithmetic stays in range for huge coordinates.
        let col = (x / self.cell_size).floor().clamp(-2.0, (self.cols + 1) as f32);
        let row = (y / self.cell_size).floor().clamp(-2.0, (self.rows + 1) as f32);
        (col as i64, row as i64)
    }
}

#[inline]
fn span_cells(extent: f32, cell_size: f32) -> i64 {
    if extent.is_finite() && extent > 0.0 {
        (extent / cell_size).ceil() as i64
    } else {
        0
    }
}
