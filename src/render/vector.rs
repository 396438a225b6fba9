// vector.rs - SVG rendering of the decorative set
//
// Resolution independent: coordinates stay in the 640x960 design space and
// the viewBox does the scaling. The markup is rebuilt only when the snapshot
// changes, so steady-state frames are free.

use std::fmt::{self, Write};

use super::{Backend, BackendKind, Layer};
use crate::error::RenderError;
use crate::render::FrameInput;
use crate::scene::{DESIGN_HEIGHT, DESIGN_WIDTH, Droplet, SizeClass};

const LARGE_BODY: [(u8, &str); 6] = [
    (0, "rgba(255,255,255,0.06)"),
    (60, "rgba(255,255,255,0.02)"),
    (82, "rgba(255,255,255,0.01)"),
    (88, "rgba(60,80,90,0.15)"),
    (94, "rgba(40,60,70,0.35)"),
    (100, "rgba(30,50,60,0.25)"),
];

const LARGE_EDGE: [(u8, &str); 4] = [
    (0, "transparent"),
    (85, "transparent"),
    (95, "rgba(40,55,65,0.2)"),
    (100, "rgba(30,45,55,0.1)"),
];

const MEDIUM_BODY: [(u8, &str); 5] = [
    (0, "rgba(255,255,255,0.05)"),
    (65, "rgba(255,255,255,0.02)"),
    (85, "rgba(60,80,90,0.12)"),
    (95, "rgba(40,60,70,0.3)"),
    (100, "rgba(35,55,65,0.2)"),
];

const SMALL_BODY: [(u8, &str); 4] = [
    (0, "rgba(255,255,255,0.08)"),
    (60, "rgba(255,255,255,0.03)"),
    (85, "rgba(50,70,80,0.2)"),
    (100, "rgba(40,60,70,0.15)"),
];

/// Shared defs: two highlight gradients and the shadow blur.
const SHARED_DEFS: &str = concat!(
    r#"<defs>"#,
    r#"<radialGradient id="highlight-arc" cx="30%" cy="30%" r="70%">"#,
    r#"<stop offset="0%" stop-color="rgba(255,255,255,0.85)"/>"#,
    r#"<stop offset="50%" stop-color="rgba(255,255,255,0.35)"/>"#,
    r#"<stop offset="100%" stop-color="rgba(255,255,255,0)"/>"#,
    r#"</radialGradient>"#,
    r#"<radialGradient id="highlight-soft" cx="35%" cy="35%" r="65%">"#,
    r#"<stop offset="0%" stop-color="rgba(255,255,255,0.75)"/>"#,
    r#"<stop offset="60%" stop-color="rgba(255,255,255,0.2)"/>"#,
    r#"<stop offset="100%" stop-color="rgba(255,255,255,0)"/>"#,
    r#"</radialGradient>"#,
    r#"<filter id="shadow-blur" x="-50%" y="-50%" width="200%" height="200%">"#,
    r#"<feGaussianBlur stdDeviation="1.5"/>"#,
    r#"</filter>"#,
    r#"</defs>"#,
);

pub struct VectorBackend {
    markup: String,
    /// Copy of the snapshot `markup` was built from.
    drawn: Option<Vec<Droplet>>,
}

impl VectorBackend {
    pub fn new() -> Self {
        Self { markup: String::new(), drawn: None }
    }
}

impl Default for VectorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for VectorBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Vector
    }

    fn resize(&mut self, _width: u32, _height: u32) -> Result<(), RenderError> {
        // viewBox scaling; nothing to redo.
        Ok(())
    }

    fn render(&mut self, input: &FrameInput<'_>) -> Layer<'_> {
        if input.is_zero_sized() {
            return Layer::Empty;
        }

        if self.drawn.as_deref() != Some(input.drops) {
            self.markup.clear();
            self.drawn = None;
            if let Err(e) = write_svg(&mut self.markup, input.drops) {
                log::warn!("svg serialisation failed: {e}");
                self.markup.clear();
                return Layer::Empty;
            }
            self.drawn = Some(input.drops.to_vec());
        }
        Layer::Markup(&self.markup)
    }
}

/// Whole document: root element, shared defs, then every droplet in input
/// order (ascending radius from the generator, so big drops land on top).
pub fn write_svg<W: Write>(out: &mut W, drops: &[Droplet]) -> fmt::Result {
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="wallpaper__svg" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMin slice" aria-hidden="true" style="pointer-events:none">"#,
        DESIGN_WIDTH, DESIGN_HEIGHT
    )?;
    out.write_str(SHARED_DEFS)?;
    for d in drops {
        write_droplet(out, d)?;
    }
    out.write_str("</svg>")
}

fn write_droplet<W: Write>(out: &mut W, d: &Droplet) -> fmt::Result {
    let cx = d.x * DESIGN_WIDTH;
    let cy = d.y * DESIGN_HEIGHT;
    let r = d.radius;
    let (rx, ry) = d.axes();
    let degrees = d.rotation.to_degrees();

    write!(
        out,
        r#"<g opacity="{:.3}" transform="rotate({:.3} {:.3} {:.3})">"#,
        d.opacity, degrees, cx, cy
    )?;

    match d.size_class {
        SizeClass::Large => {
            out.write_str("<defs>")?;
            write_radial(out, "drop-body", d.id, &LARGE_BODY)?;
            write_radial(out, "drop-edge", d.id, &LARGE_EDGE)?;
            out.write_str("</defs>")?;

            shadow(out, cx + r * 0.08, cy + r * 0.45, rx * 0.7, ry * 0.25, "rgba(0,0,0,0.12)")?;
            let body = format!("url(#drop-body-{})", d.id);
            let edge = format!("url(#drop-edge-{})", d.id);
            ellipse(out, cx, cy, rx, ry, &body)?;
            ellipse(out, cx, cy, rx, ry, &edge)?;
            ellipse(out, cx, cy, rx * 0.6, ry * 0.6, "rgba(255,255,255,0.04)")?;
            ellipse(out, cx, cy + ry * 0.4, rx * 0.45, ry * 0.12, "rgba(255,255,255,0.18)")?;
            ellipse(out, cx - rx * 0.28, cy - ry * 0.28, rx * 0.38, ry * 0.25, "url(#highlight-arc)")?;
            ellipse(out, cx - rx * 0.35, cy - ry * 0.35, rx * 0.1, ry * 0.08, "rgba(255,255,255,0.95)")?;
            write!(
                out,
                r#"<circle cx="{:.3}" cy="{:.3}" r="{:.3}" fill="rgba(255,255,255,0.7)"/>"#,
                cx - rx * 0.42,
                cy - ry * 0.28,
                r * 0.04
            )?;
        }
        SizeClass::Medium => {
            out.write_str("<defs>")?;
            write_radial(out, "drop-body", d.id, &MEDIUM_BODY)?;
            out.write_str("</defs>")?;

            shadow(out, cx + r * 0.05, cy + r * 0.35, rx * 0.6, ry * 0.2, "rgba(0,0,0,0.08)")?;
            let body = format!("url(#drop-body-{})", d.id);
            ellipse(out, cx, cy, rx, ry, &body)?;
            ellipse(out, cx, cy + ry * 0.35, rx * 0.35, ry * 0.1, "rgba(255,255,255,0.15)")?;
            ellipse(out, cx - rx * 0.25, cy - ry * 0.25, rx * 0.32, ry * 0.2, "url(#highlight-soft)")?;
            ellipse(out, cx - rx * 0.32, cy - ry * 0.32, rx * 0.08, ry * 0.06, "rgba(255,255,255,0.9)")?;
        }
        SizeClass::Small => {
            out.write_str("<defs>")?;
            write_radial(out, "drop-body", d.id, &SMALL_BODY)?;
            out.write_str("</defs>")?;

            let body = format!("url(#drop-body-{})", d.id);
            ellipse(out, cx, cy, rx, ry, &body)?;
            ellipse(out, cx - rx * 0.25, cy - ry * 0.25, rx * 0.3, ry * 0.25, "rgba(255,255,255,0.65)")?;
        }
    }

    out.write_str("</g>")
}

fn write_radial<W: Write>(out: &mut W, prefix: &str, id: u32, stops: &[(u8, &str)]) -> fmt::Result {
    write!(out, r#"<radialGradient id="{prefix}-{id}" cx="50%" cy="50%" r="50%">"#)?;
    for (offset, color) in stops {
        write!(out, r#"<stop offset="{offset}%" stop-color="{color}"/>"#)?;
    }
    out.write_str("</radialGradient>")
}

fn ellipse<W: Write>(out: &mut W, cx: f64, cy: f64, rx: f64, ry: f64, fill: &str) -> fmt::Result {
    write!(
        out,
        r#"<ellipse cx="{cx:.3}" cy="{cy:.3}" rx="{rx:.3}" ry="{ry:.3}" fill="{fill}"/>"#
    )
}

fn shadow<W: Write>(out: &mut W, cx: f64, cy: f64, rx: f64, ry: f64, fill: &str) -> fmt::Result {
    write!(
        out,
        r#"<ellipse cx="{cx:.3}" cy="{cy:.3}" rx="{rx:.3}" ry="{ry:.3}" fill="{fill}" filter="url(#shadow-blur)"/>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::generate;

    fn input(drops: &[Droplet]) -> FrameInput<'_> {
        FrameInput { width: 390, height: 844, elapsed: 0.0, dt: 0.0, drops, physics: &[] }
    }

    #[test]
    fn empty_set_is_bare_document() {
        let mut s = String::new();
        write_svg(&mut s, &[]).unwrap();
        assert!(s.starts_with("<svg"));
        assert!(s.contains(r#"viewBox="0 0 640 960""#));
        assert!(s.contains("xMidYMin slice"));
        assert!(!s.contains("<g "));
        assert!(s.ends_with("</svg>"));
    }

    #[test]
    fn one_group_per_droplet() {
        let drops = generate(50, 42);
        let mut s = String::new();
        write_svg(&mut s, &drops).unwrap();
        assert_eq!(s.matches("<g ").count(), drops.len());
        for d in &drops {
            assert!(s.contains(&format!(r#"id="drop-body-{}""#, d.id)));
        }
    }

    #[test]
    fn tiers_differ_in_detail() {
        let big = Droplet::circle(1, 0.5, 0.5, 16.0, 0.9, SizeClass::Large);
        let small = Droplet::circle(2, 0.5, 0.5, 2.0, 0.9, SizeClass::Small);
        let mut a = String::new();
        let mut b = String::new();
        write_droplet(&mut a, &big).unwrap();
        write_droplet(&mut b, &small).unwrap();
        assert!(a.contains("drop-edge-1") && a.contains("<circle"));
        assert!(!b.contains("shadow-blur"));
        assert_eq!(b.matches("<ellipse").count(), 2);
    }

    #[test]
    fn zero_viewport_renders_nothing() {
        let drops = generate(10, 1);
        let mut backend = VectorBackend::new();
        let mut i = input(&drops);
        i.width = 0;
        assert!(matches!(backend.render(&i), Layer::Empty));
    }

    #[test]
    fn markup_is_cached_between_frames() {
        let drops = generate(30, 3);
        let mut backend = VectorBackend::new();
        let first = match backend.render(&input(&drops)) {
            Layer::Markup(s) => s.to_string(),
            _ => panic!("expected markup"),
        };
        let second = match backend.render(&input(&drops)) {
            Layer::Markup(s) => s.to_string(),
            _ => panic!("expected markup"),
        };
        assert_eq!(first, second);
    }

    #[test]
    fn new_snapshot_of_same_length_is_redrawn() {
        let mut backend = VectorBackend::new();
        let first = generate(30, 1);
        let _ = backend.render(&input(&first));
        drop(first);

        let second = generate(30, 2);
        let mut expected = String::new();
        write_svg(&mut expected, &second).unwrap();
        match backend.render(&input(&second)) {
            Layer::Markup(s) => assert_eq!(s, expected),
            _ => panic!("expected markup"),
        }
    }
}
