// export.rs - Layer output files

use std::io;
use std::path::Path;

use image::{ExtendedColorType, ImageResult};
use rain_wallpaper::Frame;

/// Straight-alpha RGBA, as the frame stores it.
pub fn write_png(path: &Path, frame: &Frame) -> ImageResult<()> {
    image::save_buffer(path, frame.bytes(), frame.width(), frame.height(), ExtendedColorType::Rgba8)
}

pub fn write_svg(path: &Path, markup: &str) -> io::Result<()> {
    std::fs::write(path, markup)
}
