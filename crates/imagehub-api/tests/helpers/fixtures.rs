//! Test fixtures: images encoded in memory.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Solid-colour image of the given size encoded as `format`.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 80, 10])));
    let mut buffer = Vec::new();
    img.write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture image");
    buffer
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encoded_image(width, height, ImageFormat::Png)
}
