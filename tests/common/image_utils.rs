//! Checks on written figure files.

use image::{DynamicImage, GenericImageView, ImageFormat, Rgba};
use std::path::Path;

/// Load a written PNG.
pub fn load_png(path: &Path) -> DynamicImage {
    let bytes = std::fs::read(path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e));
    assert_eq!(
        image::guess_format(&bytes).ok(),
        Some(ImageFormat::Png),
        "{} is not a PNG",
        path.display()
    );
    image::load_from_memory(&bytes).unwrap()
}

/// Check if an image has the expected dimensions
pub fn assert_image_dimensions(image: &DynamicImage, expected_width: u32, expected_height: u32) {
    let (actual_width, actual_height) = image.dimensions();
    assert_eq!(
        (actual_width, actual_height),
        (expected_width, expected_height),
        "Image dimensions differ"
    );
}

/// Number of pixels of exactly `color`.
pub fn count_color(image: &DynamicImage, color: [u8; 4]) -> usize {
    image
        .pixels()
        .filter(|(_, _, pixel)| *pixel == Rgba(color))
        .count()
}

/// Number of distinct colors, a rough measure of how much was drawn.
pub fn distinct_colors(image: &DynamicImage) -> usize {
    let mut colors: Vec<[u8; 4]> = image.pixels().map(|(_, _, p)| p.0).collect();
    colors.sort_unstable();
    colors.dedup();
    colors.len()
}

/// Read a text output file (SVG or EPS).
pub fn read_text(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_count_color() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
        let img = DynamicImage::ImageRgba8(img);
        assert_eq!(count_color(&img, [0, 0, 0, 255]), 1);
        assert_eq!(distinct_colors(&img), 2);
    }
}
