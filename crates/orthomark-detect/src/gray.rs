//! RGB to single-channel intensity conversion.

use orthomark_core::{GrayImage, RgbImageView};

/// Collapse an interleaved RGB image to 8-bit intensity using BT.601
/// luma weights in integer arithmetic (`0.299 R + 0.587 G + 0.114 B`,
/// rounded).
pub fn rgb_to_gray(image: &RgbImageView<'_>) -> GrayImage {
    let mut data = Vec::with_capacity(image.width * image.height);
    for px in image.data.chunks_exact(3) {
        let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
        data.push(((r * 299 + g * 587 + b * 114 + 500) / 1000) as u8);
    }
    GrayImage {
        width: image.width,
        height: image.height,
        data,
    }
}
