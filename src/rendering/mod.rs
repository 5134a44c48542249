//! Rendering primitives: raster canvas, text rasterisation and the paint
//! command list that the composer replays onto a canvas.

pub mod paint;
pub mod raster;
pub mod text;

pub use paint::{paint, PaintCommand};
pub use raster::{Canvas, ColorHandle};
pub use text::FontFace;

use sha2::{Digest, Sha256};

/// A fully encoded PNG together with its pixel dimensions.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub width: u32,
    pub height: u32,
    pub png_data: Vec<u8>,
}

impl EncodedImage {
    /// Hex-encoded SHA-256 of the PNG bytes.
    pub fn sha256_hex(&self) -> String {
        hex::encode(Sha256::digest(&self.png_data))
    }
}
