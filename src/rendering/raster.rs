//! True-color raster canvas and the color handles allocated against it.

use std::sync::atomic::{AtomicU64, Ordering};

use image::{Rgb, RgbImage};
use log::debug;

use crate::error::{Error, Result};

static NEXT_CANVAS_ID: AtomicU64 = AtomicU64::new(1);

/// A color resolved against one specific canvas.
///
/// Handles carry the id of the canvas that allocated them; using a handle on
/// any other canvas is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorHandle {
    canvas_id: u64,
    rgb: [u8; 3],
}

impl ColorHandle {
    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }
}

/// Fixed-size RGB raster. Starts black, like a fresh true-color GD image.
#[derive(Debug)]
pub struct Canvas {
    id: u64,
    image: RgbImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ResourceAllocation(format!(
                "canvas dimensions must be non-zero (got {}x{})",
                width, height
            )));
        }
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(3))
            .ok_or_else(|| {
                Error::ResourceAllocation(format!("canvas {}x{} is too large", width, height))
            })?;

        let id = NEXT_CANVAS_ID.fetch_add(1, Ordering::Relaxed);
        debug!("allocated canvas #{} ({}x{})", id, width, height);
        Ok(Self { id, image: RgbImage::new(width, height) })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Resolve an `[r, g, b]` list into a handle for this canvas.
    ///
    /// Anything other than exactly three channels in `0..=255` is rejected.
    pub fn allocate_color(&self, channels: &[i32]) -> Result<ColorHandle> {
        let [r, g, b] = channels else {
            return Err(Error::ResourceAllocation(format!(
                "color must have exactly 3 channels, got {}",
                channels.len()
            )));
        };
        let mut rgb = [0u8; 3];
        for (slot, &value) in rgb.iter_mut().zip([r, g, b]) {
            *slot = u8::try_from(value).map_err(|_| {
                Error::ResourceAllocation(format!("color channel {} is outside 0..=255", value))
            })?;
        }
        Ok(ColorHandle { canvas_id: self.id, rgb })
    }

    fn check_handle(&self, color: &ColorHandle) -> Result<()> {
        if color.canvas_id != self.id {
            return Err(Error::ResourceAllocation(format!(
                "color handle belongs to canvas #{}, not #{}",
                color.canvas_id, self.id
            )));
        }
        Ok(())
    }

    /// Fill the rectangle spanned by two inclusive corners. Corners may be
    /// given in any order; the area is clipped to the canvas.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: &ColorHandle) -> Result<()> {
        self.check_handle(color)?;
        let max_x = self.width() as i64 - 1;
        let max_y = self.height() as i64 - 1;
        let (lx, hx) = (x0.min(x1) as i64, x0.max(x1) as i64);
        let (ly, hy) = (y0.min(y1) as i64, y0.max(y1) as i64);
        if hx < 0 || hy < 0 || lx > max_x || ly > max_y {
            return Ok(());
        }
        let pixel = Rgb(color.rgb);
        for y in ly.max(0)..=hy.min(max_y) {
            for x in lx.max(0)..=hx.min(max_x) {
                self.image.put_pixel(x as u32, y as u32, pixel);
            }
        }
        Ok(())
    }

    /// Blend `color` over the pixel at `(x, y)` with the given coverage in
    /// `0.0..=1.0`. Out-of-bounds coordinates are ignored.
    pub(crate) fn blend(&mut self, x: i32, y: i32, color: &ColorHandle, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return;
        }
        let a = coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        for (d, s) in dst.0.iter_mut().zip(color.rgb) {
            *d = (s as f32 * a + *d as f32 * (1.0 - a)).round() as u8;
        }
    }

    /// Check that a handle may be used with this canvas without drawing.
    pub(crate) fn ensure_owned(&self, color: &ColorHandle) -> Result<()> {
        self.check_handle(color)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Encode the canvas as an 8-bit RGB PNG. Each `(keyword, text)` pair is
    /// stored as an uncompressed iTXt chunk ahead of the image data.
    pub fn encode_png(&self, metadata: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, self.width(), self.height());
            encoder.set_color(png::ColorType::Rgb);
            encoder.set_depth(png::BitDepth::Eight);
            for (keyword, text) in metadata {
                encoder.add_itxt_chunk(keyword.to_string(), text.to_string())?;
            }
            let mut writer = encoder.write_header()?;
            writer.write_image_data(self.image.as_raw())?;
            writer.finish()?;
        }
        debug!("encoded canvas #{} into {} PNG bytes", self.id, out.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_canvas_is_black() {
        let c = Canvas::new(16, 8).unwrap();
        assert_eq!(c.width(), 16);
        assert_eq!(c.height(), 8);
        assert_eq!(c.pixel(15, 7), Some([0, 0, 0]));
        assert_eq!(c.pixel(16, 0), None);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(matches!(Canvas::new(0, 10), Err(Error::ResourceAllocation(_))));
    }

    #[test]
    fn malformed_colors_are_rejected() {
        let c = Canvas::new(4, 4).unwrap();
        assert!(matches!(c.allocate_color(&[1, 2]), Err(Error::ResourceAllocation(_))));
        assert!(matches!(c.allocate_color(&[1, 2, 3, 4]), Err(Error::ResourceAllocation(_))));
        assert!(matches!(c.allocate_color(&[0, 256, 0]), Err(Error::ResourceAllocation(_))));
        assert!(matches!(c.allocate_color(&[-1, 0, 0]), Err(Error::ResourceAllocation(_))));
        assert_eq!(c.allocate_color(&[0, 128, 255]).unwrap().rgb(), [0, 128, 255]);
    }

    #[test]
    fn fill_rect_is_inclusive_and_clipped() {
        let mut c = Canvas::new(10, 10).unwrap();
        let red = c.allocate_color(&[255, 0, 0]).unwrap();
        c.fill_rect(8, 8, 2, 2, &red).unwrap();
        assert_eq!(c.pixel(2, 2), Some([255, 0, 0]));
        assert_eq!(c.pixel(8, 8), Some([255, 0, 0]));
        assert_eq!(c.pixel(9, 9), Some([0, 0, 0]));
        assert_eq!(c.pixel(1, 5), Some([0, 0, 0]));

        c.fill_rect(-5, -5, 100, 100, &red).unwrap();
        assert_eq!(c.pixel(9, 9), Some([255, 0, 0]));
        assert_eq!(c.pixel(0, 0), Some([255, 0, 0]));
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let a = Canvas::new(4, 4).unwrap();
        let mut b = Canvas::new(4, 4).unwrap();
        let color = a.allocate_color(&[1, 2, 3]).unwrap();
        assert!(matches!(b.fill_rect(0, 0, 1, 1, &color), Err(Error::ResourceAllocation(_))));
    }

    #[test]
    fn blend_mixes_by_coverage() {
        let mut c = Canvas::new(2, 2).unwrap();
        let white = c.allocate_color(&[255, 255, 255]).unwrap();
        c.blend(0, 0, &white, 1.0);
        c.blend(1, 0, &white, 0.5);
        c.blend(-1, 0, &white, 1.0);
        assert_eq!(c.pixel(0, 0), Some([255, 255, 255]));
        assert_eq!(c.pixel(1, 0), Some([128, 128, 128]));
    }

    #[test]
    fn encoded_png_has_signature_and_metadata() {
        let c = Canvas::new(3, 2).unwrap();
        let bytes = c.encode_png(&[("Title", "héllo")]).unwrap();
        assert_eq!(&bytes[0..8], b"\x89PNG\r\n\x1a\n");

        let reader = png::Decoder::new(&bytes[..]).read_info().unwrap();
        let info = reader.info();
        assert_eq!((info.width, info.height), (3, 2));
        let chunk = &info.utf8_text[0];
        assert_eq!(chunk.keyword, "Title");
        assert_eq!(chunk.get_text().unwrap(), "héllo");
    }
}
