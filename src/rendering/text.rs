//! TrueType text rasterisation on top of `rusttype`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rusttype::{point, Font, Scale};

use crate::error::{Error, Result};
use crate::rendering::raster::{Canvas, ColorHandle};

/// Resolution used to turn point sizes into pixels (GD's default).
pub const TEXT_DPI: f32 = 96.0;

/// A parsed TrueType font loaded from disk.
pub struct FontFace {
    font: Font<'static>,
    path: PathBuf,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace").field("path", &self.path).finish()
    }
}

impl FontFace {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)
            .map_err(|e| Error::FontLoad(format!("{}: {}", path.display(), e)))?;
        let font = Font::try_from_vec(data).ok_or_else(|| {
            Error::FontLoad(format!("{}: not a valid TrueType font", path.display()))
        })?;
        debug!("loaded font {} ({} glyphs)", path.display(), font.glyph_count());
        Ok(Self { font, path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// rusttype scales by ascent-to-descent height; convert a point size
    /// (em at `TEXT_DPI`) into that unit.
    fn scale_for_points(&self, size_pt: f32) -> Scale {
        let em_px = size_pt * TEXT_DPI / 72.0;
        let vm = self.font.v_metrics_unscaled();
        let units_per_em = f32::from(self.font.units_per_em().max(1));
        Scale::uniform(em_px * (vm.ascent - vm.descent) / units_per_em)
    }

    /// Draw `text` with the baseline of its first glyph at `(x, y)`.
    ///
    /// Returns the horizontal advance in pixels.
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        size_pt: f32,
        x: i32,
        y: i32,
        color: &ColorHandle,
        text: &str,
    ) -> Result<f32> {
        canvas.ensure_owned(color)?;
        let scale = self.scale_for_points(size_pt);
        let mut advance = 0.0f32;
        for glyph in self.font.layout(text, scale, point(x as f32, y as f32)) {
            advance = glyph.position().x + glyph.unpositioned().h_metrics().advance_width - x as f32;
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                canvas.blend(bb.min.x + gx as i32, bb.min.y + gy as i32, color, coverage);
            });
        }
        Ok(advance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/font/DejaVuSansMono.ttf")
    }

    #[test]
    fn missing_font_is_a_font_load_error() {
        let err = FontFace::load("/nonexistent/font.ttf").unwrap_err();
        assert!(matches!(err, Error::FontLoad(_)));
        assert!(err.to_string().contains("/nonexistent/font.ttf"));
    }

    #[test]
    fn garbage_font_is_a_font_load_error() {
        let path = std::env::temp_dir().join(format!("framecard-bad-font-{}.ttf", std::process::id()));
        fs::write(&path, b"definitely not a font").unwrap();
        let err = FontFace::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, Error::FontLoad(_)));
    }

    #[test]
    fn draws_above_baseline_only_near_anchor() {
        let face = FontFace::load(font_path()).unwrap();
        let mut canvas = Canvas::new(200, 60).unwrap();
        let white = canvas.allocate_color(&[255, 255, 255]).unwrap();
        let advance = face.draw(&mut canvas, 20.0, 10, 40, &white, "HH").unwrap();
        assert!(advance > 20.0);

        let lit: Vec<(u32, u32)> = (0..60)
            .flat_map(|y| (0..200).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) != Some([0, 0, 0]))
            .collect();
        assert!(!lit.is_empty());
        // 'H' has no descender: nothing below the baseline row.
        assert!(lit.iter().all(|&(_, y)| y <= 40));
        assert!(lit.iter().all(|&(x, _)| x >= 10));
    }
}
