/// Paint command list replayed onto a canvas

use crate::error::Result;
use crate::rendering::raster::{Canvas, ColorHandle};
use crate::rendering::text::FontFace;

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    /// Filled rectangle between two inclusive corners
    FilledRect {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        color: ColorHandle,
    },
    /// Text with its baseline origin at `(x, y)`
    Text {
        size_pt: f32,
        x: i32,
        y: i32,
        color: ColorHandle,
        text: String,
    },
}

/// Execute `commands` in order; later commands draw over earlier ones.
pub fn paint(canvas: &mut Canvas, font: &FontFace, commands: &[PaintCommand]) -> Result<()> {
    for cmd in commands {
        match cmd {
            PaintCommand::FilledRect { x0, y0, x1, y1, color } => {
                canvas.fill_rect(*x0, *y0, *x1, *y1, color)?;
            }
            PaintCommand::Text { size_pt, x, y, color, text } => {
                font.draw(canvas, *size_pt, *x, *y, color, text)?;
            }
        }
    }
    Ok(())
}
