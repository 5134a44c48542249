//! The card composer: a 600x200 frame with a timestamped label and a caption.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use log::{debug, info};

use crate::error::Result;
use crate::rendering::{paint, Canvas, ColorHandle, EncodedImage, FontFace, PaintCommand};
use crate::ComposerConfig;

pub const CANVAS_WIDTH: u32 = 600;
pub const CANVAS_HEIGHT: u32 = 200;

/// Width of the primary-colored frame around the inner fill.
pub const BORDER: i32 = 10;

/// Format of the timestamp appended to the label.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const LABEL_SIZE_PT: f32 = 20.0;
const LABEL_ORIGIN: (i32, i32) = (50, 50);
const CAPTION_SIZE_PT: f32 = 12.0;
const CAPTION_ORIGIN: (i32, i32) = (50, 80);

/// PNG text chunk keywords carrying the rendered strings.
pub const LABEL_KEYWORD: &str = "Title";
pub const CAPTION_KEYWORD: &str = "Description";

const WHITE: [i32; 3] = [255, 255, 255];

/// `"<label> - <timestamp>"`
pub fn compose_label<Tz: TimeZone>(label: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} - {}", label, at.format(TIMESTAMP_FORMAT))
}

/// Append `" (secret: <secret>)"` when a non-empty secret is configured.
pub fn compose_caption(caption: &str, secret: Option<&str>) -> String {
    match secret {
        Some(s) if !s.is_empty() => format!("{} (secret: {})", caption, s),
        _ => caption.to_string(),
    }
}

/// Owns the canvas, its palette and the finalized strings for one card.
///
/// Rendering consumes the composer, so each instance produces at most one
/// image and the canvas is released on every exit path.
#[derive(Debug)]
pub struct ImageComposer {
    canvas: Canvas,
    white: ColorHandle,
    primary: ColorHandle,
    secondary: ColorHandle,
    label: String,
    caption: String,
    font_path: PathBuf,
}

impl ImageComposer {
    /// Build a composer stamped with the current local time.
    pub fn new(config: ComposerConfig) -> Result<Self> {
        Self::with_timestamp(config, Local::now())
    }

    /// Build a composer whose label carries `at` instead of the wall clock.
    pub fn with_timestamp<Tz: TimeZone>(config: ComposerConfig, at: DateTime<Tz>) -> Result<Self>
    where
        Tz::Offset: std::fmt::Display,
    {
        let canvas = Canvas::new(CANVAS_WIDTH, CANVAS_HEIGHT)?;
        let white = canvas.allocate_color(&WHITE)?;
        let primary = canvas.allocate_color(&config.primary_color)?;
        let secondary = canvas.allocate_color(&config.secondary_color)?;

        let label = compose_label(&config.label, &at);
        let caption = compose_caption(&config.caption, config.secret.as_deref());
        debug!(
            "composer ready: primary={:?} secondary={:?} label={:?} secret={}",
            primary.rgb(),
            secondary.rgb(),
            label,
            config.secret.as_deref().is_some_and(|s| !s.is_empty())
        );

        Ok(Self {
            canvas,
            white,
            primary,
            secondary,
            label,
            caption,
            font_path: config.font_path,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn font_path(&self) -> &Path {
        &self.font_path
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    /// The fixed draw list: outer frame, inner fill, label, caption.
    pub fn paint_commands(&self) -> Vec<PaintCommand> {
        let w = CANVAS_WIDTH as i32;
        let h = CANVAS_HEIGHT as i32;
        vec![
            PaintCommand::FilledRect { x0: 0, y0: 0, x1: w, y1: h, color: self.primary },
            PaintCommand::FilledRect {
                x0: BORDER,
                y0: BORDER,
                x1: w - BORDER,
                y1: h - BORDER,
                color: self.secondary,
            },
            PaintCommand::Text {
                size_pt: LABEL_SIZE_PT,
                x: LABEL_ORIGIN.0,
                y: LABEL_ORIGIN.1,
                color: self.white,
                text: self.label.clone(),
            },
            PaintCommand::Text {
                size_pt: CAPTION_SIZE_PT,
                x: CAPTION_ORIGIN.0,
                y: CAPTION_ORIGIN.1,
                color: self.white,
                text: self.caption.clone(),
            },
        ]
    }

    /// Paint the card and encode it. Nothing is produced if any step fails.
    pub fn render(mut self) -> Result<EncodedImage> {
        let font = FontFace::load(&self.font_path)?;
        debug!("rendering {:?} with font {}", self.label, font.path().display());
        let commands = self.paint_commands();
        paint(&mut self.canvas, &font, &commands)?;

        let png_data = self.canvas.encode_png(&[
            (LABEL_KEYWORD, self.label.as_str()),
            (CAPTION_KEYWORD, self.caption.as_str()),
        ])?;
        Ok(EncodedImage {
            width: self.canvas.width(),
            height: self.canvas.height(),
            png_data,
        })
    }

    /// Render the card and write the complete PNG to `sink`.
    ///
    /// The image is fully encoded before the first byte is written.
    pub fn create_image<W: Write>(self, sink: &mut W) -> Result<EncodedImage> {
        let image = self.render()?;
        sink.write_all(&image.png_data)?;
        sink.flush()?;
        info!(
            "wrote {}x{} PNG ({} bytes)",
            image.width,
            image.height,
            image.png_data.len()
        );
        Ok(image)
    }
}
