//! framecard
//!
//! Renders a fixed 600x200 card: a primary-colored frame around a
//! secondary-colored fill, a label stamped with the construction time and a
//! caption that can carry a secret suffix. The card is emitted as PNG.
//!
//! # Example
//!
//! ```no_run
//! use framecard::{ComposerConfig, ImageComposer};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ComposerConfig {
//!     primary_color: vec![200, 30, 30],
//!     label: "STAGING".to_string(),
//!     secret: Some("abc123".to_string()),
//!     ..Default::default()
//! };
//!
//! let composer = ImageComposer::new(config)?;
//! let mut out = std::io::stdout().lock();
//! composer.create_image(&mut out)?;
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub mod composer;
pub mod error;
pub mod rendering;

pub use composer::ImageComposer;
pub use error::{Error, Result};
pub use rendering::EncodedImage;

/// Font shipped with the crate, relative to its root.
pub const DEFAULT_FONT: &str = "assets/font/DejaVuSansMono.ttf";

/// Path of the bundled font inside the crate directory.
pub fn default_font_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_FONT)
}

/// Inputs for one card.
///
/// Colors are kept as raw channel lists; they are validated when the
/// composer allocates them, so a malformed triple surfaces as
/// [`Error::ResourceAllocation`] at construction.
///
/// # Examples
///
/// ```
/// let cfg = framecard::ComposerConfig::default();
/// assert_eq!(cfg.label, "DEVOPS");
/// assert_eq!(cfg.primary_color, vec![128, 128, 128]);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Frame color
    pub primary_color: Vec<i32>,
    /// Inner fill color
    pub secondary_color: Vec<i32>,
    /// Label text; the timestamp is appended at construction
    pub label: String,
    /// Caption text
    pub caption: String,
    /// Optional secret appended to the caption as `" (secret: ...)"`
    pub secret: Option<String>,
    /// TrueType font used for both lines. Not checked until render.
    pub font_path: PathBuf,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            primary_color: vec![128, 128, 128],
            secondary_color: vec![60, 80, 57],
            label: "DEVOPS".to_string(),
            caption: "Une superbe image".to_string(),
            secret: None,
            font_path: default_font_path(),
        }
    }
}

impl ComposerConfig {
    /// Load a JSON config; missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&raw).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ComposerConfig::default();
        assert_eq!(config.secondary_color, vec![60, 80, 57]);
        assert_eq!(config.caption, "Une superbe image");
        assert!(config.secret.is_none());
        assert!(config.font_path.ends_with("DejaVuSansMono.ttf"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ComposerConfig =
            serde_json::from_str(r#"{"label": "PROD", "primary_color": [1, 2, 3]}"#).unwrap();
        assert_eq!(cfg.label, "PROD");
        assert_eq!(cfg.primary_color, vec![1, 2, 3]);
        assert_eq!(cfg.caption, "Une superbe image");
    }

    #[test]
    fn unreadable_config_file_is_config_error() {
        let err = ComposerConfig::from_json_file("/nonexistent/framecard.json").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
