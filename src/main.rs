use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use framecard::{ComposerConfig, ImageComposer};

/// Render a framed, timestamped text card as PNG
#[derive(Parser, Debug)]
#[command(name = "framecard", version, about)]
struct Cli {
    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Frame color as R,G,B
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    primary: Option<Vec<i32>>,

    /// Inner fill color as R,G,B
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    secondary: Option<Vec<i32>>,

    /// Label text (the current time is appended)
    #[arg(long)]
    label: Option<String>,

    /// Caption text
    #[arg(long)]
    caption: Option<String>,

    /// Secret appended to the caption
    #[arg(long, env = "APP_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// TrueType font to render with
    #[arg(long)]
    font: Option<PathBuf>,

    /// Write the PNG here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<(ComposerConfig, Option<PathBuf>)> {
        let mut cfg = match &self.config {
            Some(path) => ComposerConfig::from_json_file(path)?,
            None => ComposerConfig::default(),
        };
        if let Some(c) = self.primary {
            cfg.primary_color = c;
        }
        if let Some(c) = self.secondary {
            cfg.secondary_color = c;
        }
        if let Some(l) = self.label {
            cfg.label = l;
        }
        if let Some(c) = self.caption {
            cfg.caption = c;
        }
        if let Some(s) = self.secret.filter(|s| !s.is_empty()) {
            cfg.secret = Some(s);
        }
        if let Some(f) = self.font {
            cfg.font_path = f;
        }
        Ok((cfg, self.output))
    }
}

fn run(cli: Cli) -> Result<()> {
    let (config, output) = cli.into_config()?;
    let composer = ImageComposer::new(config).context("failed to set up the card")?;

    // The destination is only opened once the PNG is complete.
    let image = composer.render()?;
    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            out.write_all(&image.png_data)?;
            out.flush()?;
        }
        None => {
            let mut out = io::stdout().lock();
            out.write_all(&image.png_data)?;
            out.flush()?;
        }
    }
    info!("card sha256 {}", image.sha256_hex());
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("framecard: {:#}", e);
        std::process::exit(1);
    }
}
