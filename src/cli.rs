use clap::{Parser, ValueEnum};
use log::LevelFilter;

use toypath::RenderSettings;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScenePreset {
    /// Random small spheres around three large ones
    BookCover,
    /// Ground, diffuse, hollow glass and mirror spheres
    Showcase,
    /// One diffuse sphere in front of the sky
    Single,
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "toypath")]
#[command(about = "Progressive sphere path tracer")]
pub struct Args {
    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// Image width in pixels
    #[arg(long, default_value = "1280", help = "Image width in pixels")]
    pub width: u32,

    /// Image height in pixels
    #[arg(long, default_value = "720", help = "Image height in pixels")]
    pub height: u32,

    /// Number of samples per pixel per frame
    #[arg(long, short = 's', default_value = "1", help = "Number of samples per pixel per frame")]
    pub samples_per_pixel: u32,

    /// Number of progressive frames to accumulate
    #[arg(long, short = 'f', default_value = "64", help = "Number of progressive frames to accumulate")]
    pub frames: u32,

    /// Seed for the per-pixel random streams and the random scene
    #[arg(long, default_value = "0", help = "Seed for the per-pixel random streams and the random scene")]
    pub seed: u64,

    /// Scene to render
    #[arg(long, value_enum, default_value = "book-cover", help = "Scene to render")]
    pub scene: ScenePreset,

    /// Lens aperture; overrides the scene's default (0 = pinhole)
    #[arg(long, help = "Lens aperture; overrides the scene's default (0 = pinhole)")]
    pub aperture: Option<f32>,

    /// Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)
    #[arg(short, long, default_value = "output.png", help = "Output file path (.png for 8-bit with gamma correction, .exr for HDR linear)")]
    pub output: String,
}

impl Args {
    /// Renderer settings carried by the command line.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
            samples_per_pixel: self.samples_per_pixel,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_render_settings_defaults() {
        let args = Args::parse_from(["toypath"]);
        assert_eq!(args.render_settings(), RenderSettings::default());
        assert_eq!(args.scene, ScenePreset::BookCover);
        assert!(args.aperture.is_none());
    }

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "toypath", "--width", "64", "--height", "32", "-s", "4", "-f", "3", "--scene", "showcase",
            "--aperture", "0", "--seed", "9", "-o", "out.exr",
        ]);
        let settings = args.render_settings();
        assert_eq!((settings.width, settings.height, settings.samples_per_pixel, settings.seed), (64, 32, 4, 9));
        assert_eq!(args.frames, 3);
        assert_eq!(args.scene, ScenePreset::Showcase);
        assert_eq!(args.aperture, Some(0.0));
        assert_eq!(args.output, "out.exr");
    }
}
