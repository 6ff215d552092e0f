use crate::error::{Error, Result};
use crate::state::{ViewerState, DEFAULT_ZOOM};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

pub const MIN_PIXEL_RATIO: f64 = 0.25;
pub const MAX_PIXEL_RATIO: f64 = 8.0;

/// Drag to rotate the navigation cube; +/- zoom, r resets, d shows debug info, q quits.
#[derive(Parser, Debug, Clone)]
#[command(name = "nav3d", version)]
pub struct Config {
    /// Device pixels per logical pixel; values above 1 supersample the canvas
    #[arg(long, default_value_t = 1.0, value_parser = parse_pixel_ratio)]
    pub pixel_ratio: f64,

    /// Print a single frame to stdout and exit
    #[arg(long)]
    pub snapshot: bool,

    /// Snapshot with ASCII shading instead of ANSI colors
    #[arg(long, requires = "snapshot")]
    pub plain: bool,

    /// Snapshot width in terminal columns (defaults to the terminal width)
    #[arg(long)]
    pub width: Option<u16>,

    /// Snapshot height in terminal rows (defaults to the terminal height)
    #[arg(long)]
    pub height: Option<u16>,

    /// Initial rotation around the horizontal axis, in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub angle_x: f64,

    /// Initial rotation around the vertical axis, in radians
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub angle_y: f64,

    /// Initial zoom level, clamped to 2..=10
    #[arg(long, default_value_t = DEFAULT_ZOOM, allow_negative_numbers = true)]
    pub zoom: i32,

    /// Start with the debug status line visible
    #[arg(long)]
    pub debug: bool,

    /// Write log output to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    pub fn initial_state(&self) -> ViewerState {
        ViewerState::new(self.angle_x, self.angle_y, self.zoom)
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Checks that `ratio` is a usable pixel density.
pub fn validate_pixel_ratio(ratio: f64) -> Result<f64> {
    if (MIN_PIXEL_RATIO..=MAX_PIXEL_RATIO).contains(&ratio) {
        Ok(ratio)
    } else {
        Err(Error::InvalidPixelRatio(ratio))
    }
}

fn parse_pixel_ratio(value: &str) -> std::result::Result<f64, String> {
    let ratio: f64 = value.parse().map_err(|e| format!("{e}"))?;
    validate_pixel_ratio(ratio).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["nav3d"]).unwrap();
        assert_eq!(config.pixel_ratio, 1.0);
        assert!(!config.snapshot);
        assert_eq!(config.initial_state(), ViewerState::default());
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn snapshot_options() {
        let config = Config::try_parse_from([
            "nav3d",
            "--snapshot",
            "--plain",
            "--width",
            "80",
            "--height",
            "24",
            "--angle-x",
            "-0.5",
            "--zoom",
            "12",
            "-vv",
        ])
        .unwrap();
        assert!(config.snapshot && config.plain);
        assert_eq!((config.width, config.height), (Some(80), Some(24)));
        assert_eq!(config.initial_state(), ViewerState::new(-0.5, 0.0, 10));
        assert_eq!(config.log_level(), LevelFilter::Debug);
    }

    #[test]
    fn rejects_bad_pixel_ratio() {
        assert!(Config::try_parse_from(["nav3d", "--pixel-ratio", "0"]).is_err());
        assert!(Config::try_parse_from(["nav3d", "--pixel-ratio", "nine"]).is_err());
        assert!(Config::try_parse_from(["nav3d", "--pixel-ratio", "2.5"]).is_ok());
    }

    #[test]
    fn plain_needs_snapshot() {
        assert!(Config::try_parse_from(["nav3d", "--plain"]).is_err());
    }
}
