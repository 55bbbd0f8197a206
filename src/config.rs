//! Runtime settings
//!
//! Stored as pretty-printed JSON. Missing fields take their defaults, so a
//! settings file only needs the values it changes.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 320;
pub const DEFAULT_HEIGHT: u32 = 160;
pub const DEFAULT_SCALE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Logical canvas width in pixels
    pub width: u32,
    /// Logical canvas height in pixels
    pub height: u32,
    /// Window pixels per canvas pixel
    pub scale: u32,
    pub vsync: bool,
    /// Palette image; the built-in pico-8 palette when absent
    pub palette: Option<PathBuf>,
    /// Sprite sheet quantized against the palette at startup
    pub sprite: Option<PathBuf>,
    /// Name of the demo shown first
    pub demo: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
            vsync: true,
            palette: None,
            sprite: None,
            demo: None,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Window size in screen pixels
    pub fn window_size(&self) -> (u32, u32) {
        let scale = self.scale.max(1);
        (self.width * scale, self.height * scale)
    }
}

/// Parse a `WIDTHxHEIGHT` resolution string such as `320x160`
pub fn parse_resolution(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
    let w = w.trim().parse::<u32>().map_err(|e| format!("bad width '{}': {}", w, e))?;
    let h = h.trim().parse::<u32>().map_err(|e| format!("bad height '{}': {}", h, e))?;
    if w == 0 || h == 0 {
        return Err(format!("resolution must be non-zero, got {}x{}", w, h));
    }
    Ok((w, h))
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            Self::Parse { path, source } => {
                write!(f, "invalid settings in {}: {}", path.display(), source)
            },
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("paladin-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!((s.width, s.height, s.scale), (320, 160, 4));
        assert!(s.vsync);
        assert_eq!(s.window_size(), (1280, 640));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s: Settings = serde_json::from_str(r#"{ "width": 128, "demo": "mandelbrot" }"#).unwrap();
        assert_eq!(s.width, 128);
        assert_eq!(s.height, DEFAULT_HEIGHT);
        assert_eq!(s.demo.as_deref(), Some("mandelbrot"));
        assert!(s.palette.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("save");
        let s = Settings {
            width: 64,
            height: 48,
            scale: 2,
            vsync: false,
            palette: Some(PathBuf::from("assets/pal.png")),
            sprite: None,
            demo: Some("shapes".to_string()),
        };
        s.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_load_errors() {
        assert!(matches!(
            Settings::load("no/such/settings.json"),
            Err(ConfigError::Io { .. })
        ));

        let path = temp_path("garbage");
        fs::write(&path, "{ not json").unwrap();
        let result = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("320x160"), Ok((320, 160)));
        assert_eq!(parse_resolution("64X32"), Ok((64, 32)));
        assert!(parse_resolution("320").is_err());
        assert!(parse_resolution("0x10").is_err());
        assert!(parse_resolution("axb").is_err());
    }
}
