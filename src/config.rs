use std::env;

use crate::color::normalize_hex;
use crate::scale::{DEFAULT_COLOR, sanitize_palette_name};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub default_color: String,
    pub default_palette_name: String,
    pub swatch_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            default_color: DEFAULT_COLOR.to_string(),
            default_palette_name: "primary".to_string(),
            swatch_size: 64,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup, falling back to defaults for
    /// missing or malformed values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            // Server
            host: lookup("HOST").unwrap_or(defaults.host),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            // Palette
            default_color: lookup("DEFAULT_COLOR")
                .and_then(|v| normalize_hex(&v))
                .unwrap_or(defaults.default_color),
            default_palette_name: lookup("DEFAULT_PALETTE_NAME")
                .and_then(|v| sanitize_palette_name(&v))
                .unwrap_or(defaults.default_palette_name),
            swatch_size: lookup("SWATCH_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|&size| size > 0)
                .unwrap_or(defaults.swatch_size),
        }
    }
}
