//! Session parameters
//!
//! Read from the page query string on the web, from JSON when embedded.
//! Nothing here is persisted.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Parameters fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Ducks to collect before the session completes
    pub target: u32,
    /// Arena half-extent
    pub bounds: f32,
    /// Per-command move distance
    pub step: f32,
    /// y-coordinate for the player and ducks
    pub rest_height: f32,
    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET,
            bounds: DEFAULT_BOUNDS,
            step: DEFAULT_STEP,
            rest_height: DEFAULT_REST_HEIGHT,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse a URL query string such as `?target=3&bounds=2.5&seed=42`.
    ///
    /// Unknown keys are ignored. Values that fail to parse or validate are
    /// logged and the default is kept.
    pub fn from_query(query: &str) -> Self {
        let mut settings = Self::default();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let applied = match key {
                "target" => value.parse().ok().map(|v| settings.target = v),
                "bounds" => parse_f32(value)
                    .filter(|v| *v >= 0.0)
                    .map(|v| settings.bounds = v),
                "step" => parse_f32(value)
                    .filter(|v| *v > 0.0)
                    .map(|v| settings.step = v),
                "rest_height" => parse_f32(value).map(|v| settings.rest_height = v),
                "seed" => value.parse().ok().map(|v| settings.seed = Some(v)),
                _ => continue,
            };
            if applied.is_none() {
                log::warn!("Ignoring invalid setting {}={:?}", key, value);
            }
        }

        settings
    }

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Option<Self> {
        match serde_json::from_str(json) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Invalid settings JSON: {}", e);
                None
            }
        }
    }
}

/// Finite f32 or nothing
fn parse_f32(s: &str) -> Option<f32> {
    s.parse::<f32>().ok().filter(|v| v.is_finite())
}
