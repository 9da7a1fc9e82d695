use anyhow::{Context, Result, bail};
use heatmap_core::{BorderValues, ParameterSpec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Everything needed for one run, as read from a JSON file.
///
/// Missing keys fall back to the built-in defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub parameters: ParameterSpec,
    pub initial_value: f64,
    pub borders: BorderValues,
    pub animation: AnimationConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Draw every `stride`-th layer.
    pub stride: usize,
    /// Pause between frames, seconds.
    pub delay: f64,
    /// Passes over the time range; 0 loops until interrupted.
    pub cycles: u32,
    /// Color scale range.
    pub vmin: f64,
    pub vmax: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            parameters: ParameterSpec::default(),
            initial_value: 0.0,
            borders: BorderValues::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            stride: 5,
            delay: 0.01,
            cycles: 1,
            vmin: 0.0,
            vmax: 100.0,
        }
    }
}

impl AnimationConfig {
    pub fn delay_duration(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.delay).with_context(|| {
            format!("delay must be a non-negative number of seconds, got {}", self.delay)
        })
    }
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

/// Parses `top,left,bottom,right`.
pub fn parse_borders(s: &str) -> Result<BorderValues> {
    let mut out = Vec::with_capacity(4);
    for part in s.split(',') {
        let p = part.trim();
        let v: f64 = p
            .parse()
            .with_context(|| format!("border value `{p}` is not a number"))?;
        out.push(v);
    }
    match *out.as_slice() {
        [top, left, bottom, right] => Ok(BorderValues::from((top, left, bottom, right))),
        _ => bail!("expected 4 border values (top,left,bottom,right), got {}", out.len()),
    }
}
