use crate::render::{ColorScale, render_layer};
use anyhow::{Result, bail};
use heatmap_core::TemperatureField;
use log::debug;
use std::io::Write;
use std::iter::StepBy;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Replays a computed field frame by frame.
#[derive(Clone, Debug)]
pub struct Animator {
    stride: usize,
    delay: Duration,
    cycles: u32,
    color: bool,
}

impl Animator {
    /// `cycles == 0` keeps looping until the stop flag is raised.
    pub fn new(stride: usize, delay: Duration, cycles: u32, color: bool) -> Result<Self> {
        if stride == 0 {
            bail!("animation stride must be >= 1");
        }
        Ok(Animator {
            stride,
            delay,
            cycles,
            color,
        })
    }

    pub fn frame_indices(&self, layers: usize) -> StepBy<Range<usize>> {
        (0..layers).step_by(self.stride)
    }

    /// Draws frames into `out` until the cycle count is reached or `stop` is
    /// set. Returns the number of frames drawn.
    pub fn play<W: Write>(
        &self,
        field: &TemperatureField,
        time_step: f64,
        scale: &ColorScale,
        out: &mut W,
        stop: &AtomicBool,
    ) -> Result<usize> {
        let mut frames = 0;
        let mut cycle = 0u32;
        while self.cycles == 0 || cycle < self.cycles {
            for k in self.frame_indices(field.layers()) {
                if stop.load(Ordering::Relaxed) {
                    debug!("animation stopped after {frames} frames");
                    return Ok(frames);
                }
                let Some(view) = field.layer_view(k) else {
                    break;
                };
                let frame = render_layer(&view, k as f64 * time_step, scale, self.color);
                write!(out, "{CLEAR_SCREEN}{frame}")?;
                out.flush()?;
                frames += 1;
                if !self.delay.is_zero() {
                    thread::sleep(self.delay);
                }
            }
            cycle = cycle.saturating_add(1);
        }
        Ok(frames)
    }
}
