mod animate;
mod config;
mod render;

use animate::Animator;
use anyhow::{Context, Result};
use clap::Parser;
use config::{RunConfig, parse_borders};
use heatmap_core::{HeatSolver, InteriorStride, ParameterSpec, SimulationParameters};
use log::info;
use render::{ColorScale, render_layer};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// Flags left unset fall back to the config file, then to the built-in
/// defaults shown below.
#[derive(Parser, Debug)]
#[command(author, version, about = "2-D heat diffusion on a square plate")]
struct Args {
    /// JSON run configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Thermal diffusivity alpha [default: 2]
    #[arg(long)]
    diffusivity: Option<f64>,

    /// Grid spacing dx [default: 1]
    #[arg(long)]
    spatial_step: Option<f64>,

    /// Number of time layers [default: 500]
    #[arg(long)]
    max_time_steps: Option<usize>,

    /// Grid points per side [default: 50]
    #[arg(long)]
    plate_length: Option<usize>,

    /// Step the interior loops by the spatial step instead of by one cell
    #[arg(long)]
    legacy_stride: bool,

    /// Initial temperature of layer 0 [default: 0]
    #[arg(long, allow_hyphen_values = true)]
    initial: Option<f64>,

    /// Border temperatures "top,left,bottom,right" [default: 100,70,20,10]
    #[arg(long, allow_hyphen_values = true)]
    borders: Option<String>,

    /// Draw every n-th layer [default: 5]
    #[arg(long)]
    stride: Option<usize>,

    /// Pause between frames in seconds [default: 0.01]
    #[arg(long, allow_hyphen_values = true)]
    delay: Option<f64>,

    /// Passes over the time range, 0 loops until interrupted (Ctrl-C) [default: 1]
    #[arg(long)]
    cycles: Option<u32>,

    /// Render only this layer and exit
    #[arg(long)]
    frame: Option<usize>,

    /// Print a JSON run summary instead of drawing
    #[arg(long)]
    summary: bool,

    /// Draw with characters instead of 24-bit colors
    #[arg(long)]
    no_color: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct LayerStats {
    min: f64,
    max: f64,
    mean: f64,
}

#[derive(Serialize)]
struct RunSummary {
    parameters: ParameterSpec,
    time_step: f64,
    diffusion_number: f64,
    final_time: f64,
    final_layer: LayerStats,
    compute_ms: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let cfg = build_config(&args)?;
    let params = SimulationParameters::from_spec(cfg.parameters.clone())
        .context("invalid simulation parameters")?;
    info!(
        "plate {n}x{n}, {t} layers, dt={dt}, gamma={g}",
        n = params.plate_length(),
        t = params.max_time_steps(),
        dt = params.time_step(),
        g = params.diffusion_number()
    );

    let mut solver = HeatSolver::new(params);
    let t0 = Instant::now();
    solver.create_field();
    solver.set_borders(cfg.initial_value, cfg.borders)?;
    solver.calculate()?;
    let compute_ms = t0.elapsed().as_secs_f64() * 1e3;
    info!("calculation took {compute_ms:.1} ms");

    let scale = ColorScale {
        vmin: cfg.animation.vmin,
        vmax: cfg.animation.vmax,
    };
    let color = !args.no_color;
    let mut stdout = io::stdout().lock();

    if args.summary {
        let last = solver.max_time_steps() - 1;
        let view = solver.layer(last)?;
        let summary = RunSummary {
            parameters: solver.params().spec(),
            time_step: solver.time_step(),
            diffusion_number: solver.diffusion_number(),
            final_time: solver.time_at(last),
            final_layer: LayerStats {
                min: view.min(),
                max: view.max(),
                mean: view.mean(),
            },
            compute_ms,
        };
        serde_json::to_writer_pretty(&mut stdout, &summary)?;
        writeln!(stdout)?;
        return Ok(());
    }

    if let Some(k) = args.frame {
        let view = solver.layer(k)?;
        write!(stdout, "{}", render_layer(&view, solver.time_at(k), &scale, color))?;
        return Ok(());
    }

    let animator = Animator::new(
        cfg.animation.stride,
        cfg.animation.delay_duration()?,
        cfg.animation.cycles,
        color,
    )?;
    let field = solver.field().context("no field after calculation")?;
    // never raised here; `--cycles 0` runs until the process is interrupted
    let stop = AtomicBool::new(false);
    let frames = animator.play(field, solver.time_step(), &scale, &mut stdout, &stop)?;
    info!("drew {frames} frames");

    Ok(())
}

fn build_config(args: &Args) -> Result<RunConfig> {
    let mut cfg = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    let p = &mut cfg.parameters;
    if let Some(v) = args.diffusivity {
        p.diffusivity = v;
    }
    if let Some(v) = args.spatial_step {
        p.spatial_step = v;
    }
    if let Some(v) = args.max_time_steps {
        p.max_time_steps = v;
    }
    if let Some(v) = args.plate_length {
        p.plate_length = v;
    }
    if args.legacy_stride {
        p.stride = InteriorStride::SpatialStep;
    }

    if let Some(v) = args.initial {
        cfg.initial_value = v;
    }
    if let Some(s) = &args.borders {
        cfg.borders = parse_borders(s)?;
    }

    let a = &mut cfg.animation;
    if let Some(v) = args.stride {
        a.stride = v;
    }
    if let Some(v) = args.delay {
        a.delay = v;
    }
    if let Some(v) = args.cycles {
        a.cycles = v;
    }
    a.delay_duration()?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_core::BorderValues;

    #[test]
    fn defaults_match_reference_run() {
        let args = Args::parse_from(["heatmap"]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg, RunConfig::default());
        assert_eq!(cfg.parameters.plate_length, 50);
        assert_eq!(cfg.borders, BorderValues::from((100.0, 70.0, 20.0, 10.0)));
        assert_eq!(cfg.animation.stride, 5);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from([
            "heatmap",
            "--plate-length",
            "8",
            "--borders",
            "-1,2,3,4",
            "--legacy-stride",
            "--cycles",
            "0",
        ]);
        let cfg = build_config(&args).unwrap();
        assert_eq!(cfg.parameters.plate_length, 8);
        assert_eq!(cfg.parameters.stride, InteriorStride::SpatialStep);
        assert_eq!(cfg.borders.top, -1.0);
        assert_eq!(cfg.animation.cycles, 0);
        assert_eq!(cfg.parameters.diffusivity, 2.0);
    }

    #[test]
    fn bad_delay_is_rejected_before_solving() {
        for delay in ["1e30", "-1"] {
            let args = Args::parse_from(["heatmap", "--delay", delay]);
            assert!(build_config(&args).is_err(), "delay {delay} accepted");
        }
    }

    #[test]
    fn bad_border_flag_is_an_error() {
        let args = Args::parse_from(["heatmap", "--borders", "1,2"]);
        assert!(build_config(&args).is_err());
    }
}
