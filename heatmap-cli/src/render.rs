//! Terminal rendering of a single time layer as a color-mapped grid.

use colored::Colorize;
use heatmap_core::LayerView;

/// Density ramp used when colors are disabled, coldest first.
const RAMP: &[u8] = b" .:-=+*#%@";

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    pub vmin: f64,
    pub vmax: f64,
}

impl Default for ColorScale {
    fn default() -> Self {
        ColorScale {
            vmin: 0.0,
            vmax: 100.0,
        }
    }
}

impl ColorScale {
    /// Position of `value` in the range, clamped to `[0, 1]`.
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.vmax - self.vmin;
        if span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - self.vmin) / span).clamp(0.0, 1.0)
    }

    pub fn jet(&self, value: f64) -> (u8, u8, u8) {
        let t = self.normalize(value);
        let channel = |center: f64| {
            let v = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
            (v * 255.0).round() as u8
        };
        (channel(3.0), channel(2.0), channel(1.0))
    }

    fn glyph(&self, value: f64) -> char {
        let last = RAMP.len() - 1;
        RAMP[(self.normalize(value) * last as f64).round() as usize] as char
    }
}

/// Draws one layer: title, grid (row 0 at the bottom), axis labels and a
/// colorbar.
pub fn render_layer(view: &LayerView<'_>, time: f64, scale: &ColorScale, color: bool) -> String {
    let n = view.size();
    let mut out = String::new();
    let cell = |v: f64| -> String {
        if color {
            let (r, g, b) = scale.jet(v);
            "  ".on_truecolor(r, g, b).to_string()
        } else {
            let c = scale.glyph(v);
            format!("{c}{c}")
        }
    };

    out.push_str(&format!("Temperature at t = {time:.3} unit time\n"));
    for (offset, row) in view.rows().rev().enumerate() {
        let i = n - 1 - offset;
        let label = if offset == n / 2 { "y" } else { " " };
        out.push_str(&format!("{label} {i:>4} "));
        for &v in row {
            out.push_str(&cell(v));
        }
        out.push('\n');
    }

    let width = 2 * n;
    out.push_str(&format!("{:7}0{:>w$}\n", "", n - 1, w = width.saturating_sub(1)));
    out.push_str(&format!("{:7}{:^width$}\n", "", "x"));

    let bar: String = (0..=20)
        .map(|s| cell(scale.vmin + (scale.vmax - scale.vmin) * s as f64 / 20.0))
        .collect();
    out.push_str(&format!("{:7}{} {} .. {}\n", "", bar, scale.vmin, scale.vmax));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use heatmap_core::HeatSolver;

    #[test]
    fn jet_endpoints_and_middle() {
        let s = ColorScale::default();
        assert_eq!(s.jet(0.0), (0, 0, 128));
        assert_eq!(s.jet(100.0), (128, 0, 0));
        assert_eq!(s.jet(50.0), (128, 255, 128));
        // clamped outside the range
        assert_eq!(s.jet(-10.0), s.jet(0.0));
        assert_eq!(s.jet(1e6), s.jet(100.0));
    }

    #[test]
    fn degenerate_range_maps_to_cold() {
        let s = ColorScale { vmin: 5.0, vmax: 5.0 };
        assert_eq!(s.normalize(7.0), 0.0);
    }

    #[test]
    fn plain_render_puts_row_zero_last() {
        let mut solver = HeatSolver::initialize(1.0, 1.0, 2, 4).unwrap();
        solver.run(0.0, (100.0, 0.0, 0.0, 0.0)).unwrap();
        let view = solver.layer(0).unwrap();
        let text = render_layer(&view, 0.0, &ColorScale::default(), false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Temperature at t = 0.000 unit time");
        // top row (index 3) is drawn first: left/right corners 0, hot middle
        assert!(lines[1].ends_with("  @@@@  "));
        assert!(lines[4].ends_with("        "));
        assert!(lines[4].contains("   0 "));
        assert!(text.contains('x'));
    }
}
