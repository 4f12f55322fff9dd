//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::{format_rate, mix_bar_heights, ChartPlotter};
pub use renderer::{stack_segments, RenderError, StaticChartRenderer, StackSegment};

/// Fuel colours in stack order. Country series reuse the same sequence.
pub const PALETTE: [(u8, u8, u8); 11] = [
    (0x00, 0x68, 0xc9),
    (0x83, 0xc9, 0xff),
    (0xff, 0x2b, 0x2b),
    (0xff, 0xab, 0xab),
    (0x29, 0xb0, 0x9d),
    (0x7d, 0xef, 0xa1),
    (0xff, 0x87, 0x00),
    (0xff, 0xd1, 0x6a),
    (0x6d, 0x3f, 0xc0),
    (0xb5, 0x1d, 0x80),
    (0xbf, 0xc2, 0xc7),
];

/// Year axis ticks are anchored at 5 and spaced 5 apart.
pub const YEAR_TICK_ANCHOR: f64 = 5.0;
pub const YEAR_TICK_STEP: f64 = 5.0;

const MAX_TICKS: f64 = 60.0;

/// Tick positions `anchor + k * step` that fall inside `[min, max]`.
///
/// On very wide ranges the step grows tenfold until at most 60 ticks remain.
pub fn linear_ticks(min: f64, max: f64, anchor: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !min.is_finite() || !max.is_finite() || min > max {
        return Vec::new();
    }

    let mut step = step;
    while (max - min) / step > MAX_TICKS {
        step *= 10.0;
    }

    let first = ((min - anchor) / step).ceil() as i64;
    let last = ((max - anchor) / step).floor() as i64;
    (first..=last).map(|k| anchor + k as f64 * step).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_ticks_are_multiples_of_five() {
        let ticks = linear_ticks(1989.0, 2024.0, YEAR_TICK_ANCHOR, YEAR_TICK_STEP);
        assert_eq!(
            ticks,
            [1990.0, 1995.0, 2000.0, 2005.0, 2010.0, 2015.0, 2020.0]
        );
    }

    #[test]
    fn ticks_include_range_edges() {
        assert_eq!(linear_ticks(5.0, 15.0, 5.0, 5.0), [5.0, 10.0, 15.0]);
    }

    #[test]
    fn invalid_ranges_have_no_ticks() {
        assert!(linear_ticks(10.0, 0.0, 5.0, 5.0).is_empty());
        assert!(linear_ticks(0.0, 10.0, 5.0, 0.0).is_empty());
        assert!(linear_ticks(f64::NEG_INFINITY, 10.0, 5.0, 5.0).is_empty());
    }

    #[test]
    fn wide_ranges_are_thinned() {
        let ticks = linear_ticks(0.0, 10_000.0, 5.0, 5.0);
        assert!(ticks.len() <= 60);
        assert_eq!(ticks.first(), Some(&5.0));
    }
}
