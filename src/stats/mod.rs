//! Statistics module - CO2 intensity trend estimation

mod calculator;

pub use calculator::{
    CountryTrend, LinearFit, StatsCalculator, TrendResult, TrendSeries, CO2_INTENSITY,
};
