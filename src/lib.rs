//! Europe Electricity Explorer
//!
//! Data pipeline and dashboard for Ember's yearly European electricity
//! release: generation mix by fuel and CO2 intensity trends per country.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod gui;
pub mod logging;
pub mod stats;
