pub mod backtest;
pub mod combiner;
pub mod config;
pub mod cooccurrence;
pub mod evaluation;
pub mod predict;
pub mod scoring;
pub mod selector;
pub mod stats;
pub mod test_support;
