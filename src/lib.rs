pub mod comparison;
pub mod config;
pub mod datasets;
pub mod export;
pub mod fdr;
pub mod formatting;
pub mod results;
pub mod standings;
pub mod state;
pub mod views;
