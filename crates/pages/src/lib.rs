//! # Marketdash Pages
//!
//! One module per published dashboard page, plus the raw-history pull jobs.
//! Each page is a batch pipeline: load what it needs through the injected
//! `HistorySource`, derive its table(s), and hand them to the injected
//! `PublishSink`. Per-asset failures exclude the asset and the run carries
//! on; a publish failure is fatal for the run.

// Declare the modules that constitute this crate.
pub mod anomalies;
pub mod ath;
pub mod compare;
pub mod correlation_page;
pub mod error;
pub mod pull;
pub mod stablecoins;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the key components to create a clean, public-facing API.
pub use anomalies::generate_anomaly_page;
pub use ath::generate_ath_page;
pub use compare::generate_compare_page;
pub use correlation_page::generate_correlation_page;
pub use error::PageError;
pub use pull::{coin_history_table, stock_history_table};
pub use stablecoins::generate_stablecoin_page;
