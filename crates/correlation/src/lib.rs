//! # Marketdash Correlation Engine
//!
//! This crate computes the cross-asset correlation matrices shown on the
//! dashboard: daily rates of return per asset, pairwise date alignment, and
//! Pearson coefficients over a set of rolling lookback windows.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of
//!   external systems. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** The `CorrelationEngine` is a stateless
//!   calculator. It takes return series as input and produces one
//!   `CorrelationMatrix` per lookback window as output. This makes it highly
//!   reliable and easy to test.
//! - **Undefined is a value, not an error:** a pair/window whose coefficient
//!   cannot be computed (too few aligned rows, constant returns) carries
//!   `None` through to the published matrix instead of a fabricated number.
//!
//! ## Public API
//!
//! - `ReturnSeries`: daily rate-of-return series derived from a price history.
//! - `AlignedPair`: the common-date, both-defined subset of two return series.
//! - `pearson`: the windowed Pearson coefficient for one aligned pair.
//! - `CorrelationEngine` / `CorrelationMatrix`: the full N x N assembly.

// Declare the modules that constitute this crate.
pub mod align;
pub mod matrix;
pub mod pearson;
pub mod returns;

// Re-export the key components to create a clean, public-facing API.
pub use align::{AlignedPair, AlignedRow};
pub use matrix::{CorrelationEngine, CorrelationMatrix};
pub use pearson::pearson;
pub use returns::{ReturnPoint, ReturnSeries};
