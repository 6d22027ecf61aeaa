pub mod error;
pub mod series;

// Re-export the core types to provide a clean public API.
pub use error::DataError;
pub use series::{AssetId, PricePoint, PriceSeries};
