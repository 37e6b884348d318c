//! Trade API client, request types, and response normalization.

mod client;
pub mod normalize;
mod types;

pub use client::TradeApiClient;
pub use normalize::ShapeError;
pub use types::{PositionsParams, PositionsView, ProvidersParams, StatsParams};
