//! Normalized entities produced from trade API payloads.

mod balance;
mod exchange;
mod position;
mod provider;
mod stats;

pub use balance::UserBalance;
pub use exchange::ExchangeConnection;
pub use position::{Position, RealInvestment, ReBuyTarget, Side, ValueStyle};
pub use provider::{DailyReturn, Provider};
pub use stats::{stat_value, ProviderStats};
