//! Screening engine: polling, filtering and cross-venue aggregation.

pub mod confirm;
pub mod deposit;
pub mod filter;
pub mod gate;
pub mod orderbook;
pub mod poller;

pub use confirm::*;
pub use deposit::*;
pub use filter::*;
pub use gate::*;
pub use orderbook::*;
pub use poller::*;
