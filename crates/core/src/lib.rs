//! Core data types for the dump screener.

pub mod chain;
pub mod deposit;
pub mod listing;
pub mod orderbook;
pub mod snapshot;
pub mod venue;

pub use chain::*;
pub use deposit::*;
pub use listing::*;
pub use orderbook::*;
pub use snapshot::*;
pub use venue::*;
