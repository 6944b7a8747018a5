pub mod model;

pub use model::Transaction;

/// Reserved sender for coinbase rewards; the only way new coins enter circulation.
pub const SYSTEM_SENDER: &str = "System";
