//! Usage log entity and quota value types.

pub mod model;

pub use model::{QuotaAllowance, UsageLog};
