//! # runnerhub-client
//!
//! Client-side countdown projection: pure derived remaining-time state
//! over a lease's start timestamp and duration. Advisory only: the
//! server-side reclamation service remains the expiry authority.

pub mod countdown;

pub use countdown::{Countdown, CountdownInputs, remaining_seconds};
