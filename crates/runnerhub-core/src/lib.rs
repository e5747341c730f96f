//! # runnerhub-core
//!
//! Core crate for RunnerHub. Contains the unified error system,
//! configuration schemas, typed identifiers, and the injectable
//! `Clock`/`CycleMeter` seams.
//!
//! This crate has **no** internal dependencies on other RunnerHub crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
