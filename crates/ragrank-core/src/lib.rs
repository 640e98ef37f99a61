//! ragrank-core - Core types and traits for ragrank
//!
//! This crate provides the passage model, configuration, error handling
//! and collaborator traits shared by the ranking pipeline and the CLI.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::{RankError, Result};
pub use traits::*;
pub use types::*;
