//! Shared types and models for the Sales & Inventory Management Platform
//!
//! This crate contains types shared between the backend and other components
//! of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
