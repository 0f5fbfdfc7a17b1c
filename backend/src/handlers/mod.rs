//! HTTP handlers for the Sales & Inventory Management Platform

pub mod assistant;
pub mod auth;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod reports;
pub mod suppliers;

pub use assistant::*;
pub use auth::*;
pub use customers::*;
pub use health::*;
pub use inventory::*;
pub use orders::*;
pub use products::*;
pub use reports::*;
pub use suppliers::*;
