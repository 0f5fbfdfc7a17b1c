//! Business logic services for the Sales & Inventory Management Platform

pub mod assistant;
pub mod auth;
pub mod customers;
pub mod inventory;
pub mod ledger;
pub mod orders;
pub mod products;
pub mod reports;
pub mod suppliers;

pub use assistant::AssistantService;
pub use auth::AuthService;
pub use customers::CustomerService;
pub use inventory::InventoryService;
pub use orders::OrderService;
pub use products::ProductService;
pub use reports::ReportService;
pub use suppliers::SupplierService;
