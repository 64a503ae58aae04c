//! HTTP handlers for the Inventory & Order Management Platform

pub mod auth;
pub mod customers;
pub mod expenses;
pub mod health;
pub mod products;
pub mod purchase_orders;
pub mod receivables;
pub mod sales_orders;
pub mod stock;
pub mod variants;
pub mod vendors;
pub mod warehouses;

pub use auth::*;
pub use customers::*;
pub use expenses::*;
pub use health::*;
pub use products::*;
pub use purchase_orders::*;
pub use receivables::*;
pub use sales_orders::*;
pub use stock::*;
pub use variants::*;
pub use vendors::*;
pub use warehouses::*;
