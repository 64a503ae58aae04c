//! Business logic services for the Inventory & Order Management Platform

pub mod auth;
pub mod customer;
pub mod expense;
pub mod product;
pub mod purchase_order;
pub mod receivable;
pub mod sales_order;
pub mod stock;
pub mod variant;
pub mod vendor;
pub mod warehouse;

pub use auth::AuthService;
pub use customer::CustomerService;
pub use expense::ExpenseService;
pub use product::ProductService;
pub use purchase_order::PurchaseOrderService;
pub use receivable::ReceivableService;
pub use sales_order::SalesOrderService;
pub use stock::StockService;
pub use variant::VariantService;
pub use vendor::VendorService;
pub use warehouse::WarehouseService;
