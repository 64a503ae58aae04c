//! Route definitions for the Inventory & Order Management Platform

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - product catalog
        .nest("/products", product_routes())
        // Protected routes - variants
        .nest("/variants", variant_routes())
        // Protected routes - warehouses
        .nest("/warehouses", warehouse_routes())
        // Protected routes - stock transfer and views
        .nest("/stock", stock_routes())
        // Protected routes - purchase orders
        .nest("/purchase-orders", purchase_order_routes())
        // Protected routes - sales orders
        .nest("/sales-orders", sales_order_routes())
        // Protected routes - counterparties
        .nest("/vendors", vendor_routes())
        .nest("/customers", customer_routes())
        // Protected routes - finance
        .nest("/expenses", expense_routes())
        .nest("/receivables", receivable_routes())
}

/// Authentication routes (public, except /me)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn(auth_middleware)),
        )
}

/// Product catalog routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/low-stock", get(handlers::list_low_stock_products))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/variants", get(handlers::get_product_variants))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Variant routes (protected)
fn variant_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_variant))
        .route("/:variant_id", delete(handlers::delete_variant))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Warehouse routes (protected)
fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_warehouses).post(handlers::create_warehouse),
        )
        .route(
            "/:warehouse_id",
            get(handlers::get_warehouse).put(handlers::update_warehouse),
        )
        .route("/:warehouse_id/stock", put(handlers::set_warehouse_stock))
        .route(
            "/:warehouse_id/stock/:product_id",
            get(handlers::get_warehouse_stock_entry),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/transfer", post(handlers::transfer_stock))
        .route("/products/:product_id", get(handlers::get_product_stock))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase order routes (protected)
fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_orders).post(handlers::create_purchase_order),
        )
        .route(
            "/:order_id",
            get(handlers::get_purchase_order)
                .put(handlers::update_purchase_order)
                .delete(handlers::delete_purchase_order),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sales order routes (protected)
fn sales_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_sales_orders).post(handlers::create_sales_order),
        )
        .route(
            "/:order_id",
            get(handlers::get_sales_order)
                .put(handlers::update_sales_order)
                .delete(handlers::delete_sales_order),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Vendor routes (protected)
fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_vendors).post(handlers::create_vendor),
        )
        .route(
            "/:vendor_id",
            get(handlers::get_vendor)
                .put(handlers::update_vendor)
                .delete(handlers::delete_vendor),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Expense routes (protected)
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Receivable routes (protected)
fn receivable_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_receivables).post(handlers::create_receivable),
        )
        .route(
            "/:receivable_id",
            get(handlers::get_receivable)
                .put(handlers::update_receivable)
                .delete(handlers::delete_receivable),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}
