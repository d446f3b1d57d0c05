//! # Product REST API Service
//!
//! 基于 Axum + SQLx 的产品 CRUD 服务：
//! - `app`：产品与系统路由的处理器、模型和服务
//! - `core`：统一错误、响应、请求体提取和中间件
//! - `infrastructure`：配置、数据库连接池和日志

pub mod app;
pub mod core;
pub mod infrastructure;

use axum::{middleware, routing::get, Router};
use sqlx::sqlite::SqlitePool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use app::product::{
    handler::{self as product_handler, AppState},
    service::ProductService,
};
use app::system::handler as system_handler;
use crate::core::middleware::request_logging_middleware;

/// 创建路由，数据库连接池通过 `AppState` 显式传入各处理器
pub fn build_router(pool: SqlitePool) -> Router {
    let state = AppState {
        product_service: ProductService::new(pool),
    };

    Router::new()
        .route("/", get(system_handler::index))
        .route("/health", get(system_handler::health))
        .route(
            "/products",
            get(product_handler::list_products).post(product_handler::create_product),
        )
        .route(
            "/products/:id",
            get(product_handler::get_product)
                .put(product_handler::update_product)
                .delete(product_handler::delete_product),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}
