use product_service::{
    build_router,
    infrastructure::{config::load_config, database::DatabaseManager, logger::Logger},
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    // 初始化日志
    Logger::init(&config.logging.level);

    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => info!("No configuration file found, using defaults"),
    }

    info!("Starting Product REST API Service...");

    // 初始化数据库
    let database = DatabaseManager::new(&config.database).await.map_err(|e| {
        error!("Failed to initialize database: {}", e);
        e
    })?;

    let app = build_router(database.into_pool());

    let listener = TcpListener::bind(config.server.socket_addr()).await?;
    let addr = listener.local_addr()?;

    info!("🚀 Product service running on http://{}", addr);
    info!("📖 API endpoints:");
    info!("   GET    /               - Service info");
    info!("   GET    /health         - Health check");
    info!("   GET    /products       - List products (?name=&category=&available=)");
    info!("   POST   /products       - Create product");
    info!("   GET    /products/:id   - Get product");
    info!("   PUT    /products/:id   - Update product");
    info!("   DELETE /products/:id   - Delete product");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
