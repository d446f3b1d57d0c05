//! 首页与健康检查

use axum::response::Json;

use super::model::{HealthStatus, ServiceInfo, SERVICE_NAME, SERVICE_VERSION};

pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: SERVICE_NAME,
        version: SERVICE_VERSION,
    })
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK",
        message: "OK",
    })
}
