//! 服务元信息

use serde::Serialize;

pub const SERVICE_NAME: &str = "Product REST API Service";
pub const SERVICE_VERSION: &str = "1.0";

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}
