//! 请求体提取器

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderMap},
};
use serde_json::Value;

use super::error::CoreError;

/// 要求 `Content-Type: application/json` 的请求体
///
/// 媒体类型在提取时检查（失败为 415），JSON 解析推迟到 [`JsonBody::parse`]，
/// 以便处理器先做存在性检查。
pub struct JsonBody(Bytes);

impl JsonBody {
    pub fn parse(&self) -> Result<Value, CoreError> {
        serde_json::from_slice(&self.0)
            .map_err(|e| CoreError::BadRequest(format!("Malformed JSON body: {}", e)))
    }
}

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_json_content_type(req.headers()) {
            return Err(CoreError::UnsupportedMediaType(
                "Content-Type must be application/json".to_string(),
            ));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| CoreError::BadRequest(e.body_text()))?;

        Ok(Self(bytes))
    }
}

/// 路径中的整数 id
///
/// 无法解析为整数的 id 不可能对应任何记录，按 404 处理，错误体与其他错误一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdPath(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = CoreError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| CoreError::NotFound(e.body_text()))?;

        raw.parse::<i64>()
            .map(IdPath)
            .map_err(|_| CoreError::NotFound(format!("No record with id '{}' exists.", raw)))
    }
}

/// `application/json` 或 `application/*+json`，忽略参数和大小写
pub fn is_json_content_type(headers: &HeaderMap) -> bool {
    let content_type = match headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        Some(content_type) => content_type,
        None => return false,
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
