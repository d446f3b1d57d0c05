//! 产品处理器

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};
use tracing::info;

use super::{
    model::{Product, ValidationError},
    service::ProductService,
};
use crate::core::{
    error::CoreError,
    extract::{IdPath, JsonBody},
    response::{base_url, Created},
};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
}

/// 列表查询参数，全部在内存中过滤
#[derive(Debug, Default)]
pub struct ProductQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub available: Option<String>,
}

impl ProductQuery {
    /// 由原始查询参数构造，同名参数只取第一个值，未知参数忽略
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = ProductQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "name" => &mut query.name,
                "category" => &mut query.category,
                "available" => &mut query.available,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    /// 空的 `name`/`category` 不参与过滤；`available` 只要出现就参与
    pub fn apply(&self, mut products: Vec<Product>) -> Vec<Product> {
        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            products.retain(|p| p.name == name);
        }
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            products.retain(|p| p.category.as_str() == category);
        }
        if let Some(available) = self.available.as_deref() {
            let available = parse_flag(available);
            products.retain(|p| p.available == available);
        }
        products
    }
}

/// `true`/`1`/`yes`（不区分大小写）为真，其余为假
fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

fn not_found(id: i64) -> CoreError {
    CoreError::NotFound(format!("Product with id '{}' was not found.", id))
}

pub async fn create_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: JsonBody,
) -> Result<Created<Product>, CoreError> {
    info!("Request to Create a Product...");
    let data = body.parse()?;
    if data.get("name").is_none() {
        return Err(ValidationError::new("Missing required field: name").into());
    }

    let mut product = Product::from_json(&data)?;
    state.product_service.create(&mut product).await?;

    let id = product.id.unwrap_or_default();
    info!("Product with id [{}] saved!", id);
    let location = format!("{}/products/{}", base_url(&headers), id);

    Ok(Created::new(location, product))
}

pub async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<Product>, CoreError> {
    info!("Request to Retrieve a product with id [{}]", id);

    let product = state
        .product_service
        .find(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    body: JsonBody,
) -> Result<Json<Product>, CoreError> {
    info!("Request to Update a product with id [{}]", id);

    let mut product = state
        .product_service
        .find(id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let data = body.parse()?;
    product.apply_json(&data)?;
    state.product_service.update(&product).await?;

    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<StatusCode, CoreError> {
    info!("Request to Delete a product with id [{}]", id);

    state.product_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let query = ProductQuery::from_pairs(pairs);
    info!("Request to list Products {:?}", query);

    let products = query.apply(state.product_service.all().await?);
    info!("Returning {} products", products.len());

    Ok(Json(products))
}
