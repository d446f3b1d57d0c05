//! 产品业务服务
//!
//! 所有查询都是对 `products` 表的简单谓词扫描，不分页，按 `id` 升序返回。

use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePool;
use tracing::info;

use super::model::{parse_price_query, Category, Product, ValidationError};
use crate::core::error::CoreError;

const SELECT_PRODUCTS: &str =
    "SELECT id, name, description, price, available, category FROM products";

/// 数据库中的一行；`price` 以文本保存以保留小数位
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: String,
    available: bool,
    category: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = CoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = row.price.parse::<Decimal>().map_err(|e| {
            CoreError::InternalServerError(format!(
                "stored price '{}' of product {} is not a decimal: {}",
                row.price, row.id, e
            ))
        })?;
        let category = row.category.parse::<Category>().map_err(|e| {
            CoreError::InternalServerError(format!(
                "stored category of product {} is invalid: {}",
                row.id, e
            ))
        })?;

        Ok(Product {
            id: Some(row.id),
            name: row.name,
            description: row.description,
            price,
            available: row.available,
            category,
        })
    }
}

fn into_products(rows: Vec<ProductRow>) -> Result<Vec<Product>, CoreError> {
    rows.into_iter().map(Product::try_from).collect()
}

#[derive(Clone)]
pub struct ProductService {
    pool: SqlitePool,
}

impl ProductService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 插入新产品；调用方提供的 `id` 会被丢弃，写回存储分配的新 `id`
    pub async fn create(&self, product: &mut Product) -> Result<(), CoreError> {
        info!("Creating {}", product.name);
        product.id = None;

        let result = sqlx::query(
            "INSERT INTO products (name, description, price, available, category) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(product.available)
        .bind(product.category.as_str())
        .execute(&self.pool)
        .await?;

        product.id = Some(result.last_insert_rowid());
        Ok(())
    }

    /// 覆盖已存在产品的全部可变字段
    pub async fn update(&self, product: &Product) -> Result<(), CoreError> {
        info!("Saving {}", product.name);
        let id = product
            .id
            .ok_or_else(|| ValidationError::new("Update called with empty ID field"))?;

        let result = sqlx::query(
            "UPDATE products SET name = ?, description = ?, price = ?, available = ?, category = ? WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.to_string())
        .bind(product.available)
        .bind(product.category.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(format!(
                "Product with id '{}' was not found.",
                id
            )));
        }
        Ok(())
    }

    /// 删除产品；不存在的 `id` 不视为错误
    pub async fn delete(&self, id: i64) -> Result<(), CoreError> {
        info!("Deleting product id [{}]", id);
        sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn all(&self) -> Result<Vec<Product>, CoreError> {
        info!("Processing all Products");
        let sql = format!("{} ORDER BY id", SELECT_PRODUCTS);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        into_products(rows)
    }

    pub async fn find(&self, id: i64) -> Result<Option<Product>, CoreError> {
        info!("Processing lookup for id {} ...", id);
        let sql = format!("{} WHERE id = ?", SELECT_PRODUCTS);
        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Product::try_from).transpose()
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Product>, CoreError> {
        info!("Processing name query for {} ...", name);
        let sql = format!("{} WHERE name = ? ORDER BY id", SELECT_PRODUCTS);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await?;
        into_products(rows)
    }

    /// 按数值相等比较，`9.9` 与 `9.90` 视为同一价格
    pub async fn find_by_price(&self, price: Decimal) -> Result<Vec<Product>, CoreError> {
        info!("Processing price query for {} ...", price);
        let mut products = self.all().await?;
        products.retain(|product| product.price == price);
        Ok(products)
    }

    /// 接受带引号或空格的文本形式，例如 `"\"9.99\""`
    pub async fn find_by_price_text(&self, raw: &str) -> Result<Vec<Product>, CoreError> {
        let price = parse_price_query(raw)?;
        self.find_by_price(price).await
    }

    pub async fn find_by_availability(&self, available: bool) -> Result<Vec<Product>, CoreError> {
        info!("Processing available query for {} ...", available);
        let sql = format!("{} WHERE available = ? ORDER BY id", SELECT_PRODUCTS);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(available)
            .fetch_all(&self.pool)
            .await?;
        into_products(rows)
    }

    pub async fn find_by_available(&self) -> Result<Vec<Product>, CoreError> {
        self.find_by_availability(true).await
    }

    pub async fn find_by_category(&self, category: Category) -> Result<Vec<Product>, CoreError> {
        info!("Processing category query for {} ...", category);
        let sql = format!("{} WHERE category = ? ORDER BY id", SELECT_PRODUCTS);
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(category.as_str())
            .fetch_all(&self.pool)
            .await?;
        into_products(rows)
    }
}
