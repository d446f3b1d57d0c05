//! 集成测试公共工具：测试服务器和产品工厂
#![allow(dead_code)]

use axum_test::TestServer;
use product_service::{
    app::product::model::Category, build_router, infrastructure::database::DatabaseManager,
};
use rand::{seq::SliceRandom, Rng};
use rust_decimal::Decimal;
use serde_json::{json, Value};

/// 每个测试使用独立的内存数据库
pub async fn test_server() -> TestServer {
    let database = DatabaseManager::in_memory()
        .await
        .expect("Failed to create test database");
    TestServer::new(build_router(database.into_pool())).expect("Failed to start test server")
}

const WORDS: [&str; 12] = [
    "Hat", "Shoes", "Sheets", "Wrench", "Apple", "Lamp", "Tyre", "Scarf", "Bread", "Drill",
    "Towel", "Wiper",
];

const SENTENCES: [&str; 4] = [
    "Nothing fancy, just reliable.",
    "A customer favourite this season.",
    "Sturdy and easy to clean.",
    "Limited stock available.",
];

/// 生成随机但合法的产品请求体
pub struct ProductFactory;

impl ProductFactory {
    pub fn build() -> Value {
        let mut rng = rand::thread_rng();
        let price = Decimal::new(rng.gen_range(100..10_000), 2);

        json!({
            "name": WORDS.choose(&mut rng).copied().unwrap_or("Widget"),
            "description": SENTENCES.choose(&mut rng).copied().unwrap_or_default(),
            "price": price.to_string(),
            "available": rng.gen_bool(0.5),
            "category": Category::ALL.choose(&mut rng).copied().unwrap_or_default().as_str(),
        })
    }

    pub fn build_batch(count: usize) -> Vec<Value> {
        (0..count).map(|_| Self::build()).collect()
    }
}

/// POST 一个产品并返回响应体，要求 201
pub async fn create(server: &TestServer, payload: &Value) -> Value {
    let response = server.post("/products").json(payload).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()
}
