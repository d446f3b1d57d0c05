//! 产品数据模型
//!
//! `Product` 是服务中唯一的实体。JSON 线上格式中 `price` 以十进制字符串表示，
//! `category` 以枚举名表示。

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::core::error::CoreError;

/// 反序列化或校验失败
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    fn missing(key: &str) -> Self {
        Self(format!("Missing or invalid field: {}", key))
    }
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        CoreError::BadRequest(err.0)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| match &error.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for field: {}", field),
                })
            })
            .collect();
        messages.sort();

        ValidationError(messages.join(", "))
    }
}

/// 产品分类（封闭集合）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    #[default]
    Unknown,
    Cloths,
    Food,
    Housewares,
    Automotive,
    Tools,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Unknown,
        Category::Cloths,
        Category::Food,
        Category::Housewares,
        Category::Automotive,
        Category::Tools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unknown => "UNKNOWN",
            Category::Cloths => "CLOTHS",
            Category::Food => "FOOD",
            Category::Housewares => "HOUSEWARES",
            Category::Automotive => "AUTOMOTIVE",
            Category::Tools => "TOOLS",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    /// 只接受精确的枚举名（区分大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ValidationError(format!("Invalid category: {}", s)))
    }
}

/// 产品记录
///
/// `id` 在插入前为 `None`，由存储分配后不再改变。
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct Product {
    pub id: Option<i64>,
    #[validate(length(min = 1, max = 100, message = "name must be between 1 and 100 characters"))]
    pub name: String,
    #[validate(length(max = 250, message = "description must be at most 250 characters"))]
    pub description: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
    pub available: bool,
    pub category: Category,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            available: true,
            category: Category::Unknown,
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}

impl Product {
    /// 序列化为 JSON 对象
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("id".into(), self.id.map_or(Value::Null, Value::from));
        object.insert("name".into(), Value::String(self.name.clone()));
        object.insert("description".into(), Value::String(self.description.clone()));
        object.insert("price".into(), Value::String(self.price.to_string()));
        object.insert("available".into(), Value::Bool(self.available));
        object.insert("category".into(), Value::String(self.category.to_string()));
        Value::Object(object)
    }

    /// 从 JSON 对象构造一个尚未持久化的产品，忽略其中的 `id`
    pub fn from_json(data: &Value) -> Result<Self, ValidationError> {
        let mut product = Product::default();
        product.apply_json(data)?;
        Ok(product)
    }

    /// 用 JSON 对象覆盖全部可变字段，保留 `id`
    ///
    /// 要么全部字段生效，要么返回错误且记录保持不变。
    pub fn apply_json(&mut self, data: &Value) -> Result<&mut Self, ValidationError> {
        let object = data.as_object().ok_or_else(|| {
            ValidationError(format!(
                "Invalid product payload: expected object, got {}",
                json_type(data)
            ))
        })?;
        let field = |key: &str| object.get(key).ok_or_else(|| ValidationError::missing(key));

        let candidate = Product {
            id: self.id,
            name: expect_string("name", field("name")?)?,
            description: expect_string("description", field("description")?)?,
            price: parse_price(field("price")?)?,
            available: match field("available")? {
                Value::Bool(available) => *available,
                other => {
                    return Err(ValidationError(format!(
                        "Invalid type for boolean [available]: {}",
                        json_type(other)
                    )))
                }
            },
            category: match field("category")? {
                Value::String(name) => name.parse()?,
                other => {
                    return Err(ValidationError(format!(
                        "Invalid category: {}",
                        other
                    )))
                }
            },
        };
        candidate.validate()?;

        *self = candidate;
        Ok(self)
    }
}

/// 解析查询参数中的价格，去掉两侧的空格和双引号（例如 `" \"9.99\" "`）
pub fn parse_price_query(raw: &str) -> Result<Decimal, ValidationError> {
    parse_decimal(raw.trim_matches(|c| c == ' ' || c == '"'))
}

fn parse_price(value: &Value) -> Result<Decimal, ValidationError> {
    match value {
        Value::String(text) => parse_decimal(text.trim()),
        Value::Number(number) => parse_decimal(&number.to_string()),
        other => Err(ValidationError(format!(
            "Invalid type for decimal [price]: {}",
            json_type(other)
        ))),
    }
}

/// 负零统一为正零（`"-0.00"` 读入后输出 `"0.00"`），小数位保持不变
fn parse_decimal(text: &str) -> Result<Decimal, ValidationError> {
    let mut value = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| ValidationError(format!("Invalid price: {}", text)))?;
    if value.is_zero() {
        value.set_sign_positive(true);
    }
    Ok(value)
}

fn expect_string(key: &str, value: &Value) -> Result<String, ValidationError> {
    value.as_str().map(str::to_string).ok_or_else(|| {
        ValidationError(format!(
            "Invalid type for string [{}]: {}",
            key,
            json_type(value)
        ))
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget() -> Value {
        json!({
            "name": "Widget",
            "description": "d",
            "price": "9.99",
            "available": true,
            "category": "TOOLS"
        })
    }

    #[test]
    fn test_from_json_reads_all_fields() {
        let product = Product::from_json(&widget()).unwrap();

        assert_eq!(product.id, None);
        assert_eq!(product.name, "Widget");
        assert_eq!(product.description, "d");
        assert_eq!(product.price, Decimal::from_str("9.99").unwrap());
        assert!(product.available);
        assert_eq!(product.category, Category::Tools);
    }

    #[test]
    fn test_from_json_discards_client_id() {
        let mut data = widget();
        data["id"] = json!(42);

        let product = Product::from_json(&data).unwrap();
        assert_eq!(product.id, None);
    }

    #[test]
    fn test_to_json_keeps_price_scale_and_category_name() {
        let mut data = widget();
        data["price"] = json!("10.50");
        data["category"] = json!("HOUSEWARES");
        let mut product = Product::from_json(&data).unwrap();
        product.id = Some(7);

        let value = product.to_json();
        assert_eq!(value["id"], 7);
        assert_eq!(value["price"], "10.50");
        assert_eq!(value["category"], "HOUSEWARES");
        assert_eq!(value, serde_json::to_value(&product).unwrap());
    }

    #[test]
    fn test_json_round_trip_preserves_fields() {
        for category in Category::ALL {
            let original = Product {
                id: Some(3),
                name: "Hammer".to_string(),
                description: "Claw hammer".to_string(),
                price: Decimal::from_str("12.05").unwrap(),
                available: false,
                category,
            };

            let copy = Product::from_json(&original.to_json()).unwrap();
            assert_eq!(copy, Product { id: None, ..original });
        }
    }

    #[test]
    fn test_missing_field_names_the_key() {
        for key in ["name", "description", "price", "available", "category"] {
            let mut data = widget();
            data.as_object_mut().unwrap().remove(key);

            let err = Product::from_json(&data).unwrap_err();
            assert_eq!(err.0, format!("Missing or invalid field: {}", key));
        }
    }

    #[test]
    fn test_available_must_be_boolean() {
        let mut data = widget();
        data["available"] = json!("true");

        let err = Product::from_json(&data).unwrap_err();
        assert_eq!(err.0, "Invalid type for boolean [available]: string");
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let mut data = widget();
        data["category"] = json!("tools");
        assert!(Product::from_json(&data).is_err());

        data["category"] = json!("GADGETS");
        let err = Product::from_json(&data).unwrap_err();
        assert_eq!(err.0, "Invalid category: GADGETS");
    }

    #[test]
    fn test_bad_price_is_rejected() {
        let mut data = widget();
        data["price"] = json!("nine");
        assert_eq!(Product::from_json(&data).unwrap_err().0, "Invalid price: nine");

        data["price"] = json!(true);
        assert!(Product::from_json(&data).is_err());
    }

    #[test]
    fn test_numeric_price_is_accepted() {
        let mut data = widget();
        data["price"] = json!(12.5);

        let product = Product::from_json(&data).unwrap();
        assert_eq!(product.price, Decimal::from_str("12.5").unwrap());
    }

    #[test]
    fn test_negative_zero_price_is_normalized() {
        for raw in ["-0.00", "0.00"] {
            let mut data = widget();
            data["price"] = json!(raw);

            let product = Product::from_json(&data).unwrap();
            assert!(product.price.is_zero());
            assert!(product.price.is_sign_positive());
            assert_eq!(product.to_json()["price"], "0.00");
        }

        let price = parse_price_query("\"-0.0\"").unwrap();
        assert_eq!(price.to_string(), "0.0");
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = Product::from_json(&json!(["Widget"])).unwrap_err();
        assert!(err.0.contains("expected object, got array"));
    }

    #[test]
    fn test_empty_or_long_name_is_rejected() {
        let mut data = widget();
        data["name"] = json!("");
        assert!(Product::from_json(&data).is_err());

        data["name"] = json!("x".repeat(101));
        assert!(Product::from_json(&data).is_err());
    }

    #[test]
    fn test_apply_json_keeps_id_and_is_all_or_nothing() {
        let mut product = Product::from_json(&widget()).unwrap();
        product.id = Some(9);

        let mut bad = widget();
        bad["name"] = json!("Gadget");
        bad["category"] = json!("NOPE");
        assert!(product.apply_json(&bad).is_err());
        assert_eq!(product.name, "Widget");

        let mut good = widget();
        good["name"] = json!("Gadget");
        good["id"] = json!(100);
        product.apply_json(&good).unwrap();
        assert_eq!(product.id, Some(9));
        assert_eq!(product.name, "Gadget");
    }

    #[test]
    fn test_parse_price_query_strips_quotes_and_spaces() {
        assert_eq!(
            parse_price_query(" \"9.99\" ").unwrap(),
            Decimal::from_str("9.99").unwrap()
        );
        assert!(parse_price_query("\"abc\"").is_err());
    }

    #[test]
    fn test_category_parsing_and_default() {
        assert_eq!(Category::default(), Category::Unknown);
        assert_eq!("AUTOMOTIVE".parse::<Category>().unwrap(), Category::Automotive);
        assert_eq!(Category::Cloths.to_string(), "CLOTHS");
    }

    #[test]
    fn test_display() {
        let mut product = Product::from_json(&widget()).unwrap();
        assert_eq!(product.to_string(), "<Product Widget id=[None]>");
        product.id = Some(5);
        assert_eq!(product.to_string(), "<Product Widget id=[5]>");
    }
}
