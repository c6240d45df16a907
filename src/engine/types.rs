// src/engine/types.rs — Records the engine works on

use serde_json::Value;

/// An identifier that arrives either bare or as an embedded document.
///
/// Orders coming from the API carry `userId` / `productId` as plain strings
/// when unpopulated and as `{ "_id": ..., ... }` objects when populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdRef {
    Raw(String),
    Embedded { id: String },
}

impl IdRef {
    /// Interpret a JSON value as an id. Strings and numbers are raw ids;
    /// objects must carry a scalar `_id`. Anything else (null, arrays,
    /// booleans, objects without `_id`) is not an id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => map
                .get("_id")
                .and_then(scalar_to_string)
                .map(|id| IdRef::Embedded { id }),
            other => scalar_to_string(other).map(IdRef::Raw),
        }
    }

    /// The normalized string id.
    pub fn resolve(self) -> String {
        match self {
            IdRef::Raw(id) | IdRef::Embedded { id } => id,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One purchase event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Interaction {
    pub user_id: String,
    pub product_id: String,
}

impl Interaction {
    pub fn new(user_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            product_id: product_id.into(),
        }
    }
}

/// A normalized order: who bought what, and how many.
#[derive(Debug, Clone, PartialEq)]
pub struct Basket {
    pub user_id: String,
    pub items: Vec<BasketItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BasketItem {
    pub product_id: String,
    pub quantity: u32,
}

impl Basket {
    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }
}

/// A catalogue entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: Option<String>,
    pub price: Option<f64>,
}

impl Product {
    /// Parse one catalogue entry. Only a usable `_id` is required; text
    /// fields of any other shape read as empty and a malformed price as
    /// absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let id = map.get("_id").and_then(IdRef::from_value)?.resolve();
        let text = |key: &str| map.get(key).and_then(text_field).unwrap_or_default();
        Some(Self {
            id,
            name: text("name"),
            brand: text("brand"),
            category: text("category"),
            description: map
                .get("description")
                .and_then(text_field)
                .filter(|d| !d.trim().is_empty()),
            price: map.get("price").and_then(price_field),
        })
    }

    /// Text blob used for vectorization: name, brand, category and, when
    /// present, description.
    pub fn text(&self) -> String {
        let mut parts = vec![self.name.as_str(), self.brand.as_str(), self.category.as_str()];
        if let Some(desc) = &self.description {
            parts.push(desc.as_str());
        }
        parts.join(" ")
    }
}

fn text_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn price_field(value: &Value) -> Option<f64> {
    let price = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_start_matches('$').replace(',', "").parse().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

/// Parse a products payload, skipping entries that cannot be used.
pub fn parse_products(values: &[Value]) -> Vec<Product> {
    let mut products = Vec::with_capacity(values.len());
    for (i, value) in values.iter().enumerate() {
        match Product::from_value(value) {
            Some(p) => products.push(p),
            None => tracing::warn!(index = i, "Skipping product without a usable _id"),
        }
    }
    products
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_ref_raw_string() {
        assert_eq!(
            IdRef::from_value(&json!("u1")),
            Some(IdRef::Raw("u1".into()))
        );
    }

    #[test]
    fn test_id_ref_number() {
        assert_eq!(IdRef::from_value(&json!(42)).map(IdRef::resolve), Some("42".into()));
    }

    #[test]
    fn test_id_ref_embedded() {
        let v = json!({"_id": "685c86ae", "email": "a@b.c"});
        assert_eq!(
            IdRef::from_value(&v),
            Some(IdRef::Embedded {
                id: "685c86ae".into()
            })
        );
    }

    #[test]
    fn test_id_ref_rejects_null_and_empty() {
        assert_eq!(IdRef::from_value(&Value::Null), None);
        assert_eq!(IdRef::from_value(&json!("  ")), None);
        assert_eq!(IdRef::from_value(&json!({"name": "x"})), None);
        assert_eq!(IdRef::from_value(&json!([1, 2])), None);
    }

    #[test]
    fn test_product_text_with_description() {
        let p = Product::from_value(&json!({
            "_id": "a", "name": "Apple Watch", "brand": "Apple",
            "category": "Wearables", "description": "Tracks fitness"
        }))
        .unwrap();
        assert_eq!(p.text(), "Apple Watch Apple Wearables Tracks fitness");
    }

    #[test]
    fn test_product_text_missing_fields() {
        let p = Product::from_value(&json!({"_id": "b", "name": "Banana Slicer"})).unwrap();
        assert_eq!(p.text(), "Banana Slicer  ");
        assert!(p.price.is_none());
    }

    #[test]
    fn test_parse_products_skips_unusable() {
        let values = vec![
            json!({"_id": "a", "name": "A"}),
            json!({"name": "no id"}),
            json!("not an object"),
            json!({"_id": null, "name": "null id"}),
        ];
        let products = parse_products(&values);
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id, "a");
    }

    #[test]
    fn test_product_tolerates_odd_field_types() {
        let p = Product::from_value(&json!({
            "_id": "c", "name": 5, "brand": null,
            "category": ["Wearables"], "description": {"long": "x"},
            "price": "$1,299.50"
        }))
        .unwrap();
        assert_eq!(p.name, "5");
        assert_eq!(p.brand, "");
        assert_eq!(p.category, "");
        assert_eq!(p.description, None);
        assert_eq!(p.price, Some(1299.5));

        let q = Product::from_value(&json!({"_id": "d", "price": "call us"})).unwrap();
        assert_eq!(q.price, None);
        let r = Product::from_value(&json!({"_id": "e", "price": 19.99})).unwrap();
        assert_eq!(r.price, Some(19.99));
    }
}
