use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

/// Loose field map for a stored document. Typed models in the domain
/// crates map themselves onto this.
pub type Fields = serde_json::Map<String, Value>;

/// A document read back from the store: store-assigned id plus fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn bool_field(&self, name: &str) -> Option<bool> {
        self.fields.get(name).and_then(Value::as_bool)
    }

    pub fn string_array_field(&self, name: &str) -> Option<Vec<String>> {
        let items = self.fields.get(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Server timestamps are stored as integer milliseconds since epoch.
    pub fn timestamp_field(&self, name: &str) -> Option<DateTime<Utc>> {
        let millis = self.fields.get(name)?.as_i64()?;
        Utc.timestamp_millis_opt(millis).single()
    }
}

/// Value written to a document field. `ServerTimestamp` and `ArrayUnion`
/// are resolved by the store inside its per-document atomic update.
#[derive(Debug, Clone)]
pub enum WriteValue {
    Value(Value),
    /// Store-assigned time, in integer milliseconds since epoch.
    ServerTimestamp,
    /// Set-union into an array field: re-adding a present element is a
    /// no-op, so concurrent unions never lose each other's writes.
    ArrayUnion(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    ArrayContains(String, Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Equality/membership query with ordering and an optional cap.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<Filter>,
    pub order_by: Option<OrderBy>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn collection(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    pub fn filter_eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.push(Filter::Eq(field.into(), value));
        self
    }

    pub fn array_contains(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.push(Filter::ArrayContains(field.into(), value));
        self
    }

    pub fn order_by_asc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: Direction::Asc,
        });
        self
    }

    pub fn order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction: Direction::Desc,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.matches_fields(&doc.fields)
    }

    pub fn matches_fields(&self, fields: &Fields) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::Eq(field, value) => fields.get(field) == Some(value),
            Filter::ArrayContains(field, value) => fields
                .get(field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.contains(value)),
        })
    }
}
