use chrono::{DateTime, SecondsFormat, Utc};
use mongodb::bson::{self, Bson, Document};
use serde_json::{Map, Number, Value};

use crate::error::StoreError;

pub const TIMESTAMP_FIELD: &str = "timestamp";

/// One participant's sign-up, embedded in its event's `registrations` array.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Registration(Document);

impl Registration {
    pub fn from_json(fields: Map<String, Value>) -> Result<Self, StoreError> {
        Ok(Registration(bson::to_document(&fields)?))
    }

    pub fn timestamp(&self) -> Option<&Bson> {
        self.0.get(TIMESTAMP_FIELD)
    }

    /// Sets `timestamp` to `now` unless the caller already supplied one.
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        if !self.0.contains_key(TIMESTAMP_FIELD) {
            self.0.insert(
                TIMESTAMP_FIELD,
                now.to_rfc3339_opts(SecondsFormat::Micros, true),
            );
        }
        self
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    /// JSON-safe view used by the registrations listing.
    ///
    /// Text, numbers, booleans and null pass through; every other value is
    /// replaced by its textual form. The conversion cannot be reversed and is
    /// never written back to the store.
    pub fn sanitized(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(key, value)| (key.clone(), sanitize_value(value)))
            .collect()
    }
}

impl From<Document> for Registration {
    fn from(fields: Document) -> Self {
        Registration(fields)
    }
}

fn sanitize_value(value: &Bson) -> Value {
    match value {
        Bson::Null => Value::Null,
        Bson::Boolean(flag) => Value::Bool(*flag),
        Bson::String(text) => Value::String(text.clone()),
        Bson::Int32(number) => Value::from(*number),
        Bson::Int64(number) => Value::from(*number),
        Bson::Double(number) => Number::from_f64(*number)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(number.to_string())),
        Bson::ObjectId(id) => Value::String(id.to_hex()),
        Bson::DateTime(instant) => Value::String(
            instant
                .try_to_rfc3339_string()
                .unwrap_or_else(|_| instant.to_string()),
        ),
        other => Value::String(other.to_string()),
    }
}
