use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{PageMeta, PropertySummary};

/// Search response body as sent by the endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub data: Option<Vec<PropertySummary>>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Display-ready page of results
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SearchPage {
    pub items: Vec<PropertySummary>,
    pub meta: PageMeta,
}

impl SearchPage {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

pub fn normalize(raw: RawSearchResponse) -> SearchPage {
    SearchPage {
        items: raw.data.unwrap_or_default(),
        meta: raw.meta.unwrap_or_default(),
    }
}

/// The `error` member of a JSON payload, if any, rendered as text.
pub(crate) fn payload_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        Value::Object(map) => Some(
            map.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Value::Object(map.clone()).to_string()),
        ),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_fields_normalize_to_empty_page() {
        let raw: RawSearchResponse = serde_json::from_value(json!({})).unwrap();
        let page = normalize(raw);
        assert!(page.is_empty());
        assert_eq!(page.meta, PageMeta::default());
    }

    #[test]
    fn null_data_normalizes_to_empty_list() {
        let raw: RawSearchResponse =
            serde_json::from_value(json!({ "data": null, "meta": { "total": 0, "page": 1 } })).unwrap();
        let page = normalize(raw);
        assert!(page.is_empty());
        assert_eq!(page.meta.page, 1);
    }

    #[test]
    fn payload_error_reads_strings_and_objects() {
        assert_eq!(
            payload_error(&json!({ "error": "Non autorisé" })),
            Some("Non autorisé".to_string())
        );
        assert_eq!(
            payload_error(&json!({ "error": { "message": "Quota dépassé" } })),
            Some("Quota dépassé".to_string())
        );
        assert_eq!(payload_error(&json!({ "error": null })), None);
        assert_eq!(payload_error(&json!({ "data": [] })), None);
    }
}
