use serde_json::{Map, Value};

/// Result of applying the allow-list to a request body.
#[derive(Debug)]
pub struct FilterResult {
    pub body: Map<String, Value>,
    /// Top-level keys that were present but not allowed, in body order.
    pub dropped: Vec<String>,
}

/// Keep only the allow-listed top-level keys of `body`, in allow-list order.
///
/// Values are copied untouched. A key whose value is `null` is still present
/// and is kept. Arrays, strings and numbers filter to `{}`; callers that must
/// reject a `null` body do so before calling this.
pub fn filter_params<S: AsRef<str>>(body: &Value, allowed: &[S]) -> FilterResult {
    let Some(obj) = body.as_object() else {
        return FilterResult {
            body: Map::new(),
            dropped: Vec::new(),
        };
    };

    let mut filtered = Map::new();
    for key in allowed {
        if let Some(value) = obj.get(key.as_ref()) {
            filtered.insert(key.as_ref().to_string(), value.clone());
        }
    }

    let dropped = obj
        .keys()
        .filter(|k| !allowed.iter().any(|a| a.as_ref() == k.as_str()))
        .cloned()
        .collect();

    FilterResult {
        body: filtered,
        dropped,
    }
}
