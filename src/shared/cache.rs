use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Fields = Map<String, Value>;

/// Token and profile fields gathered while handling one request.
///
/// Entries are keyed by provider name, so a request that talks to several
/// providers keeps their fields apart. Clones share the same storage; a new
/// cache is created per request by [`crate::shared::middleware::request_cache`].
#[derive(Clone, Debug, Default)]
pub struct RequestCache {
    inner: Arc<Mutex<HashMap<String, Fields>>>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `fields` into the provider's entry; later values win.
    pub fn merge(&self, provider: &str, fields: Fields) {
        let mut entries = self.lock();
        entries
            .entry(provider.to_string())
            .or_default()
            .extend(fields);
    }

    pub fn get(&self, provider: &str, key: &str) -> Option<Value> {
        self.lock()
            .get(provider)
            .and_then(|fields| fields.get(key))
            .cloned()
    }

    /// Reads a field as text. Numbers are rendered, so ids sent as either
    /// `"123"` or `123` come back the same.
    pub fn get_str(&self, provider: &str, key: &str) -> Option<String> {
        self.get(provider, key).as_ref().and_then(value_as_string)
    }

    pub fn get_i64(&self, provider: &str, key: &str) -> Option<i64> {
        self.get(provider, key).as_ref().and_then(value_as_i64)
    }

    pub fn fields(&self, provider: &str) -> Fields {
        self.lock().get(provider).cloned().unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Fields>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn value_as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_keeps_earlier_fields() {
        let cache = RequestCache::new();
        cache.merge("weibo", fields(json!({"access_token": "t", "uid": "42"})));
        cache.merge("weibo", fields(json!({"name": "alice"})));

        assert_eq!(cache.get_str("weibo", "access_token").as_deref(), Some("t"));
        assert_eq!(cache.get_str("weibo", "name").as_deref(), Some("alice"));
        assert_eq!(cache.fields("weibo").len(), 3);
    }

    #[test]
    fn test_providers_are_isolated() {
        let cache = RequestCache::new();
        cache.merge("weibo", fields(json!({"uid": "1"})));

        assert!(cache.get("github", "uid").is_none());
        assert!(cache.fields("github").is_empty());
    }

    #[test]
    fn test_numeric_coercion() {
        let cache = RequestCache::new();
        cache.merge("weibo", fields(json!({"id": 1404376560, "expires_in": "157679999"})));

        assert_eq!(cache.get_str("weibo", "id").as_deref(), Some("1404376560"));
        assert_eq!(cache.get_i64("weibo", "expires_in"), Some(157679999));
    }

    #[test]
    fn test_clones_share_storage() {
        let cache = RequestCache::new();
        let clone = cache.clone();
        clone.merge("weibo", fields(json!({"uid": "7"})));

        assert_eq!(cache.get_str("weibo", "uid").as_deref(), Some("7"));
    }
}
