//! HTTP-shaped handlers over a [`ProgressStore`]
//!
//! Transport-agnostic: a host web layer maps its request onto [`Caller`],
//! path parameters and a JSON body, and writes back the [`ApiResponse`].
//!
//! | Method | Path | Success |
//! |--------|------|---------|
//! | `GET` | `/progress-tracking/{articleId}/{tableId}` | 200, JSON array of entity ids |
//! | `POST` | same, body `{"entity_id": ...}` | 201 |
//! | `DELETE` | same, body `{"entity_id": ...}` | 204 |

use serde_json::{Value, json};
use tracing::error;

use super::store::{ProgressKey, ProgressStore};

/// Path prefix of the progress endpoints
pub const ROUTE_PREFIX: &str = "/progress-tracking/";

/// Identity of the requesting user; `None` for anonymous callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caller {
    pub user_id: Option<u64>,
}

impl Caller {
    #[must_use]
    pub fn user(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

/// Status code plus optional JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Progress endpoints bound to a store
pub struct ProgressApi<S> {
    store: S,
}

impl<S: ProgressStore> ProgressApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// `GET`: entity ids the caller has checked
    pub fn get(&self, caller: Caller, article_id: u64, table_id: &str) -> ApiResponse {
        let Some(user_id) = caller.user_id else {
            return ApiResponse::error(403, "You must be logged in to retrieve tracked progress.");
        };
        let key = ProgressKey::new(article_id, table_id, user_id);
        match self.store.get_progress(&key) {
            Ok(entities) => ApiResponse::json(200, json!(entities)),
            Err(err) => {
                error!(
                    error = %err,
                    article = article_id,
                    table = table_id,
                    user = user_id,
                    "failed to load progress"
                );
                ApiResponse::error(500, "Failed to retrieve progress.")
            }
        }
    }

    /// `POST`: mark the body's `entity_id` as checked
    pub fn track(&self, caller: Caller, article_id: u64, table_id: &str, body: &Value) -> ApiResponse {
        let Some(user_id) = caller.user_id else {
            return ApiResponse::error(403, "You must be logged in to track progress.");
        };
        let Some(entity_id) = entity_id(body) else {
            return ApiResponse::error(400, "Invalid or missing entity_id.");
        };
        let key = ProgressKey::new(article_id, table_id, user_id);
        match self.store.track_progress(&key, &entity_id) {
            Ok(()) => ApiResponse::empty(201),
            Err(err) => {
                error!(
                    error = %err,
                    article = article_id,
                    table = table_id,
                    user = user_id,
                    entity = %entity_id,
                    "failed to track progress"
                );
                ApiResponse::error(500, "Failed to track progress.")
            }
        }
    }

    /// `DELETE`: unmark the body's `entity_id`
    pub fn delete(&self, caller: Caller, article_id: u64, table_id: &str, body: &Value) -> ApiResponse {
        let Some(user_id) = caller.user_id else {
            return ApiResponse::error(403, "You must be logged in to track progress.");
        };
        let Some(entity_id) = entity_id(body) else {
            return ApiResponse::error(400, "Invalid or missing entity_id.");
        };
        let key = ProgressKey::new(article_id, table_id, user_id);
        match self.store.delete_progress(&key, &entity_id) {
            Ok(()) => ApiResponse::empty(204),
            Err(err) => {
                error!(
                    error = %err,
                    article = article_id,
                    table = table_id,
                    user = user_id,
                    entity = %entity_id,
                    "failed to delete progress"
                );
                ApiResponse::error(500, "Failed to delete progress.")
            }
        }
    }

    /// Route a request by method and path
    ///
    /// 404 for paths outside `/progress-tracking/{articleId}/{tableId}` or a
    /// non-numeric article id, 405 for other methods.
    pub fn handle(&self, method: &str, path: &str, caller: Caller, body: Option<&Value>) -> ApiResponse {
        let Some((article_id, table_id)) = parse_route(path) else {
            return ApiResponse::error(404, "Not found.");
        };
        let body = body.unwrap_or(&Value::Null);
        match method.to_ascii_uppercase().as_str() {
            "GET" => self.get(caller, article_id, table_id),
            "POST" => self.track(caller, article_id, table_id, body),
            "DELETE" => self.delete(caller, article_id, table_id, body),
            _ => ApiResponse::error(405, "Method not allowed."),
        }
    }
}

/// Split `/progress-tracking/{articleId}/{tableId}` into its parameters
#[must_use]
pub fn parse_route(path: &str) -> Option<(u64, &str)> {
    let rest = path.strip_prefix(ROUTE_PREFIX)?;
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let (article, table) = rest.split_once('/')?;
    if table.is_empty() || table.contains('/') {
        return None;
    }
    Some((article.parse().ok()?, table))
}

/// `entity_id` as a string; numbers are accepted and stringified
fn entity_id(body: &Value) -> Option<String> {
    match body.get("entity_id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_route() {
        assert_eq!(parse_route("/progress-tracking/12/items"), Some((12, "items")));
        assert_eq!(parse_route("/progress-tracking/12/items/"), Some((12, "items")));
        assert_eq!(parse_route("/progress-tracking/abc/items"), None);
        assert_eq!(parse_route("/progress-tracking/12"), None);
        assert_eq!(parse_route("/progress-tracking/12/a/b"), None);
        assert_eq!(parse_route("/other/12/items"), None);
    }

    #[test]
    fn test_entity_id_accepts_numbers() {
        assert_eq!(entity_id(&json!({ "entity_id": 42 })), Some("42".into()));
        assert_eq!(entity_id(&json!({ "entity_id": "Item_7" })), Some("Item_7".into()));
        assert_eq!(entity_id(&json!({ "entity_id": "" })), None);
        assert_eq!(entity_id(&json!({})), None);
        assert_eq!(entity_id(&Value::Null), None);
    }
}
