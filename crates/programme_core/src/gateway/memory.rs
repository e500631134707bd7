//! Scripted in-process gateway.
//!
//! Serves queued responses per `(method, path)` and records every request.
//! With write echo enabled, unscripted writes behave like a permissive
//! server: `POST` echoes the body with a generated `id`, `PUT` echoes the
//! body with the id taken from the path, `DELETE` returns `null`.

use crate::gateway::{GatewayError, GatewayResult, Method, RemoteGateway};
use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// One call observed by [`InMemoryGateway`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

type RouteKey = (Method, String);

#[derive(Debug, Default)]
pub struct InMemoryGateway {
    routes: Mutex<HashMap<RouteKey, VecDeque<GatewayResult<Value>>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    echo_writes: bool,
}

impl InMemoryGateway {
    /// Creates a gateway that answers only scripted routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway that echoes unscripted writes.
    pub fn with_echo_writes() -> Self {
        Self {
            echo_writes: true,
            ..Self::default()
        }
    }

    /// Queues a successful response for the next matching call.
    pub fn respond(&self, method: Method, path: impl Into<String>, body: Value) {
        self.push(method, path.into(), Ok(body));
    }

    /// Queues a failure for the next matching call.
    pub fn fail(&self, method: Method, path: impl Into<String>, error: GatewayError) {
        self.push(method, path.into(), Err(error));
    }

    /// Returns all requests observed so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Returns how many requests hit `method` + `path`.
    pub fn request_count(&self, method: Method, path: &str) -> usize {
        lock(&self.requests)
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    fn push(&self, method: Method, path: String, response: GatewayResult<Value>) {
        lock(&self.routes)
            .entry((method, path))
            .or_default()
            .push_back(response);
    }

    fn dispatch(&self, method: Method, path: &str, body: Option<Value>) -> GatewayResult<Value> {
        lock(&self.requests).push(RecordedRequest {
            method,
            path: path.to_string(),
            body: body.clone(),
        });

        let scripted = lock(&self.routes)
            .get_mut(&(method, path.to_string()))
            .and_then(VecDeque::pop_front);
        if let Some(response) = scripted {
            debug!("event=gateway_dispatch module=gateway status=scripted method={method} path={path}");
            return response;
        }

        if self.echo_writes {
            if let Some(echo) = echo_response(method, path, body) {
                debug!("event=gateway_dispatch module=gateway status=echo method={method} path={path}");
                return Ok(echo);
            }
        }

        Err(GatewayError::new(format!("no response scripted for {method} {path}")).with_status(404))
    }
}

#[async_trait]
impl RemoteGateway for InMemoryGateway {
    async fn get(&self, path: &str) -> GatewayResult<Value> {
        self.dispatch(Method::Get, path, None)
    }

    async fn post(&self, path: &str, body: Option<Value>) -> GatewayResult<Value> {
        self.dispatch(Method::Post, path, body)
    }

    async fn put(&self, path: &str, body: Option<Value>) -> GatewayResult<Value> {
        self.dispatch(Method::Put, path, body)
    }

    async fn delete(&self, path: &str) -> GatewayResult<Value> {
        self.dispatch(Method::Delete, path, None)
    }
}

fn echo_response(method: Method, path: &str, body: Option<Value>) -> Option<Value> {
    let mut object = match body {
        Some(Value::Object(object)) => object,
        Some(_) => return None,
        None => Map::new(),
    };
    match method {
        Method::Get => None,
        Method::Delete => Some(Value::Null),
        Method::Post => {
            object
                .entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            Some(Value::Object(object))
        }
        Method::Put => {
            let id = path.rsplit('/').next().unwrap_or_default();
            object.insert("id".to_string(), Value::String(id.to_string()));
            Some(Value::Object(object))
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::InMemoryGateway;
    use crate::gateway::{GatewayError, Method, RemoteGateway};
    use serde_json::json;

    #[tokio::test]
    async fn scripted_responses_are_served_in_order() {
        let gateway = InMemoryGateway::new();
        gateway.respond(Method::Get, "/a", json!(1));
        gateway.fail(Method::Get, "/a", GatewayError::new("boom"));

        assert_eq!(gateway.get("/a").await.expect("first response"), json!(1));
        let err = gateway.get("/a").await.expect_err("second response fails");
        assert_eq!(err.message, "boom");
        let err = gateway.get("/a").await.expect_err("queue is drained");
        assert!(err.is_not_found());
        assert_eq!(gateway.request_count(Method::Get, "/a"), 3);
    }

    #[tokio::test]
    async fn echo_mode_assigns_ids_to_created_payloads() {
        let gateway = InMemoryGateway::with_echo_writes();
        let created = gateway
            .post("/items", Some(json!({"title": "x"})))
            .await
            .expect("echo create");
        assert!(created["id"].as_str().is_some_and(|id| !id.is_empty()));

        let updated = gateway
            .put("/items/42", Some(json!({"title": "y"})))
            .await
            .expect("echo update");
        assert_eq!(updated, json!({"title": "y", "id": "42"}));

        let deleted = gateway.delete("/items/42").await.expect("echo delete");
        assert!(deleted.is_null());
    }
}
