use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateUser {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// Envelope for the user listing.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserPage {
    pub data: Vec<User>,
}

pub type Db = Arc<RwLock<HashMap<Uuid, User>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", get(get_user))
        .route("/anything", any(anything))
        .route("/delay/{millis}", get(delay))
        .route("/html", get(html))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_users(State(db): State<Db>) -> Json<UserPage> {
    let users = db.read().await;
    Json(UserPage {
        data: users.values().cloned().collect(),
    })
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> (StatusCode, Json<User>) {
    let user = User {
        id: Uuid::new_v4(),
        name: input.name,
        address: input.address,
    };
    tracing::debug!(id = %user.id, "created user");
    db.write().await.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user))
}

/// Unknown users answer 404 with an empty JSON object.
async fn get_user(State(db): State<Db>, Path(id): Path<Uuid>) -> (StatusCode, Json<Value>) {
    let users = db.read().await;
    match users.get(&id) {
        Some(user) => (StatusCode::OK, Json(json!(user))),
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

/// Describe the request back to the caller. Every value of a repeated
/// header is listed.
async fn anything(method: Method, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let mut echoed: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in &headers {
        echoed
            .entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    let text = String::from_utf8_lossy(&body).into_owned();
    let parsed: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    Json(json!({
        "method": method.as_str(),
        "headers": echoed,
        "body": text,
        "json": parsed,
    }))
}

async fn delay(Path(millis): Path<u64>) -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(millis)).await;
    Json(json!({ "delayed_ms": millis }))
}

async fn html() -> &'static str {
    "<html><body>not json</body></html>"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: Uuid::nil(),
            name: "Mirza".to_string(),
            address: Some("Jakarta".to_string()),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["name"], "Mirza");
        assert_eq!(json["address"], "Jakarta");
    }

    #[test]
    fn user_without_address_omits_field() {
        let user = User {
            id: Uuid::nil(),
            name: "Mirza".to_string(),
            address: None,
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("address").is_none());
    }

    #[test]
    fn create_user_address_is_optional() {
        let input: CreateUser = serde_json::from_str(r#"{"name":"Mirza"}"#).unwrap();
        assert_eq!(input.name, "Mirza");
        assert!(input.address.is_none());
    }

    #[test]
    fn create_user_rejects_missing_name() {
        let result: Result<CreateUser, _> = serde_json::from_str(r#"{"address":"Jakarta"}"#);
        assert!(result.is_err());
    }
}
