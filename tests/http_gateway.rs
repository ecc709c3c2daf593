#![cfg(feature = "http")]

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde_json::{Value, json};

use bakehouse::{
    api::{self, Gateway, HttpGateway},
    domain::{Client, Product},
    error::ErrorKind,
};

#[derive(Clone, Default)]
struct Backend {
    posted: Arc<Mutex<Vec<Value>>>,
    deleted: Arc<Mutex<Vec<i64>>>,
}

async fn list_clients() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "Ana Souza", "phone": "5551", "city": "Porto" },
        { "id": 2, "name": "Bruno Lima" }
    ]))
}

async fn get_client(Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    if id == 1 {
        Ok(Json(json!({ "id": 1, "name": "Ana Souza" })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn post_client(State(backend): State<Backend>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    backend.posted.lock().expect("lock").push(body);
    (StatusCode::CREATED, Json(json!({ "id": 7 })))
}

async fn delete_client(State(backend): State<Backend>, Path(id): Path<i64>) -> StatusCode {
    backend.deleted.lock().expect("lock").push(id);
    StatusCode::NO_CONTENT
}

async fn broken() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn empty() -> &'static str {
    ""
}

async fn spawn_backend(backend: Backend) -> String {
    let app = Router::new()
        .route("/Cliente", get(list_clients).post(post_client))
        .route("/Cliente/:id", get(get_client).delete(delete_client))
        .route("/Pedido", get(broken))
        .route("/Produto", get(empty))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn lists_and_fetches_records() {
    let base = spawn_backend(Backend::default()).await;
    let gateway = HttpGateway::new(base);

    let clients: Vec<Client> = api::fetch_all(&gateway).await.expect("list");
    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].name, "Ana Souza");
    assert_eq!(clients[1].city, "");

    let one: Client = api::fetch_one(&gateway, 1).await.expect("get");
    assert_eq!(one.id, Some(1));
}

#[tokio::test]
async fn created_and_no_content_count_as_success() {
    let backend = Backend::default();
    let base = spawn_backend(backend.clone()).await;
    let gateway = HttpGateway::new(base);

    let client = Client {
        name: "Carla Dias".into(),
        ..Client::default()
    };
    let id = api::store(&gateway, &client).await.expect("post");
    assert_eq!(id, Some(7));
    let posted = backend.posted.lock().expect("lock").clone();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0]["name"], "Carla Dias");
    assert!(posted[0].get("id").is_none());

    api::remove::<Client>(&gateway, 3).await.expect("delete");
    assert_eq!(*backend.deleted.lock().expect("lock"), vec![3]);
}

#[tokio::test]
async fn error_statuses_map_to_error_kinds() {
    let base = spawn_backend(Backend::default()).await;
    let gateway = HttpGateway::new(base);

    let missing = api::fetch_one::<Client>(&gateway, 99).await.unwrap_err();
    assert_eq!(missing.kind, ErrorKind::NotFound);

    let failed = gateway.list("Pedido").await.unwrap_err();
    assert_eq!(failed.kind, ErrorKind::Http(500));
    assert!(failed.message.contains("500"));
}

#[tokio::test]
async fn empty_body_reads_as_no_records() {
    let base = spawn_backend(Backend::default()).await;
    let gateway = HttpGateway::new(base);
    let products: Vec<Product> = api::fetch_all(&gateway).await.expect("list");
    assert!(products.is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let gateway = HttpGateway::new(format!("http://{addr}"));
    let err = gateway.list("Cliente").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Network);
}
