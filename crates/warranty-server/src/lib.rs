//! HTTP server for the warranty tracker.
//!
//! Wires the JSON store and the uploads directory into the REST API, serves
//! stored receipts under `/uploads`, and adds CORS, body limits and request
//! tracing.

pub mod settings;

pub use settings::ServerConfig;

use std::sync::Arc;

use axum::{Json, Router, extract::DefaultBodyLimit, routing::get};
use serde_json::{Value, json};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use warranty_core::receipt::UPLOADS_MOUNT;
use warranty_store_fs::{JsonStore, ReceiptDir};

use settings::expand_tilde;

// ─── Application ──────────────────────────────────────────────────────────────

/// The opened storage backends plus the configuration they came from.
#[derive(Clone)]
pub struct App {
  pub store:    Arc<JsonStore>,
  pub receipts: Arc<ReceiptDir>,
  pub config:   Arc<ServerConfig>,
}

impl App {
  /// Open the store document (creating it if absent) and the uploads
  /// directory (creating it if absent).
  pub async fn open(config: ServerConfig) -> warranty_store_fs::Result<Self> {
    let store = JsonStore::open(expand_tilde(&config.store_path)).await?;
    let receipts = ReceiptDir::create(expand_tilde(&config.uploads_dir)).await?;
    Ok(Self {
      store:    Arc::new(store),
      receipts: Arc::new(receipts),
      config:   Arc::new(config),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router(app: &App) -> Router {
  let uploads = ServeDir::new(app.receipts.root());

  Router::new()
    .route("/health", get(health))
    .nest(
      "/api",
      warranty_api::api_router(app.store.clone(), app.receipts.clone()),
    )
    .nest_service(UPLOADS_MOUNT, uploads)
    .layer(DefaultBodyLimit::max(app.config.max_upload_bytes))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
  };
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;

  const BOUNDARY: &str = "server-test-boundary";

  fn config_in(dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
      store_path: dir.join("db.json"),
      uploads_dir: dir.join("uploads"),
      ..ServerConfig::default()
    }
  }

  fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("warranty_server_{}", Uuid::new_v4()))
  }

  async fn oneshot(app: &App, req: Request<Body>) -> Response {
    router(app).oneshot(req).await.unwrap()
  }

  async fn body_bytes(resp: Response) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap()
      .to_vec()
  }

  async fn body_json(resp: Response) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
  }

  fn post_warranty(item: &str, receipt: Option<(&str, &[u8])>) -> Request<Body> {
    let mut body = Vec::new();
    for (name, value) in [
      ("itemName", item),
      ("purchaseDate", "2024-06-01"),
      ("warrantyExpirationDate", "2025-06-01"),
    ] {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .as_bytes(),
      );
    }
    if let Some((file_name, bytes)) = receipt {
      body.extend_from_slice(
        format!(
          "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"receipt\"; filename=\"{file_name}\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
      );
      body.extend_from_slice(bytes);
      body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/warranties")
      .header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
      )
      .body(Body::from(body))
      .unwrap()
  }

  fn get_request(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
  }

  // ── Health ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let dir = temp_dir();
    let app = App::open(config_in(&dir)).await.unwrap();

    let resp = oneshot(&app, get_request("/health")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!({ "status": "ok" }));

    let _ = tokio::fs::remove_dir_all(dir).await;
  }

  // ── Startup ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn fresh_start_lists_no_warranties() {
    let dir = temp_dir();
    let app = App::open(config_in(&dir)).await.unwrap();

    let resp = oneshot(&app, get_request("/api/warranties")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, json!([]));
    assert!(dir.join("uploads").is_dir());

    let _ = tokio::fs::remove_dir_all(dir).await;
  }

  #[tokio::test]
  async fn records_survive_restart() {
    let dir = temp_dir();

    let app = App::open(config_in(&dir)).await.unwrap();
    let created = body_json(oneshot(&app, post_warranty("Camera", None)).await).await;
    drop(app);

    let restarted = App::open(config_in(&dir)).await.unwrap();
    let resp = oneshot(&restarted, get_request("/api/warranties")).await;
    assert_eq!(body_json(resp).await, json!([created]));

    let _ = tokio::fs::remove_dir_all(dir).await;
  }

  // ── Uploads ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn uploaded_receipt_is_served_back() {
    let dir = temp_dir();
    let app = App::open(config_in(&dir)).await.unwrap();
    let image: &[u8] = b"\xff\xd8\xff\xe0 not really a jpeg";

    let resp = oneshot(&app, post_warranty("Monitor", Some(("photo.jpg", image)))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let photo = created["receiptPhoto"].as_str().unwrap().to_owned();
    assert!(photo.ends_with(".jpg"), "photo: {photo}");

    let resp = oneshot(&app, get_request(&photo)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, image);

    let _ = tokio::fs::remove_dir_all(dir).await;
  }

  #[tokio::test]
  async fn unknown_upload_returns_404() {
    let dir = temp_dir();
    let app = App::open(config_in(&dir)).await.unwrap();

    let resp = oneshot(&app, get_request("/uploads/receipt-0-0.jpg")).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let _ = tokio::fs::remove_dir_all(dir).await;
  }

  #[tokio::test]
  async fn oversized_upload_is_rejected() {
    let dir = temp_dir();
    let app = App::open(ServerConfig {
      max_upload_bytes: 64,
      ..config_in(&dir)
    })
    .await
    .unwrap();

    let big = vec![0u8; 4096];
    let resp = oneshot(&app, post_warranty("Sofa", Some(("big.png", big.as_slice())))).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let resp = oneshot(&app, get_request("/api/warranties")).await;
    assert_eq!(body_json(resp).await, json!([]));

    let _ = tokio::fs::remove_dir_all(dir).await;
  }

  // ── CORS ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn cors_headers_are_present() {
    let dir = temp_dir();
    let app = App::open(config_in(&dir)).await.unwrap();

    let req = Request::get("/api/warranties")
      .header(header::ORIGIN, "http://localhost:3000")
      .body(Body::empty())
      .unwrap();
    let resp = oneshot(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
      resp
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
    );

    let _ = tokio::fs::remove_dir_all(dir).await;
  }
}
