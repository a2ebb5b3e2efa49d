use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::log::{debug, warn};

use crate::books::dto::BookDto;
use crate::catalog::response::{ApiResponse, ResponseData};

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const BASE_URL_ENV: &str = "BOOK_CATALOG_API_URL";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// CatalogApi abstracts the Book Catalog Service operations so the
// presentation layer can be wired against a stub in tests.
#[async_trait]
pub trait CatalogApi: Sync + Send {
    async fn list_books(&self) -> ApiResponse;
    async fn get_book(&self, isbn: &str) -> ApiResponse;
    async fn add_book(&self, book: &BookDto) -> ApiResponse;
    async fn update_book(&self, isbn: &str, book: &BookDto) -> ApiResponse;
    async fn delete_book(&self, isbn: &str) -> ApiResponse;
    async fn import_catalog(&self, format: &str, content: &str) -> ApiResponse;
    async fn export_catalog(&self, format: &str) -> ApiResponse;
    async fn undo_last(&self) -> ApiResponse;
}

// Expected body shape per operation family, applied to non-empty 2xx bodies.
#[derive(Debug, Clone, Copy)]
enum PayloadKind {
    Books,
    Book,
    Import,
    Export,
    Undo,
}

impl PayloadKind {
    fn parse(self, body: &str) -> Result<ResponseData, serde_json::Error> {
        match self {
            PayloadKind::Books => serde_json::from_str(body).map(ResponseData::Books),
            PayloadKind::Book => serde_json::from_str(body).map(ResponseData::Book),
            PayloadKind::Import => serde_json::from_str(body).map(ResponseData::Import),
            PayloadKind::Export => serde_json::from_str(body).map(ResponseData::Export),
            PayloadKind::Undo => serde_json::from_str(body).map(ResponseData::Undo),
        }
    }
}

// BookCatalogClient issues one HTTP request per catalog operation and folds
// every outcome, including transport failures, into an ApiResponse. It holds
// no state beyond the resolved base url and the connection pool.
pub struct BookCatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl BookCatalogClient {
    // Base url precedence: explicit argument, then BOOK_CATALOG_API_URL,
    // then the default local address.
    pub fn new(base_url: Option<&str>) -> BookCatalogClient {
        let env_url = std::env::var(BASE_URL_ENV).ok().filter(|url| !url.is_empty());
        let base_url = base_url
            .map(str::to_string)
            .or(env_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        BookCatalogClient { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    // Single attempt, no retries; the caller decides whether to try again.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        kind: PayloadKind,
    ) -> ApiResponse {
        let url = format!("{}{}", self.base_url, path);
        debug!("catalog request {} {}", method, path);
        let mut builder = self.http.request(method.clone(), url.as_str());
        if let Some(payload) = body {
            builder = builder.json(&payload);
        }
        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("catalog request {} {} failed: {}", method, path, err);
                return ApiResponse::transport_error(err.to_string().as_str());
            }
        };
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                warn!("catalog response for {} {} unreadable: {}", method, path, err);
                return ApiResponse::transport_error(err.to_string().as_str());
            }
        };
        if status.is_success() {
            if text.is_empty() {
                return ApiResponse::ok(status.as_u16(), None);
            }
            return match kind.parse(text.as_str()) {
                Ok(data) => ApiResponse::ok(status.as_u16(), Some(data)),
                Err(err) => ApiResponse::http_error(
                    status.as_u16(),
                    format!("malformed payload: {}", err).as_str(),
                ),
            };
        }
        ApiResponse::http_error(
            status.as_u16(),
            extract_error(status.as_u16(), text.as_str()).as_str(),
        )
    }
}

#[async_trait]
impl CatalogApi for BookCatalogClient {
    async fn list_books(&self) -> ApiResponse {
        self.request(Method::GET, "/catalog/books", None, PayloadKind::Books)
            .await
    }

    async fn get_book(&self, isbn: &str) -> ApiResponse {
        self.request(
            Method::GET,
            format!("/catalog/books/{}", isbn).as_str(),
            None,
            PayloadKind::Book,
        )
        .await
    }

    async fn add_book(&self, book: &BookDto) -> ApiResponse {
        let payload = match serde_json::to_value(book) {
            Ok(payload) => payload,
            Err(err) => {
                return ApiResponse::transport_error(
                    format!("request encoding failed: {}", err).as_str(),
                )
            }
        };
        self.request(Method::POST, "/catalog/books", Some(payload), PayloadKind::Book)
            .await
    }

    async fn update_book(&self, isbn: &str, book: &BookDto) -> ApiResponse {
        let payload = match serde_json::to_value(book) {
            Ok(payload) => payload,
            Err(err) => {
                return ApiResponse::transport_error(
                    format!("request encoding failed: {}", err).as_str(),
                )
            }
        };
        self.request(
            Method::PUT,
            format!("/catalog/books/{}", isbn).as_str(),
            Some(payload),
            PayloadKind::Book,
        )
        .await
    }

    async fn delete_book(&self, isbn: &str) -> ApiResponse {
        self.request(
            Method::DELETE,
            format!("/catalog/books/{}", isbn).as_str(),
            None,
            PayloadKind::Book,
        )
        .await
    }

    // The content string travels verbatim inside the JSON body; it is never
    // parsed or re-encoded on this side.
    async fn import_catalog(&self, format: &str, content: &str) -> ApiResponse {
        let payload = json!({ "format": format, "content": content });
        self.request(Method::POST, "/catalog/import", Some(payload), PayloadKind::Import)
            .await
    }

    async fn export_catalog(&self, format: &str) -> ApiResponse {
        let payload = json!({ "format": format });
        self.request(Method::POST, "/catalog/export", Some(payload), PayloadKind::Export)
            .await
    }

    async fn undo_last(&self) -> ApiResponse {
        self.request(Method::POST, "/catalog/undo", None, PayloadKind::Undo)
            .await
    }
}

// Extract a short error message from a non-2xx response body. A body that
// fails to parse as JSON, or a JSON object without a usable detail field,
// falls back to the raw text; an empty body falls back to "HTTP {status}".
// The discarded parse failure is intentional, not an error to report.
fn extract_error(status: u16, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        match map.get("detail") {
            Some(Value::String(detail)) if !detail.is_empty() => return detail.clone(),
            Some(detail @ (Value::Number(_) | Value::Array(_) | Value::Object(_))) => {
                return detail.to_string()
            }
            _ => {}
        }
    }
    if body.is_empty() {
        format!("HTTP {}", status)
    } else {
        body.to_string()
    }
}
