//! HTTP catalogue source

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::application::errors::CatalogueError;
use crate::domain::entities::Catalogue;
use crate::domain::traits::CatalogueSource;

/// Fetches the catalogue as a JSON object from a fixed URL.
///
/// No caching, retries or timeout beyond the client defaults.
pub struct HttpCatalogueSource {
    url: String,
    client: Client,
}

impl HttpCatalogueSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: Client::new(),
        }
    }
}

/// Parse a response body into a catalogue; anything but a JSON object is malformed
pub fn parse_catalogue(body: &[u8]) -> Result<Catalogue, CatalogueError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| CatalogueError::Malformed(e.to_string()))?;

    match value {
        Value::Object(object) => Ok(Catalogue::from_json_object(object)),
        other => Err(CatalogueError::Malformed(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[async_trait]
impl CatalogueSource for HttpCatalogueSource {
    async fn fetch(&self) -> Result<Catalogue, CatalogueError> {
        let response = self.client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| CatalogueError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(CatalogueError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogueError::Network(e.to_string()))?;

        parse_catalogue(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::header, http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    const MOVIES: &str = r#"{"Zodiac": "https://x/zodiac", "Alien": "https://x/alien", "Memento": "https://x/memento"}"#;

    /// Serve `app` on an ephemeral local port and return its base URL
    async fn serve(app: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn catalogue_server() -> Router {
        Router::new()
            .route("/movies.json", get(|| async { ([(header::CONTENT_TYPE, "application/json")], MOVIES) }))
            .route("/broken.json", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/list.json", get(|| async { r#"["Zodiac", "Alien"]"# }))
    }

    #[test]
    fn test_parse_object() {
        let catalogue = parse_catalogue(br#"{"Heat": "https://x/heat", "Ran": "https://x/ran"}"#).unwrap();
        assert_eq!(catalogue.len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        let err = parse_catalogue(br#"["Heat"]"#).unwrap_err();
        assert!(matches!(err, CatalogueError::Malformed(msg) if msg.contains("an array")));

        let err = parse_catalogue(b"<html>oops</html>").unwrap_err();
        assert!(matches!(err, CatalogueError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_unreachable_source_degrades_to_empty() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let source = HttpCatalogueSource::new("http://127.0.0.1:9/movies.json");
        let catalogue = source.fetch_or_empty().await;
        assert!(catalogue.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_keeps_document_order() {
        let base = serve(catalogue_server()).await;
        let source = HttpCatalogueSource::new(format!("{}/movies.json", base));

        let catalogue = source.fetch().await.unwrap();
        let titles: Vec<&str> = catalogue.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Zodiac", "Alien", "Memento"]);
        assert_eq!(catalogue.iter().next().unwrap().link, "https://x/zodiac");
    }

    #[tokio::test]
    async fn test_missing_document_is_status_error() {
        let base = serve(catalogue_server()).await;
        let source = HttpCatalogueSource::new(format!("{}/nope.json", base));

        assert!(matches!(source.fetch().await, Err(CatalogueError::Status(404))));
        assert!(source.fetch_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_degrades_to_empty() {
        let base = serve(catalogue_server()).await;
        let source = HttpCatalogueSource::new(format!("{}/broken.json", base));

        assert!(matches!(source.fetch().await, Err(CatalogueError::Status(500))));
        assert!(source.fetch_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_body_is_malformed() {
        let base = serve(catalogue_server()).await;
        let source = HttpCatalogueSource::new(format!("{}/list.json", base));

        assert!(matches!(source.fetch().await, Err(CatalogueError::Malformed(_))));
        assert!(source.fetch_or_empty().await.is_empty());
    }
}
