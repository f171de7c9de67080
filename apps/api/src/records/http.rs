use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::records::RecordStore;

/// Body of `GET /resume/:user` on the data API.
#[derive(Debug, Deserialize)]
struct ItemsEnvelope {
    #[serde(rename = "Items")]
    items: Vec<Value>,
}

/// Reads and writes entries through a remote résumé-data API
/// (`{base_url}/resume/{user}`), authenticating with an `x-api-key` header.
#[derive(Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpRecordStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid résumé data URL '{base_url}'"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Résumé data URL '{base_url}' cannot carry a path");
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            api_key,
        })
    }

    /// `{base_url}/resume/{user}`, with `user` percent-encoded as a single
    /// path segment so `/`, `#` or `?` in an id never change the target.
    fn url(&self, user: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("resume").push(user);
        }
        url
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("x-api-key", key),
            None => builder,
        }
    }
}

#[async_trait]
impl RecordStore for HttpRecordStore {
    async fn fetch(&self, user: &str) -> Result<Vec<Value>, AppError> {
        let url = self.url(user);
        let response = self
            .request(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("GET {url} failed: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("No résumé entries for user '{user}'")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Record store returned {status}: {body}");
            return Err(AppError::Transport(format!("GET {url} returned {status}")));
        }

        let envelope: ItemsEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::Transport(format!("GET {url} returned an invalid body: {e}")))?;
        debug!("Fetched {} entries for {user}", envelope.items.len());

        if envelope.items.is_empty() {
            return Err(AppError::NotFound(format!("No résumé entries for user '{user}'")));
        }
        Ok(envelope.items)
    }

    async fn put(&self, user: &str, item: Value) -> Result<(), AppError> {
        let url = self.url(user);
        let response = self
            .request(self.client.post(url.clone()))
            .json(&item)
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("POST {url} failed: {e}")))?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::AccessDenied(
                format!("Record store refused to store an entry for '{user}'"),
            )),
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::DataShape(format!("Record store rejected entry: {body}")))
            }
            status => Err(AppError::Transport(format!("POST {url} returned {status}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::skill;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer) -> HttpRecordStore {
        HttpRecordStore::new(&server.uri(), None).unwrap_or_else(|e| panic!("{e}"))
    }

    #[tokio::test]
    async fn test_fetch_reads_items_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/production/resume/alecwest"))
            .and(header("x-api-key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [skill("Rust", 9.0)],
                "Count": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = HttpRecordStore::new(
            &format!("{}/production/", server.uri()),
            Some("secret".to_string()),
        )
        .unwrap_or_else(|e| panic!("{e}"));
        let items = store.fetch("alecwest").await.unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Rust");
    }

    #[tokio::test]
    async fn test_fetch_404_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(matches!(store.fetch("nobody").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_empty_items_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Items": [] })))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(matches!(store.fetch("nobody").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(matches!(store.fetch("alecwest").await, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_transport() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(matches!(store.fetch("alecwest").await, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_put_unauthorized_is_access_denied() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resume/alecwest"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let store = store_for(&server);
        let result = store.put("alecwest", skill("Rust", 9.0)).await;
        assert!(matches!(result, Err(AppError::AccessDenied(_))));
    }

    #[tokio::test]
    async fn test_put_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/resume/alecwest"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server);
        assert!(store.put("alecwest", skill("Rust", 9.0)).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport() {
        let store = HttpRecordStore::new("http://127.0.0.1:1", None).unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(store.fetch("alecwest").await, Err(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_user_id_is_a_single_encoded_segment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/resume/alec"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [skill("AlecOnly", 5.0)]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/resume/alec%2Fmallory%23x%3Fy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Items": [skill("Mallory", 7.0)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(&server);
        let items = store
            .fetch("alec/mallory#x?y")
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(items[0]["title"], "Mallory");
        assert!(matches!(store.fetch("alec#mallory").await, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_rejects_unusable_base_url() {
        assert!(HttpRecordStore::new("not a url", None).is_err());
        assert!(HttpRecordStore::new("mailto:someone@example.com", None).is_err());
    }
}
