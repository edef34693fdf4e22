//! HTTP content source backed by `reqwest`.

use async_trait::async_trait;
use folio_api_types::{PostPayload, PostSummaryPayload};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::repos::{ContentSource, SourceError};
use crate::config::ApiSettings;

use super::error::InfraError;

const SOURCE: &str = "infra::http";

/// Reads the static JSON API over plain GET requests.
#[derive(Clone, Debug)]
pub struct HttpContentSource {
    client: Client,
    summary_url: Url,
    posts_url: Url,
}

impl HttpContentSource {
    pub fn new(api: &ApiSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(api.user_agent.as_str())
            .build()
            .map_err(|err| InfraError::configuration(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            summary_url: api.summary_url.clone(),
            posts_url: api.posts_url.clone(),
        })
    }

    /// `{posts_url}/{id}.json`, with `id` encoded as a single path segment.
    pub fn post_url(&self, id: &str) -> Result<Url, SourceError> {
        let mut url = self.posts_url.clone();
        url.path_segments_mut()
            .map_err(|()| SourceError::network(&self.posts_url, "posts URL cannot be a base"))?
            .pop_if_empty()
            .push(&format!("{id}.json"));
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        debug!(target_module = SOURCE, url = %url, "fetching");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| SourceError::network(&url, err))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|err| SourceError::network(&url, err))?;
        serde_json::from_slice(&bytes).map_err(|err| SourceError::decode(&url, err))
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    async fn fetch_summaries(&self) -> Result<Vec<PostSummaryPayload>, SourceError> {
        self.get_json(self.summary_url.clone()).await
    }

    async fn fetch_post(&self, id: &str) -> Result<PostPayload, SourceError> {
        let url = self.post_url(id)?;
        self.get_json(url).await.map_err(|err| match err {
            SourceError::Status { url, status: 404 } => SourceError::NotFound { url },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;

    use super::*;
    use crate::application::error::{AppError, ErrorKind};

    fn source(server: &MockServer, posts_path: &str) -> HttpContentSource {
        let base = Url::parse(&server.base_url()).expect("mock base url");
        let api = ApiSettings {
            summary_url: base.join("data/blog/summary.json").expect("summary url"),
            posts_url: base.join(posts_path).expect("posts url"),
            base_url: base,
            user_agent: "folio-test".to_string(),
        };
        HttpContentSource::new(&api).expect("source")
    }

    #[tokio::test]
    async fn fetches_summary_list() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method("GET")
                .path("/data/blog/summary.json")
                .header("user-agent", "folio-test");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"[{"id":"p1","title":"One","published":"2024-01-01T00:00:00Z","length":3,"categories":["news"]}]"#);
        }).await;

        let summaries = source(&server, "data/blog/posts")
            .fetch_summaries()
            .await
            .expect("summaries");
        mock.assert_async().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].id, "p1");
        assert_eq!(summaries[0].length, Some(3));
    }

    #[tokio::test]
    async fn post_ids_are_encoded_as_one_segment() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method("GET").path("/data/blog/posts/a%20b%2Fc.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"title":"T","content":"<p>x</p>","published":"2024-01-01T00:00:00Z","updated":"2024-01-02T00:00:00Z","categories":[]}"#);
        }).await;

        let post = source(&server, "data/blog/posts/")
            .fetch_post("a b/c")
            .await
            .expect("post");
        mock.assert_async().await;
        assert_eq!(post.title, "T");
    }

    #[test]
    fn post_url_appends_json_file() {
        let server = MockServer::start();
        let url = source(&server, "data/blog/posts")
            .post_url("hello")
            .expect("url");
        assert!(url.as_str().ends_with("/data/blog/posts/hello.json"));
    }

    #[tokio::test]
    async fn missing_post_maps_to_not_found() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("GET").path("/data/blog/posts/ghost.json");
            then.status(404);
        }).await;

        let err = source(&server, "data/blog/posts")
            .fetch_post("ghost")
            .await
            .expect_err("404");
        assert!(matches!(err, SourceError::NotFound { .. }));
        assert_eq!(AppError::from(err).kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn missing_summary_is_a_network_failure() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("GET").path("/data/blog/summary.json");
            then.status(404);
        }).await;

        let err = source(&server, "data/blog/posts")
            .fetch_summaries()
            .await
            .expect_err("404");
        assert!(matches!(err, SourceError::Status { status: 404, .. }));
        assert_eq!(AppError::from(err).kind(), ErrorKind::NetworkFailure);
    }

    #[tokio::test]
    async fn server_errors_are_network_failures() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("GET").path("/data/blog/summary.json");
            then.status(503).body("maintenance");
        }).await;

        let err = source(&server, "data/blog/posts")
            .fetch_summaries()
            .await
            .expect_err("503");
        assert!(matches!(err, SourceError::Status { status: 503, .. }));
        assert_eq!(AppError::from(err).kind(), ErrorKind::NetworkFailure);
    }

    #[tokio::test]
    async fn unexpected_shape_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method("GET").path("/data/blog/summary.json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"posts":[]}"#);
        }).await;

        let err = source(&server, "data/blog/posts")
            .fetch_summaries()
            .await
            .expect_err("object instead of array");
        assert!(matches!(err, SourceError::Decode { .. }));
        assert_eq!(AppError::from(err).kind(), ErrorKind::ParseFailure);
    }
}
