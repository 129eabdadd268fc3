use async_trait::async_trait;
use reqwest::header::HeaderName;
use reqwest::{Client, Method, StatusCode};
use url::Url;

use crate::error::{DedupError, Result};

/// A single outgoing API call.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(HeaderName, String)>,
}

/// Status and raw body of a completed call.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Performs HTTP requests on behalf of [`super::BitbucketClient`].
///
/// Returns `Err` only when no status was observed (connect failure, reset,
/// unreadable body). Non-2xx statuses are regular responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| DedupError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DedupError::Transport(format!("Failed to read response body: {e}")))?;

        Ok(HttpResponse { status, body })
    }
}


#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use reqwest::header::{ACCEPT, AUTHORIZATION};

    use super::*;

    #[tokio::test]
    async fn reqwest_transport_sends_headers_and_returns_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/repositories/acme/web/pipelines/")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("pagelen".into(), "10".into()),
            ]))
            .match_header("authorization", "Basic abc")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"page": 1}"#)
            .create_async()
            .await;

        let transport = ReqwestTransport::new("pipeline-dedup-test").unwrap();
        let url = Url::parse(&format!(
            "{}/repositories/acme/web/pipelines/?page=1&pagelen=10",
            server.url()
        ))
        .unwrap();

        let response = transport
            .execute(HttpRequest {
                method: Method::GET,
                url,
                headers: vec![
                    (ACCEPT, "application/json".to_string()),
                    (AUTHORIZATION, "Basic abc".to_string()),
                ],
            })
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, r#"{"page": 1}"#);
    }

    #[tokio::test]
    async fn reqwest_transport_passes_error_statuses_through() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/stop")
            .with_status(404)
            .create_async()
            .await;

        let transport = ReqwestTransport::new("pipeline-dedup-test").unwrap();
        let url = Url::parse(&format!("{}/stop", server.url())).unwrap();

        let response = transport
            .execute(HttpRequest {
                method: Method::POST,
                url,
                headers: Vec::new(),
            })
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn reqwest_transport_reports_connection_failure_as_error() {
        let transport = ReqwestTransport::new("pipeline-dedup-test").unwrap();
        // Port 1 on loopback is never listening in the test environment.
        let url = Url::parse("http://127.0.0.1:1/unreachable").unwrap();

        let result = transport
            .execute(HttpRequest {
                method: Method::GET,
                url,
                headers: Vec::new(),
            })
            .await;

        assert!(matches!(result, Err(DedupError::Network(_))));
    }
}
