//! Request plumbing between the API client and the network.
//!
//! A `Transport` sends a GET or a JSON POST to an endpoint and hands back the
//! status and body text. Decoding and error payloads are left to the client.

use std::fmt;

use url::Url;

use crate::api::ApiError;
use crate::config::ClientConfig;

/// Path segments plus query pairs, relative to the service base URL.
///
/// Segments are stored raw and percent-encoded when resolved, so puzzle names
/// may contain spaces, slashes or any other character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Endpoint {
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends the endpoint to `base`, keeping any path the base already has.
    pub fn resolve(&self, base: &Url) -> Result<Url, ApiError> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ApiError::BaseUrl(base.to_string()))?;
            path.pop_if_empty();
            path.extend(&self.segments);
        }
        if self.query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&self.query);
        }
        Ok(url)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        for (i, (key, value)) in self.query.iter().enumerate() {
            let separator = if i == 0 { '?' } else { '&' };
            write!(f, "{separator}{key}={value}")?;
        }
        Ok(())
    }
}

/// Status code and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the puzzle service.
///
/// Implementations only fail for transport-level problems; any HTTP status
/// is returned as a `Reply`.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn get(&self, endpoint: &Endpoint) -> Result<Reply, ApiError>;
    async fn post(&self, endpoint: &Endpoint, body: &serde_json::Value) -> Result<Reply, ApiError>;
}

/// `reqwest`-backed transport with a fixed base URL and timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::from_transport)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Reply, ApiError> {
        let response = request
            .send()
            .await
            .map_err(ApiError::from_transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(ApiError::from_transport)?;
        Ok(Reply { status, body })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, endpoint: &Endpoint) -> Result<Reply, ApiError> {
        let url = endpoint.resolve(&self.base_url)?;
        log::info!("GET {url}");
        let request = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        self.send(request).await
    }

    async fn post(&self, endpoint: &Endpoint, body: &serde_json::Value) -> Result<Reply, ApiError> {
        let url = endpoint.resolve(&self.base_url)?;
        log::info!("POST {url}");
        self.send(self.client.post(url).json(body)).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_percent_encodes_segments() {
        let base = Url::parse("http://127.0.0.1:9080").unwrap();
        let endpoint = Endpoint::new(["api", "solution", "my puzzle/1?"]);
        let url = endpoint.resolve(&base).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9080/api/solution/my%20puzzle%2F1%3F");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_adds_query() {
        let base = Url::parse("http://example.com/service/").unwrap();
        let endpoint = Endpoint::new(["api", "solution", "p"]).with_query("start_piece_id", 7);
        let url = endpoint.resolve(&base).unwrap();
        assert_eq!(url.as_str(), "http://example.com/service/api/solution/p?start_piece_id=7");
        assert_eq!(endpoint.to_string(), "/api/solution/p?start_piece_id=7");
    }

    #[tokio::test]
    async fn test_http_get_times_out_on_silent_server() {
        // accepted by the backlog, never answered
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ClientConfig::new(
            &format!("http://{addr}"),
            std::time::Duration::from_millis(100),
        )
        .unwrap();
        let transport = HttpTransport::new(&config).unwrap();

        let result = transport.get(&Endpoint::new(["api", "puzzles"])).await;
        assert_eq!(result, Err(ApiError::Timeout));
        drop(listener);
    }

    #[test]
    fn test_reply_success_range() {
        let reply = |status| Reply {
            status,
            body: String::new(),
        };
        assert!(reply(200).is_success());
        assert!(reply(201).is_success());
        assert!(!reply(404).is_success());
        assert!(!reply(500).is_success());
    }
}
