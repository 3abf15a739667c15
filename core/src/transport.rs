//! The network seam.
//!
//! # Design
//! Facades only ever call `Transport::get`, so tests and hosts can swap the
//! network out entirely. `HttpTransport` is the bundled implementation: it
//! keeps the build and parse halves of a round-trip as separate, pure
//! methods and performs the I/O in between with ureq (cargo feature
//! `http`, on by default).

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{encode_fragment, HttpRequest, HttpResponse};

/// Issues one GET against the API and returns the decoded JSON body.
pub trait Transport {
    /// `endpoint` is relative to the base URL (`movie`, `quote/{id}`);
    /// `query` holds compiled fragments in the order they must be sent.
    fn get(&self, endpoint: &str, query: &[String]) -> Result<Value>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, endpoint: &str, query: &[String]) -> Result<Value> {
        (**self).get(endpoint, query)
    }
}

/// Bearer-authenticated HTTP transport.
#[derive(Clone)]
pub struct HttpTransport {
    config: ClientConfig,
    #[cfg(feature = "http")]
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Self {
        #[cfg(feature = "http")]
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout()))
            .build()
            .new_agent();

        Self {
            config,
            #[cfg(feature = "http")]
            agent,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `{base_url}/{endpoint}`, plus `?` and the `&`-joined fragments when
    /// there are any.
    pub fn build_request(&self, endpoint: &str, query: &[String]) -> HttpRequest {
        let mut url = format!(
            "{}/{}",
            self.config.base_url(),
            endpoint.trim_start_matches('/')
        );
        if !query.is_empty() {
            let encoded: Vec<String> = query.iter().map(|f| encode_fragment(f)).collect();
            url.push('?');
            url.push_str(&encoded.join("&"));
        }
        HttpRequest {
            url,
            headers: vec![
                (
                    "authorization".to_string(),
                    format!("Bearer {}", self.config.access_token()),
                ),
                ("accept".to_string(), "application/json".to_string()),
            ],
        }
    }

    /// Anything but 200 is an `ApiError::Http` carrying the raw body; a 200
    /// whose body is not JSON is an `ApiError::Parse`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value> {
        if response.status != 200 {
            error!(status = response.status, body = %response.body, "Request failed");
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        let content_type = response.header("content-type").unwrap_or("unknown");
        match serde_json::from_str(&response.body) {
            Ok(value) => {
                debug!(
                    status = response.status,
                    content_type,
                    bytes = response.body.len(),
                    "Response received"
                );
                Ok(value)
            }
            Err(e) => {
                error!(status = response.status, content_type, error = %e, "Failed to parse response");
                Err(ApiError::Parse(e.to_string()))
            }
        }
    }

    #[cfg(feature = "http")]
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut builder = self.agent.get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let mut response = builder.call().map_err(|e| {
            error!(url = %request.url, error = %e, "Request failed");
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(feature = "http")]
impl Transport for HttpTransport {
    fn get(&self, endpoint: &str, query: &[String]) -> Result<Value> {
        let request = self.build_request(endpoint, query);
        info!(url = %request.url, "GET request");
        let response = self.execute(&request)?;
        self.parse_response(response)
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> HttpTransport {
        let config = ClientConfig::new("test-token")
            .unwrap()
            .with_base_url("http://localhost:3000/v2/");
        HttpTransport::new(config)
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_request_without_query() {
        let req = transport().build_request("movie", &[]);
        assert_eq!(req.url, "http://localhost:3000/v2/movie");
        assert_eq!(
            req.headers[0],
            ("authorization".to_string(), "Bearer test-token".to_string())
        );
    }

    #[test]
    fn build_request_joins_fragments_in_order() {
        let query = vec![
            "movie=5cd95395de30eff6ebccde5d".to_string(),
            "sort=dialog:asc".to_string(),
            "limit=5".to_string(),
        ];
        let req = transport().build_request("quote", &query);
        assert_eq!(
            req.url,
            "http://localhost:3000/v2/quote?movie=5cd95395de30eff6ebccde5d&sort=dialog:asc&limit=5"
        );
    }

    #[test]
    fn build_request_escapes_unsafe_bytes() {
        let query = vec![
            "name=The Two Towers".to_string(),
            "budgetInMillions>200".to_string(),
        ];
        let req = transport().build_request("movie", &query);
        assert_eq!(
            req.url,
            "http://localhost:3000/v2/movie?name=The%20Two%20Towers&budgetInMillions%3E200"
        );
    }

    #[test]
    fn build_request_tolerates_leading_slash() {
        let req = transport().build_request("/movie/abc/quote", &[]);
        assert_eq!(req.url, "http://localhost:3000/v2/movie/abc/quote");
    }

    #[test]
    fn parse_response_success() {
        let value = transport()
            .parse_response(response(200, r#"{"docs":[],"total":0}"#))
            .unwrap();
        assert_eq!(value["total"], 0);
    }

    #[test]
    fn parse_response_non_200_is_http_error() {
        let err = transport()
            .parse_response(response(401, r#"{"success":false,"message":"Unauthorized."}"#))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 401,
                body: r#"{"success":false,"message":"Unauthorized."}"#.to_string(),
            }
        );
    }

    #[test]
    fn parse_response_non_json_error_page_is_still_http_error() {
        let err = transport()
            .parse_response(response(502, "<html>Bad Gateway</html>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 502, .. }));
    }

    #[test]
    fn parse_response_accepts_json_with_content_type() {
        let mut ok = response(200, r#"{"docs":[]}"#);
        ok.headers = vec![(
            "Content-Type".to_string(),
            "application/json; charset=utf-8".to_string(),
        )];
        assert_eq!(ok.header("content-type"), Some("application/json; charset=utf-8"));
        let value = transport().parse_response(ok).unwrap();
        assert!(value["docs"].as_array().unwrap().is_empty());
    }

    #[test]
    fn parse_response_bad_json() {
        let err = transport()
            .parse_response(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[test]
    fn debug_never_prints_the_token() {
        assert!(!format!("{:?}", transport()).contains("test-token"));
    }
}
