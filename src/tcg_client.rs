use std::fmt;
use std::time::Duration;

use log::{debug, warn};
use reqwest::StatusCode;
use serde_json::Value;
use tokio::time::sleep;

use crate::utilities::constants::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_MAX_RETRIES, DEFAULT_RATE_LIMIT_DELAY_SECS, TCG_API_URL,
};

#[derive(Debug)]
pub enum FetchError {
    /// Transport failure after all retries, or a body that could not be read
    Network(reqwest::Error),
    /// Response body that did not match the expected shape
    Parse(serde_json::Error),
    /// Non-200 status other than 429; carries the body for diagnostics
    Api { status: StatusCode, body: String },
    /// Rate limits or transport failures outlasted the retry budget
    RetriesExhausted { attempts: u32 },
    /// A 200 response that carried no usable data
    NoData,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(e) => write!(f, "Network error: {}", e),
            FetchError::Parse(e) => write!(f, "Parse error: {}", e),
            FetchError::Api { status, body } => write!(f, "API error {}: {}", status, body),
            FetchError::RetriesExhausted { attempts } => {
                write!(f, "Gave up after {} attempts", attempts)
            }
            FetchError::NoData => write!(f, "Response carried no data"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Network(e) => Some(e),
            FetchError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Network(err)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err)
    }
}

/// Retry schedule for rate-limited requests and transport failures.
/// `backoff_delay` is pure so the schedule is testable without sleeping.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            base_delay: Duration::from_secs_f64(DEFAULT_RATE_LIMIT_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `attempt` (1-indexed): base * factor^attempt.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.base_delay.mul_f64(self.backoff_factor.powi(attempt as i32))
    }
}

pub struct TcgApiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    rate_limit_delay: Duration,
    retry: RetryPolicy,
}

impl TcgApiClient {
    pub fn new(base_url: Option<&str>, client: reqwest::Client, api_key: Option<String>) -> Self {
        TcgApiClient {
            client,
            base_url: base_url.unwrap_or(TCG_API_URL).to_string(),
            api_key,
            rate_limit_delay: Duration::from_secs_f64(DEFAULT_RATE_LIMIT_DELAY_SECS),
            retry: RetryPolicy::default(),
        }
    }

    /// Fixed pause after each successful response, keeping the steady-state
    /// request rate under the provider's limit.
    pub fn with_rate_limit_delay(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn setup_http_headers(&self) -> reqwest::header::HeaderMap {
        let mut header_map = reqwest::header::HeaderMap::new();
        header_map.insert(reqwest::header::ACCEPT, "application/json".parse().unwrap());
        if let Some(api_key) = &self.api_key {
            if let Ok(value) = api_key.parse() {
                header_map.insert("X-Api-Key", value);
            }
        }
        header_map
    }

    /// Issues a GET against the API. Rate limits (429) and transport
    /// failures are retried with exponential backoff; any other non-200
    /// status fails immediately. Retry waits start at base * factor, so
    /// they are never shorter than the steady-state pacing delay.
    pub async fn get_json(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Value, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        let mut attempt: u32 = 0;

        loop {
            match self
                .client
                .get(&url)
                .query(params)
                .headers(self.setup_http_headers())
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status == StatusCode::OK {
                        match response.json::<Value>().await {
                            Ok(body) => {
                                sleep(self.rate_limit_delay).await;
                                return Ok(body);
                            }
                            Err(e) => {
                                warn!("Failed to read response body from {}: {}", url, e);
                            }
                        }
                    } else if status == StatusCode::TOO_MANY_REQUESTS {
                        warn!("Rate limited on {}", url);
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        return Err(FetchError::Api { status, body });
                    }
                }
                Err(e) => {
                    warn!("Request error on {}: {}", url, e);
                }
            }

            attempt += 1;
            if attempt > self.retry.max_retries {
                return Err(FetchError::RetriesExhausted { attempts: attempt });
            }
            let wait = self.retry.backoff_delay(attempt);
            debug!(
                "Retrying {} in {:.1}s (attempt {}/{})",
                url,
                wait.as_secs_f64(),
                attempt,
                self.retry.max_retries
            );
            sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::helpers::test_client;
    use serde_json::json;

    #[test]
    fn test_backoff_schedule_is_attempt_indexed() {
        let policy = RetryPolicy {
            max_retries: 3,
            backoff_factor: 2.0,
            base_delay: Duration::from_secs_f64(1.0),
        };

        assert_eq!(policy.backoff_delay(1), Duration::from_secs_f64(2.0));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs_f64(4.0));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs_f64(8.0));
    }

    #[tokio::test]
    async fn test_ok_response_returns_the_parsed_body() {
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let mock = server
            .mock("GET", "/sets")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!({"data": [], "count": 0, "totalCount": 0}).to_string())
            .expect(1)
            .create();

        let client = test_client(&server.url());
        let body = client
            .get_json("sets", &[("page", "1".to_string())])
            .await
            .unwrap();

        mock.assert();
        assert_eq!(body["totalCount"], 0);
    }

    #[tokio::test]
    async fn test_non_200_status_fails_without_retrying() {
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        let mock = server
            .mock("GET", "/sets")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .expect(1)
            .create();

        let client = test_client(&server.url());
        let error = client.get_json("sets", &[]).await.unwrap_err();

        mock.assert();
        match error {
            FetchError::Api { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "internal error");
            }
            other => panic!("Expected an API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_rate_limits_are_retried_until_the_budget_runs_out() {
        let mut server = std::thread::spawn(|| mockito::Server::new())
            .join()
            .unwrap();
        // initial request plus max_retries retries
        let mock = server
            .mock("GET", "/sets")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .expect(4)
            .create();

        let client = test_client(&server.url());
        let error = client.get_json("sets", &[]).await.unwrap_err();

        mock.assert();
        match error {
            FetchError::RetriesExhausted { attempts } => assert_eq!(attempts, 4),
            other => panic!("Expected retry exhaustion, got {:?}", other),
        }
    }
}
