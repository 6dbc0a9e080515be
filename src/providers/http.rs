use isahc::{config::Configurable, prelude::*, HttpClient};
use serde_json::Value;
use std::time::Duration as StdDuration;
use tokio::time::sleep;

use crate::error::{AppError, Result};

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT: StdDuration = StdDuration::from_secs(30);
const MAX_BACKOFF: StdDuration = StdDuration::from_secs(10);

/// Shared JSON-over-HTTP client for provider modules.
///
/// Sends browser-like headers with a rotating User-Agent (several upstream
/// endpoints reject requests without them) and retries transient failures
/// with exponential backoff plus jitter. Client errors other than 403/429
/// are request problems and fail immediately.
#[derive(Clone)]
pub struct ApiClient {
    client: HttpClient,
    user_agents: Vec<String>,
    random_agent: bool,
}

impl ApiClient {
    pub fn new(random_agent: bool) -> Result<Self> {
        let client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        let user_agents = vec![
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0".to_string(),
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.3 Safari/605.1.15".to_string(),
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0".to_string(),
        ];

        Ok(Self {
            client,
            user_agents,
            random_agent,
        })
    }

    fn user_agent(&self) -> &str {
        if self.random_agent {
            use rand::seq::SliceRandom;
            self.user_agents
                .choose(&mut rand::thread_rng())
                .unwrap_or(&self.user_agents[0])
        } else {
            &self.user_agents[0]
        }
    }

    /// GET a URL and decode the body as JSON, retrying transient failures
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        let mut last_error: Option<String> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = StdDuration::from_secs_f64(
                    2.0_f64.powi(attempt as i32 - 1) + rand::random::<f64>(),
                );
                let delay = delay.min(MAX_BACKOFF);
                let reason = last_error.as_deref().unwrap_or("unknown error");
                tracing::info!(
                    attempt = attempt + 1,
                    max_retries = MAX_RETRIES,
                    reason,
                    wait_s = delay.as_secs_f64(),
                    "Retrying request after backoff"
                );
                sleep(delay).await;
            }

            let request = isahc::Request::builder()
                .uri(url)
                .method("GET")
                .header("Accept", "application/json, text/plain, */*")
                .header("Accept-Language", "en-US,en;q=0.9")
                .header("Cache-Control", "no-cache")
                .header("Pragma", "no-cache")
                .header("User-Agent", self.user_agent())
                .body(())
                .map_err(|e| AppError::InvalidInput(format!("Request build error: {}", e)))?;

            match self.client.send_async(request).await {
                Ok(mut resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        let text = resp
                            .text()
                            .await
                            .map_err(|e| AppError::Network(format!("Response body error: {}", e)))?;
                        match serde_json::from_str::<Value>(&text) {
                            Ok(data) => return Ok(data),
                            Err(e) => {
                                last_error = Some(format!("JSON parse error: {}", e));
                                continue;
                            }
                        }
                    } else if status == 429 {
                        last_error = Some("Too Many Requests (429) - rate limited".to_string());
                        continue;
                    } else if status == 403 {
                        last_error = Some("Forbidden (403) - likely bot detection".to_string());
                        continue;
                    } else if status.is_server_error() {
                        last_error = Some(format!("Server error ({})", status.as_u16()));
                        continue;
                    } else {
                        // Other 4xx are request problems, not transient
                        return Err(AppError::Network(format!(
                            "HTTP {} for {}",
                            status.as_u16(),
                            url
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(format!("Network error: {}", e));
                    continue;
                }
            }
        }

        let reason = last_error.unwrap_or_else(|| "max retries exceeded".to_string());
        if reason.contains("429") {
            Err(AppError::RateLimit)
        } else {
            Err(AppError::Network(reason))
        }
    }
}

/// Read a JSON value as f64, accepting both numbers and numeric strings.
///
/// The upstream price feeds are inconsistent about this: NSE and MoneyControl
/// return numeric strings, Yahoo and Finnhub return numbers.
pub fn json_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse().ok(),
        _ => None,
    }
}

/// Read a JSON value as u64, accepting numbers and numeric strings
pub fn json_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.max(0.0) as u64))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_user_agent_is_first_in_pool() {
        let api = ApiClient::new(false).unwrap();
        assert!(api.user_agent().starts_with("Mozilla/5.0 (Windows NT 10.0"));
    }

    #[test]
    fn test_json_f64_accepts_numbers_and_strings() {
        assert_eq!(json_f64(&json!(12.5)), Some(12.5));
        assert_eq!(json_f64(&json!("12.5")), Some(12.5));
        assert_eq!(json_f64(&json!("0.82%")), Some(0.82));
        assert_eq!(json_f64(&json!(null)), None);
        assert_eq!(json_f64(&json!("n/a")), None);
    }

    #[test]
    fn test_json_u64_accepts_decimal_strings() {
        assert_eq!(json_u64(&json!(100)), Some(100));
        assert_eq!(json_u64(&json!("100")), Some(100));
        assert_eq!(json_u64(&json!("100.0")), Some(100));
        assert_eq!(json_u64(&json!(-5)), Some(0));
    }
}
