/// Base HTTP client with rate limiting
use crate::errors::GatewayError;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};

/// Rate limiter for API clients
///
/// Enforces a minimum interval between requests and caps concurrent
/// in-flight requests per endpoint.
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    last_request: Arc<Mutex<Option<Instant>>>,
    min_interval: Duration,
}

impl RateLimiter {
    pub fn new(min_interval_ms: u64, max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            last_request: Arc::new(Mutex::new(None)),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    /// Wait until we can make a request (respects rate limits)
    pub async fn acquire(&self) -> Result<RateLimitGuard, String> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| format!("Failed to acquire rate limiter permit: {}", e))?;

        if !self.min_interval.is_zero() {
            let mut last = self.last_request.lock().await;
            let now = Instant::now();

            if let Some(last_time) = *last {
                let elapsed = last_time.elapsed();
                if elapsed < self.min_interval {
                    let sleep_duration = self.min_interval - elapsed;
                    drop(last);
                    tokio::time::sleep(sleep_duration).await;
                    let mut last_relocked = self.last_request.lock().await;
                    *last_relocked = Some(Instant::now());
                } else {
                    *last = Some(now);
                }
            } else {
                *last = Some(now);
            }
        }

        Ok(RateLimitGuard { _permit: permit })
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// RAII guard returned by [`RateLimiter::acquire`]
pub struct RateLimitGuard {
    _permit: OwnedSemaphorePermit,
}

/// HTTP client wrapper with a shared per-request timeout
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }
}

/// Execute a rate-limited GET and decode the JSON body
///
/// Shared by all upstream clients. Non-success statuses and body decode
/// failures are classified into [`GatewayError`] variants.
pub async fn get_json<T>(
    http: &HttpClient,
    limiter: &RateLimiter,
    endpoint: &str,
    url: &str,
) -> Result<T, GatewayError>
where
    T: serde::de::DeserializeOwned,
{
    get_json_with_auth(http, limiter, endpoint, url, None).await
}

/// [`get_json`] with an optional authentication header
pub async fn get_json_with_auth<T>(
    http: &HttpClient,
    limiter: &RateLimiter,
    endpoint: &str,
    url: &str,
    auth_header: Option<(&str, &str)>,
) -> Result<T, GatewayError>
where
    T: serde::de::DeserializeOwned,
{
    let _guard = limiter.acquire().await.map_err(|e| GatewayError::Network {
        endpoint: endpoint.to_string(),
        message: e,
    })?;

    let mut request = http.client().get(url);
    if let Some((name, value)) = auth_header {
        request = request.header(name, value);
    }

    let response = request
        .send()
        .await
        .map_err(|e| GatewayError::from_reqwest(endpoint, http.timeout_ms(), e))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.ok();
        return Err(GatewayError::HttpStatus {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| GatewayError::Parse {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rate_limiter_enforces_min_interval() {
        let limiter = RateLimiter::new(50, 1);

        let start = Instant::now();
        drop(limiter.acquire().await.unwrap());
        drop(limiter.acquire().await.unwrap());
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_interval_does_not_sleep() {
        let limiter = RateLimiter::new(0, 4);
        let start = Instant::now();
        drop(limiter.acquire().await.unwrap());
        drop(limiter.acquire().await.unwrap());
        assert!(start.elapsed() < Duration::from_millis(20));
    }
}
