use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use super::error::ApiError;

/// Transport retry schedule: 3 retries with exponential backoff from 1s, plus jitter.
const RETRY_BASE_DELAY_SECS: u64 = 1;
pub(super) const MAX_RETRIES: usize = 3;
const RETRY_JITTER_DIVISOR: u128 = 4; // + up to 25% jitter

fn is_retriable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn is_retriable_send_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

fn retry_base_delay(attempt: usize) -> Duration {
    let multiplier = 1u64.checked_shl(attempt as u32).unwrap_or(u64::MAX);
    Duration::from_secs(RETRY_BASE_DELAY_SECS.saturating_mul(multiplier))
}

fn add_jitter(delay: Duration) -> Duration {
    let max_jitter_ms = delay.as_millis() / RETRY_JITTER_DIVISOR;
    if max_jitter_ms == 0 {
        return delay;
    }

    let max_jitter_ms = std::cmp::min(max_jitter_ms, u128::from(u64::MAX)) as u64;
    let jitter_ms = rand::thread_rng().gen_range(0..=max_jitter_ms);
    delay + Duration::from_millis(jitter_ms)
}

/// Send a request, retrying transient failures up to `max_retries` times.
///
/// `make_request` is called once per attempt because a `RequestBuilder`
/// cannot be reused. Non-success responses that are not retriable (or that
/// exhausted the retries) are returned as-is for the caller to inspect.
pub(super) async fn send_with_retry(
    url: &str,
    max_retries: usize,
    mut make_request: impl FnMut() -> reqwest::RequestBuilder,
) -> Result<reqwest::Response, ApiError> {
    let max_attempts = max_retries + 1;
    let mut attempt = 0;

    loop {
        match make_request().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() || !is_retriable_status(status) || attempt >= max_retries {
                    return Ok(response);
                }

                let base_delay = retry_base_delay(attempt);
                let delay = add_jitter(base_delay);
                debug!(
                    "HTTP request failed with status {}; retrying in {:?} (base {:?}, attempt {}/{})",
                    status,
                    delay,
                    base_delay,
                    attempt + 1,
                    max_attempts
                );
                let _ = response.bytes().await;
                sleep(delay).await;
            }
            Err(err) => {
                if !is_retriable_send_error(&err) || attempt >= max_retries {
                    return Err(ApiError::Transport {
                        url: url.to_string(),
                        source: err,
                    });
                }

                let base_delay = retry_base_delay(attempt);
                let delay = add_jitter(base_delay);
                debug!(
                    "HTTP request error: {}; retrying in {:?} (base {:?}, attempt {}/{})",
                    err,
                    delay,
                    base_delay,
                    attempt + 1,
                    max_attempts
                );
                sleep(delay).await;
            }
        }
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_base_delay_doubles() {
        assert_eq!(retry_base_delay(0), Duration::from_secs(1));
        assert_eq!(retry_base_delay(1), Duration::from_secs(2));
        assert_eq!(retry_base_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_jitter_is_bounded() {
        let base = Duration::from_secs(4);
        for _ in 0..20 {
            let delay = add_jitter(base);
            assert!(delay >= base);
            assert!(delay <= base + Duration::from_secs(1));
        }
    }

    #[test]
    fn test_retriable_statuses() {
        assert!(is_retriable_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retriable_status(StatusCode::BAD_GATEWAY));
        assert!(!is_retriable_status(StatusCode::NOT_FOUND));
        assert!(!is_retriable_status(StatusCode::UNAUTHORIZED));
    }
}
