use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

#[derive(Debug)]
struct WindowState {
    start: Instant,
    count: u32,
}

/// Fixed window counter shared by every request passing through the layer.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    max: u32,
    window: Duration,
    state: Arc<Mutex<WindowState>>,
}

impl RateLimiter {
    fn new(max: u32, window: Duration) -> Self {
        Self {
            max: max.max(1),
            window,
            state: Arc::new(Mutex::new(WindowState {
                start: Instant::now(),
                count: 0,
            })),
        }
    }

    fn allow(&self) -> bool {
        let mut guard = self.state.lock().expect("rate limiter mutex poisoned");
        let now = Instant::now();
        if now.duration_since(guard.start) >= self.window {
            guard.start = now;
            guard.count = 0;
        }
        if guard.count < self.max {
            guard.count += 1;
            true
        } else {
            false
        }
    }
}

pub async fn rate_limit_middleware(
    State(state): State<RateLimiter>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if !state.allow() {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many requests, please try again later." })),
        )
            .into_response();
    }
    next.run(req).await
}

pub fn new_limiter(max: u32, window_secs: u64) -> RateLimiter {
    RateLimiter::new(max, Duration::from_secs(window_secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_resets_after_window() {
        let limiter = new_limiter(2, 0);
        assert!(limiter.allow());
        assert!(limiter.allow());
        // Zero-length window, so the next call starts a fresh one.
        assert!(limiter.allow());
    }

    #[test]
    fn requests_over_the_cap_are_refused() {
        let limiter = new_limiter(3, 3600);
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(limiter.allow());
        assert!(!limiter.allow());
    }
}
