//! # Rate Limiting Module
//!
//! Fixed-window request limiting keyed by client IP, kept in memory.
//!
//! Requests are matched against path policies in order; the first matching
//! prefix picks the bucket. With the default configuration that gives:
//!
//! - `/api/auth/*`: 5 requests per 15 minutes
//! - every other `/api/*` route: 100 requests per 15 minutes
//!
//! ```ignore
//! let layer = RateLimitLayer::new(vec![
//!     PathPolicy::new("auth", "/api/auth", 5, Duration::from_secs(900)),
//!     PathPolicy::new("api", "/api", 100, Duration::from_secs(900)),
//! ]);
//! let app = Router::new().route("/api/items", get(handler)).layer(layer);
//! ```
use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderValue, Response},
    response::IntoResponse,
};
use dashmap::DashMap;
use metrics::counter;
use std::net::SocketAddr;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::ServiceError;

fn num_to_header_value<T: ToString>(n: T) -> HeaderValue {
    HeaderValue::from_str(&n.to_string()).unwrap_or_else(|_| HeaderValue::from_static("0"))
}

#[derive(Debug, Clone)]
struct WindowEntry {
    count: u32,
    window_start: Instant,
}

impl WindowEntry {
    fn new(now: Instant) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    fn time_until_reset(&self, now: Instant, window: Duration) -> Duration {
        window.saturating_sub(now.duration_since(self.window_start))
    }
}

/// Limit applied to every request whose path starts with `prefix`.
#[derive(Clone, Debug)]
pub struct PathPolicy {
    pub name: &'static str,
    pub prefix: String,
    pub requests_per_window: u32,
    pub window_duration: Duration,
}

impl PathPolicy {
    pub fn new(
        name: &'static str,
        prefix: impl Into<String>,
        requests_per_window: u32,
        window_duration: Duration,
    ) -> Self {
        Self {
            name,
            prefix: prefix.into(),
            requests_per_window,
            window_duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_time: Duration,
}

/// Shared window counters.
#[derive(Clone, Default)]
pub struct RateLimiter {
    entries: Arc<DashMap<String, WindowEntry>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one request against `key` and reports whether it fits in the window.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> RateLimitResult {
        let now = Instant::now();
        let mut entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| WindowEntry::new(now));

        if now.duration_since(entry.window_start) >= window {
            *entry = WindowEntry::new(now);
        }

        let reset_time = entry.time_until_reset(now, window);
        if entry.count >= limit {
            return RateLimitResult {
                allowed: false,
                limit,
                remaining: 0,
                reset_time,
            };
        }

        entry.count += 1;
        RateLimitResult {
            allowed: true,
            limit,
            remaining: limit.saturating_sub(entry.count),
            reset_time,
        }
    }

    /// Drops windows that have fully elapsed.
    pub fn cleanup_expired(&self, window: Duration) {
        let now = Instant::now();
        self.entries
            .retain(|_, entry| now.duration_since(entry.window_start) < window);
    }

    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

/// Client address: first `x-forwarded-for` hop, then `x-real-ip`, then the socket peer.
pub fn extract_ip_key(request: &Request) -> String {
    if let Some(forwarded) = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(ip) = forwarded.split(',').next().map(str::trim) {
            if !ip.is_empty() {
                return format!("ip:{}", ip);
            }
        }
    }

    if let Some(ip) = request
        .headers()
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
    {
        return format!("ip:{}", ip.trim());
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return format!("ip:{}", addr.ip());
    }

    "ip:unknown".to_string()
}

#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: RateLimiter,
    policies: Arc<Vec<PathPolicy>>,
    enable_headers: bool,
}

impl RateLimitLayer {
    pub fn new(policies: Vec<PathPolicy>) -> Self {
        Self {
            limiter: RateLimiter::new(),
            policies: Arc::new(policies),
            enable_headers: true,
        }
    }

    /// Auth and API buckets built from the application config.
    pub fn from_config(config: &AppConfig) -> Self {
        let window = Duration::from_secs(config.rate_limit_window_seconds);
        Self::new(vec![
            PathPolicy::new(
                "auth",
                "/api/auth",
                config.rate_limit_auth_requests,
                window,
            ),
            PathPolicy::new("api", "/api", config.rate_limit_api_requests, window),
        ])
        .with_headers(config.rate_limit_enable_headers)
    }

    pub fn with_headers(mut self, enabled: bool) -> Self {
        self.enable_headers = enabled;
        self
    }

    pub fn limiter(&self) -> RateLimiter {
        self.limiter.clone()
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
            policies: self.policies.clone(),
            enable_headers: self.enable_headers,
        }
    }
}

#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: RateLimiter,
    policies: Arc<Vec<PathPolicy>>,
    enable_headers: bool,
}

fn apply_headers(response: &mut Response<axum::body::Body>, result: &RateLimitResult) {
    let headers = response.headers_mut();
    headers.insert("X-RateLimit-Limit", num_to_header_value(result.limit));
    headers.insert(
        "X-RateLimit-Remaining",
        num_to_header_value(result.remaining),
    );
    headers.insert(
        "X-RateLimit-Reset",
        num_to_header_value(result.reset_time.as_secs()),
    );
}

impl<S> Service<Request> for RateLimitService<S>
where
    S: Service<Request, Response = Response<axum::body::Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<axum::body::Body>;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let limiter = self.limiter.clone();
        let policies = self.policies.clone();
        let enable_headers = self.enable_headers;
        // take the service that was driven to readiness
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let path = request.uri().path().to_string();
            if path == "/api/health" {
                return inner.call(request).await;
            }

            let Some(policy) = policies.iter().find(|p| path.starts_with(&p.prefix)) else {
                return inner.call(request).await;
            };

            let key = format!("{}:{}", policy.name, extract_ip_key(&request));
            let result = limiter.check(&key, policy.requests_per_window, policy.window_duration);

            if !result.allowed {
                warn!(key = %key, path = %path, "rate limit exceeded");
                counter!("rate_limit_denied_total", 1, "bucket" => policy.name);

                let mut response = ServiceError::RateLimitExceeded.into_response();
                if enable_headers {
                    apply_headers(&mut response, &result);
                    response
                        .headers_mut()
                        .insert("Retry-After", num_to_header_value(result.reset_time.as_secs()));
                }
                return Ok(response);
            }

            debug!(key = %key, remaining = result.remaining, "rate limit check passed");
            let mut response = inner.call(request).await?;
            if enable_headers {
                apply_headers(&mut response, &result);
            }
            Ok(response)
        })
    }
}

/// Periodically evicts stale windows so the map does not grow without bound.
pub async fn start_cleanup_task(limiter: RateLimiter, window: Duration) {
    let mut interval_timer = tokio::time::interval(window);
    loop {
        interval_timer.tick().await;
        limiter.cleanup_expired(window);
        debug!(tracked = limiter.tracked_keys(), "rate limiter cleanup completed");
    }
}
