// crates/survey-server/src/rate_limit.rs
// ============================================================================
// Module: Rate Limiting
// Description: Fixed-window request limiter keyed by client address.
// Purpose: Bound per-client request rates on `/api/` routes.
// Dependencies: survey-config
// ============================================================================

//! ## Overview
//! Each client address owns a window that opens on its first request and
//! lasts `window_ms`. Requests beyond `max_requests` inside an open window are
//! refused with the number of seconds left. The table holds at most
//! `max_entries` clients; when full, expired windows are dropped first and
//! then the oldest window.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

use survey_config::RateLimitConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    /// Request may proceed.
    Allowed,
    /// Request exceeds the window budget.
    Limited {
        /// Seconds until the client's window resets.
        retry_after_secs: u64,
    },
}

/// Per-client window state.
#[derive(Debug, Clone, Copy)]
struct Window {
    /// Window start.
    started: Instant,
    /// Requests counted in this window.
    count: u32,
}

/// Fixed-window limiter.
#[derive(Debug)]
pub struct RateLimiter {
    /// Requests allowed per window.
    max_requests: u32,
    /// Window length.
    window: Duration,
    /// Tracked client cap.
    max_entries: usize,
    /// Windows by client address; `None` groups clients without an address.
    windows: Mutex<HashMap<Option<IpAddr>, Window>>,
}

impl RateLimiter {
    /// Builds a limiter from configuration.
    #[must_use]
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_requests: config.max_requests,
            window: Duration::from_millis(config.window_ms),
            max_entries: config.max_entries.max(1),
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the full window length in whole seconds, rounded up.
    #[must_use]
    pub fn window_secs(&self) -> u64 {
        ceil_secs(self.window)
    }

    /// Counts a request from `client` at `now`.
    pub fn check(&self, client: Option<IpAddr>, now: Instant) -> RateDecision {
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);
        if !windows.contains_key(&client) && windows.len() >= self.max_entries {
            self.evict(&mut windows, now);
        }
        let window = windows.entry(client).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.saturating_duration_since(window.started) >= self.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }
        if window.count >= self.max_requests {
            let elapsed = now.saturating_duration_since(window.started);
            let remaining = self.window.saturating_sub(elapsed);
            return RateDecision::Limited {
                retry_after_secs: ceil_secs(remaining).max(1),
            };
        }
        window.count += 1;
        RateDecision::Allowed
    }

    /// Returns the number of tracked clients.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.windows.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Frees at least one slot in a full table.
    fn evict(&self, windows: &mut HashMap<Option<IpAddr>, Window>, now: Instant) {
        windows.retain(|_, window| now.saturating_duration_since(window.started) < self.window);
        if windows.len() < self.max_entries {
            return;
        }
        let oldest = windows.iter().min_by_key(|(_, window)| window.started).map(|(key, _)| *key);
        if let Some(key) = oldest {
            windows.remove(&key);
        }
    }
}

/// Rounds a duration up to whole seconds.
fn ceil_secs(duration: Duration) -> u64 {
    let secs = duration.as_secs();
    if duration.subsec_nanos() > 0 { secs + 1 } else { secs }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
