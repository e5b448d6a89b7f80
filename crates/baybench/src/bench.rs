//! swift-bench output parsing
//!
//! swift-bench logs one line per reporting interval:
//!
//! ```text
//! swift-bench 2018-03-28 14:44:24,967 INFO 520 PUTS **FINAL** [0 failures], 26.0/s
//! ```
//!
//! Token index 4 is the item count, index 5 the method, the last token
//! the rate with an optional `/s` suffix. Anything whose first token is
//! not `swift-bench` is pipe noise and carries no reading.

use tracing::debug;

/// Request methods swift-bench reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Gets,
    Puts,
    Del,
}

impl Method {
    /// Every reported method, in reporting order.
    pub const ALL: [Method; 3] = [Method::Gets, Method::Puts, Method::Del];

    /// The token swift-bench prints for this method.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Gets => "GETS",
            Method::Puts => "PUTS",
            Method::Del => "DEL",
        }
    }

    /// Parses a method token; anything outside the reported set is `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "GETS" => Some(Method::Gets),
            "PUTS" => Some(Method::Puts),
            "DEL" => Some(Method::Del),
            _ => None,
        }
    }
}

/// One reading: how many items a method has processed and at what rate.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchSample {
    /// Request method the reading is for
    pub method: Method,
    /// Items processed so far
    pub items: u64,
    /// Processing rate in items per second
    pub rate: f64,
}

impl BenchSample {
    /// An explicit zero reading, marking the method idle.
    pub fn idle(method: Method) -> Self {
        Self {
            method,
            items: 0,
            rate: 0.0,
        }
    }
}

/// Parses one line of piped output into a reading.
///
/// Lines that are not swift-bench output yield `None` silently;
/// swift-bench lines without a usable reading (unknown method,
/// malformed count or rate) yield `None` with a debug log.
pub fn parse_bench_line(line: &str) -> Option<BenchSample> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.first().copied() != Some("swift-bench") {
        return None;
    }
    if tokens.len() < 6 {
        debug!(line, "bench line too short, skipping");
        return None;
    }

    let Ok(items) = tokens[4].parse::<u64>() else {
        debug!(line, count = tokens[4], "item count is not an integer, skipping");
        return None;
    };
    let Some(method) = Method::from_token(tokens[5]) else {
        debug!(line, method = tokens[5], "method is not reported, skipping");
        return None;
    };

    let raw_rate = tokens[tokens.len() - 1];
    let rate_token = raw_rate.split('/').next().unwrap_or(raw_rate);
    let rate = match rate_token.parse::<f64>() {
        Ok(rate) if rate.is_finite() => rate,
        _ => {
            debug!(line, rate = raw_rate, "rate is not a finite number, skipping");
            return None;
        }
    };

    Some(BenchSample {
        method,
        items,
        rate,
    })
}
