//! Rate-limit budget reported by the platform through `x-rate-limit-*` response headers.

// self
use crate::_prelude::*;

/// Header carrying the window's total request budget.
pub const RATE_LIMIT_LIMIT: &str = "x-rate-limit-limit";
/// Header carrying the requests left in the current window.
pub const RATE_LIMIT_REMAINING: &str = "x-rate-limit-remaining";
/// Header carrying the window reset instant as Unix seconds.
pub const RATE_LIMIT_RESET: &str = "x-rate-limit-reset";

/// Snapshot of the rate-limit headers on one response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitStatus {
	/// Total budget for the window.
	pub limit: Option<u32>,
	/// Requests left in the window.
	pub remaining: Option<u32>,
	/// Instant the window resets.
	pub reset_at: Option<OffsetDateTime>,
}
impl RateLimitStatus {
	/// Parses the rate-limit headers, returning `None` when none are present.
	pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
		let limit = header_number::<u32>(headers, RATE_LIMIT_LIMIT);
		let remaining = header_number::<u32>(headers, RATE_LIMIT_REMAINING);
		let reset_at = header_number::<i64>(headers, RATE_LIMIT_RESET)
			.and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok());

		if limit.is_none() && remaining.is_none() && reset_at.is_none() {
			return None;
		}

		Some(Self { limit, remaining, reset_at })
	}

	/// Returns `true` when the platform reports no requests left in the window.
	pub fn is_exhausted(&self) -> bool {
		self.remaining == Some(0)
	}

	/// Time until the window resets, measured from `now`; `None` once the reset has passed.
	pub fn reset_in(&self, now: OffsetDateTime) -> Option<Duration> {
		let delta = self.reset_at? - now;

		delta.is_positive().then_some(delta)
	}
}

fn header_number<T>(headers: &HeaderMap, name: &str) -> Option<T>
where
	T: FromStr,
{
	headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
