//! Pacing gate enforcing a minimum spacing between dispatch starts.
//!
//! The gate is a single-slot semaphore. [`PacingGate::pass`] takes the slot, and when an
//! interval is configured a background timer returns it once the interval elapses, so the next
//! caller waits for the previous window while the current request proceeds immediately.

// std
use std::{
	sync::atomic::{AtomicU64, Ordering},
	time::Duration as StdDuration,
};
// crates.io
use tokio::sync::Semaphore;
// self
use crate::_prelude::*;

/// Single-slot gate shared by every caller of one session.
#[derive(Debug)]
pub struct PacingGate {
	slot: Arc<Semaphore>,
	interval_secs: AtomicU64,
}
impl PacingGate {
	/// Creates a gate spacing dispatch starts by `seconds`; `0` disables pacing.
	pub fn new(seconds: u64) -> Self {
		Self { slot: Arc::new(Semaphore::new(1)), interval_secs: AtomicU64::new(seconds) }
	}

	/// Configured spacing in seconds.
	pub fn interval_secs(&self) -> u64 {
		self.interval_secs.load(Ordering::Acquire)
	}

	/// Replaces the spacing; applies to windows scheduled after the call.
	pub fn set_interval_secs(&self, seconds: u64) {
		self.interval_secs.store(seconds, Ordering::Release);
	}

	/// Waits for the previous pacing window, then schedules the next one.
	///
	/// Must run inside a Tokio runtime when an interval is configured.
	pub async fn pass(&self) {
		// The semaphore is never closed.
		let Ok(permit) = Arc::clone(&self.slot).acquire_owned().await else { return };
		let seconds = self.interval_secs();

		if seconds == 0 {
			return;
		}

		tokio::spawn(async move {
			tokio::time::sleep(StdDuration::from_secs(seconds)).await;

			drop(permit);
		});
	}
}
impl Default for PacingGate {
	fn default() -> Self {
		Self::new(0)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use tokio::time::Instant;
	// self
	use super::*;

	#[tokio::test(start_paused = true)]
	async fn zero_interval_never_waits() {
		let gate = PacingGate::default();
		let start = Instant::now();

		for _ in 0..5 {
			gate.pass().await;
		}

		assert_eq!(start.elapsed(), StdDuration::ZERO);
	}

	#[tokio::test(start_paused = true)]
	async fn successive_passes_are_spaced_by_interval() {
		let gate = PacingGate::new(2);
		let start = Instant::now();

		gate.pass().await;

		assert_eq!(start.elapsed(), StdDuration::ZERO);

		gate.pass().await;

		assert!(start.elapsed() >= StdDuration::from_secs(2));

		gate.pass().await;

		assert!(start.elapsed() >= StdDuration::from_secs(4));
	}

	#[tokio::test(start_paused = true)]
	async fn concurrent_callers_share_one_window() {
		let gate = Arc::new(PacingGate::new(1));
		let start = Instant::now();
		let handles = (0..3)
			.map(|_| {
				let gate = Arc::clone(&gate);

				tokio::spawn(async move {
					gate.pass().await;

					Instant::now()
				})
			})
			.collect::<Vec<_>>();
		let mut passed = Vec::new();

		for handle in handles {
			passed.push(handle.await.expect("Pacing task should not panic."));
		}

		passed.sort();

		assert_eq!(passed[0] - start, StdDuration::ZERO);
		assert!(passed[1] - passed[0] >= StdDuration::from_secs(1));
		assert!(passed[2] - passed[1] >= StdDuration::from_secs(1));
	}
}
