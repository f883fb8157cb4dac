use parking_lot::Mutex;
use std::any::type_name;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, watch};
use tokio::time::{Instant, MissedTickBehavior};

/// Source of intervals and sleeps.
///
/// In production this is a thin wrapper around tokio's timers. Created with [`TimeSource::test`],
/// time only passes when a test calls [`TimeSource::advance_time`]. Timers are grouped by name so
/// a test can advance one of them without affecting the others.
#[derive(Clone, Default)]
pub struct TimeSource {
	test_time_sources: Option<Arc<TestTimeSources>>,
}

#[derive(Default)]
struct TestTimeSources {
	named_time_sources: Mutex<BTreeMap<&'static str, Arc<TestTimeSource>>>,
}

struct TestTimeSource {
	elapsed: watch::Sender<Duration>,
	time_requested: Notify,
}

impl Default for TestTimeSource {
	fn default() -> Self {
		Self {
			elapsed: watch::channel(Duration::ZERO).0,
			time_requested: Notify::new(),
		}
	}
}

impl TestTimeSources {
	fn get(&self, name: &'static str) -> Arc<TestTimeSource> {
		self.named_time_sources.lock().entry(name).or_default().clone()
	}

	fn interval_at(&self, name: &'static str, start: Duration, period: Duration) -> TestInterval {
		let time_source = self.get(name);
		let receiver = time_source.elapsed.subscribe();
		let next_deadline = *receiver.borrow() + start;
		time_source.time_requested.notify_one();

		TestInterval {
			next_deadline,
			period,
			receiver,
		}
	}

	async fn sleep(&self, name: &'static str, duration: Duration) {
		let time_source = self.get(name);
		let mut receiver = time_source.elapsed.subscribe();
		let deadline = *receiver.borrow() + duration;
		time_source.time_requested.notify_one();

		wait_until(&mut receiver, deadline).await;
	}

	fn advance_time(&self, name: &'static str, by_duration: Duration) {
		self.get(name).elapsed.send_modify(|elapsed| *elapsed += by_duration);
	}

	async fn wait_for_time_request(&self, name: &'static str) {
		let time_source = self.get(name);
		time_source.time_requested.notified().await;
	}
}

async fn wait_until(receiver: &mut watch::Receiver<Duration>, deadline: Duration) {
	if receiver.wait_for(|elapsed| *elapsed >= deadline).await.is_err() {
		panic!("{} dropped prematurely.", type_name::<TimeSource>());
	}
}

impl TimeSource {
	pub fn test() -> Self {
		Self {
			test_time_sources: Some(Default::default()),
		}
	}

	/// Interval whose first tick is `start` from now. Missed ticks are skipped, not bunched up.
	pub fn interval_at(&self, name: &'static str, start: Duration, period: Duration) -> Interval {
		match &self.test_time_sources {
			None => {
				let mut interval = tokio::time::interval_at(Instant::now() + start, period);
				interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
				Interval::Tokio(interval)
			}
			Some(test_time_sources) => Interval::Test(test_time_sources.interval_at(name, start, period)),
		}
	}

	pub async fn sleep(&self, name: &'static str, duration: Duration) {
		match &self.test_time_sources {
			None => tokio::time::sleep(duration).await,
			Some(test_time_sources) => test_time_sources.sleep(name, duration).await,
		}
	}

	pub fn advance_time(&self, name: &'static str, by_duration: Duration) {
		self.test_time_sources
			.as_ref()
			.expect("Can only be called in test mode.")
			.advance_time(name, by_duration);
	}

	/// Resolves once an interval or sleep with the given name has been requested.
	/// Requests made before waiting are remembered.
	pub async fn wait_for_time_request(&self, name: &'static str) {
		match &self.test_time_sources {
			None => (),
			Some(test_time_sources) => test_time_sources.wait_for_time_request(name).await,
		}
	}
}

pub enum Interval {
	Tokio(tokio::time::Interval),
	Test(TestInterval),
}

impl Interval {
	pub async fn tick(&mut self) {
		match self {
			Interval::Tokio(interval) => {
				interval.tick().await;
			}
			Interval::Test(interval) => interval.tick().await,
		}
	}
}

pub struct TestInterval {
	next_deadline: Duration,
	period: Duration,
	receiver: watch::Receiver<Duration>,
}

impl TestInterval {
	async fn tick(&mut self) {
		wait_until(&mut self.receiver, self.next_deadline).await;
		self.next_deadline += self.period;
	}
}
