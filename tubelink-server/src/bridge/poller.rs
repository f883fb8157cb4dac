use crate::bridge::EmbeddedContent;
use crate::message::outbound::Command;
use crate::utils::aborting_join_handle::AbortingJoinHandle;
use crate::utils::time_source::TimeSource;
use std::time::Duration;
use tracing::trace;

pub const CURRENT_TIME_POLL: &str = "current_time_poll";

/// Periodically asks the embedded document for its current time.
///
/// Polling stops as soon as the poller is dropped.
pub struct CurrentTimePoller {
	_task: AbortingJoinHandle<()>,
}

impl CurrentTimePoller {
	pub fn start(embedded_content: EmbeddedContent, time_source: &TimeSource, period: Duration) -> Self {
		// created outside of the task so the first tick is scheduled right away
		let mut interval = time_source.interval_at(CURRENT_TIME_POLL, period, period);
		let task = tokio::spawn(async move {
			loop {
				interval.tick().await;
				trace!("Requesting current time");
				embedded_content.send_command(Command::ReportCurrentTime).await;
			}
		});

		Self { _task: task.into() }
	}
}
