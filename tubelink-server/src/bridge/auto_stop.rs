use crate::bridge::EmbeddedContent;
use crate::message::outbound::Command;
use crate::utils::aborting_join_handle::AbortingJoinHandle;
use crate::utils::time_source::TimeSource;
use std::time::Duration;
use tracing::info;

pub const AUTO_STOP: &str = "auto_stop";

/// Stops the video once, a fixed time after it first started playing in a bridge session.
pub struct AutoStop {
	after: Duration,
	state: AutoStopState,
}

enum AutoStopState {
	Unarmed,
	Armed { _task: AbortingJoinHandle<()> },
}

impl AutoStop {
	pub fn new(after: Duration) -> Self {
		Self {
			after,
			state: AutoStopState::Unarmed,
		}
	}

	/// Called on every transition into playing. Only the first call has an effect.
	pub fn arm(&mut self, embedded_content: &EmbeddedContent, time_source: &TimeSource) {
		if matches!(self.state, AutoStopState::Armed { .. }) {
			return;
		}

		let after = self.after;
		let embedded_content = embedded_content.clone();
		let time_source = time_source.clone();
		let task = tokio::spawn(async move {
			time_source.sleep(AUTO_STOP, after).await;
			info!("Stopping video after {:?}", after);
			embedded_content.send_command(Command::Stop).await;
		});
		self.state = AutoStopState::Armed { _task: task.into() };
	}
}
