use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Formats seconds as `MM:SS`, rounding down to whole seconds.
///
/// Negative and non-finite values are shown as `00:00`. Minutes aren't wrapped into hours, so
/// anything from 100 minutes on simply gets more digits.
pub fn format_time(seconds: f64) -> String {
	let whole_seconds = non_negative_seconds(seconds).floor() as u64;
	format!("{:02}:{:02}", whole_seconds / 60, whole_seconds % 60)
}

fn non_negative_seconds(seconds: f64) -> f64 {
	if seconds.is_finite() && seconds > 0.0 {
		seconds
	} else {
		0.0
	}
}

/// Playback position and length of the loaded video as reported by the embedded player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeReading {
	pub current_time_seconds: f64,
	pub duration_seconds: f64,
}

impl TimeReading {
	pub fn set_current_time(&mut self, seconds: f64) {
		self.current_time_seconds = non_negative_seconds(seconds);
	}

	pub fn set_duration(&mut self, seconds: f64) {
		self.duration_seconds = non_negative_seconds(seconds);
	}
}

impl Display for TimeReading {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		write!(
			formatter,
			"{} / {}",
			format_time(self.current_time_seconds),
			format_time(self.duration_seconds)
		)
	}
}
