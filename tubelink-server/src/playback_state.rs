use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// State code reported by the embedded YouTube player.
///
/// See <https://developers.google.com/youtube/iframe_api_reference#Playback_status>.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerStateCode(i64);

impl PlayerStateCode {
	pub const UNSTARTED: Self = Self(-1);
	pub const ENDED: Self = Self(0);
	pub const PLAYING: Self = Self(1);
	pub const PAUSED: Self = Self(2);
	pub const BUFFERING: Self = Self(3);
	pub const CUED: Self = Self(5);
}

impl Display for PlayerStateCode {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		let name = match *self {
			Self::UNSTARTED => "unstarted",
			Self::ENDED => "ended",
			Self::PLAYING => "playing",
			Self::PAUSED => "paused",
			Self::BUFFERING => "buffering",
			Self::CUED => "cued",
			Self(code) => return write!(formatter, "unknown ({code})"),
		};
		formatter.write_str(name)
	}
}

impl From<i64> for PlayerStateCode {
	fn from(code: i64) -> Self {
		Self(code)
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
	#[default]
	Stopped,
	Playing,
}

impl From<PlayerStateCode> for PlaybackState {
	/// Everything but an actively playing player (including buffering) counts as stopped.
	fn from(code: PlayerStateCode) -> Self {
		if code == PlayerStateCode::PLAYING {
			Self::Playing
		} else {
			Self::Stopped
		}
	}
}
