use crate::bridge::EmbeddedContent;
use crate::bridge::auto_stop::AutoStop;
use crate::bridge::poller::CurrentTimePoller;
use crate::bridge::session_id::BridgeSessionId;
use crate::configuration::Configuration;
use crate::link::{InvalidLinkError, VideoReference, parse_link};
use crate::message::inbound::{InboundMessage, SessionMessage};
use crate::message::outbound::Command;
use crate::playback_state::PlaybackState;
use crate::time_display::TimeReading;
use crate::utils::time_source::TimeSource;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug)]
pub struct PlayerSettings {
	pub poll_interval: Duration,
	pub auto_stop_after: Option<Duration>,
}

impl From<&Configuration> for PlayerSettings {
	fn from(configuration: &Configuration) -> Self {
		Self {
			poll_interval: configuration.poll_interval,
			auto_stop_after: configuration.auto_stop_after,
		}
	}
}

/// Snapshot of everything a user gets to see.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
	pub video_id: Option<VideoReference>,
	pub session_id: Option<BridgeSessionId>,
	pub playback_state: PlaybackState,
	pub time: TimeReading,
	pub display: String,
}

/// Host side of the playback bridge.
///
/// Owns the link text, the loaded video and everything the embedded document reported about it.
/// While the document reports playing, the current time is polled.
pub struct Player {
	embedded_content: EmbeddedContent,
	time_source: TimeSource,
	settings: PlayerSettings,
	link_text: String,
	session: Option<Session>,
}

/// One loaded video. Dropping it cancels all of its timers.
struct Session {
	id: BridgeSessionId,
	video_reference: VideoReference,
	playback_state: PlaybackState,
	time_reading: TimeReading,
	poller: Option<CurrentTimePoller>,
	auto_stop: Option<AutoStop>,
}

impl Player {
	pub fn new(embedded_content: EmbeddedContent, time_source: TimeSource, settings: PlayerSettings) -> Self {
		Self {
			embedded_content,
			time_source,
			settings,
			link_text: String::new(),
			session: None,
		}
	}

	pub fn set_link_text(&mut self, text: impl Into<String>) {
		self.link_text = text.into();
	}

	#[cfg(test)]
	pub fn link_text(&self) -> &str {
		&self.link_text
	}

	/// Loads the video the current link text points to, replacing whatever was loaded before.
	///
	/// Nothing changes if the link is invalid.
	pub async fn add_link(&mut self) -> Result<(VideoReference, BridgeSessionId), InvalidLinkError> {
		let video_reference = match parse_link(&self.link_text) {
			Ok(video_reference) => video_reference,
			Err(error) => {
				warn!("Rejected link '{}': {}", self.link_text, error);
				return Err(error);
			}
		};

		// stop the old session's timers before its content goes away
		self.session = None;
		let session_id = self.embedded_content.load_content(&video_reference).await;
		info!("Playing video '{}' in {}", video_reference, session_id);

		self.session = Some(Session {
			id: session_id,
			video_reference: video_reference.clone(),
			playback_state: PlaybackState::Stopped,
			time_reading: TimeReading::default(),
			poller: None,
			auto_stop: self.settings.auto_stop_after.map(AutoStop::new),
		});
		Ok((video_reference, session_id))
	}

	pub async fn submit_link(
		&mut self,
		text: impl Into<String>,
	) -> Result<(VideoReference, BridgeSessionId), InvalidLinkError> {
		self.set_link_text(text);
		self.add_link().await
	}

	pub async fn play(&self) {
		self.send_command(Command::Play).await;
	}

	pub async fn pause(&self) {
		self.send_command(Command::Pause).await;
	}

	async fn send_command(&self, command: Command) {
		if self.session.is_none() {
			debug!("Ignoring {:?}, no video loaded", command);
			return;
		}
		self.embedded_content.send_command(command).await;
	}

	/// Applies a message from the embedded document. The latest message of each kind wins.
	pub fn handle_message(&mut self, SessionMessage { session_id, message }: SessionMessage) {
		let Some(session) = self.session.as_mut().filter(|session| session.id == session_id) else {
			debug!("Ignoring {} message of stale {}", message.kind(), session_id);
			return;
		};

		match message {
			InboundMessage::PlayerState(code) => {
				let playback_state = PlaybackState::from(code);
				debug!("Player reported {}, now {:?}", code, playback_state);
				session.transition_to(playback_state, &self.embedded_content, &self.time_source, self.settings);
			}
			InboundMessage::Duration(seconds) => session.time_reading.set_duration(seconds),
			InboundMessage::CurrentTime(seconds) => session.time_reading.set_current_time(seconds),
		}
	}

	/// Unloads the video and stops all timers.
	pub async fn teardown(&mut self) {
		if let Some(session) = self.session.take() {
			info!("Tearing down {} of video '{}'", session.id, session.video_reference);
			drop(session);
			self.embedded_content.unload_content().await;
		}
	}

	pub fn video_reference(&self) -> Option<&VideoReference> {
		self.session.as_ref().map(|session| &session.video_reference)
	}

	pub fn session_id(&self) -> Option<BridgeSessionId> {
		self.session.as_ref().map(|session| session.id)
	}

	pub fn playback_state(&self) -> PlaybackState {
		self.session
			.as_ref()
			.map_or(PlaybackState::Stopped, |session| session.playback_state)
	}

	pub fn time_reading(&self) -> TimeReading {
		self.session
			.as_ref()
			.map_or_else(TimeReading::default, |session| session.time_reading)
	}

	#[cfg(test)]
	pub fn is_polling(&self) -> bool {
		self.session.as_ref().is_some_and(|session| session.poller.is_some())
	}

	/// `MM:SS / MM:SS`
	pub fn display_text(&self) -> String {
		self.time_reading().to_string()
	}

	pub fn status(&self) -> PlayerStatus {
		PlayerStatus {
			video_id: self.video_reference().cloned(),
			session_id: self.session_id(),
			playback_state: self.playback_state(),
			time: self.time_reading(),
			display: self.display_text(),
		}
	}
}

impl Session {
	fn transition_to(
		&mut self,
		playback_state: PlaybackState,
		embedded_content: &EmbeddedContent,
		time_source: &TimeSource,
		settings: PlayerSettings,
	) {
		if self.playback_state == playback_state {
			return;
		}
		self.playback_state = playback_state;

		match playback_state {
			PlaybackState::Playing => {
				self.poller = Some(CurrentTimePoller::start(
					embedded_content.clone(),
					time_source,
					settings.poll_interval,
				));
				if let Some(auto_stop) = &mut self.auto_stop {
					auto_stop.arm(embedded_content, time_source);
				}
			}
			PlaybackState::Stopped => self.poller = None,
		}
	}
}
