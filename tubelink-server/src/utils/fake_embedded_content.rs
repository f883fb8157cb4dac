use crate::bridge::session_id::{BridgeSessionId, BridgeSessionIdSequence};
use crate::bridge::{EmbeddedContent, EmbeddedContentTrait, InboundMessages};
use crate::link::VideoReference;
use crate::message::inbound::{InboundMessage, SessionMessage};
use crate::message::outbound::Command;
use async_trait::async_trait;
use futures_util::StreamExt;
use parking_lot::Mutex;
use std::future::ready;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::BroadcastStream;

/// Records outbound commands and lets tests post inbound messages.
///
/// Commands are recorded whether or not content is loaded, so tasks outliving their content show up.
pub struct FakeEmbeddedContent {
	session_ids: BridgeSessionIdSequence,
	loaded: Mutex<Option<(BridgeSessionId, VideoReference)>>,
	command_sender: mpsc::UnboundedSender<Command>,
	inbound_sender: broadcast::Sender<SessionMessage>,
}

pub struct CommandProbe {
	receiver: mpsc::UnboundedReceiver<Command>,
}

impl FakeEmbeddedContent {
	pub fn new() -> (Arc<FakeEmbeddedContent>, CommandProbe) {
		let (command_sender, receiver) = mpsc::unbounded_channel();
		let fake = FakeEmbeddedContent {
			session_ids: Default::default(),
			loaded: Default::default(),
			command_sender,
			inbound_sender: broadcast::channel(64).0,
		};
		(Arc::new(fake), CommandProbe { receiver })
	}

	/// Fake with a video already loaded.
	pub async fn loaded() -> (EmbeddedContent, CommandProbe) {
		let (fake, probe) = Self::new();
		fake.load_content(&"abc123".parse().expect("Invalid identifier")).await;
		let embedded_content: EmbeddedContent = fake;
		(embedded_content, probe)
	}

	pub fn current_session(&self) -> Option<BridgeSessionId> {
		self.loaded.lock().as_ref().map(|(session_id, _)| *session_id)
	}

	pub fn loaded_video(&self) -> Option<VideoReference> {
		self.loaded.lock().as_ref().map(|(_, video_reference)| video_reference.clone())
	}

	/// Message as if posted by the document of the current session.
	pub fn message(&self, message: InboundMessage) -> SessionMessage {
		SessionMessage {
			session_id: self.current_session().expect("No content loaded"),
			message,
		}
	}

	pub fn post(&self, message: InboundMessage) {
		let _ = self.inbound_sender.send(self.message(message));
	}
}

#[async_trait]
impl EmbeddedContentTrait for FakeEmbeddedContent {
	async fn load_content(&self, video_reference: &VideoReference) -> BridgeSessionId {
		let session_id = self.session_ids.next();
		*self.loaded.lock() = Some((session_id, video_reference.clone()));
		session_id
	}

	async fn unload_content(&self) {
		*self.loaded.lock() = None;
	}

	async fn send_command(&self, command: Command) {
		let _ = self.command_sender.send(command);
	}

	fn subscribe(&self) -> InboundMessages {
		BroadcastStream::new(self.inbound_sender.subscribe())
			.filter_map(|message| ready(message.ok()))
			.boxed()
	}
}

impl CommandProbe {
	pub async fn receive(&mut self) -> Command {
		tokio::time::timeout(Duration::from_secs(1), self.receiver.recv())
			.await
			.expect("Timed out waiting for a command")
			.expect("Fake embedded content was dropped")
	}

	/// Gives spawned tasks a chance to run and checks that none of them sent anything.
	pub async fn assert_no_command(&mut self) {
		for _ in 0..16 {
			tokio::task::yield_now().await;
		}

		if let Ok(command) = self.receiver.try_recv() {
			panic!("Unexpected command: {command:?}");
		}
	}
}
