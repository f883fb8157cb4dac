use crate::bridge::session_id::{BridgeSessionId, BridgeSessionIdSequence};
use crate::bridge::{EmbeddedContentTrait, InboundMessages};
use crate::link::VideoReference;
use crate::message::inbound::{InboundMessage, SessionMessage};
use crate::message::outbound::Command;
use crate::message::{MessageError, WebSocketMessage};
use async_trait::async_trait;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use parking_lot::Mutex;
use std::fmt::Display;
use std::future::ready;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, trace, warn};

/// Commands beyond this many are dropped while the page doesn't keep up.
const COMMAND_QUEUE_SIZE: usize = 16;
const INBOUND_BUFFER_SIZE: usize = 64;

/// Embedded content living in a page that is served by us and talks back over a websocket.
///
/// Loading content only records what the page should show. The page itself connects to the
/// bridge of its session; pages of outdated sessions get disconnected and reload themselves.
pub struct WebSocketEmbeddedContent {
	inner: Mutex<Inner>,
	session_ids: BridgeSessionIdSequence,
	inbound_sender: broadcast::Sender<SessionMessage>,
}

#[derive(Default)]
struct Inner {
	loaded: Option<LoadedContent>,
	next_page_number: u64,
}

struct LoadedContent {
	session_id: BridgeSessionId,
	video_reference: VideoReference,
	page: Option<AttachedPage>,
}

struct AttachedPage {
	number: u64,
	command_sender: mpsc::Sender<Command>,
}

struct PageAttachment {
	number: u64,
	commands: mpsc::Receiver<Command>,
}

impl Default for WebSocketEmbeddedContent {
	fn default() -> Self {
		Self {
			inner: Default::default(),
			session_ids: Default::default(),
			inbound_sender: broadcast::channel(INBOUND_BUFFER_SIZE).0,
		}
	}
}

impl WebSocketEmbeddedContent {
	pub fn loaded_content(&self) -> Option<(BridgeSessionId, VideoReference)> {
		self.inner
			.lock()
			.loaded
			.as_ref()
			.map(|loaded| (loaded.session_id, loaded.video_reference.clone()))
	}

	/// Relays between the bridge and one page until either side goes away.
	pub async fn run_page_connection<PageSink, PageStream, StreamError>(
		&self,
		session_id: BridgeSessionId,
		mut page_sink: PageSink,
		mut page_stream: PageStream,
	) where
		PageSink: Sink<WebSocketMessage> + Unpin,
		PageStream: Stream<Item = Result<WebSocketMessage, StreamError>> + Unpin,
		StreamError: Display,
	{
		let Some(PageAttachment { number, mut commands }) = self.attach_page(session_id) else {
			info!("Rejecting page of outdated {}", session_id);
			let _ = page_sink.send(WebSocketMessage::Close(None)).await;
			return;
		};

		let forward_commands = async {
			while let Some(command) = commands.recv().await {
				if page_sink.send(command.into()).await.is_err() {
					return;
				}
			}
			// content got replaced or unloaded
			let _ = page_sink.send(WebSocketMessage::Close(None)).await;
		};

		let receive_messages = async {
			while let Some(result) = page_stream.next().await {
				let websocket_message = match result {
					Ok(websocket_message) => websocket_message,
					Err(error) => {
						debug!("Page connection of {} failed: {}", session_id, error);
						break;
					}
				};
				if let WebSocketMessage::Close(_) = websocket_message {
					break;
				}

				match InboundMessage::try_from(&websocket_message) {
					Ok(message) => self.publish(session_id, message),
					Err(MessageError::WrongMessageType(websocket_message)) => {
						trace!("Ignoring {:?} from page", websocket_message);
					}
					Err(error) => warn!("{}", error),
				}
			}
		};

		tokio::select! {
			() = forward_commands => {},
			() = receive_messages => {},
		}

		self.detach_page(session_id, number);
	}

	fn attach_page(&self, session_id: BridgeSessionId) -> Option<PageAttachment> {
		let mut inner = self.inner.lock();
		let number = inner.next_page_number;
		inner.next_page_number += 1;

		let loaded = inner.loaded.as_mut().filter(|loaded| loaded.session_id == session_id)?;
		let (command_sender, commands) = mpsc::channel(COMMAND_QUEUE_SIZE);
		if loaded.page.replace(AttachedPage { number, command_sender }).is_some() {
			info!("Page #{} replaces the previous page of {}", number, session_id);
		} else {
			info!("Page #{} attached to {}", number, session_id);
		}

		Some(PageAttachment { number, commands })
	}

	fn detach_page(&self, session_id: BridgeSessionId, number: u64) {
		let mut inner = self.inner.lock();
		let Some(loaded) = inner.loaded.as_mut().filter(|loaded| loaded.session_id == session_id) else {
			return;
		};

		if loaded.page.as_ref().is_some_and(|page| page.number == number) {
			loaded.page = None;
			info!("Page #{} of {} disconnected", number, session_id);
		}
	}

	fn publish(&self, session_id: BridgeSessionId, message: InboundMessage) {
		trace!("Received {} message on {}", message.kind(), session_id);
		// nobody listening is fine, the message is simply lost
		let _ = self.inbound_sender.send(SessionMessage { session_id, message });
	}
}

#[async_trait]
impl EmbeddedContentTrait for WebSocketEmbeddedContent {
	async fn load_content(&self, video_reference: &VideoReference) -> BridgeSessionId {
		let session_id = self.session_ids.next();
		let previous = self.inner.lock().loaded.replace(LoadedContent {
			session_id,
			video_reference: video_reference.clone(),
			page: None,
		});

		if let Some(previous) = previous {
			info!(
				"Tearing down {} of video '{}'",
				previous.session_id, previous.video_reference
			);
		}
		info!("Loaded video '{}' in {}", video_reference, session_id);
		session_id
	}

	async fn unload_content(&self) {
		if let Some(previous) = self.inner.lock().loaded.take() {
			info!(
				"Unloaded video '{}' of {}",
				previous.video_reference, previous.session_id
			);
		}
	}

	async fn send_command(&self, command: Command) {
		let inner = self.inner.lock();
		let Some(page) = inner.loaded.as_ref().and_then(|loaded| loaded.page.as_ref()) else {
			trace!("Dropping {:?}, no page attached", command);
			return;
		};

		match page.command_sender.try_send(command) {
			Ok(()) => {}
			Err(TrySendError::Full(command)) => debug!("Dropping {:?}, page doesn't keep up", command),
			Err(TrySendError::Closed(command)) => trace!("Dropping {:?}, page is gone", command),
		}
	}

	fn subscribe(&self) -> InboundMessages {
		BroadcastStream::new(self.inbound_sender.subscribe())
			.filter_map(|message| ready(message.ok()))
			.boxed()
	}
}
