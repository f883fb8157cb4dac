use crate::bridge::session_id::BridgeSessionId;
use crate::link::VideoReference;
use crate::message::inbound::SessionMessage;
use crate::message::outbound::Command;
use async_trait::async_trait;
use futures_util::stream::BoxStream;
use std::sync::Arc;

pub mod auto_stop;
pub mod poller;
pub mod session_id;
pub mod websocket;

pub type EmbeddedContent = Arc<dyn EmbeddedContentTrait + Send + Sync>;
pub type InboundMessages = BoxStream<'static, SessionMessage>;

/// Surface that hosts the embedded player document.
#[async_trait]
pub trait EmbeddedContentTrait {
	/// Tears down whatever is currently loaded and loads the player for `video_reference`
	/// in a new bridge session.
	async fn load_content(&self, video_reference: &VideoReference) -> BridgeSessionId;

	async fn unload_content(&self);

	/// Fire and forget. Does nothing if no content is loaded.
	async fn send_command(&self, command: Command);

	/// Messages of all sessions, starting with the ones received after subscribing.
	fn subscribe(&self) -> InboundMessages;
}
