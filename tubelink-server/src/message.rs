use axum::extract::ws;
use thiserror::Error;

pub mod inbound;
pub mod outbound;

pub type WebSocketMessage = ws::Message;

#[derive(Debug, Error)]
pub enum MessageError {
	#[error("Failed to deserialize message with error: {error}, message was: {json}")]
	DeserializationFailed { error: String, json: String },
	#[error("Message has an unsupported type: {0:?}")]
	WrongMessageType(WebSocketMessage),
}
