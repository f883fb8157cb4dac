use crate::bridge::session_id::BridgeSessionId;
use crate::message::{MessageError, WebSocketMessage};
use crate::playback_state::PlayerStateCode;
use serde::{Deserialize, Serialize};

/// Notification posted by the embedded document.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", content = "data")]
#[serde(rename_all = "camelCase")]
pub enum InboundMessage {
	PlayerState(PlayerStateCode),
	Duration(f64),
	CurrentTime(f64),
}

impl InboundMessage {
	pub fn kind(&self) -> &'static str {
		use InboundMessage::*;
		match self {
			PlayerState(_) => "player state",
			Duration(_) => "duration",
			CurrentTime(_) => "current time",
		}
	}
}

/// An [`InboundMessage`] together with the bridge session it arrived on.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionMessage {
	pub session_id: BridgeSessionId,
	pub message: InboundMessage,
}

impl TryFrom<&WebSocketMessage> for InboundMessage {
	type Error = MessageError;

	fn try_from(websocket_message: &WebSocketMessage) -> Result<Self, Self::Error> {
		match websocket_message {
			WebSocketMessage::Text(json) => {
				serde_json::from_str(json.as_str()).map_err(|error| MessageError::DeserializationFailed {
					error: error.to_string(),
					json: json.as_str().to_owned(),
				})
			}
			_ => Err(MessageError::WrongMessageType(websocket_message.clone())),
		}
	}
}
