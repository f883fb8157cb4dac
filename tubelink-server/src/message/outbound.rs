use crate::message::WebSocketMessage;
use serde::{Deserialize, Serialize};

/// Instruction for the embedded player. Fire and forget, nothing is ever acknowledged.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "command")]
#[serde(rename_all = "snake_case")]
pub enum Command {
	Play,
	Pause,
	Stop,
	/// Asks the document to answer with a current time report.
	ReportCurrentTime,
}

impl From<Command> for WebSocketMessage {
	fn from(command: Command) -> Self {
		let json = serde_json::to_string(&command).expect("Failed to serialize command to JSON.");
		WebSocketMessage::Text(json.into())
	}
}
