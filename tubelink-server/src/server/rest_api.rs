use crate::bridge::session_id::BridgeSessionId;
use crate::lifecycle::PlayerHandle;
use crate::link::VideoReference;
use crate::player::PlayerStatus;
use crate::server::ServerState;
use crate::server::rest_api::error::ApiErrorResponse;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

pub mod error;

pub fn rest_api() -> Router<ServerState> {
	Router::new()
		.route("/link", post(submit_link))
		.route("/play", post(play))
		.route("/pause", post(pause))
		.route("/status", get(status))
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LinkRequest {
	pub link: String,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct LinkResponse {
	pub video_id: VideoReference,
	pub session_id: BridgeSessionId,
}

async fn submit_link(
	State(player): State<PlayerHandle>,
	Json(LinkRequest { link }): Json<LinkRequest>,
) -> Result<Json<LinkResponse>, ApiErrorResponse> {
	let (video_id, session_id) = player.submit_link(link).await?;
	Ok(Json(LinkResponse { video_id, session_id }))
}

async fn play(State(player): State<PlayerHandle>) -> Result<StatusCode, ApiErrorResponse> {
	player.play().await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn pause(State(player): State<PlayerHandle>) -> Result<StatusCode, ApiErrorResponse> {
	player.pause().await?;
	Ok(StatusCode::NO_CONTENT)
}

async fn status(State(player): State<PlayerHandle>) -> Json<PlayerStatus> {
	Json(player.status())
}
