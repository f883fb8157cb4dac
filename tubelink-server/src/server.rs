use crate::bridge::session_id::BridgeSessionId;
use crate::bridge::websocket::WebSocketEmbeddedContent;
use crate::console::run_console;
use crate::context::ApplicationContext;
use crate::document::{PlayerDocument, WaitingDocument};
use crate::lifecycle::{PlayerHandle, spawn_player};
use crate::utils::aborting_join_handle::AbortingJoinHandle;
use axum::Router;
use axum::extract::{FromRef, Path, State, WebSocketUpgrade};
use axum::response::{Html, Response};
use axum::routing::get;
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::info;

pub mod rest_api;

const MAX_MESSAGE_SIZE: usize = 10 * 1024;

#[derive(Clone, FromRef)]
pub struct ServerState {
	pub application_context: ApplicationContext,
	pub embedded_content: Arc<WebSocketEmbeddedContent>,
	pub player: PlayerHandle,
	#[from_ref(skip)]
	_player_task: Arc<AbortingJoinHandle<()>>,
}

impl ServerState {
	pub fn new(application_context: ApplicationContext) -> Self {
		let embedded_content = Arc::new(WebSocketEmbeddedContent::default());
		let (player, player_task) = spawn_player(&application_context, embedded_content.clone());

		Self {
			application_context,
			embedded_content,
			player,
			_player_task: Arc::new(player_task),
		}
	}
}

pub async fn run_server(application_context: ApplicationContext, with_console: bool) -> Result<(), std::io::Error> {
	let address = application_context.configuration.address;
	let state = ServerState::new(application_context);
	let console_player = with_console.then(|| state.player.clone());

	info!("Open 'http://{}/player' in a browser to show the video.", address);
	let server = axum_server::bind(address).serve(create_router(state).into_make_service());
	match console_player {
		Some(player) => tokio::select! {
			result = server => result,
			result = run_console(player) => result,
		},
		None => server.await,
	}
}

pub fn create_router(state: ServerState) -> Router {
	Router::new()
		.route("/", get(player_page))
		.route("/player", get(player_page))
		.route("/bridge/{session_id}", get(bridge))
		.nest("/api", rest_api::rest_api())
		.with_state(state)
}

async fn player_page(
	State(application_context): State<ApplicationContext>,
	State(embedded_content): State<Arc<WebSocketEmbeddedContent>>,
) -> Html<String> {
	let Some((session_id, video_reference)) = embedded_content.loaded_content() else {
		return Html(WaitingDocument.render());
	};

	let configuration = &application_context.configuration;
	Html(
		PlayerDocument {
			video_reference: &video_reference,
			session_id,
			width: configuration.player_width,
			height: configuration.player_height,
		}
		.render(),
	)
}

async fn bridge(
	State(embedded_content): State<Arc<WebSocketEmbeddedContent>>,
	Path(session_id): Path<BridgeSessionId>,
	upgrade: WebSocketUpgrade,
) -> Response {
	upgrade
		.max_message_size(MAX_MESSAGE_SIZE)
		.max_frame_size(MAX_MESSAGE_SIZE)
		.on_upgrade(move |websocket| async move {
			let (page_sink, page_stream) = websocket.split();
			embedded_content
				.run_page_connection(session_id, page_sink, page_stream)
				.await;
		})
}
