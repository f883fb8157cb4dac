use crate::bridge::session_id::BridgeSessionId;
use crate::bridge::{EmbeddedContent, InboundMessages};
use crate::context::ApplicationContext;
use crate::link::{InvalidLinkError, VideoReference};
use crate::message::inbound::SessionMessage;
use crate::player::{Player, PlayerSettings, PlayerStatus};
use crate::utils::aborting_join_handle::AbortingJoinHandle;
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info};

const REQUEST_QUEUE_SIZE: usize = 16;

type SubmitLinkResult = Result<(VideoReference, BridgeSessionId), InvalidLinkError>;

enum PlayerRequest {
	SubmitLink {
		link: String,
		response: oneshot::Sender<SubmitLinkResult>,
	},
	Play,
	Pause,
}

enum PlayerEvent {
	Request(Option<PlayerRequest>),
	Message(Option<SessionMessage>),
}

#[derive(Debug, Error)]
#[error("The player isn't running anymore.")]
pub struct PlayerUnavailable;

#[derive(Debug, Error)]
pub enum SubmitLinkError {
	#[error(transparent)]
	InvalidLink(#[from] InvalidLinkError),
	#[error(transparent)]
	PlayerUnavailable(#[from] PlayerUnavailable),
}

/// Cloneable access to a running player.
#[derive(Clone)]
pub struct PlayerHandle {
	requests: mpsc::Sender<PlayerRequest>,
	status: watch::Receiver<PlayerStatus>,
}

impl PlayerHandle {
	pub async fn submit_link(
		&self,
		link: impl Into<String>,
	) -> Result<(VideoReference, BridgeSessionId), SubmitLinkError> {
		let (response, receiver) = oneshot::channel();
		self.send(PlayerRequest::SubmitLink {
			link: link.into(),
			response,
		})
		.await?;

		Ok(receiver.await.map_err(|_| PlayerUnavailable)??)
	}

	pub async fn play(&self) -> Result<(), PlayerUnavailable> {
		self.send(PlayerRequest::Play).await
	}

	pub async fn pause(&self) -> Result<(), PlayerUnavailable> {
		self.send(PlayerRequest::Pause).await
	}

	pub fn status(&self) -> PlayerStatus {
		self.status.borrow().clone()
	}

	/// Receiver that is notified whenever the status changes.
	pub fn status_changes(&self) -> watch::Receiver<PlayerStatus> {
		self.status.clone()
	}

	async fn send(&self, request: PlayerRequest) -> Result<(), PlayerUnavailable> {
		self.requests.send(request).await.map_err(|_| PlayerUnavailable)
	}
}

/// Starts the task owning the player. It runs until every [`PlayerHandle`] is gone.
pub fn spawn_player(
	application_context: &ApplicationContext,
	embedded_content: EmbeddedContent,
) -> (PlayerHandle, AbortingJoinHandle<()>) {
	let inbound_messages = embedded_content.subscribe();
	let player = Player::new(
		embedded_content,
		application_context.time_source.clone(),
		PlayerSettings::from(&application_context.configuration),
	);

	let (request_sender, request_receiver) = mpsc::channel(REQUEST_QUEUE_SIZE);
	let (status_sender, status_receiver) = watch::channel(player.status());
	let task = tokio::spawn(run_player(player, inbound_messages, request_receiver, status_sender));

	let handle = PlayerHandle {
		requests: request_sender,
		status: status_receiver,
	};
	(handle, task.into())
}

async fn run_player(
	mut player: Player,
	mut inbound_messages: InboundMessages,
	mut requests: mpsc::Receiver<PlayerRequest>,
	status_sender: watch::Sender<PlayerStatus>,
) {
	loop {
		let event = tokio::select! {
			request = requests.recv() => PlayerEvent::Request(request),
			message = inbound_messages.next() => PlayerEvent::Message(message),
		};

		match event {
			PlayerEvent::Request(Some(request)) => handle_request(&mut player, request).await,
			PlayerEvent::Message(Some(message)) => player.handle_message(message),
			PlayerEvent::Request(None) => {
				debug!("All player handles are gone");
				break;
			}
			PlayerEvent::Message(None) => {
				debug!("Embedded content stopped sending messages");
				break;
			}
		}

		let status = player.status();
		status_sender.send_if_modified(|current_status| {
			if *current_status == status {
				return false;
			}
			*current_status = status;
			true
		});
	}

	player.teardown().await;
	status_sender.send_replace(player.status());
	info!("Player stopped");
}

async fn handle_request(player: &mut Player, request: PlayerRequest) {
	match request {
		PlayerRequest::SubmitLink { link, response } => {
			let result = player.submit_link(link).await;
			// the requester may have given up waiting
			let _ = response.send(result);
		}
		PlayerRequest::Play => player.play().await,
		PlayerRequest::Pause => player.pause().await,
	}
}
