use crate::lifecycle::{PlayerHandle, SubmitLinkError};
use crate::player::PlayerStatus;
use crate::utils::aborting_join_handle::AbortingJoinHandle;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::error;

#[derive(Debug, PartialEq)]
enum ConsoleCommand<'line> {
	Play,
	Pause,
	Status,
	Quit,
	Link(&'line str),
}

impl<'line> ConsoleCommand<'line> {
	fn parse(line: &'line str) -> Option<Self> {
		let command = match line.trim() {
			"" => return None,
			"play" => Self::Play,
			"pause" => Self::Pause,
			"status" => Self::Status,
			"quit" | "exit" => Self::Quit,
			link => Self::Link(link),
		};
		Some(command)
	}
}

/// Reads commands and links from stdin until it closes or the user quits.
pub async fn run_console(player: PlayerHandle) -> std::io::Result<()> {
	println!("Paste a link to load it. Other commands: play, pause, status, quit");
	let _display_printer = AbortingJoinHandle::from(tokio::spawn(print_display(player.status_changes())));

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	while let Some(line) = lines.next_line().await? {
		let Some(command) = ConsoleCommand::parse(&line) else {
			continue;
		};

		let result = match command {
			ConsoleCommand::Play => player.play().await,
			ConsoleCommand::Pause => player.pause().await,
			ConsoleCommand::Status => {
				println!("{}", describe(&player.status()));
				Ok(())
			}
			ConsoleCommand::Quit => break,
			ConsoleCommand::Link(link) => match player.submit_link(link).await {
				Ok((video_reference, _)) => {
					println!("Loaded video '{video_reference}'");
					Ok(())
				}
				Err(SubmitLinkError::InvalidLink(error)) => {
					println!("{}", error.alert_message());
					Ok(())
				}
				Err(SubmitLinkError::PlayerUnavailable(error)) => Err(error),
			},
		};

		if let Err(error) = result {
			error!("{}", error);
			break;
		}
	}

	Ok(())
}

/// Prints the time display whenever its text changes.
async fn print_display(mut status_changes: watch::Receiver<PlayerStatus>) {
	let mut last_display = String::new();
	while status_changes.changed().await.is_ok() {
		let display = status_changes.borrow_and_update().display.clone();
		if display != last_display {
			println!("{display}");
			last_display = display;
		}
	}
}

fn describe(status: &PlayerStatus) -> String {
	match &status.video_id {
		Some(video_id) => format!("{video_id} {:?} {}", status.playback_state, status.display),
		None => "No video loaded".to_string(),
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::playback_state::PlaybackState;
	use crate::time_display::TimeReading;

	#[test]
	fn should_parse_commands_and_treat_everything_else_as_link() {
		assert_eq!(Some(ConsoleCommand::Play), ConsoleCommand::parse("play"));
		assert_eq!(Some(ConsoleCommand::Pause), ConsoleCommand::parse(" pause \n"));
		assert_eq!(Some(ConsoleCommand::Status), ConsoleCommand::parse("status"));
		assert_eq!(Some(ConsoleCommand::Quit), ConsoleCommand::parse("exit"));
		assert_eq!(
			Some(ConsoleCommand::Link("https://youtu.be/watch?v=abc123")),
			ConsoleCommand::parse("https://youtu.be/watch?v=abc123")
		);
		assert_eq!(None, ConsoleCommand::parse("   "));
	}

	#[test]
	fn should_describe_status() {
		assert_eq!("No video loaded", describe(&PlayerStatus::default()));

		let status = PlayerStatus {
			video_id: Some("abc123".parse().expect("Invalid identifier")),
			session_id: None,
			playback_state: PlaybackState::Playing,
			time: TimeReading::default(),
			display: "00:12 / 03:32".to_string(),
		};
		assert_eq!("abc123 Playing 00:12 / 03:32", describe(&status));
	}
}
