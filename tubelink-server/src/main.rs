use crate::commandline::Commandline;
use crate::error::TubelinkError;
use clap::Parser;
use std::process::ExitCode;

mod bridge;
mod commandline;
mod configuration;
mod console;
mod context;
mod document;
mod error;
mod lifecycle;
mod link;
mod message;
mod playback_state;
mod player;
mod server;
mod time_display;
mod utils;

#[tokio::main]
async fn main() -> Result<ExitCode, TubelinkError> {
	let commandline = Commandline::parse();
	commandline.run().await
}
