use crate::configuration::Configuration;
use crate::context::ApplicationContext;
use crate::error::TubelinkError;
use crate::link::parse_link;
use crate::server::run_server;
use crate::utils::time_source::TimeSource;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser)]
#[clap(name = "tubelink", about = "Play pasted YouTube links in an embedded player")]
pub struct Commandline {
	#[clap(short = 'c', long = "config-file", default_value = "configuration.toml")]
	pub configuration_file_path: String,
	#[clap(subcommand)]
	pub command: Option<BaseCommand>,
}

#[derive(clap::Parser)]
pub enum BaseCommand {
	/// Serve the player page and control it from the console
	Run {
		/// Only serve, don't read commands from stdin
		#[clap(long)]
		no_console: bool,
	},
	/// Print the configuration
	Configuration,
	/// Print the video id contained in a link
	ParseLink { link: String },
}

impl Default for BaseCommand {
	fn default() -> Self {
		Self::Run { no_console: false }
	}
}

impl Commandline {
	pub async fn run(self) -> Result<ExitCode, TubelinkError> {
		let base_command = self.command.unwrap_or_default();
		if let BaseCommand::ParseLink { link } = &base_command {
			return Ok(print_parsed_link(link));
		}

		let configuration = Configuration::from_file(&self.configuration_file_path)?;
		let application_context = ApplicationContext::new(configuration, TimeSource::default());

		tracing_subscriber::fmt()
			.with_env_filter(EnvFilter::new(&application_context.configuration.log_filters))
			.init();

		match base_command {
			BaseCommand::Run { no_console } => {
				info!(
					"Starting server. Pages connect to 'ws://{}/bridge/<session>'.",
					application_context.configuration.address
				);
				run_server(application_context, !no_console).await?;
			}
			BaseCommand::Configuration => println!("{:?}", application_context.configuration),
			BaseCommand::ParseLink { .. } => unreachable!("Handled before loading the configuration"),
		}
		Ok(ExitCode::SUCCESS)
	}
}

fn print_parsed_link(link: &str) -> ExitCode {
	match parse_link(link) {
		Ok(video_reference) => {
			println!("{video_reference}");
			ExitCode::SUCCESS
		}
		Err(error) => {
			eprintln!("{}", error.alert_message());
			ExitCode::FAILURE
		}
	}
}
