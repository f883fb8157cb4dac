use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Text shown to the user whenever a pasted link can't be used.
pub const INVALID_LINK_ALERT: &str = "Please enter a valid link.";

const VIDEO_PARAMETER: &str = "v";
/// Links without a scheme (`youtube.com/watch?v=…`, `?v=…`) are resolved against this.
const BASE_LINK: &str = "https://www.youtube.com/";

/// Identifier of a YouTube video.
///
/// Only consists of ASCII alphanumerics, `-` and `_`, so it can be embedded into HTML and
/// JavaScript without any escaping.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, derive_more::Deref, derive_more::Into)]
#[serde(transparent)]
pub struct VideoReference(String);

impl VideoReference {
	fn is_valid_identifier(identifier: &str) -> bool {
		!identifier.is_empty()
			&& identifier
				.chars()
				.all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl FromStr for VideoReference {
	type Err = InvalidLinkError;

	fn from_str(identifier: &str) -> Result<Self, Self::Err> {
		if Self::is_valid_identifier(identifier) {
			Ok(Self(identifier.to_string()))
		} else {
			Err(InvalidLinkError::InvalidIdentifier(identifier.to_string()))
		}
	}
}

impl<'de> Deserialize<'de> for VideoReference {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let identifier = String::deserialize(deserializer)?;
		identifier.parse().map_err(serde::de::Error::custom)
	}
}

impl Display for VideoReference {
	fn fmt(&self, formatter: &mut Formatter) -> std::fmt::Result {
		formatter.write_str(&self.0)
	}
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidLinkError {
	#[error("Link is not a valid URL: {0}")]
	UnparseableUrl(#[from] url::ParseError),
	#[error("Link has no 'v' query parameter.")]
	MissingVideoParameter,
	#[error("Link has more than one 'v' query parameter.")]
	AmbiguousVideoParameter,
	#[error("'{0}' is not a valid video identifier.")]
	InvalidIdentifier(String),
}

impl InvalidLinkError {
	/// What the user gets to see, independent of the reason.
	pub fn alert_message(&self) -> &'static str {
		INVALID_LINK_ALERT
	}
}

/// Extracts the video identifier from the `v` query parameter of a pasted link.
pub fn parse_link(text: &str) -> Result<VideoReference, InvalidLinkError> {
	let base = Url::parse(BASE_LINK)?;
	let url = Url::options().base_url(Some(&base)).parse(text.trim())?;

	let mut values = url
		.query_pairs()
		.filter(|(key, _)| key == VIDEO_PARAMETER)
		.map(|(_, value)| value.into_owned());
	let value = values.next().ok_or(InvalidLinkError::MissingVideoParameter)?;
	if values.next().is_some() {
		return Err(InvalidLinkError::AmbiguousVideoParameter);
	}

	let video_reference = value.parse()?;
	debug!("Extracted video '{}' from link '{}'", video_reference, text);
	Ok(video_reference)
}
