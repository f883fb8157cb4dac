use crate::bridge::session_id::BridgeSessionId;
use crate::link::VideoReference;

/// How often the waiting page checks whether something got loaded in the meantime.
const WAITING_RELOAD_MILLISECONDS: u64 = 2000;
/// Delay before a page whose bridge closed reloads itself.
const BRIDGE_CLOSED_RELOAD_MILLISECONDS: u64 = 1000;

/// Page hosting the YouTube IFrame player for one bridge session.
///
/// The page posts `duration` once the player is ready and `playerState` on every state change.
/// It executes the commands it receives over the bridge and reloads itself as soon as the bridge
/// closes, which is how it picks up newly loaded videos.
pub struct PlayerDocument<'video> {
	pub video_reference: &'video VideoReference,
	pub session_id: BridgeSessionId,
	pub width: u32,
	pub height: u32,
}

impl PlayerDocument<'_> {
	pub fn render(&self) -> String {
		let video_id = self.video_reference.as_str();
		let session = u64::from(self.session_id);
		let width = self.width;
		let height = self.height;

		format!(
			r#"<!DOCTYPE html>
<html>
	<head>
		<meta name="viewport" content="width=device-width, initial-scale=1.0">
		<title>{video_id}</title>
	</head>
	<body style="margin: 0; padding: 0;">
		<div id="player"></div>
		<script>
			var bridge = new WebSocket((location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '/bridge/{session}');
			var player;
			var playerReady = false;

			var tag = document.createElement('script');
			tag.src = 'https://www.youtube.com/iframe_api';
			var firstScriptTag = document.getElementsByTagName('script')[0];
			firstScriptTag.parentNode.insertBefore(tag, firstScriptTag);

			function onYouTubeIframeAPIReady() {{
				player = new YT.Player('player', {{
					height: '{height}',
					width: '{width}',
					videoId: '{video_id}',
					playerVars: {{ playsinline: 1 }},
					events: {{
						onReady: onPlayerReady,
						onStateChange: onPlayerStateChange
					}}
				}});
			}}

			function postMessageToHost(type, data) {{
				if (bridge.readyState === WebSocket.OPEN) {{
					bridge.send(JSON.stringify({{ type: type, data: data }}));
				}}
			}}

			function onPlayerReady(event) {{
				playerReady = true;
				postMessageToHost('duration', player.getDuration());
			}}

			function onPlayerStateChange(event) {{
				postMessageToHost('playerState', event.data);
			}}

			bridge.onmessage = function (event) {{
				if (!playerReady) {{
					return;
				}}
				var message = JSON.parse(event.data);
				switch (message.command) {{
					case 'play': player.playVideo(); break;
					case 'pause': player.pauseVideo(); break;
					case 'stop': player.stopVideo(); break;
					case 'report_current_time': postMessageToHost('currentTime', player.getCurrentTime()); break;
				}}
			}};

			bridge.onclose = function () {{
				setTimeout(function () {{ location.reload(); }}, {BRIDGE_CLOSED_RELOAD_MILLISECONDS});
			}};
		</script>
	</body>
</html>
"#
		)
	}
}

/// Page shown while no video is loaded.
pub struct WaitingDocument;

impl WaitingDocument {
	pub fn render(&self) -> String {
		format!(
			r#"<!DOCTYPE html>
<html>
	<head>
		<meta name="viewport" content="width=device-width, initial-scale=1.0">
		<title>No video</title>
	</head>
	<body style="margin: 0; padding: 0; background-color: #4a4a4a;">
		<script>
			setTimeout(function () {{ location.reload(); }}, {WAITING_RELOAD_MILLISECONDS});
		</script>
	</body>
</html>
"#
		)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn player_document_should_embed_video_session_and_size() {
		let video_reference = "dQw4w9WgXcQ".parse().expect("Invalid identifier");
		let html = PlayerDocument {
			video_reference: &video_reference,
			session_id: BridgeSessionId::from(42),
			width: 640,
			height: 360,
		}
		.render();

		assert!(html.contains("videoId: 'dQw4w9WgXcQ'"));
		assert!(html.contains("'/bridge/42'"));
		assert!(html.contains("width: '640'"));
		assert!(html.contains("height: '360'"));
	}

	#[test]
	fn player_document_should_handle_every_command() {
		let video_reference = "abc123".parse().expect("Invalid identifier");
		let html = PlayerDocument {
			video_reference: &video_reference,
			session_id: BridgeSessionId::from(0),
			width: 1,
			height: 1,
		}
		.render();

		for command in ["'play'", "'pause'", "'stop'", "'report_current_time'"] {
			assert!(html.contains(command), "missing {command}");
		}
		for message_type in ["'duration'", "'playerState'", "'currentTime'"] {
			assert!(html.contains(message_type), "missing {message_type}");
		}
	}

	#[test]
	fn waiting_document_should_reload_itself() {
		assert!(WaitingDocument.render().contains("location.reload()"));
	}
}
