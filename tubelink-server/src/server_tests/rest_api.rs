use crate::link::INVALID_LINK_ALERT;
use crate::playback_state::PlaybackState;
use crate::server::rest_api::LinkRequest;
use crate::server::rest_api::error::ApiErrorResponse;
use crate::server_tests::{start_test_server, status, submit_link};
use reqwest::StatusCode;

#[tokio::test]
async fn should_accept_valid_link() {
	let (client, _time_source) = start_test_server().await;

	let response = submit_link(&client, "  https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42  ").await;
	assert_eq!("dQw4w9WgXcQ", response.video_id.as_str());

	let status = status(&client).await;
	assert_eq!(Some(response.video_id), status.video_id);
	assert_eq!(Some(response.session_id), status.session_id);
	assert_eq!(PlaybackState::Stopped, status.playback_state);
	assert_eq!("00:00 / 00:00", status.display);
}

#[tokio::test]
async fn should_reject_invalid_links_with_alert() {
	let (client, _time_source) = start_test_server().await;

	for link in ["", "not a link", "https://youtu.be/dQw4w9WgXcQ", "https://youtube.com/watch?v="] {
		let response = client
			.post("/api/link")
			.json(&LinkRequest { link: link.to_string() })
			.send()
			.await
			.expect("Request failed.");
		assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status(), "link: '{link}'");

		let error = response
			.json::<ApiErrorResponse>()
			.await
			.expect("Failed to parse error response");
		assert_eq!(
			ApiErrorResponse {
				r#type: "invalid_link".to_string(),
				status: 422,
				message: INVALID_LINK_ALERT.to_string(),
			},
			error
		);
	}

	assert_eq!(None, status(&client).await.video_id);
}

#[tokio::test]
async fn invalid_link_should_keep_the_previous_video() {
	let (client, _time_source) = start_test_server().await;
	let loaded = submit_link(&client, "https://youtu.be/watch?v=abc123").await;

	let response = client
		.post("/api/link")
		.json(&LinkRequest {
			link: "https://youtu.be/abc123".to_string(),
		})
		.send()
		.await
		.expect("Request failed.");
	assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, response.status());

	let status = status(&client).await;
	assert_eq!(Some(loaded.video_id), status.video_id);
	assert_eq!(Some(loaded.session_id), status.session_id);
}

#[tokio::test]
async fn play_and_pause_without_video_should_be_accepted() {
	let (client, _time_source) = start_test_server().await;

	for path in ["/api/play", "/api/pause"] {
		let response = client.post(path).send().await.expect("Request failed.");
		assert_eq!(StatusCode::NO_CONTENT, response.status());
	}
	assert_eq!(PlaybackState::Stopped, status(&client).await.playback_state);
}

#[tokio::test]
async fn should_report_empty_status_initially() {
	let (client, _time_source) = start_test_server().await;

	let response = client.get("/api/status").send().await.expect("Request failed.");
	assert_eq!(StatusCode::OK, response.status());
	let status = response.json::<crate::player::PlayerStatus>().await.expect("Failed to parse status");

	assert_eq!(None, status.video_id);
	assert_eq!(None, status.session_id);
	assert_eq!("00:00 / 00:00", status.display);
}

#[tokio::test]
async fn should_accept_link_without_scheme() {
	let (client, _time_source) = start_test_server().await;

	let response = submit_link(&client, "www.youtube.com/watch?v=dQw4w9WgXcQ").await;

	assert_eq!("dQw4w9WgXcQ", response.video_id.as_str());
	assert_eq!(Some(response.video_id), status(&client).await.video_id);
}
