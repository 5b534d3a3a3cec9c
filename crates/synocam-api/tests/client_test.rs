#![allow(clippy::unwrap_used)]
// Integration tests for `SurveillanceClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use synocam_api::{Error, PtzDirection, SurveillanceClient, ZoomControl};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, SurveillanceClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = SurveillanceClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

/// Mount a login mock and authenticate, so entry.cgi calls carry a sid.
async fn setup_logged_in() -> (MockServer, SurveillanceClient) {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "Login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "sid": "test-sid-123" }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    client.login("admin", &secret).await.unwrap();
    (server, client)
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_sid() {
    let (_server, client) = setup_logged_in().await;
    assert!(client.is_logged_in());
}

#[tokio::test]
async fn test_login_failure() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 400 }
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong-password".to_string().into();
    let result = client.login("admin", &secret).await;

    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.is_logged_in());
}

#[tokio::test]
async fn test_call_without_login_is_rejected() {
    let (_server, client) = setup().await;
    let result = client.list_cameras().await;
    assert!(matches!(result, Err(Error::NotLoggedIn)));
}

#[tokio::test]
async fn test_logout_clears_sid() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/webapi/auth.cgi"))
        .and(query_param("method", "Logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    client.logout().await.unwrap();
    assert!(!client.is_logged_in());
}

// ── Camera tests ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_cameras() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.Camera"))
        .and(query_param("method", "List"))
        .and(query_param("_sid", "test-sid-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "cameras": [{
                    "id": 3,
                    "name": "Driveway",
                    "model": "DS-2CD2142",
                    "vendor": "Hikvision",
                    "ip": "192.168.1.60",
                    "port": 80,
                    "status": 1,
                    "enabled": true
                }]
            }
        })))
        .mount(&server)
        .await;

    let cameras = client.list_cameras().await.unwrap();

    assert_eq!(cameras.len(), 1);
    assert_eq!(cameras[0].id, 3);
    assert_eq!(cameras[0].name, "Driveway");
    assert!(cameras[0].enabled);
    assert_eq!(
        cameras[0].camera_status(),
        synocam_api::CameraStatus::Normal
    );
}

#[tokio::test]
async fn test_session_expiry_surfaces_as_session_expired() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 106 }
        })))
        .mount(&server)
        .await;

    let result = client.list_cameras().await;
    assert!(matches!(result, Err(Error::SessionExpired)));
}

#[tokio::test]
async fn test_snapshot_returns_bytes() {
    let (server, client) = setup_logged_in().await;

    let jpeg_magic = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("method", "GetSnapshot"))
        .and(query_param("cameraId", "3"))
        .and(query_param("camStm", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(jpeg_magic.clone(), "image/jpeg"),
        )
        .mount(&server)
        .await;

    let bytes = client.snapshot(3, 1).await.unwrap();
    assert_eq!(bytes.as_ref(), jpeg_magic.as_slice());
}

#[tokio::test]
async fn test_snapshot_json_error_is_not_an_image() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("method", "GetSnapshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "code": 402 }
        })))
        .mount(&server)
        .await;

    let result = client.snapshot(3, 1).await;
    assert!(matches!(result, Err(Error::Authentication { .. })));
}

// ── Event tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_query_events() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.Event"))
        .and(query_param("method", "List"))
        .and(query_param("cameraIds", "3"))
        .and(query_param("fromTime", "1718000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "timestamp": "1718000060",
                "events": [
                    {
                        "eventId": 9001,
                        "cameraId": 3,
                        "reason": 2,
                        "startTime": 1718000030,
                        "is_complete": false
                    }
                ]
            }
        })))
        .mount(&server)
        .await;

    let query = client.query_events(3, 1_718_000_000, &[2, 3]).await.unwrap();

    assert_eq!(query.timestamp, 1_718_000_060);
    assert_eq!(query.events.len(), 1);
    assert_eq!(query.events[0].id, 9001);
    assert_eq!(query.events[0].reason, 2);
    assert!(!query.events[0].is_complete);
}

// ── PTZ tests ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_ptz_move_and_zoom() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.PTZ"))
        .and(query_param("method", "Move"))
        .and(query_param("direction", "left"))
        .and(query_param("speed", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("api", "SYNO.SurveillanceStation.PTZ"))
        .and(query_param("method", "Zoom"))
        .and(query_param("control", "in"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    client.ptz_move(3, PtzDirection::Left, 1).await.unwrap();
    client.ptz_zoom(3, ZoomControl::In).await.unwrap();
}

#[tokio::test]
async fn test_list_presets() {
    let (server, client) = setup_logged_in().await;

    Mock::given(method("GET"))
        .and(path("/webapi/entry.cgi"))
        .and(query_param("method", "ListPreset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "presets": [
                    { "id": 1, "name": "Gate", "position": 1 },
                    { "id": 2, "name": "Yard", "position": 2 }
                ]
            }
        })))
        .mount(&server)
        .await;

    let presets = client.list_presets(3).await.unwrap();
    assert_eq!(presets.len(), 2);
    assert_eq!(presets[0].name, "Gate");
}
