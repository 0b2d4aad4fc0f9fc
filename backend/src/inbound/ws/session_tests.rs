//! WebSocket session handler tests.

use super::*;
use crate::domain::ports::{
    EventPublisher, FixtureGuestRepository, FixtureNotifier, FixtureObjectStore,
    FixturePhotoRepository, FixtureThumbnailGenerator, TopicRegistry,
};
use crate::domain::{
    GuestRegistrationService, PhotoIngestPorts, PhotoIngestService, UploadPolicy,
};
use crate::inbound::ws;
use crate::outbound::realtime::RealtimeHub;
use crate::test_support::fixture_clock;
use actix_web::{App, HttpServer, dev::Server, dev::ServerHandle};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message};
use futures_util::{SinkExt, StreamExt};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

fn ws_state(hub: Arc<RealtimeHub>) -> WsState {
    let publisher: Arc<dyn EventPublisher> = hub.clone();
    let registry: Arc<dyn TopicRegistry> = hub;
    let guests = GuestRegistrationService::new(
        Arc::new(FixtureGuestRepository::default()),
        Arc::new(FixtureNotifier::default()),
        publisher.clone(),
        fixture_clock(),
        Vec::new(),
    );
    let photos = PhotoIngestService::new(
        PhotoIngestPorts {
            store: Arc::new(FixtureObjectStore::default()),
            thumbnails: Arc::new(FixtureThumbnailGenerator),
            photos: Arc::new(FixturePhotoRepository::default()),
            publisher: publisher.clone(),
            clock: fixture_clock(),
        },
        UploadPolicy::default(),
    );
    WsState::new(registry, publisher, Arc::new(guests), Arc::new(photos))
}

#[fixture]
async fn start_ws_server() -> (String, Server) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let state = ws_state(Arc::new(RealtimeHub::new()));
    let server = HttpServer::new(move || {
        App::new()
            .app_data(actix_web::web::Data::new(state.clone()))
            .service(ws::ws_entry)
    })
    .listen(listener)
    .expect("bind test server")
    .disable_signals()
    .run();
    (format!("http://{addr}"), server)
}

async fn connect(url: &str) -> Socket {
    let (_resp, socket) = awc::Client::default()
        .ws(format!("{url}/ws"))
        .connect()
        .await
        .expect("websocket connect");
    socket
}

#[fixture]
async fn ws_client(#[future] start_ws_server: (String, Server)) -> (Socket, ServerHandle) {
    let (url, server) = start_ws_server.await;
    let handle = server.handle();
    actix_web::rt::spawn(server);
    (connect(&url).await, handle)
}

async fn send(socket: &mut Socket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .expect("send text");
}

async fn next_event(socket: &mut Socket) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json frame"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

#[rstest]
#[actix_rt::test]
async fn photo_registration_reaches_topic_members_then_confirms(
    #[future] ws_client: (Socket, ServerHandle),
) {
    let (mut socket, _server) = ws_client.await;
    send(&mut socket, json!({"event": "join_tag_topics", "data": ["venue", 7, ""]})).await;
    send(
        &mut socket,
        json!({
            "event": "photo_uploaded",
            "data": {"imageUrl": "https://cdn.example/a.jpg", "title": "Altar", "tags": ["venue"]}
        }),
    )
    .await;

    let category = next_event(&mut socket).await;
    assert_eq!(category, json!({"event": "new_category", "data": ["venue"]}));
    let photo = next_event(&mut socket).await;
    assert_eq!(photo["event"], "new_photo");
    assert_eq!(photo["data"]["imageUrlThumb"], "https://cdn.example/a.jpg");
    let confirmation = next_event(&mut socket).await;
    assert_eq!(
        confirmation,
        json!({"event": "confirmation", "data": {"status": "ok"}})
    );
}

#[rstest]
#[actix_rt::test]
async fn invalid_guest_is_rejected_with_failed_confirmation(
    #[future] ws_client: (Socket, ServerHandle),
) {
    let (mut socket, _server) = ws_client.await;
    send(
        &mut socket,
        json!({"event": "new_guest", "data": {"nombre_completo": "   "}}),
    )
    .await;

    let reply = next_event(&mut socket).await;
    assert_eq!(reply["event"], "confirmation");
    assert_eq!(reply["data"]["status"], "not_ok");
    assert!(reply["data"]["error"].as_str().is_some_and(|e| !e.is_empty()));
}

#[rstest]
#[actix_rt::test]
async fn accepted_guest_is_broadcast(#[future] ws_client: (Socket, ServerHandle)) {
    let (mut socket, _server) = ws_client.await;
    send(
        &mut socket,
        json!({"event": "new_guest", "data": {"nombre_completo": "Ana", "asistira": true}}),
    )
    .await;

    assert_eq!(next_event(&mut socket).await["event"], "confirmation");
    let guest = next_event(&mut socket).await;
    assert_eq!(guest["event"], "new_guest");
    assert_eq!(guest["data"]["nombre_completo"], "Ana");
}

#[rstest]
#[actix_rt::test]
async fn closes_on_malformed_json(#[future] ws_client: (Socket, ServerHandle)) {
    let (mut socket, _server) = ws_client.await;
    socket
        .send(Message::Text("not-json".into()))
        .await
        .expect("send text");

    loop {
        match socket.next().await.expect("response frame").expect("frame") {
            Frame::Ping(_) | Frame::Pong(_) => continue,
            Frame::Close(reason) => {
                assert_eq!(reason.expect("reason").code, CloseCode::Policy);
                break;
            }
            other => panic!("expected close frame, got {other:?}"),
        }
    }
}

#[rstest]
#[case(json!({"event": "new_guest", "data": {"nombre_completo": 5}}))]
#[case(json!({"event": "photo_uploaded", "data": {"imageUrl": 123}}))]
#[actix_rt::test]
async fn badly_typed_payload_is_refused_but_session_stays_open(
    #[future] ws_client: (Socket, ServerHandle),
    #[case] frame: Value,
) {
    let (mut socket, _server) = ws_client.await;
    send(&mut socket, frame).await;

    let refusal = next_event(&mut socket).await;
    assert_eq!(refusal["event"], "confirmation");
    assert_eq!(refusal["data"]["status"], "not_ok");
    assert!(
        refusal["data"]["error"]
            .as_str()
            .is_some_and(|error| error.starts_with("invalid ")),
        "{refusal}"
    );

    send(
        &mut socket,
        json!({"event": "new_guest", "data": {"name": "Ana", "attending": true, "companions": 0}}),
    )
    .await;
    assert_eq!(
        next_event(&mut socket).await,
        json!({"event": "confirmation", "data": {"status": "ok"}})
    );
    let guest = next_event(&mut socket).await;
    assert_eq!(guest["event"], "new_guest");
    assert_eq!(guest["data"]["nombre_completo"], "Ana");
}

#[rstest]
#[actix_rt::test]
async fn closes_after_timeout_without_client_messages(
    #[future] ws_client: (Socket, ServerHandle),
) {
    let (mut socket, _server) = ws_client.await;
    tokio::time::sleep(CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 3).await;

    let observed_close = tokio::time::timeout(Duration::from_secs(2), async {
        let mut observed = None;
        while let Some(frame) = socket.next().await {
            match frame.expect("frame") {
                Frame::Ping(_) | Frame::Pong(_) => continue,
                Frame::Close(reason) => {
                    observed = reason;
                    break;
                }
                other => panic!("unexpected frame before close: {other:?}"),
            }
        }
        observed
    })
    .await
    .expect("close frame missing within timeout")
    .expect("close frame missing after timeout");

    assert_eq!(observed_close.code, CloseCode::Normal);
    assert_eq!(
        observed_close.description.as_deref(),
        Some("heartbeat timeout")
    );
}
