//! WebSocket client helpers for tests that run a real listener.

use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::{HttpServer, rt};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message};
use backend::server::{AppDependencies, build_app};
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};

pub type Socket = actix_codec::Framed<BoxedSocket, Codec>;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);

/// Serve `deps` on an ephemeral port and return its base URL.
pub fn spawn_server(deps: AppDependencies) -> (String, ServerHandle) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");
    let server = HttpServer::new(move || build_app(deps.clone()))
        .workers(1)
        .listen(listener)
        .expect("listen on test socket")
        .disable_signals()
        .run();
    let handle = server.handle();
    rt::spawn(server);
    (format!("http://{addr}"), handle)
}

pub async fn connect(base_url: &str) -> Socket {
    let (_resp, socket) = awc::Client::default()
        .ws(format!("{base_url}/ws"))
        .connect()
        .await
        .expect("websocket connect");
    socket
}

pub async fn send(socket: &mut Socket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .expect("send text");
}

/// Next JSON text frame, skipping heartbeats.
pub async fn next_event(socket: &mut Socket) -> Value {
    loop {
        let frame = tokio::time::timeout(FRAME_TIMEOUT, socket.next())
            .await
            .expect("frame before timeout")
            .expect("socket still open")
            .expect("valid frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json frame"),
            Frame::Ping(_) | Frame::Pong(_) => continue,
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

/// Round-trip a request that only the sender hears back about.
///
/// The session handles frames in order and replies through the same queue as
/// broadcasts, so once the rejection arrives every earlier frame from this
/// client has been applied and every earlier broadcast has been delivered.
pub async fn sync(socket: &mut Socket) {
    send(
        socket,
        json!({"event": "new_guest", "data": {"nombre_completo": " "}}),
    )
    .await;
    let reply = next_event(socket).await;
    assert_eq!(reply["event"], "confirmation", "unexpected frame {reply}");
    assert_eq!(reply["data"]["status"], "not_ok");
}
