use std::net::SocketAddr;

use axum::Router;
use futures_util::StreamExt;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest},
};
use url::Url;

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Serves `router` on a random local port.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

/// Connects to `/ws/{path}?token=...`.
pub async fn connect_ws(
    addr: SocketAddr,
    path: &str,
    token: &str,
) -> Result<Client, tokio_tungstenite::tungstenite::Error> {
    let url = Url::parse(&format!("ws://{addr}/ws/{path}?token={token}")).unwrap();
    let req = url.as_str().into_client_request().unwrap();
    connect_async(req).await.map(|(stream, _)| stream)
}

/// Next JSON text frame, skipping control frames. Panics after two seconds.
pub async fn next_json(client: &mut Client) -> Value {
    let deadline = std::time::Duration::from_secs(2);
    loop {
        let msg = tokio::time::timeout(deadline, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}
