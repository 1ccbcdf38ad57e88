use super::handler::Connection;
use super::messages::{ClientEvent, ServerEvent};
use super::state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Build the HTTP router: health check plus the WebSocket session endpoint.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health
async fn health_check() -> impl IntoResponse {
    "OK"
}

/// GET /ws - upgrade to the session protocol
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    info!("Client connected");

    let (mut sink, mut stream) = socket.split();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<ServerEvent>();
    let mut connection = Connection::new(state, events_tx.clone());

    loop {
        tokio::select! {
            Some(event) = events_rx.recv() => {
                match serde_json::to_string(&event) {
                    Ok(json) => {
                        if sink.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Failed to serialize server event: {}", e),
                }
            }

            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => connection.handle(event).await,
                            Err(e) => {
                                warn!("Rejected malformed client message: {}", e);
                                let _ = events_tx.send(ServerEvent::Error {
                                    message: "Invalid message".to_string(),
                                    recoverable: true,
                                });
                            }
                        }
                    }
                    // Pings are answered by axum; other frames carry nothing
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!("WebSocket receive error: {}", e);
                        break;
                    }
                }
            }
        }
    }

    info!("Client disconnected");
    connection.disconnected().await;
}
