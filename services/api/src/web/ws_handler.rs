//! services/api/src/web/ws_handler.rs
//!
//! This is the entry point for a quiz WebSocket connection. It bridges the socket
//! to the channel-based quiz runner: text frames are decoded into `ClientMessage`s
//! and every `ServerMessage` is written back as a JSON text frame.

use crate::web::{
    protocol::{ClientMessage, ServerMessage},
    quiz_task::quiz_process,
    state::AppState,
};
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// The handler for upgrading HTTP requests to WebSocket connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(app_state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| {
        let connection_id = Uuid::new_v4();
        handle_socket(socket, app_state)
            .instrument(tracing::info_span!("quiz_connection", %connection_id))
    })
}

async fn handle_socket(socket: WebSocket, app_state: Arc<AppState>) {
    info!("New WebSocket connection established.");

    let (mut sender, mut receiver) = socket.split();
    let (client_tx, client_rx) = mpsc::channel::<ClientMessage>(32);
    let (server_tx, mut server_rx) = mpsc::channel::<ServerMessage>(32);
    let error_tx = server_tx.clone();

    // --- 1. Quiz runner ---
    let runner = tokio::spawn(
        async move {
            if let Err(e) = quiz_process(app_state, client_rx, server_tx).await {
                error!("Quiz process failed: {:?}", e);
            }
        }
        .in_current_span(),
    );

    // --- 2. Outbound writer ---
    let writer = tokio::spawn(
        async move {
            while let Some(msg) = server_rx.recv().await {
                let json = match serde_json::to_string(&msg) {
                    Ok(json) => json,
                    Err(e) => {
                        error!("Failed to serialize server message: {}", e);
                        continue;
                    }
                };
                if sender.send(Message::Text(json.into())).await.is_err() {
                    error!("Failed to send message; client is gone.");
                    break;
                }
            }
        }
        .in_current_span(),
    );

    // --- 3. Inbound reader ---
    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    if client_tx.send(client_msg).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to deserialize client message: {}", e);
                    let _ = error_tx
                        .send(ServerMessage::Error {
                            message: format!("Unrecognised message: {}", e),
                        })
                        .await;
                }
            },
            Message::Close(_) => {
                info!("Client sent close message.");
                break;
            }
            _ => {}
        }
    }

    // --- 4. Cleanup ---
    drop(client_tx);
    drop(error_tx);
    if let Err(e) = runner.await {
        error!("Quiz runner task panicked: {:?}", e);
    }
    if let Err(e) = writer.await {
        error!("Writer task panicked: {:?}", e);
    }
    info!("WebSocket connection closed.");
}
