//! WebSocket channel for seated players
//!
//! `GET /api/game/:id/ws?join_as=new|white|black&token=...`. The handshake
//! seats the socket (or re-attaches it); afterwards the client sends
//! [`ClientMessage`]s and receives [`ServerEvent`]s.

use crate::state::{lock_game, ServerState, SharedGame};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    response::IntoResponse,
};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use hexchess_core::{Color, Connection, GameError, ServerEvent};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

// ---- Message types ----

/// Client → Server messages
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    GetAllowedMoves {
        tile: String,
    },
    Move {
        from: String,
        to: String,
        #[serde(default)]
        promotion: Option<String>,
    },
    Forfeit,
}

/// Handshake query
#[derive(Debug, Default, Deserialize)]
pub struct JoinParams {
    pub join_as: Option<String>,
    pub token: Option<String>,
}

/// What the socket writer task is told to do
#[derive(Debug)]
pub enum Outbound {
    Event(ServerEvent),
    Close,
}

/// [`Connection`] backed by the writer task of one socket
#[derive(Clone, Debug)]
pub struct SocketConnection {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl SocketConnection {
    pub fn new(tx: mpsc::UnboundedSender<Outbound>) -> Self {
        Self { tx }
    }

    fn reply(&self, event: ServerEvent) {
        // A closed channel means the socket is gone; nothing left to tell
        let _ = self.tx.send(Outbound::Event(event));
    }
}

impl Connection for SocketConnection {
    fn send(&self, event: &ServerEvent) {
        self.reply(event.clone());
    }

    fn close(&self) {
        let _ = self.tx.send(Outbound::Close);
    }
}

// ---- WebSocket handler ----

pub async fn game_socket(
    ws: WebSocketUpgrade,
    Path(id): Path<String>,
    Query(params): Query<JoinParams>,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, id, params, state))
}

async fn handle_socket(socket: WebSocket, id: String, params: JoinParams, state: Arc<ServerState>) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let connection = SocketConnection::new(tx);

    let (game, color) = match join(&state, &id, &params, connection.clone()) {
        Ok(seated) => seated,
        Err(err) => {
            tracing::warn!(game = %id, error = %err, "handshake rejected");
            let _ = send_event(&mut sender, &ServerEvent::from(&err)).await;
            let _ = sender.close().await;
            return;
        }
    };

    let writer = tokio::spawn(async move {
        while let Some(outbound) = rx.recv().await {
            match outbound {
                Outbound::Event(event) => {
                    if send_event(&mut sender, &event).await.is_err() {
                        break;
                    }
                }
                Outbound::Close => {
                    let _ = sender.close().await;
                    break;
                }
            }
        }
    });

    while let Some(Ok(msg)) = receiver.next().await {
        let text = match msg {
            Message::Text(t) => t,
            Message::Close(_) => break,
            _ => continue,
        };

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(message) => dispatch(&state, &game, color, message, &connection),
            Err(e) => connection.reply(ServerEvent::Error {
                status: 400,
                error: format!("invalid message: {e}"),
            }),
        }
    }

    tracing::debug!(game = %id, color = color.as_str(), "socket closed");
    writer.abort();
}

/// Seat or re-attach `connection` according to the handshake
pub fn join(
    state: &ServerState,
    id: &str,
    params: &JoinParams,
    connection: SocketConnection,
) -> Result<(SharedGame, Color), GameError> {
    let shared = state.get_or_load(id)?;

    let color = {
        let mut game = lock_game(&shared);
        match params.join_as.as_deref() {
            Some("new") => game.register_player(Box::new(connection))?.color,
            Some(seat) => {
                let color: Color = seat.parse().map_err(|_| GameError::Unauthorized)?;
                let token = params.token.as_deref().unwrap_or_default();
                game.login(color, token, Box::new(connection))?;
                color
            }
            None => return Err(GameError::Unauthorized),
        }
    };

    Ok((shared, color))
}

/// Apply one client message for the player seated as `color`
pub fn dispatch(
    state: &ServerState,
    shared: &SharedGame,
    color: Color,
    message: ClientMessage,
    connection: &SocketConnection,
) {
    let mut game = lock_game(shared);

    let result = match message {
        ClientMessage::GetAllowedMoves { tile } => game
            .allowed_moves(color, &tile)
            .map(|allowed| connection.reply(ServerEvent::AllowedMoves { from: tile, allowed })),
        ClientMessage::Move { from, to, promotion } => game
            .do_move(color, &from, &to, promotion.as_deref())
            .map(|_| ()),
        ClientMessage::Forfeit => game.forfeit(color),
    };

    if let Err(err) = result {
        tracing::warn!(game = %game.id(), color = color.as_str(), error = %err, "request rejected");
        connection.reply(ServerEvent::from(&err));
    }

    if game.is_finished() {
        state.remove(game.id());
    }
}

// ---- Helper: send event ----

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(event)?;
    sender.send(Message::Text(json)).await?;
    Ok(())
}
