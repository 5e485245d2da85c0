use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use futures_util::{SinkExt, StreamExt};
use grid_chase::constants::OBSTACLE_TICK_MS;
use grid_chase::engine::GridChaseEngine;
use grid_chase::error::ConfigError;
use grid_chase::obstacle::ObstacleEngine;
use grid_chase::render::{render_board, render_obstacle, status_line};
use grid_chase::server_protocol::{parse_client_message, GameKind, ParsedClientMessage};
use grid_chase::server_utils::{normalize_seed, parse_port};
use grid_chase::types::GameConfig;
use log::{debug, error, info, warn};
use serde_json::{json, Value};
use tokio::time::MissedTickBehavior;
use tower_http::services::{ServeDir, ServeFile};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Everything a connection plays. Sessions are owned by their connection task and never
/// shared.
enum Session {
    Chase(GridChaseEngine),
    Obstacle(ObstacleEngine),
}

impl Session {
    fn start(kind: GameKind, seed: u32) -> Result<Self, ConfigError> {
        match kind {
            GameKind::Chase(variant) => Ok(Self::Chase(GridChaseEngine::new(
                GameConfig::preset(variant),
                seed,
            )?)),
            GameKind::Obstacle => Ok(Self::Obstacle(ObstacleEngine::new(seed))),
        }
    }

    fn kind(&self) -> GameKind {
        match self {
            Self::Chase(engine) => GameKind::Chase(engine.config().variant),
            Self::Obstacle(_) => GameKind::Obstacle,
        }
    }

    /// Render pass: chase snapshots drain their one-shot notices here.
    fn render(&mut self) -> Value {
        let game = self.kind().label();
        match self {
            Self::Chase(engine) => {
                let state = engine.build_snapshot(true);
                json!({
                    "type": "snapshot",
                    "game": game,
                    "board": render_board(&state),
                    "status": status_line(&state),
                    "state": state,
                })
            }
            Self::Obstacle(engine) => {
                let state = engine.snapshot();
                json!({
                    "type": "snapshot",
                    "game": game,
                    "board": render_obstacle(&state),
                    "status": format!("Score: {}", state.score),
                    "state": state,
                })
            }
        }
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port = parse_port(std::env::var("PORT").ok().as_deref());
    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/ws", get(ws_handler));

    let app = if let Some(static_dir) = resolve_static_dir() {
        let index_file = static_dir.join("index.html");
        info!("static file root: {}", static_dir.to_string_lossy());
        app.fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)),
        )
    } else {
        warn!("static file root not found; serving the websocket API only");
        app
    };

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {bind_addr}: {err}");
            std::process::exit(1);
        }
    };

    info!("listening on :{port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("server runtime failed: {err}");
        std::process::exit(1);
    }
}

fn resolve_static_dir() -> Option<PathBuf> {
    if let Ok(raw) = std::env::var("STATIC_DIR") {
        let path = PathBuf::from(raw);
        if path.join("index.html").is_file() {
            return Some(path);
        }
    }

    let candidates = [PathBuf::from("static"), PathBuf::from("dist/client")];
    candidates
        .into_iter()
        .find(|path| path.join("index.html").is_file())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn ws_handler(ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(handle_socket)
}

async fn handle_socket(socket: WebSocket) {
    let client_id = make_id("client");
    info!("{client_id} connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();
    let mut session: Option<Session> = None;
    // Obstacle runs only advance when this driver ticks them.
    let mut ticker = tokio::time::interval(Duration::from_millis(OBSTACLE_TICK_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let outbound = tokio::select! {
            received = ws_receiver.next() => {
                let Some(Ok(message)) = received else {
                    break;
                };
                let raw = match message {
                    Message::Text(raw) => raw.to_string(),
                    Message::Binary(raw) => String::from_utf8(raw.to_vec()).unwrap_or_default(),
                    Message::Close(_) => break,
                    _ => continue,
                };
                handle_client_message(&mut session, &client_id, &raw)
            }
            _ = ticker.tick() => tick_session(&mut session),
        };

        if let Some(payload) = outbound {
            if ws_sender
                .send(Message::Text(payload.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    }

    info!("{client_id} disconnected");
}

fn handle_client_message(
    session: &mut Option<Session>,
    client_id: &str,
    raw: &str,
) -> Option<Value> {
    let Some(message) = parse_client_message(raw) else {
        return Some(error_payload("invalid message"));
    };

    match message {
        ParsedClientMessage::Start { game, seed } => {
            let seed = normalize_seed(seed);
            match Session::start(game, seed) {
                Ok(mut started) => {
                    info!("{client_id} started {} (seed {seed})", game.label());
                    let payload = started.render();
                    *session = Some(started);
                    Some(payload)
                }
                Err(err) => Some(error_payload(&err.to_string())),
            }
        }
        ParsedClientMessage::Input { dir } => match session.as_mut() {
            Some(Session::Chase(engine)) => {
                engine.move_player(dir);
                session.as_mut().map(Session::render)
            }
            Some(Session::Obstacle(_)) => Some(error_payload("obstacle game takes flap, not input")),
            None => Some(error_payload("send start first")),
        },
        ParsedClientMessage::Flap => match session.as_mut() {
            Some(Session::Obstacle(engine)) => {
                engine.flap();
                session.as_mut().map(Session::render)
            }
            Some(Session::Chase(_)) => Some(error_payload("chase games take input, not flap")),
            None => Some(error_payload("send start first")),
        },
        ParsedClientMessage::Restart => {
            let current = session.as_mut()?;
            match &mut *current {
                Session::Chase(engine) => {
                    engine.restart();
                }
                Session::Obstacle(engine) => {
                    engine.reset();
                }
            }
            debug!("{client_id} restarted {}", current.kind().label());
            Some(current.render())
        }
        ParsedClientMessage::Ping { t } => Some(json!({
            "type": "pong",
            "t": t,
        })),
    }
}

fn tick_session(session: &mut Option<Session>) -> Option<Value> {
    match session.as_mut()? {
        Session::Obstacle(engine) if engine.is_running() => {
            engine.advance_tick();
            session.as_mut().map(Session::render)
        }
        _ => None,
    }
}

fn error_payload(message: &str) -> Value {
    json!({
        "type": "error",
        "message": message,
    })
}

fn make_id(prefix: &str) -> String {
    let seq = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}_{seq}")
}
