use axum::{
  extract::{Path, Query, State, WebSocketUpgrade},
  http::{Method, StatusCode},
  response::IntoResponse,
  routing::{get, post},
  Json, Router,
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use snake_arena::config::ServerConfig;
use snake_arena::game::room::{DebugKillTarget, Room};
use snake_arena::shared::names::sanitize_session_name;
use snake_arena::transport::ws_session::handle_socket;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

const DEFAULT_SESSION: &str = "main";

struct AppState {
  rooms: DashMap<String, Arc<Room>>,
  config: ServerConfig,
}

#[derive(Debug, Serialize)]
struct OkResponse {
  ok: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
  ok: bool,
  error: String,
}

#[derive(Debug, Serialize)]
struct DebugKillResponse {
  ok: bool,
  killed: String,
}

#[derive(Debug, Deserialize)]
struct DebugKillQuery {
  session: Option<String>,
  target: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = ServerConfig::load_or_default();
  let port = config.port;
  let debug_commands = config.debug_commands;
  tracing::info!(?config, "configuration loaded");

  let state = Arc::new(AppState {
    rooms: DashMap::new(),
    config,
  });

  let cors = CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([Method::GET, Method::POST])
    .allow_headers(Any);

  let mut app: Router<Arc<AppState>> = Router::new()
    .route("/api/health", get(health))
    .route("/api/session/:session", get(ws_handler))
    .route("/api/session/:session/stats", get(session_stats));

  if debug_commands {
    app = app.route("/api/debug/kill", post(debug_kill));
  }

  let app: Router = app.layer(cors).with_state(state);

  let address = format!("0.0.0.0:{port}");
  tracing::info!("listening on {address}");

  let listener = tokio::net::TcpListener::bind(&address).await?;
  axum::serve(listener, app).await?;

  Ok(())
}

impl AppState {
  fn room(&self, name: String) -> Arc<Room> {
    match self.rooms.entry(name) {
      dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
      dashmap::mapref::entry::Entry::Vacant(entry) => {
        let room = Arc::new(Room::new(entry.key().clone(), &self.config));
        entry.insert(room.clone());
        room
      }
    }
  }

  fn existing_room(&self, name: &str) -> Option<Arc<Room>> {
    self.rooms.get(name).map(|entry| entry.value().clone())
  }
}

async fn health() -> impl IntoResponse {
  Json(OkResponse { ok: true })
}

async fn ws_handler(
  ws: WebSocketUpgrade,
  Path(session): Path<String>,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let room = state.room(sanitize_session_name(&session, DEFAULT_SESSION));
  ws.on_upgrade(move |socket| handle_socket(socket, room))
}

async fn session_stats(
  Path(session): Path<String>,
  State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
  let name = sanitize_session_name(&session, DEFAULT_SESSION);
  let Some(room) = state.existing_room(&name) else {
    return (
      StatusCode::NOT_FOUND,
      Json(ErrorResponse {
        ok: false,
        error: "Unknown session".to_string(),
      }),
    )
      .into_response();
  };
  Json(room.stats().await).into_response()
}

async fn debug_kill(
  State(state): State<Arc<AppState>>,
  Query(params): Query<DebugKillQuery>,
) -> impl IntoResponse {
  if !state.config.debug_commands {
    return (
      StatusCode::FORBIDDEN,
      Json(ErrorResponse {
        ok: false,
        error: "Debug commands disabled".to_string(),
      }),
    )
      .into_response();
  }

  let name = sanitize_session_name(params.session.as_deref().unwrap_or(DEFAULT_SESSION), DEFAULT_SESSION);
  let target = match params.target.as_deref() {
    Some("agent") => DebugKillTarget::Agent,
    Some("player") => DebugKillTarget::Player,
    _ => DebugKillTarget::Any,
  };
  let killed = match state.existing_room(&name) {
    Some(room) => room.debug_kill(target).await,
    None => None,
  };

  match killed {
    Some(killed) => Json(DebugKillResponse { ok: true, killed }).into_response(),
    None => (
      StatusCode::NOT_FOUND,
      Json(ErrorResponse {
        ok: false,
        error: "Nothing matching to kill".to_string(),
      }),
    )
      .into_response(),
  }
}
