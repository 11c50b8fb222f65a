//! Axum web server with WebSocket streaming for the presentation layer.

use std::net::SocketAddr;

use algoscope_steps::{Algorithm, AlgorithmInfo, Step};
use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::playback::PlaybackStatus;

/// Visualization server.
pub struct VisServer {
    controller: Controller,
}

impl VisServer {
    pub fn new(controller: Controller) -> Self {
        Self { controller }
    }

    /// Build the router for the server.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/status", get(status_handler))
            .route("/api/step", get(step_handler))
            .route("/api/algorithms", get(algorithms_handler))
            .route("/api/playback/play", post(play_handler))
            .route("/api/playback/pause", post(pause_handler))
            .route("/api/playback/reset", post(reset_handler))
            .route("/api/settings/algorithm", post(algorithm_handler))
            .route("/api/settings/speed", post(speed_handler))
            .route("/api/settings/size", post(size_handler))
            .route("/api/settings/target", post(target_handler))
            .route("/api/input", post(input_handler))
            .route("/ws", get(ws_handler))
            .layer(CorsLayer::permissive())
            .with_state(self.controller.clone())
    }

    /// Bind `addr` and serve until the listener fails.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Algoscope server running on http://{}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NoIntegers(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Steps(_) | Error::Serialization(_) => StatusCode::BAD_REQUEST,
            Error::Config { .. } | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

async fn status_handler(State(controller): State<Controller>) -> Json<PlaybackStatus> {
    Json(controller.status().await)
}

async fn step_handler(State(controller): State<Controller>) -> Json<Step> {
    Json(controller.latest_step().await)
}

async fn algorithms_handler() -> Json<Vec<AlgorithmInfo>> {
    Json(Algorithm::ALL.iter().map(Algorithm::info).collect())
}

/// Start the paced loop in the background and report the status right away.
async fn play_handler(State(controller): State<Controller>) -> Json<PlaybackStatus> {
    spawn_play(&controller);
    Json(controller.status().await)
}

fn spawn_play(controller: &Controller) {
    let controller = controller.clone();
    tokio::spawn(async move {
        let outcome = controller.play().await;
        debug!(?outcome, "playback loop exited");
    });
}

async fn pause_handler(State(controller): State<Controller>) -> Json<PlaybackStatus> {
    controller.pause().await;
    Json(controller.status().await)
}

#[derive(Debug, Default, Deserialize)]
struct ResetRequest {
    #[serde(default)]
    array: Option<Vec<i64>>,
}

/// Reset to `{ "array": [...] }` when given, otherwise to a fresh array.
async fn reset_handler(State(controller): State<Controller>, body: Bytes) -> Result<Json<Step>> {
    let req: ResetRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ResetRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };
    Ok(Json(controller.reset(req.array).await))
}

#[derive(Deserialize)]
struct AlgorithmRequest {
    algorithm: String,
}

async fn algorithm_handler(
    State(controller): State<Controller>,
    Json(req): Json<AlgorithmRequest>,
) -> Result<Json<Step>> {
    let algorithm: Algorithm = req.algorithm.parse()?;
    Ok(Json(controller.set_algorithm(algorithm).await))
}

#[derive(Deserialize)]
struct SpeedRequest {
    speed: u8,
}

async fn speed_handler(
    State(controller): State<Controller>,
    Json(req): Json<SpeedRequest>,
) -> Json<PlaybackStatus> {
    controller.set_speed(req.speed).await;
    Json(controller.status().await)
}

#[derive(Deserialize)]
struct SizeRequest {
    size: usize,
}

async fn size_handler(
    State(controller): State<Controller>,
    Json(req): Json<SizeRequest>,
) -> Json<Step> {
    Json(controller.set_array_size(req.size).await)
}

#[derive(Deserialize)]
struct TargetRequest {
    target: String,
}

async fn target_handler(
    State(controller): State<Controller>,
    Json(req): Json<TargetRequest>,
) -> Json<PlaybackStatus> {
    controller.set_target(&req.target).await;
    Json(controller.status().await)
}

#[derive(Deserialize)]
struct InputRequest {
    text: String,
}

async fn input_handler(
    State(controller): State<Controller>,
    Json(req): Json<InputRequest>,
) -> Result<Json<Step>> {
    Ok(Json(controller.set_custom_input(&req.text).await?))
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(controller): State<Controller>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, controller))
}

async fn handle_ws(mut socket: WebSocket, controller: Controller) {
    // Subscribe before the snapshot so nothing published in between is lost.
    let mut events = controller.subscribe();
    info!("WebSocket client connected");

    let status = WsResponse::Status(controller.status().await);
    let step = WsResponse::LatestStep(controller.latest_step().await);
    for initial in [status, step] {
        if let Err(e) = send_json(&mut socket, &initial).await {
            warn!("Failed to send initial state: {}", e);
            return;
        }
    }

    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let cmd = match serde_json::from_str::<WsCommand>(text.as_str()) {
                            Ok(cmd) => cmd,
                            Err(e) => {
                                debug!("Ignoring WebSocket message: {}", e);
                                continue;
                            }
                        };
                        let response = handle_ws_command(&controller, cmd).await;
                        if let Err(e) = send_json(&mut socket, &response).await {
                            warn!("Failed to send response: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("WebSocket client disconnected");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    _ => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        if let Err(e) = send_json(&mut socket, &event).await {
                            warn!("Dropping WebSocket client: {}", e);
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "WebSocket client lagging; events dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }
}

/// Errors from either encoding or the socket itself.
#[derive(Debug, thiserror::Error)]
enum SendError {
    #[error(transparent)]
    Encode(#[from] Error),
    #[error(transparent)]
    Socket(#[from] axum::Error),
}

async fn send_json<T: Serialize>(
    socket: &mut WebSocket,
    value: &T,
) -> std::result::Result<(), SendError> {
    let json = encode(value)?;
    socket.send(Message::Text(json.into())).await?;
    Ok(())
}

fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsCommand {
    GetStatus,
    Play,
    Pause,
    Reset {
        #[serde(default)]
        array: Option<Vec<i64>>,
    },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WsResponse {
    Status(PlaybackStatus),
    /// The step on screen when the client connected
    LatestStep(Step),
}

async fn handle_ws_command(controller: &Controller, cmd: WsCommand) -> WsResponse {
    match cmd {
        WsCommand::GetStatus => {}
        WsCommand::Play => spawn_play(controller),
        WsCommand::Pause => {
            controller.pause().await;
        }
        WsCommand::Reset { array } => {
            controller.reset(array).await;
        }
    }
    WsResponse::Status(controller.status().await)
}
