use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State as AxumState,
    },
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use groupclick_execution::{
    load_groups, load_player, load_rates,
    state_transition::{execute_instruction, join_session, leave_session},
    Memory, Store, StoreError,
};
use groupclick_types::{
    api::{ServerMessage, Summary},
    economy::{CLICK_INTERVAL_MS, ERROR_MALFORMED_COMMAND, ERROR_RATE_LIMITED},
    Instruction, SessionId, Snapshot,
};
use serde::Serialize;
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tokio::{sync::broadcast, task::JoinHandle};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};

pub mod config;

/// Runtime knobs of a [Hub] and its [Api].
#[derive(Clone, Debug)]
pub struct Settings {
    pub latency: Duration,
    /// `None` disables the per-session click limit.
    pub click_interval: Option<Duration>,
    pub broadcast_capacity: usize,
    pub http_replenish: Duration,
    pub http_burst: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latency: Duration::ZERO,
            click_interval: Some(Duration::from_millis(CLICK_INTERVAL_MS)),
            broadcast_capacity: 1024,
            http_replenish: Duration::from_millis(10),
            http_burst: 200,
        }
    }
}

/// The one shared economy plus the channel every session listens on.
pub struct Hub {
    state: Mutex<Memory>,
    update_tx: broadcast::Sender<ServerMessage>,
    settings: Settings,
}

impl Hub {
    /// Start an economy, restoring groups and rates from `snapshot` if given.
    /// Players in the snapshot are dropped: their sessions are gone.
    pub fn new(settings: Settings, snapshot: Option<Snapshot>) -> Self {
        let (update_tx, _) = broadcast::channel(settings.broadcast_capacity);
        let state = match snapshot {
            Some(snapshot) => Memory::from_snapshot(snapshot.shared_only()),
            None => Memory::default(),
        };

        Self {
            state: Mutex::new(state),
            update_tx,
            settings,
        }
    }

    fn state(&self) -> MutexGuard<'_, Memory> {
        self.state.lock().unwrap_or_else(|poisoned| {
            tracing::error!("economy lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Open a session: a fresh player and the state it starts from.
    pub fn join(&self) -> Option<(SessionId, ServerMessage)> {
        let session = SessionId::random();
        let mut state = self.state();
        if let Err(e) = join_session(&mut *state, session) {
            tracing::error!("Failed to join session {}: {}", session, e);
            return None;
        }
        let initial = ServerMessage::InitialState {
            groups: load_groups(&*state),
            rates: load_rates(&*state),
            player: load_player(&*state, &session).unwrap_or_default(),
        };
        Some((session, initial))
    }

    pub fn leave(&self, session: SessionId) {
        let mut state = self.state();
        if let Err(e) = leave_session(&mut *state, session) {
            tracing::warn!("Failed to remove session {}: {}", session, e);
        }
    }

    /// Apply one command and build the reply for its sender. Clicks and trades
    /// are also broadcast to every session as a `stateUpdate`.
    pub fn submit(&self, session: SessionId, instruction: &Instruction) -> ServerMessage {
        let mut state = self.state();
        let events = match execute_instruction(&mut *state, session, instruction) {
            Ok(events) => events,
            Err(e) => {
                tracing::debug!(%session, instruction = instruction.name(), "rejected: {}", e);
                return ServerMessage::error(e.to_string());
            }
        };
        let groups = load_groups(&*state);
        let rates = load_rates(&*state);
        let player = load_player(&*state, &session).unwrap_or_default();
        drop(state); // Release lock before broadcasting

        for event in &events {
            tracing::debug!(?event, "applied");
        }
        if matches!(instruction, Instruction::Click | Instruction::Trade { .. }) {
            let update = ServerMessage::StateUpdate {
                groups,
                rates,
                player_id: session,
                player: player.clone(),
            };
            if let Err(e) = self.update_tx.send(update) {
                tracing::debug!("Failed to broadcast state update (no subscribers): {}", e);
            }
        }

        ServerMessage::Result {
            groups,
            rates,
            player,
        }
    }

    pub fn summary(&self) -> Summary {
        let state = self.state();
        Summary {
            groups: load_groups(&*state),
            rates: load_rates(&*state),
            players: state.players(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state().snapshot()
    }

    /// Persist groups and rates. Players are left out since a restore drops
    /// them, which also keeps the file under the decoder's player cap.
    pub fn save<S: Store>(&self, store: &S) -> Result<(), StoreError> {
        let snapshot = self.snapshot().shared_only();
        store.save(&snapshot)
    }

    pub fn update_subscriber(&self) -> broadcast::Receiver<ServerMessage> {
        self.update_tx.subscribe()
    }

    /// A fresh click limiter for one session, if clicks are limited.
    pub fn click_limiter(&self) -> Option<DefaultDirectRateLimiter> {
        let interval = self.settings.click_interval?;
        Quota::with_period(interval).map(RateLimiter::direct)
    }
}

/// Save the hub's snapshot to `store` every `every`, until aborted.
pub fn spawn_snapshots<S>(hub: Arc<Hub>, store: Arc<S>, every: Duration) -> JoinHandle<()>
where
    S: Store + Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = hub.save(store.as_ref()) {
                tracing::warn!("Failed to save snapshot: {}", e);
            }
        }
    })
}

pub struct Api {
    hub: Arc<Hub>,
}

impl Api {
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    pub fn router(&self) -> Router {
        // Configure CORS
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]);

        let router = Router::new()
            .route("/play", get(play_ws))
            .route("/state", get(query_state))
            .route("/health", get(health))
            .layer(cors);

        // Configure Rate Limiting
        let settings = self.hub.settings();
        let replenish_ms = u64::try_from(settings.http_replenish.as_millis()).unwrap_or(u64::MAX);
        let router = match GovernorConfigBuilder::default()
            .per_millisecond(replenish_ms.max(1))
            .burst_size(settings.http_burst.max(1))
            .key_extractor(SmartIpKeyExtractor)
            .finish()
        {
            Some(config) => router.layer(GovernorLayer {
                config: Arc::new(config),
            }),
            None => {
                tracing::warn!("Invalid HTTP rate limit, serving without one");
                router
            }
        };

        router.with_state(self.hub.clone())
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn query_state(AxumState(hub): AxumState<Arc<Hub>>) -> impl IntoResponse {
    Json(hub.summary())
}

async fn play_ws(AxumState(hub): AxumState<Arc<Hub>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_play_ws(socket, hub))
}

fn encode_message<T: Serialize>(message: &T) -> Result<Message, axum::Error> {
    let text = serde_json::to_string(message).map_err(|e| {
        tracing::error!("Failed to encode server message: {}", e);
        axum::Error::new(e)
    })?;
    Ok(Message::Text(text))
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> Result<(), axum::Error> {
    let message = encode_message(message)?;
    sender.send(message).await
}

/// Turn one text frame into a reply: parse, rate limit clicks, wait out the
/// configured latency, then apply.
async fn handle_command(
    hub: &Hub,
    session: SessionId,
    limiter: Option<&DefaultDirectRateLimiter>,
    text: &str,
) -> ServerMessage {
    let instruction: Instruction = match serde_json::from_str(text) {
        Ok(instruction) => instruction,
        Err(e) => {
            tracing::warn!(%session, "Malformed command: {}", e);
            return ServerMessage::error(ERROR_MALFORMED_COMMAND);
        }
    };
    if matches!(instruction, Instruction::Click) {
        if let Some(limiter) = limiter {
            if limiter.check().is_err() {
                return ServerMessage::error(ERROR_RATE_LIMITED);
            }
        }
    }
    let latency = hub.settings().latency;
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
    hub.submit(session, &instruction)
}

async fn handle_play_ws(socket: WebSocket, hub: Arc<Hub>) {
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before joining so no update after our initial state is missed
    let mut updates = hub.update_subscriber();
    let Some((session, initial)) = hub.join() else {
        let _ = sender.close().await;
        return;
    };
    tracing::info!(%session, "Player connected");
    let limiter = hub.click_limiter();

    if send_message(&mut sender, &initial).await.is_err() {
        tracing::warn!(%session, "Failed to send initial state, client disconnected");
        hub.leave(session);
        return;
    }

    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_command(&hub, session, limiter.as_ref(), &text).await;
                        if send_message(&mut sender, &reply).await.is_err() {
                            tracing::warn!(%session, "Failed to send reply, client disconnected");
                            break;
                        }
                    }
                    Some(Ok(Message::Binary(_))) => {
                        tracing::warn!(%session, "Binary frames are not supported");
                        let reply = ServerMessage::error(ERROR_MALFORMED_COMMAND);
                        if send_message(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!(%session, "Client closed WebSocket connection");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            tracing::warn!(%session, "Failed to send pong, client disconnected");
                            break;
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Err(e)) => {
                        tracing::warn!(%session, "WebSocket error: {:?}", e);
                        break;
                    }
                    None => {
                        tracing::info!(%session, "WebSocket stream ended");
                        break;
                    }
                }
            }
            update = updates.recv() => {
                match update {
                    Ok(update) => {
                        if send_message(&mut sender, &update).await.is_err() {
                            tracing::warn!(%session, "Failed to send update, client disconnected");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(
                            %session,
                            "WebSocket client lagged behind, skipped {} updates",
                            skipped
                        );
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Broadcast channel closed");
                        break;
                    }
                }
            }
        }
    }

    hub.leave(session);
    tracing::info!(%session, "Player disconnected");
    let _ = sender.close().await;
}

#[cfg(test)]
mod tests;
