use crate::command::MissionCommand;
use crate::selection::Selection;
use crate::transport::{MissionTransport, TransportError, WebSocketTransport};
use metrics::counter;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use synervol_core::{millis_since, now_epoch_millis, DispatchId, ErrorCode, SvError};
use tokio::task::JoinHandle;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Idle,
    Connecting,
    Open,
    Sent,
    Closed,
    Failed,
}

impl DispatchState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Sent => "sent",
            Self::Closed => "closed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }
}

impl fmt::Display for DispatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    pub dispatch_id: DispatchId,
    pub state: DispatchState,
    pub reached: DispatchState,
    pub error: Option<SvError>,
    pub elapsed_ms: u64,
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        self.state == DispatchState::Closed
    }
}

#[derive(Debug)]
pub struct DispatchHandle {
    dispatch_id: DispatchId,
    task: JoinHandle<DispatchOutcome>,
}

impl DispatchHandle {
    pub fn id(&self) -> DispatchId {
        self.dispatch_id
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    pub async fn outcome(self) -> DispatchOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(err) => DispatchOutcome {
                dispatch_id: self.dispatch_id,
                state: DispatchState::Failed,
                reached: DispatchState::Idle,
                error: Some(SvError::new(ErrorCode::Internal, err.to_string())),
                elapsed_ms: 0,
            },
        }
    }
}

pub struct MissionDispatcher {
    transport: Arc<dyn MissionTransport>,
    connect_timeout: Duration,
}

impl MissionDispatcher {
    pub fn new(transport: Arc<dyn MissionTransport>, connect_timeout: Duration) -> Self {
        Self {
            transport,
            connect_timeout,
        }
    }

    pub fn websocket(endpoint: impl Into<String>, connect_timeout: Duration) -> Self {
        Self::new(Arc::new(WebSocketTransport::new(endpoint)), connect_timeout)
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    /// Captures `selection` by value, spawns the attempt on the current tokio
    /// runtime and returns at once. A selection without a center is still
    /// sent, with `"coordinates": null`.
    pub fn dispatch(&self, selection: Selection) -> DispatchHandle {
        let dispatch_id = DispatchId::new();
        let command = MissionCommand::from_selection(&selection);
        if command.coordinates.is_none() {
            tracing::warn!(
                %dispatch_id,
                "dispatching mission without a selection center; coordinates will be null"
            );
        }
        let transport = Arc::clone(&self.transport);
        let connect_timeout = self.connect_timeout;
        let task = tokio::spawn(async move {
            run_dispatch(transport, dispatch_id, command, connect_timeout).await
        });
        DispatchHandle { dispatch_id, task }
    }
}

impl Default for MissionDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(WebSocketTransport::default()), DEFAULT_CONNECT_TIMEOUT)
    }
}

async fn run_dispatch(
    transport: Arc<dyn MissionTransport>,
    dispatch_id: DispatchId,
    command: MissionCommand,
    connect_timeout: Duration,
) -> DispatchOutcome {
    let started_at_ms = now_epoch_millis();
    let mut reached = DispatchState::Idle;
    let result = attempt(
        transport.as_ref(),
        dispatch_id,
        &command,
        connect_timeout,
        &mut reached,
    )
    .await;
    let elapsed_ms = millis_since(started_at_ms);

    match result {
        Ok(()) => {
            counter!("synervol_dispatch_total", "outcome" => "sent").increment(1);
            tracing::info!(
                %dispatch_id,
                endpoint = transport.endpoint(),
                scan_type = %command.scan_type,
                elapsed_ms,
                "mission dispatched"
            );
            DispatchOutcome {
                dispatch_id,
                state: DispatchState::Closed,
                reached,
                error: None,
                elapsed_ms,
            }
        }
        Err(err) => {
            counter!("synervol_dispatch_total", "outcome" => "failed").increment(1);
            tracing::warn!(
                %dispatch_id,
                endpoint = transport.endpoint(),
                reached = %reached,
                error = %err,
                "mission dispatch failed"
            );
            DispatchOutcome {
                dispatch_id,
                state: DispatchState::Failed,
                reached,
                error: Some(err),
                elapsed_ms,
            }
        }
    }
}

async fn attempt(
    transport: &dyn MissionTransport,
    dispatch_id: DispatchId,
    command: &MissionCommand,
    connect_timeout: Duration,
    reached: &mut DispatchState,
) -> Result<(), SvError> {
    let payload = command.encode()?;

    transition(dispatch_id, reached, DispatchState::Connecting);
    let mut connection = tokio::time::timeout(connect_timeout, transport.open())
        .await
        .map_err(|_| TransportError::Timeout(connect_timeout))??;
    transition(dispatch_id, reached, DispatchState::Open);

    connection.send_text(payload).await?;
    transition(dispatch_id, reached, DispatchState::Sent);

    // The message is already handed off; a failing close is not a failed dispatch.
    if let Err(err) = connection.close().await {
        tracing::debug!(%dispatch_id, error = %err, "close after send failed");
    }
    transition(dispatch_id, reached, DispatchState::Closed);
    Ok(())
}

fn transition(dispatch_id: DispatchId, reached: &mut DispatchState, next: DispatchState) {
    tracing::debug!(%dispatch_id, from = %reached, to = %next, "dispatch state");
    *reached = next;
}
