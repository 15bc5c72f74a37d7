//! Dialogue history: a short in-memory window plus an append-only JSONL file.
use std::{
    collections::VecDeque,
    fs::{create_dir_all, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use bevy::prelude::*;
use serde::Serialize;

use crate::{npc::components::CharacterId, world::time::WorldClock};

use super::{
    errors::{DialogueError, DialogueErrorKind},
    events::{DialogueRequestFailedEvent, DialogueResponseEvent},
    status::{DialogueBrokerStatus, DialogueConnectionState},
    types::DialogueResponse,
};

const DEFAULT_LOG_PATH: &str = "logs/dialogue_history.jsonl";
const DEFAULT_CAPACITY: usize = 64;

/// Rolling history of dialogue outcomes, newest last.
#[derive(Resource, Debug)]
pub struct DialogueTelemetry {
    capacity: usize,
    records: VecDeque<DialogueTelemetryRecord>,
}

impl DialogueTelemetry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    pub fn push(&mut self, record: DialogueTelemetryRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn records(&self) -> impl Iterator<Item = &DialogueTelemetryRecord> {
        self.records.iter()
    }

    pub fn latest_response(&self) -> Option<&DialogueResponse> {
        self.records.iter().rev().find_map(|record| match &record.event {
            DialogueTelemetryEvent::Response(response) => Some(response),
            _ => None,
        })
    }
}

impl Default for DialogueTelemetry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[derive(Debug, Clone)]
pub struct DialogueTelemetryRecord {
    /// Real seconds since start-up.
    pub occurred_at_seconds: f64,
    /// In-game stamp such as "day 2, 09:15", when a clock exists.
    pub world_time: Option<String>,
    pub event: DialogueTelemetryEvent,
}

impl DialogueTelemetryRecord {
    pub fn new(occurred_at_seconds: f64, event: DialogueTelemetryEvent) -> Self {
        Self {
            occurred_at_seconds,
            world_time: None,
            event,
        }
    }

    pub fn at_world_time(mut self, clock: Option<&WorldClock>) -> Self {
        self.world_time = clock.map(WorldClock::stamp);
        self
    }

    /// One line of the JSONL history, without the trailing newline.
    pub fn to_json_line(&self) -> serde_json::Result<String> {
        serde_json::to_string(&TelemetryLine::from(self))
    }
}

#[derive(Debug, Clone)]
pub enum DialogueTelemetryEvent {
    SessionStarted(DialogueBrokerStatus),
    Response(DialogueResponse),
    Failure {
        speaker: CharacterId,
        error: DialogueError,
    },
}

pub fn record_dialogue_telemetry(
    time: Res<Time<Real>>,
    clock: Option<Res<WorldClock>>,
    mut telemetry: ResMut<DialogueTelemetry>,
    mut log: ResMut<DialogueTelemetryLog>,
    mut responses: MessageReader<DialogueResponseEvent>,
    mut failures: MessageReader<DialogueRequestFailedEvent>,
) {
    let now = time.elapsed_secs_f64();
    let clock = clock.as_deref();

    let events = responses
        .read()
        .map(|event| DialogueTelemetryEvent::Response(event.response.clone()))
        .chain(failures.read().map(|event| DialogueTelemetryEvent::Failure {
            speaker: event.speaker,
            error: event.error.clone(),
        }));

    for event in events {
        let record = DialogueTelemetryRecord::new(now, event).at_world_time(clock);
        log.push(&record);
        telemetry.push(record);
    }
}

pub fn record_dialogue_session_start(
    status: Res<DialogueBrokerStatus>,
    mut log: ResMut<DialogueTelemetryLog>,
) {
    log.push(&DialogueTelemetryRecord::new(
        0.0,
        DialogueTelemetryEvent::SessionStarted(status.clone()),
    ));
}

/// Serialized lines waiting to be appended to the history file.
#[derive(Resource, Debug)]
pub struct DialogueTelemetryLog {
    output_path: PathBuf,
    pending: Vec<String>,
}

impl DialogueTelemetryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: path.into(),
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, record: &DialogueTelemetryRecord) {
        match record.to_json_line() {
            Ok(line) => self.pending.push(line),
            Err(err) => warn!(target: "dialogue", "Skipping telemetry record: {}", err),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.output_path.parent() {
            create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_path)?;
        for line in self.pending.drain(..) {
            writeln!(file, "{}", line)?;
        }
        file.flush()
    }

    pub fn path(&self) -> &Path {
        &self.output_path
    }
}

impl Default for DialogueTelemetryLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

pub fn flush_dialogue_telemetry_log(mut log: ResMut<DialogueTelemetryLog>) {
    if let Err(err) = log.flush() {
        warn!(
            "Failed to persist dialogue telemetry to {}: {}",
            log.path().display(),
            err
        );
    }
}

#[derive(Serialize)]
struct TelemetryLine {
    occurred_at_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    world_time: Option<String>,
    event: TelemetryEventLine,
}

impl From<&DialogueTelemetryRecord> for TelemetryLine {
    fn from(record: &DialogueTelemetryRecord) -> Self {
        Self {
            occurred_at_seconds: record.occurred_at_seconds,
            world_time: record.world_time.clone(),
            event: TelemetryEventLine::from(&record.event),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
enum TelemetryEventLine {
    SessionStarted {
        provider: String,
        connection_state: DialogueConnectionState,
        detail: String,
    },
    Response {
        request_id: u64,
        provider: String,
        topic: &'static str,
        speaker: String,
        target: Option<String>,
        content: String,
    },
    Failure {
        request_id: u64,
        provider: String,
        speaker: String,
        error: ErrorLine,
    },
}

impl From<&DialogueTelemetryEvent> for TelemetryEventLine {
    fn from(event: &DialogueTelemetryEvent) -> Self {
        match event {
            DialogueTelemetryEvent::SessionStarted(status) => Self::SessionStarted {
                provider: status.provider().to_string(),
                connection_state: status.connection_state(),
                detail: status.detail().to_string(),
            },
            DialogueTelemetryEvent::Response(response) => Self::Response {
                request_id: response.request_id.value(),
                provider: response.provider.to_string(),
                topic: response.topic_hint.label(),
                speaker: response.speaker.to_string(),
                target: response.target.map(|id| id.to_string()),
                content: response.content.clone(),
            },
            DialogueTelemetryEvent::Failure { speaker, error } => Self::Failure {
                request_id: error.request_id.value(),
                provider: error.provider.to_string(),
                speaker: speaker.to_string(),
                error: ErrorLine::from(&error.kind),
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorLine {
    error_kind: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after_seconds: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<&'static str>,
}

impl From<&DialogueErrorKind> for ErrorLine {
    fn from(kind: &DialogueErrorKind) -> Self {
        let (retry_after_seconds, missing) = match kind {
            DialogueErrorKind::RateLimited {
                retry_after_seconds,
            } => (Some(*retry_after_seconds), None),
            DialogueErrorKind::ContextMissing { missing } => (None, Some(missing.label())),
            DialogueErrorKind::ProviderFailure { .. } => (None, None),
        };
        Self {
            error_kind: kind.code(),
            message: kind.to_string(),
            retry_after_seconds,
            missing,
        }
    }
}
