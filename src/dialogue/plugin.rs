//! Dialogue plugin wiring broker selection, the request queue and telemetry.
use std::time::Duration;

use bevy::{prelude::*, time::common_conditions::on_timer};

use super::{
    broker::select_broker,
    events::{DialogueRequestFailedEvent, DialogueResponseEvent},
    queue::DialogueRequestQueue,
    systems::{
        advance_dialogue_queue, dispatch_dialogue_requests, poll_dialogue_tasks,
        ActiveDialogueBroker, DialogueTasks,
    },
    telemetry::{
        flush_dialogue_telemetry_log, record_dialogue_session_start, record_dialogue_telemetry,
        DialogueTelemetry, DialogueTelemetryLog,
    },
};

const TELEMETRY_FLUSH_INTERVAL: Duration = Duration::from_secs(3);

/// Ordering of the dialogue pipeline inside `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogueSet {
    /// Systems that enqueue requests.
    Request,
    Dispatch,
    /// Systems reacting to responses and failures.
    React,
}

pub struct DialoguePlugin;

impl Plugin for DialoguePlugin {
    fn build(&self, app: &mut App) {
        let (broker, status) = select_broker();
        info!("DialoguePlugin initialised with provider: {}", status);

        app.insert_resource(ActiveDialogueBroker::new(broker))
            .insert_resource(status)
            .init_resource::<DialogueRequestQueue>()
            .init_resource::<DialogueTasks>()
            .init_resource::<DialogueTelemetry>()
            .init_resource::<DialogueTelemetryLog>()
            .add_message::<DialogueResponseEvent>()
            .add_message::<DialogueRequestFailedEvent>()
            .configure_sets(
                Update,
                (DialogueSet::Request, DialogueSet::Dispatch, DialogueSet::React).chain(),
            )
            .add_systems(Startup, record_dialogue_session_start)
            .add_systems(
                Update,
                (
                    advance_dialogue_queue,
                    dispatch_dialogue_requests,
                    poll_dialogue_tasks,
                )
                    .chain()
                    .in_set(DialogueSet::Dispatch),
            )
            .add_systems(
                Update,
                (
                    record_dialogue_telemetry.in_set(DialogueSet::React),
                    flush_dialogue_telemetry_log
                        .after(record_dialogue_telemetry)
                        .run_if(on_timer(TELEMETRY_FLUSH_INTERVAL)),
                ),
            )
            .add_systems(Last, flush_on_exit);
    }
}

fn flush_on_exit(exit: MessageReader<AppExit>, mut log: ResMut<DialogueTelemetryLog>) {
    if exit.is_empty() {
        return;
    }
    if let Err(err) = log.flush() {
        warn!("Failed to persist dialogue telemetry on exit: {}", err);
    }
}
