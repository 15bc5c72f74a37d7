//! Systems driving the dialogue queue: dispatch to the task pool and collect results.
use std::sync::Arc;

use bevy::{
    prelude::*,
    tasks::{block_on, futures_lite::future, AsyncComputeTaskPool, Task},
};

use super::{
    broker::DialogueBroker,
    errors::DialogueError,
    events::{DialogueRequestFailedEvent, DialogueResponseEvent},
    queue::{DialogueRequestQueue, QueuedDialogueRequest},
    types::DialogueResponse,
};

/// The broker every request is routed to.
#[derive(Resource, Clone)]
pub struct ActiveDialogueBroker(pub Arc<dyn DialogueBroker>);

impl ActiveDialogueBroker {
    pub fn new(broker: Box<dyn DialogueBroker>) -> Self {
        Self(Arc::from(broker))
    }
}

struct InFlightDialogue {
    queued: QueuedDialogueRequest,
    task: Task<Result<DialogueResponse, DialogueError>>,
}

/// Requests currently being processed on the async compute pool.
#[derive(Resource, Default)]
pub struct DialogueTasks {
    running: Vec<InFlightDialogue>,
}

pub fn advance_dialogue_queue(time: Res<Time<Real>>, mut queue: ResMut<DialogueRequestQueue>) {
    queue.tick(time.delta_secs());
}

/// Moves ready requests onto the async compute pool; brokers may block on HTTP.
pub fn dispatch_dialogue_requests(
    mut queue: ResMut<DialogueRequestQueue>,
    broker: Res<ActiveDialogueBroker>,
    mut tasks: ResMut<DialogueTasks>,
) {
    let limit = queue.config().max_dispatches_per_tick;
    let ready = queue.take_ready(limit);
    if ready.is_empty() {
        return;
    }

    let pool = AsyncComputeTaskPool::get();
    for queued in ready {
        debug!(
            target: "dialogue",
            "Dispatching request {} ({} from {}) to {}",
            queued.id,
            queued.request.topic_hint.label(),
            queued.request.speaker,
            broker.0.provider_kind()
        );
        let broker = Arc::clone(&broker.0);
        let id = queued.id;
        let request = queued.request.clone();
        let task = pool.spawn(async move { broker.process(id, &request) });
        tasks.running.push(InFlightDialogue { queued, task });
    }
}

/// Collects finished tasks, emitting responses, retries or failures.
pub fn poll_dialogue_tasks(
    mut queue: ResMut<DialogueRequestQueue>,
    mut tasks: ResMut<DialogueTasks>,
    mut responses: MessageWriter<DialogueResponseEvent>,
    mut failures: MessageWriter<DialogueRequestFailedEvent>,
) {
    let mut still_running = Vec::with_capacity(tasks.running.len());
    for mut in_flight in tasks.running.drain(..) {
        let Some(result) = block_on(future::poll_once(&mut in_flight.task)) else {
            still_running.push(in_flight);
            continue;
        };

        let speaker = in_flight.queued.request.speaker;
        queue.complete(speaker);

        match result {
            Ok(response) => {
                info!(
                    target: "dialogue",
                    "{} says: {}",
                    response.speaker, response.content
                );
                responses.write(DialogueResponseEvent { response });
            }
            Err(error) => {
                if let Some(delay) = error.retry_delay() {
                    if queue.retry_later(in_flight.queued, delay) {
                        debug!(
                            target: "dialogue",
                            "{}; retrying in {:.1}s",
                            error,
                            delay.as_secs_f32()
                        );
                        continue;
                    }
                }
                warn!(target: "dialogue", "{}", error);
                failures.write(DialogueRequestFailedEvent { speaker, error });
            }
        }
    }
    tasks.running = still_running;
}
