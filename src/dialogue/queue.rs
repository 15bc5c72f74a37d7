//! Dialogue request queue and rate-limiting logic.
use std::{
    collections::{HashMap, VecDeque},
    time::Duration,
};

use bevy::prelude::*;

use crate::npc::components::CharacterId;

use super::types::{DialogueRequest, DialogueRequestId};

/// A request waiting in (or dispatched from) the queue.
#[derive(Debug, Clone)]
pub struct QueuedDialogueRequest {
    pub id: DialogueRequestId,
    pub request: DialogueRequest,
    pub retries: u8,
}

#[derive(Debug, Clone, Copy)]
pub struct DialogueQueueConfig {
    pub global_cooldown_secs: f32,
    pub per_speaker_cooldown_secs: f32,
    pub max_retries: u8,
    pub max_dispatches_per_tick: usize,
    pub max_in_flight: usize,
}

impl Default for DialogueQueueConfig {
    fn default() -> Self {
        Self {
            global_cooldown_secs: 0.5,
            per_speaker_cooldown_secs: 2.0,
            max_retries: 3,
            max_dispatches_per_tick: 2,
            max_in_flight: 3,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct DialogueQueueMetrics {
    pub enqueued: u64,
    pub dispatched: u64,
    pub completed: u64,
    pub retries_scheduled: u64,
    pub dropped: u64,
}

#[derive(Debug)]
struct CooldownTracker {
    remaining: f32,
}

impl CooldownTracker {
    fn ready() -> Self {
        Self { remaining: 0.0 }
    }

    fn tick(&mut self, delta_seconds: f32) {
        self.remaining = (self.remaining - delta_seconds).max(0.0);
    }

    fn is_ready(&self) -> bool {
        self.remaining <= f32::EPSILON
    }

    fn trigger(&mut self, cooldown: f32) {
        self.remaining = cooldown.max(0.0);
    }
}

#[derive(Debug)]
struct RetryEntry {
    queued: QueuedDialogueRequest,
    remaining: f32,
}

#[derive(Resource)]
pub struct DialogueRequestQueue {
    pending: VecDeque<QueuedDialogueRequest>,
    delayed: Vec<RetryEntry>,
    speaker_cooldowns: HashMap<CharacterId, CooldownTracker>,
    global_cooldown: CooldownTracker,
    in_flight: usize,
    config: DialogueQueueConfig,
    metrics: DialogueQueueMetrics,
    next_id: u64,
}

impl Default for DialogueRequestQueue {
    fn default() -> Self {
        Self::new(DialogueQueueConfig::default())
    }
}

impl DialogueRequestQueue {
    pub fn new(config: DialogueQueueConfig) -> Self {
        Self {
            pending: VecDeque::new(),
            delayed: Vec::new(),
            speaker_cooldowns: HashMap::new(),
            global_cooldown: CooldownTracker::ready(),
            in_flight: 0,
            config,
            metrics: DialogueQueueMetrics::default(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> DialogueQueueConfig {
        self.config
    }

    pub fn metrics(&self) -> &DialogueQueueMetrics {
        &self.metrics
    }

    pub fn queue_depth(&self) -> usize {
        self.pending.len() + self.delayed.len()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// True when the speaker already has a request waiting to be dispatched.
    pub fn has_pending_for(&self, speaker: CharacterId) -> bool {
        self.pending
            .iter()
            .chain(self.delayed.iter().map(|entry| &entry.queued))
            .any(|queued| queued.request.speaker == speaker)
    }

    pub fn enqueue(&mut self, request: DialogueRequest) -> DialogueRequestId {
        let id = DialogueRequestId::new(self.next_id);
        self.next_id += 1;
        debug!(
            target: "dialogue",
            "Queued {} request {} from {}; depth={}",
            request.topic_hint.label(),
            id,
            request.speaker,
            self.queue_depth() + 1
        );
        self.pending.push_back(QueuedDialogueRequest {
            id,
            request,
            retries: 0,
        });
        self.metrics.enqueued += 1;
        id
    }

    /// Pops up to `limit` requests whose cooldowns allow dispatch.
    pub fn take_ready(&mut self, limit: usize) -> Vec<QueuedDialogueRequest> {
        let limit = limit.min(self.config.max_in_flight.saturating_sub(self.in_flight));
        let mut ready = Vec::new();

        while ready.len() < limit && self.global_cooldown.is_ready() {
            let Some(index) = self
                .pending
                .iter()
                .position(|queued| self.speaker_ready(queued.request.speaker))
            else {
                break;
            };
            let Some(queued) = self.pending.remove(index) else {
                break;
            };

            self.global_cooldown
                .trigger(self.config.global_cooldown_secs);
            self.speaker_cooldowns
                .entry(queued.request.speaker)
                .or_insert_with(CooldownTracker::ready)
                .trigger(self.config.per_speaker_cooldown_secs);
            self.in_flight += 1;
            self.metrics.dispatched += 1;
            ready.push(queued);
        }

        ready
    }

    /// Marks a dispatched request as finished, whatever its outcome.
    pub fn complete(&mut self, speaker: CharacterId) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.metrics.completed += 1;
        if let Some(tracker) = self.speaker_cooldowns.get_mut(&speaker) {
            tracker.trigger(self.config.per_speaker_cooldown_secs);
        }
    }

    /// Puts a request back after `delay`. Returns false when it exceeded
    /// `max_retries` and was dropped instead.
    pub fn retry_later(&mut self, mut queued: QueuedDialogueRequest, delay: Duration) -> bool {
        if queued.retries >= self.config.max_retries {
            self.metrics.dropped += 1;
            warn!(
                target: "dialogue",
                "Dropping request {} after exhausting retries (max_retries={}); depth={}",
                queued.id,
                self.config.max_retries,
                self.queue_depth()
            );
            return false;
        }

        queued.retries = queued.retries.saturating_add(1);
        self.metrics.retries_scheduled += 1;
        if delay.is_zero() {
            self.pending.push_back(queued);
        } else {
            self.delayed.push(RetryEntry {
                queued,
                remaining: delay.as_secs_f32(),
            });
        }
        true
    }

    pub fn tick(&mut self, delta_seconds: f32) {
        self.global_cooldown.tick(delta_seconds);
        for tracker in self.speaker_cooldowns.values_mut() {
            tracker.tick(delta_seconds);
        }

        let mut still_delayed = Vec::with_capacity(self.delayed.len());
        for mut entry in self.delayed.drain(..) {
            entry.remaining = (entry.remaining - delta_seconds).max(0.0);
            if entry.remaining <= f32::EPSILON {
                self.pending.push_back(entry.queued);
            } else {
                still_delayed.push(entry);
            }
        }
        self.delayed = still_delayed;
    }

    fn speaker_ready(&self, speaker: CharacterId) -> bool {
        self.speaker_cooldowns
            .get(&speaker)
            .map(|tracker| tracker.is_ready())
            .unwrap_or(true)
    }
}
