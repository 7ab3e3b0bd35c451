//! Quiz lifecycle events.
//!
//! An explicit publish/subscribe service object, constructed once at
//! application start and passed by reference to consumers. The host UI
//! subscribes to drive toasts, progress displays, and animations without the
//! engine knowing about any of them.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum QuizEvent {
    #[serde(rename = "QUIZ_LOADED")]
    QuizLoaded {
        quiz_id: String,
        title: String,
        question_count: u32,
    },

    #[serde(rename = "SESSION_STARTED")]
    SessionStarted {
        quiz_id: String,
        question_count: u32,
    },

    #[serde(rename = "ANSWER_RECORDED")]
    AnswerRecorded {
        question_id: String,
        selected_option_id: Option<String>,
        is_correct: bool,
        time_taken: u32,
    },

    #[serde(rename = "QUESTION_ADVANCED")]
    QuestionAdvanced { index: u32 },

    #[serde(rename = "SESSION_ENDED")]
    SessionEnded {
        quiz_id: String,
        correct_answers: u32,
        total_questions: u32,
        total_time: u32,
    },

    #[serde(rename = "SESSION_RESET")]
    SessionReset { quiz_id: String },
}

impl QuizEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            QuizEvent::QuizLoaded { .. } => "QUIZ_LOADED",
            QuizEvent::SessionStarted { .. } => "SESSION_STARTED",
            QuizEvent::AnswerRecorded { .. } => "ANSWER_RECORDED",
            QuizEvent::QuestionAdvanced { .. } => "QUESTION_ADVANCED",
            QuizEvent::SessionEnded { .. } => "SESSION_ENDED",
            QuizEvent::SessionReset { .. } => "SESSION_RESET",
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub id: String,
    pub event: QuizEvent,
    pub created_at: DateTime<Utc>,
}

impl EventEnvelope {
    fn new(event: QuizEvent) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            event,
            created_at: Utc::now(),
        }
    }
}

pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
    event_count: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            sender,
            event_count: AtomicU64::new(0),
        }
    }

    /// Publish never blocks; an event with no subscribers is dropped.
    pub fn publish(&self, event: QuizEvent) {
        self.event_count.fetch_add(1, Ordering::Relaxed);
        let envelope = EventEnvelope::new(event);
        let event_type = envelope.event.event_type();
        match self.sender.send(envelope) {
            Ok(delivered) => {
                debug!(event_type, delivered, "event published");
            }
            Err(_) => {
                debug!(event_type, "no subscribers for event");
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn event_count(&self) -> u64 {
        self.event_count.load(Ordering::Relaxed)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
