use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::Event;

/// Envelope pushed to observers: `{event_id, event_type, payload, timestamp}`.
///
/// `timestamp` is the business time of the wrapped event, not the time of
/// delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    event_type: String,
    payload: E,
    timestamp: DateTime<Utc>,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: Uuid,
        event_type: impl Into<String>,
        payload: E,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            event_id,
            event_type: event_type.into(),
            payload,
            timestamp,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a typed event, taking type and timestamp from its metadata.
    pub fn wrap(event: E) -> Self {
        let event_type = event.event_type();
        let timestamp = event.occurred_at();
        Self::new(Uuid::now_v7(), event_type, event, timestamp)
    }
}
