//! Live scan feed over Server-Sent Events.

use std::convert::Infallible;
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::{Duration, Instant};

use axum::{
    extract::Extension,
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse,
    },
    routing::get,
    Router,
};
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;

use stockmaster_events::EventBus;

use crate::app::services::AppServices;

const POLL_INTERVAL: Duration = Duration::from_millis(1000);
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(15);

pub fn router() -> Router {
    Router::new().route("/scans", get(stream_scans))
}

/// GET /stream/scans
///
/// Each committed stock-changing scan is sent as a `scan_result` event whose
/// data is the JSON envelope. Idle connections get a `heartbeat` event.
///
/// Each observer holds one blocking-pool thread until it disconnects, so the
/// number of concurrent observers is bounded by tokio's blocking pool size
/// (512 by default). A dropped client is noticed on the next send, at most one
/// heartbeat interval later.
pub async fn stream_scans(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let (tx, rx) = unbounded_channel::<Result<SseEvent, Infallible>>();

    // Subscribe before returning so nothing committed after this point is missed.
    let subscription = services.bus.subscribe();
    tracing::debug!(observers = services.bus.subscriber_count(), "scan stream observer connected");

    tokio::task::spawn_blocking(move || {
        let mut last_sent = Instant::now();

        loop {
            match subscription.recv_timeout(POLL_INTERVAL) {
                Ok(envelope) => {
                    let data = match serde_json::to_string(&envelope) {
                        Ok(s) => s,
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to encode scan event");
                            continue;
                        }
                    };
                    let event = SseEvent::default().event(envelope.event_type()).data(data);
                    if tx.send(Ok(event)).is_err() {
                        break;
                    }
                    last_sent = Instant::now();
                }
                Err(RecvTimeoutError::Timeout) => {
                    if tx.is_closed() {
                        break;
                    }
                    if last_sent.elapsed() >= HEARTBEAT_INTERVAL {
                        let heartbeat = SseEvent::default().event("heartbeat").data("{}");
                        if tx.send(Ok(heartbeat)).is_err() {
                            break;
                        }
                        last_sent = Instant::now();
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("scan stream observer disconnected");
    });

    Sse::new(UnboundedReceiverStream::new(rx))
        .keep_alive(KeepAlive::new().interval(HEARTBEAT_INTERVAL))
        .into_response()
}
