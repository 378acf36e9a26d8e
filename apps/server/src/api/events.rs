use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde_json::json;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

use crate::main_lib::AppState;
use regdeck_core::events::ChangeEvent;

/// JSON payload broadcast for each event kind. Record-bearing events carry
/// the whole record so clients never need a follow-up fetch.
pub(crate) fn event_payload(event: &ChangeEvent) -> serde_json::Value {
    match event {
        ChangeEvent::Created { registration } | ChangeEvent::Updated { registration } => {
            json!(registration)
        }
        ChangeEvent::Deleted { id, category } => json!({ "id": id, "category": category }),
        ChangeEvent::Cleared { category } => json!({ "category": category }),
        ChangeEvent::SettingChanged { key, value } => json!({ "key": key, "value": value }),
    }
}

/// One long-lived stream per dashboard session. Events are named by kind;
/// category filtering happens client-side against the payload. There is
/// no replay: a client that reconnects refetches the full list instead.
async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.event_bus.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(evt) => {
            let sse_event = SseEvent::default().event(evt.name());
            match sse_event.json_data(event_payload(&evt)) {
                Ok(ev) => Some(Ok(ev)),
                Err(err) => {
                    tracing::error!("Failed to serialize SSE payload for {}: {}", evt.name(), err);
                    None
                }
            }
        }
        // A lagged subscriber missed events; it will resync on reconnect.
        Err(BroadcastStreamRecvError::Lagged(_)) => None,
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/events/stream", get(stream_events))
}
