use std::sync::mpsc;
use std::thread;

use idea_core::{Effect, Msg};
use idea_engine::{
    EngineError, EngineEvent, EngineEvents, EngineHandle, StreamConnection, StreamSettings,
};
use idea_logging::{idea_debug, idea_info, idea_warn};

/// Turns core effects into engine calls and engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    connection: Option<StreamConnection>,
}

impl EffectRunner {
    pub fn new(settings: StreamSettings, msg_tx: mpsc::Sender<Msg>) -> Result<Self, EngineError> {
        let (engine, events) = EngineHandle::new(settings)?;
        spawn_event_loop(events, msg_tx)?;
        Ok(Self {
            engine,
            connection: None,
        })
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenStream { url } => {
                    if self.connection.is_some() {
                        idea_warn!("Stream already open; ignoring OpenStream for {}", url);
                        continue;
                    }
                    idea_info!("Opening stream url={}", url);
                    self.connection = Some(self.engine.open(url));
                }
                Effect::CloseStream => {
                    if let Some(connection) = self.connection.take() {
                        idea_debug!("Closing stream {}", connection.id());
                        connection.close();
                    }
                }
            }
        }
    }
}

fn spawn_event_loop(events: EngineEvents, msg_tx: mpsc::Sender<Msg>) -> Result<(), EngineError> {
    thread::Builder::new()
        .name("idea-events".to_string())
        .spawn(move || {
            while let Some(event) = events.recv() {
                let Some(msg) = map_event(event) else {
                    continue;
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
        .map_err(EngineError::Thread)
}

/// A normal end of stream is reported like an error: the view stops either way.
fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Opened { connection } => {
            idea_info!("Stream {} open", connection);
            None
        }
        EngineEvent::Fragment { text, .. } => Some(Msg::FragmentReceived(text)),
        EngineEvent::Ended {
            connection,
            result: Ok(summary),
        } => {
            idea_info!(
                "Stream {} ended by server after {} fragments ({} bytes)",
                connection,
                summary.fragments,
                summary.bytes
            );
            Some(Msg::StreamError)
        }
        EngineEvent::Ended {
            connection,
            result: Err(err),
        } => {
            idea_warn!(
                "SSE connection error. Closing stream. connection={} error={}",
                connection,
                err
            );
            Some(Msg::StreamError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idea_engine::{FailureKind, StreamError, StreamSummary};
    use pretty_assertions::assert_eq;

    #[test]
    fn fragments_become_messages() {
        let msg = map_event(EngineEvent::Fragment {
            connection: 1,
            text: "idea".to_string(),
        });
        assert_eq!(msg, Some(Msg::FragmentReceived("idea".to_string())));
    }

    #[test]
    fn opened_is_not_forwarded() {
        assert_eq!(map_event(EngineEvent::Opened { connection: 1 }), None);
    }

    #[test]
    fn any_end_of_stream_is_a_stream_error() {
        let clean = map_event(EngineEvent::Ended {
            connection: 1,
            result: Ok(StreamSummary {
                fragments: 3,
                bytes: 42,
            }),
        });
        let failed = map_event(EngineEvent::Ended {
            connection: 1,
            result: Err(StreamError::new(FailureKind::HttpStatus(500), "boom")),
        });
        assert_eq!(clean, Some(Msg::StreamError));
        assert_eq!(failed, Some(Msg::StreamError));
    }
}
