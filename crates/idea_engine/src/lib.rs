//! Idea stream engine: server-push transport and output persistence.
mod engine;
mod persist;
mod source;
mod sse;
mod types;

pub use engine::{EngineError, EngineEvents, EngineHandle, StreamConnection};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use source::{
    ChannelFragmentSink, FragmentSink, FragmentSource, ReqwestFragmentSource, StreamSettings,
    EVENT_STREAM_CONTENT_TYPE,
};
pub use sse::{SseDecoder, SseEvent};
pub use types::{ConnectionId, EngineEvent, FailureKind, StreamError, StreamSummary};
