//! Idea stream core: pure state machine, view model and Markdown rendering.
mod effect;
mod endpoint;
mod markdown;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use endpoint::{stream_endpoint, EndpointError, STREAM_PATH};
pub use markdown::render_markdown;
pub use msg::Msg;
pub use state::{AppState, ConnectionState, IdeaBuffer, Phase};
pub use update::update;
pub use view_model::{
    AppViewModel, DocumentView, LOADING_CAPTION, LOADING_SUBCAPTION, UNAVAILABLE_MESSAGE,
};
