use crate::{render_markdown, ConnectionState, Phase};

pub const LOADING_CAPTION: &str = "Generating brilliant ideas...";
pub const LOADING_SUBCAPTION: &str = "Powered by OpenAI";
pub const UNAVAILABLE_MESSAGE: &str = "Unable to load ideas. Please try again.";

/// The three mutually exclusive states of the document card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentView {
    /// Spinner with [`LOADING_CAPTION`] and [`LOADING_SUBCAPTION`].
    Loading,
    /// Rendered ideas. `markdown` is the raw buffer, `html` its rendering.
    Content { markdown: String, html: String },
    /// Placeholder with [`UNAVAILABLE_MESSAGE`].
    Unavailable,
}

impl DocumentView {
    pub(crate) fn content(markdown: &str) -> Self {
        DocumentView::Content {
            markdown: markdown.to_string(),
            html: render_markdown(markdown),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub document: DocumentView,
    pub phase: Phase,
    pub connection: ConnectionState,
    pub fragment_count: usize,
    pub dirty: bool,
}

impl AppViewModel {
    /// True while more fragments may still arrive.
    pub fn is_live(&self) -> bool {
        self.connection != ConnectionState::Closed
    }
}
