use crate::view_model::{AppViewModel, DocumentView};

/// Lifecycle of the single streaming connection owned by a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// View created but not mounted yet.
    #[default]
    Pending,
    Open,
    /// Closed by error, remote closure or teardown. Never reopened.
    Closed,
}

/// Which of the two visual phases the view is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Streaming,
}

/// Append-only text accumulated from stream fragments.
///
/// Every fragment is stored followed by a newline, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdeaBuffer {
    text: String,
}

impl IdeaBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_fragment(&mut self, fragment: &str) {
        self.text.reserve(fragment.len() + 1);
        self.text.push_str(fragment);
        self.text.push('\n');
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    buffer: IdeaBuffer,
    loading: bool,
    connection: ConnectionState,
    fragment_count: usize,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            buffer: IdeaBuffer::new(),
            loading: true,
            connection: ConnectionState::Pending,
            fragment_count: 0,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let document = if self.loading {
            DocumentView::Loading
        } else if self.buffer.is_empty() {
            DocumentView::Unavailable
        } else {
            DocumentView::content(self.buffer.as_str())
        };
        AppViewModel {
            document,
            phase: self.phase(),
            connection: self.connection,
            fragment_count: self.fragment_count,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else {
            Phase::Streaming
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn buffer(&self) -> &IdeaBuffer {
        &self.buffer
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    /// True once the connection is closed; nothing can change the view anymore.
    pub fn is_settled(&self) -> bool {
        self.connection == ConnectionState::Closed
    }

    /// Returns whether the state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn open_connection(&mut self) {
        self.connection = ConnectionState::Open;
        self.dirty = true;
    }

    pub(crate) fn accept_fragment(&mut self, fragment: &str) {
        self.loading = false;
        self.buffer.push_fragment(fragment);
        self.fragment_count += 1;
        self.dirty = true;
    }

    pub(crate) fn fail_stream(&mut self) {
        self.loading = false;
        self.connection = ConnectionState::Closed;
        self.dirty = true;
    }

    pub(crate) fn teardown(&mut self) {
        self.loading = false;
        self.connection = ConnectionState::Closed;
        self.dirty = true;
    }
}
