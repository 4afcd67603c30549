//! Output targets for the view model.

use std::io::{self, Write};
use std::path::Path;

use idea_core::{
    AppViewModel, DocumentView, LOADING_CAPTION, LOADING_SUBCAPTION, UNAVAILABLE_MESSAGE,
};
use idea_engine::{AtomicFileWriter, PersistError};
use idea_logging::idea_debug;
use thiserror::Error;

use super::render::render_page;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("terminal write failed: {0}")]
    Io(#[from] io::Error),
    #[error("page write failed: {0}")]
    Persist(#[from] PersistError),
}

/// Something that shows the current view. Called after every state change.
pub trait Surface {
    fn present(&mut self, view: &AppViewModel) -> Result<(), SurfaceError>;
}

/// Streams the raw markdown to a writer as it grows.
///
/// Output is append-only: the loading caption and the placeholder are each
/// printed at most once, and content is printed as the suffix not yet shown.
pub struct TerminalSurface<W: Write> {
    out: W,
    printed: usize,
    announced_loading: bool,
    announced_unavailable: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            printed: 0,
            announced_loading: false,
            announced_unavailable: false,
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn present(&mut self, view: &AppViewModel) -> Result<(), SurfaceError> {
        match &view.document {
            DocumentView::Loading => {
                if !self.announced_loading {
                    writeln!(self.out, "{LOADING_CAPTION} ({LOADING_SUBCAPTION})")?;
                    self.announced_loading = true;
                }
            }
            DocumentView::Content { markdown, .. } => {
                if let Some(fresh) = markdown.get(self.printed..) {
                    if !fresh.is_empty() {
                        self.out.write_all(fresh.as_bytes())?;
                        self.printed = markdown.len();
                    }
                }
            }
            DocumentView::Unavailable => {
                if !self.announced_unavailable {
                    writeln!(self.out, "{UNAVAILABLE_MESSAGE}")?;
                    self.announced_unavailable = true;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }
}

/// Rewrites a self-contained HTML page atomically on every change.
pub struct HtmlPageSurface {
    writer: AtomicFileWriter,
    last_page: Option<String>,
}

impl HtmlPageSurface {
    pub fn new(target: impl AsRef<Path>) -> Self {
        Self {
            writer: AtomicFileWriter::new(target.as_ref()),
            last_page: None,
        }
    }

    pub fn target(&self) -> &Path {
        self.writer.target()
    }
}

impl Surface for HtmlPageSurface {
    fn present(&mut self, view: &AppViewModel) -> Result<(), SurfaceError> {
        let page = render_page(view);
        if self.last_page.as_deref() == Some(page.as_str()) {
            return Ok(());
        }
        let path = self.writer.write(&page)?;
        idea_debug!("Wrote {} bytes to {:?}", page.len(), path);
        self.last_page = Some(page);
        Ok(())
    }
}
