use std::io;
use std::sync::mpsc;

use anyhow::Context;
use idea_core::{update, AppState, DocumentView, Msg};
use idea_logging::{idea_debug, idea_error, idea_info, idea_warn};

use super::effects::EffectRunner;
use super::ui::surface::{HtmlPageSurface, Surface, TerminalSurface};
use crate::config::AppConfig;

/// How a run ended, for the final log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    pub fragment_count: usize,
    pub had_content: bool,
}

/// Mounts one view, streams until the connection closes, then unmounts.
pub fn run_app(config: &AppConfig) -> anyhow::Result<RunOutcome> {
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner =
        EffectRunner::new(config.stream.clone(), msg_tx).context("failed to start stream engine")?;

    let mut page = PageView::new(runner, build_surfaces(config));
    page.present();
    page.dispatch(Msg::Mounted {
        endpoint: config.endpoint.clone(),
    });

    while !page.state.is_settled() {
        match msg_rx.recv() {
            Ok(msg) => page.dispatch(msg),
            Err(_) => {
                idea_warn!("Engine event loop stopped unexpectedly");
                page.dispatch(Msg::StreamError);
            }
        }
    }

    Ok(page.finish())
}

fn build_surfaces(config: &AppConfig) -> Vec<Box<dyn Surface>> {
    let mut surfaces: Vec<Box<dyn Surface>> = Vec::new();
    if config.surface.terminal() {
        surfaces.push(Box::new(TerminalSurface::new(io::stdout())));
    }
    if config.surface.html() {
        let html = HtmlPageSurface::new(&config.output);
        idea_info!("Writing page to {:?}", html.target());
        surfaces.push(Box::new(html));
    }
    surfaces
}

/// The mounted view. Dropping it unmounts, so the stream never outlives it.
struct PageView {
    state: AppState,
    runner: EffectRunner,
    surfaces: Vec<Box<dyn Surface>>,
    unmounted: bool,
}

impl PageView {
    fn new(runner: EffectRunner, surfaces: Vec<Box<dyn Surface>>) -> Self {
        Self {
            state: AppState::new(),
            runner,
            surfaces,
            unmounted: false,
        }
    }

    /// Shows the current view everywhere. A failing surface is logged and skipped.
    fn present(&mut self) {
        let view = self.state.view();
        for surface in &mut self.surfaces {
            if let Err(err) = surface.present(&view) {
                idea_error!("Failed to present view: {}", err);
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        idea_debug!("dispatch {}", msg_name(&msg));
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);

        let was_dirty = state.consume_dirty();
        self.state = state;
        if was_dirty {
            self.present();
        }
    }

    fn finish(mut self) -> RunOutcome {
        self.unmount();
        let view = self.state.view();
        RunOutcome {
            fragment_count: view.fragment_count,
            had_content: matches!(view.document, DocumentView::Content { .. }),
        }
    }

    fn unmount(&mut self) {
        if !self.unmounted {
            self.unmounted = true;
            self.dispatch(Msg::Unmounted);
        }
    }
}

impl Drop for PageView {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Fragment text can be long; log only the message kind.
fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::Mounted { .. } => "Mounted",
        Msg::FragmentReceived(_) => "FragmentReceived",
        Msg::StreamError => "StreamError",
        Msg::Unmounted => "Unmounted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceChoice;
    use idea_core::stream_endpoint;
    use idea_engine::StreamSettings;
    use idea_logging::LogSettings;
    use std::fs;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    /// Serves one raw HTTP response and returns the base URL.
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}")
    }

    fn event_stream(body: &str) -> String {
        format!(
            "HTTP/1.1 200 OK\r\ncontent-type: text/event-stream\r\ncache-control: no-cache\r\nconnection: close\r\n\r\n{body}"
        )
    }

    fn html_config(base: &str, temp: &TempDir) -> AppConfig {
        AppConfig {
            endpoint: stream_endpoint(base).unwrap(),
            output: temp.path().join("ideas.html"),
            surface: SurfaceChoice::Html,
            logging: LogSettings::default(),
            stream: StreamSettings::default(),
        }
    }

    #[test]
    fn streamed_ideas_end_up_on_the_page() {
        let base = serve_once(event_stream(
            ": ping\n\ndata: # Ideas\n\ndata: 1. Solar bike lock\n\n",
        ));
        let temp = TempDir::new().unwrap();
        let config = html_config(&base, &temp);

        let outcome = run_app(&config).unwrap();
        assert_eq!(
            outcome,
            RunOutcome {
                fragment_count: 2,
                had_content: true
            }
        );

        let page = fs::read_to_string(&config.output).unwrap();
        assert!(page.contains("<h1>Ideas</h1>"));
        assert!(page.contains("<li>Solar bike lock</li>"));
        assert!(!page.contains("http-equiv=\"refresh\""));
    }

    #[test]
    fn failed_connection_shows_placeholder() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                .to_string(),
        );
        let temp = TempDir::new().unwrap();
        let config = html_config(&base, &temp);

        let outcome = run_app(&config).unwrap();
        assert_eq!(
            outcome,
            RunOutcome {
                fragment_count: 0,
                had_content: false
            }
        );

        let page = fs::read_to_string(&config.output).unwrap();
        assert!(page.contains("Unable to load ideas. Please try again."));
    }
}
