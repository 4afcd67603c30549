use crate::{AppState, ConnectionState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted { endpoint } => {
            // One connection per view: a second mount, or a mount after
            // teardown, never reopens.
            if state.connection() != ConnectionState::Pending {
                return (state, Vec::new());
            }
            state.open_connection();
            vec![Effect::OpenStream { url: endpoint }]
        }
        Msg::FragmentReceived(fragment) => {
            if state.connection() != ConnectionState::Open {
                return (state, Vec::new());
            }
            state.accept_fragment(&fragment);
            Vec::new()
        }
        Msg::StreamError => {
            if state.connection() != ConnectionState::Open {
                return (state, Vec::new());
            }
            state.fail_stream();
            vec![Effect::CloseStream]
        }
        Msg::Unmounted => match state.connection() {
            ConnectionState::Open => {
                state.teardown();
                vec![Effect::CloseStream]
            }
            ConnectionState::Pending => {
                state.teardown();
                Vec::new()
            }
            ConnectionState::Closed => Vec::new(),
        },
    };

    (state, effects)
}
