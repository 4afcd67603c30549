#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The view was initialized; open the stream at `endpoint`.
    Mounted { endpoint: String },
    /// One text payload arrived from the stream.
    FragmentReceived(String),
    /// The stream failed or the remote closed it. Terminal for the view.
    StreamError,
    /// The view is being torn down.
    Unmounted,
}
