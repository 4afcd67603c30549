/// Side effects requested by [`crate::update`] and carried out by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the one streaming connection of this view.
    OpenStream { url: String },
    /// Release the streaming connection. No further fragments are processed.
    CloseStream,
}
