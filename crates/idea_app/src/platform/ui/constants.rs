pub const PAGE_TITLE: &str = "Business Idea Generator | AI-Powered Innovation";
pub const PAGE_DESCRIPTION: &str =
    "Generate innovative business ideas instantly using AI. Get inspired with creative business concepts.";
pub const BADGE_TEXT: &str = "\u{2728} AI-Powered";
pub const TITLE_ACCENT: &str = "Business Ideas";
pub const TITLE_MAIN: &str = "Instantly Generated";
pub const TAGLINE: &str =
    "Get innovative business ideas powered by AI. Explore new opportunities in seconds.";
pub const FOOTER_TEXT: &str = "\u{1f4a1} Run again to generate new ideas";
/// Seconds between browser reloads while the stream is live.
pub const LIVE_REFRESH_SECS: u32 = 1;
