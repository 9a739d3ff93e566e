use ratatui::style::Color;

pub const APP_TITLE: &str = "Veo Studio";
pub const APP_SUBTITLE: &str = "AI video generation";
pub const PROMPT_TITLE: &str = "Describe your video";
pub const PROMPT_PLACEHOLDER: &str =
    "A sunrise over misty mountains with birds crossing the sky...";
pub const DURATION_TITLE: &str = "Duration";
pub const ASPECT_TITLE: &str = "Aspect ratio";
pub const GENERATE_LABEL: &str = "Generate video";
pub const GALLERY_TITLE: &str = "Generated videos";
pub const EMPTY_STATE_TEXT: &str = "Start by generating your first video";
pub const TOO_SMALL_TEXT: &str = "Enlarge the terminal to see your videos";
pub const DOWNLOAD_LABEL: &str = "[ Download ]";
pub const PREVIEW_DOWNLOAD_LABEL: &str = "[ Download video ]";
pub const CLOSE_LABEL: &str = "[x]";
pub const KEY_HINTS: &str = "Tab focus | \u{2190}/\u{2192} change | Enter generate/open | \
     d download | Esc cancel/close | Ctrl-Q quit";

pub const ACCENT: Color = Color::Magenta;
pub const MUTED: Color = Color::DarkGray;
pub const TEXT: Color = Color::White;
pub const INFO: Color = Color::Green;
pub const ERROR: Color = Color::Red;
pub const THUMBNAIL_BG: Color = Color::Indexed(236);

/// Outer height of one gallery card, borders included.
pub const CARD_HEIGHT: u16 = 9;
pub const OVERLAY_MAX_WIDTH: u16 = 76;
pub const OVERLAY_MAX_HEIGHT: u16 = 20;
