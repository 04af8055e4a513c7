//! Video URL recognition.

use std::sync::LazyLock;

use regex_lite::Regex;

/// Default embed size (16:9).
pub const DEFAULT_VIDEO_WIDTH: u32 = 560;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 315;

/// `watch?v=ID` on youtube.com, www., m. and music. hosts
static WATCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?(?:[\w-]+\.)?youtube\.com/watch\?(?:[^#]*&)?v=([\w-]{11})").unwrap()
});

/// `youtu.be/ID`
static SHORT_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:https?://)?(?:www\.)?youtu\.be/([\w-]{11})").unwrap());

/// `/embed/ID`, `/v/ID`, `/shorts/ID`, `/live/ID`
static PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:[\w-]+\.)?youtube(?:-nocookie)?\.com/(?:embed|v|shorts|live)/([\w-]{11})",
    )
    .unwrap()
});

/// A bare 11-character id
static BARE_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[\w-]{11}$").unwrap());

/// Extract the platform video id from any accepted URL shape.
///
/// ```
/// use newsworthy::editor::extract_video_id;
///
/// assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
/// assert_eq!(extract_video_id("not a url"), None);
/// ```
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    [&*WATCH_RE, &*SHORT_LINK_RE, &*PATH_RE, &*BARE_ID_RE]
        .iter()
        .find_map(|re| {
            let caps = re.captures(url)?;
            caps.get(1)
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().to_string())
        })
}

/// Embed player URL for a video id.
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}

/// Canonical watch URL for a video id.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}
