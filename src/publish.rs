//! Helpers for publishing an exported page to static hosting.
//!
//! Uploading itself belongs to the caller; these functions only shape the
//! names and snippets the upload and the embedding site need.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::export::escape_attr;

/// Characters not allowed in a published filename.
static UNSAFE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

/// Normalize a user-supplied page name into a hosting-safe filename.
///
/// Adds the `.html` suffix when missing, then replaces every character
/// outside `[A-Za-z0-9._-]` with `-`.
///
/// ```
/// use newsworthy::publish::publish_filename;
///
/// assert_eq!(publish_filename("My Story"), "My-Story.html");
/// assert_eq!(publish_filename("report.html"), "report.html");
/// ```
pub fn publish_filename(name: &str) -> String {
    let name = name.trim();
    let with_suffix = if name.ends_with(".html") {
        name.to_string()
    } else {
        format!("{name}.html")
    };
    UNSAFE_FILENAME_RE
        .replace_all(&with_suffix, "-")
        .into_owned()
}

/// Place a filename under `YYYY/MM/`.
pub fn dated_path(filename: &str, year: i32, month: u32) -> String {
    format!("{year:04}/{month:02}/{filename}")
}

/// Public URL of a published path under a hosting base URL.
pub fn public_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// `<iframe>` markup that embeds a published page in another site.
pub fn embed_snippet(url: &str) -> String {
    format!(
        concat!(
            "<iframe \n",
            "    src=\"{}\" \n",
            "    width=\"100%\" \n",
            "    height=\"600\" \n",
            "    frameborder=\"0\" \n",
            "    style=\"border: none; max-width: 100%;\"\n",
            "    sandbox=\"allow-same-origin allow-scripts\"\n",
            "></iframe>",
        ),
        escape_attr(url)
    )
}
