//! HTML decoding back into sections.
//!
//! Accepts both page variants written by [`crate::export`] and loosely
//! similar hand-written markup. Decoding is lenient: html5ever recovers
//! from malformed input, and fragments that match no block shape are
//! skipped rather than reported.
//!
//! # Example
//!
//! ```
//! use newsworthy::import::{decode, is_editable_html};
//! use newsworthy::model::{Block, IdAllocator};
//!
//! let html = r#"<section class="section" style="min-height: 250px">
//!     <div class="text-block" style="max-width: 40rem;"><p>Hello</p></div>
//! </section>"#;
//!
//! assert!(is_editable_html(html));
//! let sections = decode(html, &mut IdAllocator::new());
//! assert_eq!(sections[0].props.height, 250);
//! assert!(matches!(&sections[0].blocks[0], Block::Text(t) if t.html == "<p>Hello</p>"));
//! ```

mod html;
mod style;

#[cfg(test)]
mod tests;

pub use html::{decode, decode_bytes, is_editable_html};
pub use style::{InlineStyle, css_url};
