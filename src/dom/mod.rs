//! HTML parsing into an arena DOM.
//!
//! ```
//! use newsworthy::dom::parse_html;
//!
//! let dom = parse_html(r#"<section class="section"><p>Hi</p></section>"#);
//! let section = dom.find_class(dom.document(), "section").unwrap();
//! assert_eq!(dom.inner_html(section), "<p>Hi</p>");
//! ```

mod arena;
mod tree_sink;

pub use arena::{Attribute, Children, Descendants, Dom, Node, NodeData, NodeId};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::DomSink;

/// Parse a complete HTML document, recovering from malformed markup.
pub fn parse_html(html: &str) -> Dom {
    parse_document(DomSink::new(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
