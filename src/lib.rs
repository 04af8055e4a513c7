//! # newsworthy
//!
//! A page-builder document model with a round-tripping HTML codec.
//!
//! ## Features
//!
//! - Sections holding text, image gallery, full-width image, float image and
//!   video blocks
//! - An [`Editor`] that owns the document, the selection cursor and the
//!   transient image handles of one editing session
//! - HTML export in two variants: a preview page linked to a shared
//!   stylesheet, and a self-contained standalone page
//! - HTML import that recovers sections from either variant
//!
//! ## Quick Start
//!
//! ```
//! use newsworthy::Editor;
//! use newsworthy::export::HtmlConfig;
//!
//! let mut editor = Editor::new();
//! let section = editor.add_section(None).id;
//! editor.select_section(section);
//! editor.add_text_block().unwrap();
//! editor.set_text_html("<h1>Breaking</h1>");
//!
//! let html = editor.export_html(&HtmlConfig::default());
//! assert!(html.contains("<h1>Breaking</h1>"));
//!
//! let mut restored = Editor::new();
//! assert_eq!(restored.import_html(&html), 1);
//! ```
//!
//! ## Working with the Model
//!
//! Sections serialize to the JSON shape the storage layer keeps:
//!
//! ```
//! use newsworthy::export::{HtmlConfig, HtmlVariant, encode_html};
//! use newsworthy::model::{Identifier, Section};
//!
//! let mut section = Section::new(Identifier(1));
//! section.props.background = "#101820".to_string();
//!
//! let config = HtmlConfig::default().with_variant(HtmlVariant::Preview);
//! let html = encode_html(&[section], &config);
//! assert!(html.contains("background:#101820"));
//! ```

pub mod assets;
pub mod dom;
pub mod editor;
pub mod error;
pub mod export;
pub mod import;
pub mod model;
pub mod publish;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use editor::Editor;
pub use error::{Error, Result};
