//! HTML encoding of documents.
//!
//! Provides the `Exporter` trait and the two page variants.
//!
//! # Architecture
//!
//! Exporters follow a builder pattern:
//! - `new()` creates an exporter with the default [`HtmlConfig`]
//! - `with_config()` allows customization
//! - `encode()` renders to a string, `export()` writes to any `Write`
//!
//! Both variants share the fragments for full-width, float and video
//! blocks; they differ in page shell, section styling and text/gallery
//! markup. Encoding never fails and never touches transient handles, so
//! callers externalize assets first (see [`crate::Editor::export_html`]).
//!
//! # Example
//!
//! ```
//! use newsworthy::export::{Exporter, HtmlConfig, StandaloneExporter};
//!
//! let config = HtmlConfig::default().with_title("Election night");
//! let html = StandaloneExporter::with_config(config).encode(&[]);
//! assert!(html.contains("<title>Election night</title>"));
//! ```

use std::io::{self, Write};

use crate::model::{DEFAULT_SECTION_WIDTH, Section};

mod fragments;
mod preview;
mod standalone;

pub use fragments::{escape_attr, escape_text};
pub use preview::PreviewExporter;
pub use standalone::StandaloneExporter;

/// Trait for rendering sections to an HTML page.
pub trait Exporter {
    /// Render the page.
    fn encode(&self, sections: &[Section]) -> String;

    /// Render the page into `writer`.
    fn export<W: Write>(&self, sections: &[Section], writer: &mut W) -> io::Result<()> {
        writer.write_all(self.encode(sections).as_bytes())
    }
}

/// Which page shell to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HtmlVariant {
    /// Canvas layout with an external stylesheet.
    Preview,
    /// Downloadable page with everything inlined.
    #[default]
    Standalone,
}

/// Configuration for HTML export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlConfig {
    pub variant: HtmlVariant,
    pub title: String,
    pub lang: String,
    /// Stylesheet linked by the preview page.
    pub stylesheet_href: String,
    /// `<base href>` of the preview page.
    pub base_href: String,
    /// Standalone width of sections that have none.
    pub default_section_width: u32,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            variant: HtmlVariant::default(),
            title: "Exported Article".to_string(),
            lang: "en".to_string(),
            stylesheet_href: "/preview.css".to_string(),
            base_href: "/".to_string(),
            default_section_width: DEFAULT_SECTION_WIDTH,
        }
    }
}

impl HtmlConfig {
    pub fn with_variant(mut self, variant: HtmlVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn with_stylesheet_href(mut self, href: impl Into<String>) -> Self {
        self.stylesheet_href = href.into();
        self
    }

    pub fn with_base_href(mut self, href: impl Into<String>) -> Self {
        self.base_href = href.into();
        self
    }

    pub fn with_default_section_width(mut self, width: u32) -> Self {
        self.default_section_width = width;
        self
    }
}

/// Render sections with the variant `config` selects.
pub fn encode_html(sections: &[Section], config: &HtmlConfig) -> String {
    match config.variant {
        HtmlVariant::Preview => PreviewExporter::with_config(config.clone()).encode(sections),
        HtmlVariant::Standalone => StandaloneExporter::with_config(config.clone()).encode(sections),
    }
}
