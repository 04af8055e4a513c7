//! Standalone page: one self-contained file with the stylesheet inlined.

use std::fmt::Write;

use super::fragments::{
    css_url, escape_attr, escape_text, object_fit, rich_text, write_caption, write_float,
    write_full_width, write_video,
};
use super::{Exporter, HtmlConfig};
use crate::model::{Block, GalleryBlock, Section, TextAlign, TextBlock};

const STYLESHEET: &str = "
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
  background-color: #b9b9b9;
}
.article-container {
  width: 100%;
  background-color: #b9b9b9;
  display: flex;
  flex-direction: column;
  align-items: center;
}
.section {
  margin: 0 auto;
  position: relative;
  border-top: 2px solid #e0e0e0;
  padding: 16px 20px;
  overflow: visible;
  background-size: cover;
  background-position: center;
  background-repeat: no-repeat;
}
.text-block { width: 100%; margin: 10px auto; padding: 8px; }
.text-block h1 { font-size: 2em; font-weight: 700; margin: 0.67em 0; line-height: 1.2; }
.text-block h2 { font-size: 1.5em; font-weight: 700; margin: 0.83em 0; line-height: 1.3; }
.text-block p, .prose p { font-size: 1em; line-height: 1.6; margin: 1em 0; }
.text-block a, .prose a { color: #2563eb; text-decoration: underline; }
.text-block a:hover, .prose a:hover { color: #1d4ed8; }
.text-block ul, .text-block ol { margin: 1em 0; padding-left: 2em; }
.text-block li { margin: 0.5em 0; }
.text-align-left { text-align: left; }
.text-align-center { text-align: center; }
.text-align-right { text-align: right; }
.image-gallery { display: flex; flex-wrap: wrap; justify-content: center; gap: 10px; }
.image-block { display: flex; flex-direction: column; align-items: center; margin: 10px 0; }
.image-block img { max-width: 100%; border-radius: 4px; }
.image-caption { font-size: 0.875em; color: #555; text-align: center; margin-top: 6px; }
.fullwidth-image-block { width: 100%; margin: 10px 0; }
.float-image-container { margin: 10px 0; }
.video-block { display: flex; justify-content: center; margin: 10px 0; }
.video-block iframe { max-width: 100%; border: 0; }
";

/// Renders a downloadable page that needs nothing but itself.
#[derive(Debug, Clone, Default)]
pub struct StandaloneExporter {
    config: HtmlConfig,
}

impl StandaloneExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HtmlConfig) -> Self {
        Self { config }
    }

    fn write_section(&self, out: &mut String, section: &Section) {
        let props = &section.props;
        let width = props.width.unwrap_or(self.config.default_section_width);
        let mut style = format!(
            "width: {width}px; min-height: {}px; background-color: {};",
            props.height, props.background
        );
        if let Some(src) = props.active_image() {
            let _ = write!(style, " background-image: url('{}');", css_url(src));
        }

        let _ = writeln!(
            out,
            r#"<section class="section" style="{}">"#,
            escape_attr(&style)
        );
        for block in &section.blocks {
            let start = out.len();
            match block {
                Block::Text(text) => write_text(out, text),
                Block::Gallery(gallery) => write_gallery(out, gallery),
                Block::FullWidthImage(b) => write_full_width(out, b),
                Block::FloatImage(b) => write_float(out, b),
                Block::Video(b) => write_video(out, b),
                Block::Unknown => {}
            }
            if out.len() > start {
                out.push('\n');
            }
        }
        out.push_str("</section>\n");
    }
}

fn align_class(align: TextAlign) -> &'static str {
    match align {
        TextAlign::Left => "text-align-left",
        TextAlign::Center => "text-align-center",
        TextAlign::Right => "text-align-right",
    }
}

fn write_text(out: &mut String, block: &TextBlock) {
    let _ = write!(
        out,
        r#"<div class="text-block {}" style="max-width: {};">{}</div>"#,
        align_class(block.align),
        escape_attr(&block.props.width),
        rich_text(&block.html),
    );
}

fn write_gallery(out: &mut String, gallery: &GalleryBlock) {
    if gallery.images.is_empty() {
        return;
    }
    let _ = write!(
        out,
        r#"<div class="image-gallery" data-layout="{}">"#,
        escape_attr(&gallery.layout)
    );
    for image in &gallery.images {
        let _ = write!(
            out,
            concat!(
                r#"<figure class="image-block"><img src="{}" "#,
                r#"style="width: {}px; height: {}px; object-fit: {}; object-position: center;" alt="Image">"#,
            ),
            escape_attr(&image.src),
            image.width,
            image.height,
            object_fit(image.keep_ratio),
        );
        write_caption(out, image);
        out.push_str("</figure>");
    }
    out.push_str("</div>");
}

impl Exporter for StandaloneExporter {
    fn encode(&self, sections: &[Section]) -> String {
        let config = &self.config;
        let mut out = String::new();
        let _ = write!(
            out,
            concat!(
                "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n",
                "<meta charset=\"UTF-8\">\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
                "<title>{title}</title>\n",
                "<style>{css}</style>\n",
                "</head>\n<body>\n<div class=\"article-container\">\n",
            ),
            lang = escape_attr(&config.lang),
            title = escape_text(&config.title),
            css = STYLESHEET,
        );
        for section in sections {
            self.write_section(&mut out, section);
        }
        out.push_str("</div>\n</body>\n</html>\n");
        out
    }
}
