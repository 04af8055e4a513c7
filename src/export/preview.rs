//! Preview page: the layout the canvas shows, styled by an external sheet.

use std::fmt::Write;

use super::fragments::{
    css_url, escape_attr, escape_text, object_fit, rich_text, write_caption, write_float,
    write_full_width, write_video,
};
use super::{Exporter, HtmlConfig};
use crate::model::{Block, GalleryBlock, Section, TextBlock};

/// Renders sections the way the editor canvas lays them out.
///
/// Every block sits in a `.block-wrapper`; galleries show their first image.
#[derive(Debug, Clone, Default)]
pub struct PreviewExporter {
    config: HtmlConfig,
}

impl PreviewExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: HtmlConfig) -> Self {
        Self { config }
    }

    fn write_section(&self, out: &mut String, section: &Section) {
        let props = &section.props;
        let mut style: Vec<String> = match props.active_image() {
            Some(src) => vec![
                format!("background-image:url('{}')", css_url(src)),
                "background-size:cover".to_string(),
                "background-position:center".to_string(),
                "background-repeat:no-repeat".to_string(),
            ],
            None => vec![format!("background:{}", props.background)],
        };
        if props.height > 0 {
            style.push(format!("min-height:{}px", props.height));
        }
        style.push("width:100%".to_string());

        let _ = write!(
            out,
            r#"<section class="section-block" style="{}">"#,
            escape_attr(&style.join(";"))
        );
        for block in &section.blocks {
            let mut inner = String::new();
            match block {
                Block::Text(text) => write_text(&mut inner, text),
                Block::Gallery(gallery) => write_first_image(&mut inner, gallery),
                Block::FullWidthImage(b) => write_full_width(&mut inner, b),
                Block::FloatImage(b) => write_float(&mut inner, b),
                Block::Video(b) => write_video(&mut inner, b),
                Block::Unknown => {}
            }
            if !inner.is_empty() {
                let _ = write!(out, r#"<div class="block-wrapper">{inner}</div>"#);
            }
        }
        out.push_str("</section>\n");
    }
}

fn write_text(out: &mut String, block: &TextBlock) {
    let _ = write!(
        out,
        concat!(
            r#"<div class="text-wrapper" style="--block-max:{};width:100%;margin:0 auto;padding:0.5rem 0;">"#,
            r#"<div class="prose max-w-none">{}</div></div>"#,
        ),
        escape_attr(&block.props.width),
        rich_text(&block.html),
    );
}

fn write_first_image(out: &mut String, gallery: &GalleryBlock) {
    let Some(image) = gallery.images.first() else {
        return;
    };
    let _ = write!(
        out,
        concat!(
            r#"<figure class="image-block"><img src="{}" "#,
            r#"style="width:{}px;height:{}px;object-fit:{};object-position:center;max-width:100%;display:block;" alt="">"#,
        ),
        escape_attr(&image.src),
        image.width,
        image.height,
        object_fit(image.keep_ratio),
    );
    write_caption(out, image);
    out.push_str("</figure>");
}

impl Exporter for PreviewExporter {
    fn encode(&self, sections: &[Section]) -> String {
        let config = &self.config;
        let mut out = String::new();
        let _ = write!(
            out,
            concat!(
                "<!doctype html>\n<html lang=\"{lang}\">\n<head>\n",
                "<meta charset=\"utf-8\">\n",
                "<base href=\"{base}\">\n",
                "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
                "<title>{title}</title>\n",
                "<link rel=\"stylesheet\" href=\"{sheet}\">\n",
                "</head>\n<body>\n<main class=\"canvas-area\">\n",
            ),
            lang = escape_attr(&config.lang),
            base = escape_attr(&config.base_href),
            title = escape_text(&config.title),
            sheet = escape_attr(&config.stylesheet_href),
        );
        for section in sections {
            self.write_section(&mut out, section);
        }
        out.push_str("</main>\n</body>\n</html>\n");
        out
    }
}
