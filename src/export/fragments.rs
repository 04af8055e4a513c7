//! Block markup shared by both page variants.
//!
//! Each writer appends one block to `out` and writes nothing for a block
//! that has no renderable content. Rich text (`html`, float `text`) is
//! trusted markup and written verbatim; everything else is escaped.

use std::fmt::Write;

use crate::editor::embed_url;
use crate::model::{
    FloatAlign, FloatImageBlock, FullWidthImageBlock, FullWidthMode, ImageItem, VideoBlock,
};

/// Written in place of empty rich text.
pub(crate) const EMPTY_PARAGRAPH: &str = "<p></p>";

/// Escape text content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make a source safe inside CSS `url('…')`.
pub(crate) fn css_url(src: &str) -> String {
    src.replace('\'', "%27").replace('\\', "%5C")
}

pub(crate) fn rich_text(html: &str) -> &str {
    if html.trim().is_empty() {
        EMPTY_PARAGRAPH
    } else {
        html
    }
}

pub(crate) fn object_fit(keep_ratio: bool) -> &'static str {
    if keep_ratio { "contain" } else { "fill" }
}

pub(crate) fn write_caption(out: &mut String, image: &ImageItem) {
    if !image.caption.is_empty() {
        let _ = write!(
            out,
            r#"<figcaption class="image-caption">{}</figcaption>"#,
            escape_text(&image.caption)
        );
    }
}

pub(crate) fn write_full_width(out: &mut String, block: &FullWidthImageBlock) {
    let item = &block.image.item;
    if item.src.is_empty() {
        return;
    }
    let fit = match block.image.mode {
        FullWidthMode::Fixed => format!("object-fit:cover;height:{}px;", item.height),
        FullWidthMode::Auto => "object-fit:contain;height:auto;".to_string(),
    };
    let _ = write!(
        out,
        r#"<figure class="fullwidth-image-block"><img src="{}" class="fullwidth-image" style="width:100%;display:block;{fit}" data-height="{}" alt="">"#,
        escape_attr(&item.src),
        item.height,
    );
    write_caption(out, item);
    out.push_str("</figure>");
}

pub(crate) fn write_float(out: &mut String, block: &FloatImageBlock) {
    let item = &block.image.item;
    if item.src.is_empty() {
        return;
    }
    let (image_order, text_order) = match block.image.align {
        FloatAlign::Left => (1, 2),
        FloatAlign::Right => (2, 1),
    };
    let _ = write!(
        out,
        concat!(
            r#"<div class="float-image-container" style="display:flex;gap:1rem;align-items:flex-start;flex-wrap:wrap;">"#,
            r#"<figure class="float-image-block" style="width:{}%;margin:0;order:{};">"#,
            r#"<img src="{}" width="{}" height="{}" style="width:100%;height:auto;display:block;" alt="">"#,
        ),
        block.image.width_percent,
        image_order,
        escape_attr(&item.src),
        item.width,
        item.height,
    );
    write_caption(out, item);
    let _ = write!(
        out,
        concat!(
            r#"</figure><div class="float-text-content" style="flex:1;min-width:200px;order:{};">"#,
            r#"<div class="prose max-w-none">{}</div></div></div>"#,
        ),
        text_order,
        rich_text(&block.text),
    );
}

pub(crate) fn write_video(out: &mut String, block: &VideoBlock) {
    if block.video_id.is_empty() {
        return;
    }
    let _ = write!(
        out,
        concat!(
            r#"<div class="video-block"><iframe src="{}" width="{}" height="{}" frameborder="0" "#,
            r#"allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" "#,
            r#"allowfullscreen></iframe></div>"#,
        ),
        escape_attr(&embed_url(&block.video_id)),
        block.width,
        block.height,
    );
}
