//! Reconstruction of sections from exported (or hand-written) HTML.

use memchr::memmem;

use super::style::{InlineStyle, int_attr};
use crate::dom::{Dom, NodeId, parse_html};
use crate::editor::{DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH, extract_video_id, watch_url};
use crate::error::{Error, Result};
use crate::model::{
    BackgroundType, Block, DEFAULT_LAYOUT, FLOAT_WIDTH_DEFAULT, FLOAT_WIDTH_MAX, FLOAT_WIDTH_MIN,
    FloatAlign, FloatImage, FloatImageBlock, FullWidthImage, FullWidthImageBlock, FullWidthMode,
    GalleryBlock, IdAllocator, ImageItem, Section, TextAlign, TextBlock, TextProps, VideoBlock,
    ratio_of,
};
use crate::util::{decode_text, looks_binary};

/// Image size used when markup carries none.
const FALLBACK_IMAGE_SIZE: u32 = 300;
/// Full-width height used when markup carries none.
const FALLBACK_FULL_WIDTH_HEIGHT: u32 = 400;

/// Substrings that mark markup as produced by this editor.
const EDITABLE_MARKERS: &[&str] = &["section", "canvas-area", "block-wrapper", "text-wrapper"];

/// Cheap check for editor-shaped markup, without parsing.
pub fn is_editable_html(html: &str) -> bool {
    let bytes = html.as_bytes();
    EDITABLE_MARKERS
        .iter()
        .any(|marker| memmem::find(bytes, marker.as_bytes()).is_some())
}

/// Decode raw bytes, detecting the text encoding.
///
/// Input containing NUL bytes is rejected as not being HTML at all.
pub fn decode_bytes(bytes: &[u8], ids: &mut IdAllocator) -> Result<Vec<Section>> {
    if looks_binary(bytes) {
        return Err(Error::DecodeParse(
            "input looks like binary data, not HTML".to_string(),
        ));
    }
    Ok(decode(&decode_text(bytes), ids))
}

/// Rebuild sections from HTML.
///
/// Sections are `.section-block` elements (preview pages) or, when there
/// are none, `.section` elements. Markup that matches no known block shape
/// is skipped. Fresh identifiers come from `ids`.
pub fn decode(html: &str, ids: &mut IdAllocator) -> Vec<Section> {
    let dom = parse_html(html);
    let mut decoder = Decoder { dom: &dom, ids };

    let mut roots = decoder.section_elements("section-block");
    if roots.is_empty() {
        roots = decoder.section_elements("section");
    }

    let sections: Vec<Section> = roots.into_iter().map(|el| decoder.section(el)).collect();
    log::debug!("decoded {} sections", sections.len());
    sections
}

struct Decoder<'a> {
    dom: &'a Dom,
    ids: &'a mut IdAllocator,
}

impl Decoder<'_> {
    /// Outermost elements carrying `class`.
    fn section_elements(&self, class: &str) -> Vec<NodeId> {
        let dom = self.dom;
        dom.descendants(dom.document())
            .filter(|&id| dom.has_class(id, class))
            .filter(|&id| dom.ancestor(id, |a| dom.has_class(a, class)).is_none())
            .collect()
    }

    fn section(&mut self, el: NodeId) -> Section {
        let mut section = Section::new(self.ids.next());
        let style = InlineStyle::parse(self.dom.attr(el, "style").unwrap_or_default());
        let props = &mut section.props;

        if let Some(src) = style.url("background-image") {
            props.bg_type = BackgroundType::Image;
            props.bg_img = src;
        }
        if let Some(color) = style.get("background-color").or_else(|| {
            style
                .get("background")
                .filter(|value| !value.contains("url("))
        }) {
            props.background = color.to_string();
        }
        if let Some(height) = style.px("min-height") {
            props.height = height;
        }
        props.width = style.px("width");

        self.walk(el, &mut section.blocks);
        section
    }

    /// Collect blocks below `parent` in document order.
    fn walk(&mut self, parent: NodeId, blocks: &mut Vec<Block>) {
        let dom = self.dom;
        for child in dom.child_elements(parent).collect::<Vec<_>>() {
            if let Some(block) = self.block(child) {
                blocks.push(block);
                continue;
            }
            if dom.child_elements(child).next().is_some() {
                self.walk(child, blocks);
            } else if !dom.text(child).trim().is_empty() {
                log::debug!(
                    "skipping unrecognised <{}> fragment",
                    dom.tag(child).unwrap_or_default()
                );
            }
        }
    }

    /// Decode `el` if it is a recognised block container.
    fn block(&mut self, el: NodeId) -> Option<Block> {
        let dom = self.dom;
        if dom.has_class(el, "text-wrapper") {
            Some(self.text_wrapper(el))
        } else if dom.has_class(el, "text-block") {
            Some(self.text_block(el))
        } else if dom.has_class(el, "image-gallery") {
            self.gallery(el)
        } else if dom.has_class(el, "image-block") && dom.tag(el) == Some("figure") {
            let image = self.gallery_image(el)?;
            Some(self.gallery_block(vec![image], DEFAULT_LAYOUT))
        } else if dom.has_class(el, "fullwidth-image-block") {
            self.full_width(el)
        } else if dom.has_class(el, "float-image-container") {
            self.float(el)
        } else if dom.has_class(el, "video-block") {
            let iframe = dom.find_tag(el, "iframe")?;
            self.video(iframe)
        } else if dom.tag(el) == Some("iframe") {
            self.video(el)
        } else {
            None
        }
    }

    fn prose_html(&self, container: NodeId) -> String {
        self.dom
            .find_class(container, "prose")
            .map(|prose| self.dom.inner_html(prose).trim().to_string())
            .unwrap_or_else(|| "<p></p>".to_string())
    }

    /// Preview text: `.text-wrapper` around `.prose`.
    fn text_wrapper(&mut self, el: NodeId) -> Block {
        let style = InlineStyle::parse(self.dom.attr(el, "style").unwrap_or_default());
        let mut props = TextProps::default();
        if let Some(width) = style.get("--block-max") {
            props.width = width.to_string();
        }
        Block::Text(TextBlock {
            id: self.ids.next(),
            html: self.prose_html(el),
            align: text_align(&style, self.dom.classes(el)),
            props,
        })
    }

    /// Standalone text: `.text-block` holding the markup directly.
    fn text_block(&mut self, el: NodeId) -> Block {
        let style = InlineStyle::parse(self.dom.attr(el, "style").unwrap_or_default());
        let mut props = TextProps::default();
        if let Some(width) = style.get("max-width") {
            props.width = width.to_string();
        }
        Block::Text(TextBlock {
            id: self.ids.next(),
            html: self.dom.inner_html(el).trim().to_string(),
            align: text_align(&style, self.dom.classes(el)),
            props,
        })
    }

    fn gallery(&mut self, el: NodeId) -> Option<Block> {
        let dom = self.dom;
        let figures: Vec<NodeId> = dom
            .descendants(el)
            .filter(|&id| dom.tag(id) == Some("figure") && dom.has_class(id, "image-block"))
            .collect();
        let images: Vec<ImageItem> = figures
            .into_iter()
            .filter_map(|figure| self.gallery_image(figure))
            .collect();
        if images.is_empty() {
            log::debug!("skipping image gallery without images");
            return None;
        }
        let layout = dom.attr(el, "data-layout").unwrap_or(DEFAULT_LAYOUT);
        Some(self.gallery_block(images, layout))
    }

    fn gallery_block(&mut self, images: Vec<ImageItem>, layout: &str) -> Block {
        Block::Gallery(GalleryBlock {
            id: self.ids.next(),
            images,
            layout: layout.to_string(),
        })
    }

    /// One `figure.image-block`; `None` when it holds no `<img>`.
    fn gallery_image(&mut self, figure: NodeId) -> Option<ImageItem> {
        let dom = self.dom;
        let img = dom.find_tag(figure, "img")?;
        let style = InlineStyle::parse(dom.attr(img, "style").unwrap_or_default());
        let (width, height) = self.image_size(img, &style);

        let mut item = ImageItem::new(
            self.ids.next(),
            dom.attr(img, "src").unwrap_or_default(),
            width,
            height,
        );
        item.keep_ratio = style.get("object-fit") == Some("contain");
        item.caption = self.caption(figure);
        Some(item)
    }

    /// Pixel size from inline style, then attributes, then defaults.
    fn image_size(&self, img: NodeId, style: &InlineStyle) -> (u32, u32) {
        let width = style
            .px("width")
            .or_else(|| int_attr(self.dom.attr(img, "width")))
            .filter(|&w| w > 0)
            .unwrap_or(FALLBACK_IMAGE_SIZE);
        let height = style
            .px("height")
            .or_else(|| int_attr(self.dom.attr(img, "height")))
            .filter(|&h| h > 0)
            .unwrap_or(FALLBACK_IMAGE_SIZE);
        (width, height)
    }

    fn caption(&self, figure: NodeId) -> String {
        self.dom
            .find_class(figure, "image-caption")
            .or_else(|| self.dom.find_tag(figure, "figcaption"))
            .map(|c| self.dom.text(c))
            .unwrap_or_default()
    }

    fn full_width(&mut self, figure: NodeId) -> Option<Block> {
        let dom = self.dom;
        let img = dom.find_tag(figure, "img")?;
        let style = InlineStyle::parse(dom.attr(img, "style").unwrap_or_default());
        let mode = match style.get("object-fit") {
            Some("cover") => FullWidthMode::Fixed,
            _ => FullWidthMode::Auto,
        };
        let height = int_attr(dom.attr(img, "data-height"))
            .or_else(|| style.px("height"))
            .filter(|&h| h > 0)
            .unwrap_or(FALLBACK_FULL_WIDTH_HEIGHT);

        let mut item = ImageItem::new(
            self.ids.next(),
            dom.attr(img, "src").unwrap_or_default(),
            FALLBACK_IMAGE_SIZE,
            height,
        );
        item.keep_ratio = false;
        item.caption = self.caption(figure);

        Some(Block::FullWidthImage(FullWidthImageBlock {
            id: self.ids.next(),
            image: FullWidthImage { item, mode },
        }))
    }

    fn float(&mut self, container: NodeId) -> Option<Block> {
        let dom = self.dom;
        let figure = dom.find_class(container, "float-image-block")?;
        let img = dom.find_tag(figure, "img")?;

        let figure_style = InlineStyle::parse(dom.attr(figure, "style").unwrap_or_default());
        let width_percent = figure_style
            .percent("width")
            .unwrap_or(FLOAT_WIDTH_DEFAULT)
            .clamp(FLOAT_WIDTH_MIN, FLOAT_WIDTH_MAX);
        let align = match figure_style.get("order") {
            Some("1") => FloatAlign::Left,
            _ => FloatAlign::Right,
        };

        let img_style = InlineStyle::parse(dom.attr(img, "style").unwrap_or_default());
        let (width, height) = self.image_size(img, &img_style);
        let mut item = ImageItem::new(
            self.ids.next(),
            dom.attr(img, "src").unwrap_or_default(),
            width,
            height,
        );
        item.caption = self.caption(figure);

        let text = dom
            .find_class(container, "float-text-content")
            .map(|content| self.prose_html(content))
            .unwrap_or_else(|| "<p></p>".to_string());

        Some(Block::FloatImage(FloatImageBlock {
            id: self.ids.next(),
            image: FloatImage {
                item,
                align,
                width_percent,
            },
            text,
        }))
    }

    fn video(&mut self, iframe: NodeId) -> Option<Block> {
        let dom = self.dom;
        let src = dom.attr(iframe, "src").unwrap_or_default();
        let Some(video_id) = extract_video_id(src) else {
            log::debug!("skipping iframe without a recognised video: {src}");
            return None;
        };
        let width = int_attr(dom.attr(iframe, "width"))
            .filter(|&w| w > 0)
            .unwrap_or(DEFAULT_VIDEO_WIDTH);
        let height = int_attr(dom.attr(iframe, "height"))
            .filter(|&h| h > 0)
            .unwrap_or(DEFAULT_VIDEO_HEIGHT);

        Some(Block::Video(VideoBlock {
            id: self.ids.next(),
            url: watch_url(&video_id),
            video_id,
            width,
            height,
            aspect_ratio: ratio_of(width, height),
            keep_ratio: true,
        }))
    }
}

/// Alignment from a `text-align-*` class or a `text-align` declaration.
fn text_align(style: &InlineStyle, classes: &[String]) -> TextAlign {
    let from_class = classes
        .iter()
        .find_map(|c| c.strip_prefix("text-align-"));
    match from_class.or_else(|| style.get("text-align")) {
        Some("center") => TextAlign::Center,
        Some("right") => TextAlign::Right,
        _ => TextAlign::Left,
    }
}
