//! The editing session: document, selection and the mutation API.
//!
//! An [`Editor`] is created when a session starts and owns everything the
//! session touches: the sections, the selection cursor, the identifier
//! allocator and the pool of transient image handles. UI code calls into it
//! for every change; nothing about the document lives in global state.
//!
//! Operations that target "the selected thing" are no-ops returning `false`
//! when nothing suitable is selected. Operations the user is told about
//! (missing section, unreadable image, bad video URL) return [`Error`]s.
//!
//! Image creation is split in two so the natural-size probe can run
//! asynchronously: [`Editor::begin_image`] records a generation for the
//! target section and [`Editor::finish_image`] applies the result only if no
//! newer request for that section started in between.
//!
//! # Example
//!
//! ```
//! use newsworthy::Editor;
//! use newsworthy::model::Selection;
//!
//! let mut editor = Editor::new();
//! let section = editor.add_section(None).id;
//! editor.select_section(section);
//! let text = editor.add_text_block().unwrap();
//! assert_eq!(editor.selection().block_id(), Some(text));
//!
//! editor.delete_selected();
//! assert_eq!(editor.selection(), Selection::Section { section_id: section });
//! ```

mod geometry;
mod video;

#[cfg(test)]
mod tests;

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::assets::{BlobStore, Dimensions, ImageProbe, externalize_sections, is_transient};
use crate::error::{Error, Result};
use crate::export::{HtmlConfig, encode_html};
use crate::model::{
    BackgroundType, Block, DEFAULT_LAYOUT, FLOAT_WIDTH_DEFAULT, FLOAT_WIDTH_MAX, FLOAT_WIDTH_MIN,
    FloatAlign, FloatImage, FloatImageBlock, FullWidthImage, FullWidthImageBlock, FullWidthMode,
    GalleryBlock, IdAllocator, Identifier, ImageItem, Section, Selection, TextAlign, TextBlock,
    TextProps, VideoBlock, ratio_of, sections_to_json,
};

pub use geometry::{Geometry, fit_within};
pub use video::{
    DEFAULT_VIDEO_HEIGHT, DEFAULT_VIDEO_WIDTH, embed_url, extract_video_id, watch_url,
};

/// Markup of a freshly added text block.
pub const TEXT_PLACEHOLDER: &str = "<p>New text block…</p>";
/// Markup beside a freshly added float image.
pub const FLOAT_TEXT_PLACEHOLDER: &str = "<p>Add text beside the image…</p>";
/// Gallery images start inside a square of this size.
pub const GALLERY_START_SIZE: u32 = 300;
/// Fixed-mode height of a freshly added full-width image.
pub const FULL_WIDTH_DEFAULT_HEIGHT: u32 = 400;
/// Used when a probe reports a zero dimension.
const FALLBACK_NATURAL_SIZE: u32 = 300;

/// Which image-bearing block an image is added as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gallery,
    FullWidth,
    Float,
}

/// An image creation waiting for its natural-size probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingImage {
    pub kind: ImageKind,
    pub src: String,
    pub section_id: Identifier,
    /// Gallery selected when the request started, if it had room.
    pub gallery_id: Option<Identifier>,
    pub generation: u64,
}

/// Result of finishing an image creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Added {
        block_id: Identifier,
        /// Position of the image within its block (always 0 outside galleries).
        image_index: usize,
    },
    /// A newer request superseded this one, or its section is gone.
    Discarded,
}

/// An editing session over one document.
#[derive(Debug, Default)]
pub struct Editor {
    sections: Vec<Section>,
    selection: Selection,
    ids: IdAllocator,
    blobs: BlobStore,
    generation: u64,
    /// Latest image-request generation per section.
    pending: HashMap<Identifier, u64>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Accessors ---

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// The handle pool, for registering dropped files before adding them.
    pub fn blobs_mut(&mut self) -> &mut BlobStore {
        &mut self.blobs
    }

    pub fn section(&self, id: Identifier) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    fn section_index(&self, id: Identifier) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.section(self.selection.section_id()?)
    }

    fn current_section_mut(&mut self) -> Option<&mut Section> {
        let id = self.selection.section_id()?;
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn current_block(&self) -> Option<&Block> {
        self.current_section()?.block(self.selection.block_id()?)
    }

    fn current_block_mut(&mut self) -> Option<&mut Block> {
        let block_id = self.selection.block_id()?;
        self.current_section_mut()?.block_mut(block_id)
    }

    /// The selected gallery image; a selected gallery block means its first image.
    fn current_gallery_image_mut(&mut self) -> Option<&mut ImageItem> {
        let index = self.selection.image_index().unwrap_or(0);
        match self.current_block_mut()? {
            Block::Gallery(gallery) => gallery.images.get_mut(index),
            _ => None,
        }
    }

    /// The selected image of any image-bearing block.
    fn current_image_mut(&mut self) -> Option<&mut ImageItem> {
        let index = self.selection.image_index().unwrap_or(0);
        match self.current_block_mut()? {
            Block::Gallery(gallery) => gallery.images.get_mut(index),
            Block::FullWidthImage(block) => Some(&mut block.image.item),
            Block::FloatImage(block) => Some(&mut block.image.item),
            _ => None,
        }
    }

    // --- Sections and blocks ---

    /// Append an empty section.
    pub fn add_section(&mut self, width: Option<u32>) -> &Section {
        let mut section = Section::new(self.ids.next());
        section.props.width = width;
        self.sections.push(section);
        &self.sections[self.sections.len() - 1]
    }

    /// Append a placeholder text block to the selected section and select it.
    pub fn add_text_block(&mut self) -> Result<Identifier> {
        let block_id = self.ids.next();
        let section = self.current_section_mut().ok_or(Error::NoSectionSelected)?;
        section.blocks.push(Block::Text(TextBlock {
            id: block_id,
            html: TEXT_PLACEHOLDER.to_string(),
            align: TextAlign::Left,
            props: TextProps::default(),
        }));
        let section_id = section.id;
        self.selection = Selection::Block {
            section_id,
            block_id,
        };
        Ok(block_id)
    }

    /// Append a video block to the selected section and select it.
    pub fn add_video_block(&mut self, url: &str) -> Result<Identifier> {
        let section_id = self
            .current_section()
            .map(|s| s.id)
            .ok_or(Error::NoSectionSelected)?;
        let video_id =
            extract_video_id(url).ok_or_else(|| Error::InvalidVideoUrl(url.to_string()))?;

        let block_id = self.ids.next();
        let block = VideoBlock {
            id: block_id,
            url: url.trim().to_string(),
            video_id,
            width: DEFAULT_VIDEO_WIDTH,
            height: DEFAULT_VIDEO_HEIGHT,
            aspect_ratio: ratio_of(DEFAULT_VIDEO_WIDTH, DEFAULT_VIDEO_HEIGHT),
            keep_ratio: true,
        };
        if let Some(section) = self.current_section_mut() {
            section.blocks.push(Block::Video(block));
        }
        self.selection = Selection::Block {
            section_id,
            block_id,
        };
        Ok(block_id)
    }

    // --- Images ---

    /// Add an image to a gallery (the selected one when it has room).
    pub fn add_image_block(&mut self, src: &str) -> Result<ImageOutcome> {
        self.add_image(ImageKind::Gallery, src)
    }

    pub fn add_full_width_image_block(&mut self, src: &str) -> Result<ImageOutcome> {
        self.add_image(ImageKind::FullWidth, src)
    }

    pub fn add_float_image_block(&mut self, src: &str) -> Result<ImageOutcome> {
        self.add_image(ImageKind::Float, src)
    }

    /// Add an image, probing it through the session's own blob store.
    pub fn add_image(&mut self, kind: ImageKind, src: &str) -> Result<ImageOutcome> {
        let pending = self.begin_image(kind, src)?;
        let probed = self.blobs.probe(src);
        self.finish_image(pending, probed)
    }

    /// Add an image, probing it with a caller-supplied probe.
    pub fn add_image_with(
        &mut self,
        kind: ImageKind,
        src: &str,
        probe: &impl ImageProbe,
    ) -> Result<ImageOutcome> {
        let pending = self.begin_image(kind, src)?;
        let probed = probe.probe(src);
        self.finish_image(pending, probed)
    }

    /// Start an image creation in the selected section.
    pub fn begin_image(&mut self, kind: ImageKind, src: &str) -> Result<PendingImage> {
        let section_id = self
            .current_section()
            .map(|s| s.id)
            .ok_or(Error::NoSectionSelected)?;
        let gallery_id = match (kind, self.current_block()) {
            (ImageKind::Gallery, Some(Block::Gallery(gallery))) if !gallery.is_full() => {
                Some(gallery.id)
            }
            _ => None,
        };

        self.generation += 1;
        self.pending.insert(section_id, self.generation);

        Ok(PendingImage {
            kind,
            src: src.to_string(),
            section_id,
            gallery_id,
            generation: self.generation,
        })
    }

    /// Complete an image creation with its probe result.
    ///
    /// Stale requests are discarded without touching the document. A failed
    /// probe is returned as-is and also leaves the document unchanged. In
    /// both cases a transient source is released unless the document
    /// already refers to it.
    pub fn finish_image(
        &mut self,
        pending: PendingImage,
        probed: Result<Dimensions>,
    ) -> Result<ImageOutcome> {
        if self.pending.get(&pending.section_id) != Some(&pending.generation) {
            log::debug!(
                "discarding stale image request {} for section {}",
                pending.generation,
                pending.section_id
            );
            self.release_unreferenced(&pending.src);
            return Ok(ImageOutcome::Discarded);
        }
        self.pending.remove(&pending.section_id);

        let dims = match probed {
            Ok(dims) => dims,
            Err(e) => {
                log::error!("{e}");
                self.release_unreferenced(&pending.src);
                return Err(e);
            }
        };
        let Some(section_index) = self.section_index(pending.section_id) else {
            self.release_unreferenced(&pending.src);
            return Ok(ImageOutcome::Discarded);
        };

        let natural_w = if dims.width == 0 { FALLBACK_NATURAL_SIZE } else { dims.width };
        let natural_h = if dims.height == 0 { FALLBACK_NATURAL_SIZE } else { dims.height };
        let image_id = self.ids.next();
        let block_id = self.ids.next();
        let section_id = pending.section_id;
        let section = &mut self.sections[section_index];

        let outcome = match pending.kind {
            ImageKind::Gallery => {
                let (width, height) = fit_within(natural_w, natural_h, GALLERY_START_SIZE);
                let mut item = ImageItem::new(image_id, pending.src, width, height);
                item.aspect_ratio = ratio_of(natural_w, natural_h);

                let existing = pending.gallery_id.and_then(|gallery_id| {
                    section.blocks.iter_mut().find_map(|b| match b {
                        Block::Gallery(g) if g.id == gallery_id && !g.is_full() => Some(g),
                        _ => None,
                    })
                });
                let (block_id, image_index) = match existing {
                    Some(gallery) => {
                        gallery.images.push(item);
                        (gallery.id, gallery.images.len() - 1)
                    }
                    None => {
                        section.blocks.push(Block::Gallery(GalleryBlock {
                            id: block_id,
                            images: vec![item],
                            layout: DEFAULT_LAYOUT.to_string(),
                        }));
                        (block_id, 0)
                    }
                };
                self.selection = Selection::Image {
                    section_id,
                    block_id,
                    image_index,
                };
                ImageOutcome::Added {
                    block_id,
                    image_index,
                }
            }
            ImageKind::FullWidth => {
                let mut item = ImageItem::new(image_id, pending.src, natural_w, natural_h);
                item.height = FULL_WIDTH_DEFAULT_HEIGHT;
                item.keep_ratio = false;
                section.blocks.push(Block::FullWidthImage(FullWidthImageBlock {
                    id: block_id,
                    image: FullWidthImage {
                        item,
                        mode: FullWidthMode::Auto,
                    },
                }));
                self.selection = Selection::Block {
                    section_id,
                    block_id,
                };
                ImageOutcome::Added {
                    block_id,
                    image_index: 0,
                }
            }
            ImageKind::Float => {
                let item = ImageItem::new(image_id, pending.src, natural_w, natural_h);
                section.blocks.push(Block::FloatImage(FloatImageBlock {
                    id: block_id,
                    image: FloatImage {
                        item,
                        align: FloatAlign::Right,
                        width_percent: FLOAT_WIDTH_DEFAULT,
                    },
                    text: FLOAT_TEXT_PLACEHOLDER.to_string(),
                }));
                self.selection = Selection::Block {
                    section_id,
                    block_id,
                };
                ImageOutcome::Added {
                    block_id,
                    image_index: 0,
                }
            }
        };
        Ok(outcome)
    }

    // --- Geometry ---

    pub fn set_img_width(&mut self, width: u32) -> bool {
        self.current_gallery_image_mut()
            .map(|img| img.set_width(width))
            .is_some()
    }

    pub fn set_img_height(&mut self, height: u32) -> bool {
        self.current_gallery_image_mut()
            .map(|img| img.set_height(height))
            .is_some()
    }

    pub fn set_img_keep_ratio(&mut self, keep: bool) -> bool {
        self.current_gallery_image_mut()
            .map(|img| img.set_keep_ratio(keep))
            .is_some()
    }

    fn current_video_mut(&mut self) -> Option<&mut VideoBlock> {
        match self.current_block_mut()? {
            Block::Video(video) => Some(video),
            _ => None,
        }
    }

    pub fn set_video_width(&mut self, width: u32) -> bool {
        self.current_video_mut()
            .map(|v| v.set_width(width))
            .is_some()
    }

    pub fn set_video_height(&mut self, height: u32) -> bool {
        self.current_video_mut()
            .map(|v| v.set_height(height))
            .is_some()
    }

    pub fn set_video_keep_ratio(&mut self, keep: bool) -> bool {
        self.current_video_mut()
            .map(|v| v.set_keep_ratio(keep))
            .is_some()
    }

    fn current_full_width_mut(&mut self) -> Option<&mut FullWidthImage> {
        match self.current_block_mut()? {
            Block::FullWidthImage(block) => Some(&mut block.image),
            _ => None,
        }
    }

    pub fn set_full_width_img_height(&mut self, height: u32) -> bool {
        self.current_full_width_mut()
            .map(|img| img.item.height = height.max(1))
            .is_some()
    }

    pub fn set_full_width_img_mode(&mut self, mode: FullWidthMode) -> bool {
        self.current_full_width_mut()
            .map(|img| img.mode = mode)
            .is_some()
    }

    fn current_float_mut(&mut self) -> Option<&mut FloatImageBlock> {
        match self.current_block_mut()? {
            Block::FloatImage(block) => Some(block),
            _ => None,
        }
    }

    /// Set the float image width in percent, clamped to `[20, 70]`.
    pub fn set_float_img_width(&mut self, percent: u32) -> bool {
        self.current_float_mut()
            .map(|b| b.image.width_percent = percent.clamp(FLOAT_WIDTH_MIN, FLOAT_WIDTH_MAX))
            .is_some()
    }

    pub fn set_float_img_align(&mut self, align: FloatAlign) -> bool {
        self.current_float_mut()
            .map(|b| b.image.align = align)
            .is_some()
    }

    // --- Content ---

    pub fn set_float_text(&mut self, html: &str) -> bool {
        self.current_float_mut()
            .map(|b| b.text = html.to_string())
            .is_some()
    }

    fn current_text_mut(&mut self) -> Option<&mut TextBlock> {
        match self.current_block_mut()? {
            Block::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn set_text_html(&mut self, html: &str) -> bool {
        self.current_text_mut()
            .map(|t| t.html = html.to_string())
            .is_some()
    }

    /// Set the text block's max-width (any CSS length).
    pub fn set_text_width(&mut self, width: &str) -> bool {
        self.current_text_mut()
            .map(|t| t.props.width = width.trim().to_string())
            .is_some()
    }

    pub fn set_text_align(&mut self, align: TextAlign) -> bool {
        self.current_text_mut()
            .map(|t| t.align = align)
            .is_some()
    }

    pub fn set_caption(&mut self, caption: &str) -> bool {
        self.current_image_mut()
            .map(|img| img.caption = caption.to_string())
            .is_some()
    }

    pub fn set_caption_position(&mut self, position: &str) -> bool {
        self.current_image_mut()
            .map(|img| img.caption_position = position.to_string())
            .is_some()
    }

    pub fn set_caption_bubble_animated(&mut self, animated: bool) -> bool {
        self.current_image_mut()
            .map(|img| img.caption_bubble_animated = animated)
            .is_some()
    }

    // --- Section properties ---

    /// Set a flat background color and make it the active background.
    pub fn set_sec_bg(&mut self, color: &str) -> bool {
        self.current_section_mut()
            .map(|s| {
                s.props.background = color.to_string();
                s.props.bg_type = BackgroundType::Color;
            })
            .is_some()
    }

    /// Set a background image and make it the active background.
    ///
    /// A previous transient handle is released unless it is the new source
    /// or another field still refers to it.
    pub fn set_sec_bg_img(&mut self, url: &str) -> bool {
        let Some(index) = self
            .selection
            .section_id()
            .and_then(|id| self.section_index(id))
        else {
            return false;
        };

        let props = &mut self.sections[index].props;
        let old = props.transient_ref.take_if(|old| old.as_str() != url);
        props.bg_img = url.to_string();
        props.bg_type = BackgroundType::Image;
        props.transient_ref = is_transient(url).then(|| url.to_string());
        if let Some(old) = old {
            self.release_unreferenced(&old);
        }
        true
    }

    pub fn set_sec_type(&mut self, bg_type: BackgroundType) -> bool {
        self.current_section_mut()
            .map(|s| s.props.bg_type = bg_type)
            .is_some()
    }

    pub fn set_sec_height(&mut self, height: u32) -> bool {
        self.current_section_mut()
            .map(|s| s.props.height = height.max(1))
            .is_some()
    }

    // --- Ordering ---

    /// Move a section to `index` (clamped to the end).
    pub fn move_section(&mut self, id: Identifier, index: usize) -> bool {
        let Some(from) = self.section_index(id) else {
            return false;
        };
        let section = self.sections.remove(from);
        let to = index.min(self.sections.len());
        self.sections.insert(to, section);
        true
    }

    /// Move a block within its section to `index` (clamped to the end).
    pub fn move_block(&mut self, section_id: Identifier, block_id: Identifier, index: usize) -> bool {
        let Some(section) = self.sections.iter_mut().find(|s| s.id == section_id) else {
            return false;
        };
        let Some(from) = section.block_index(block_id) else {
            return false;
        };
        let block = section.blocks.remove(from);
        let to = index.min(section.blocks.len());
        section.blocks.insert(to, block);
        true
    }

    // --- Selection ---

    /// Select a section; an unknown id clears the selection.
    pub fn select_section(&mut self, section_id: Identifier) -> bool {
        if self.section(section_id).is_some() {
            self.selection = Selection::Section { section_id };
            true
        } else {
            self.not_selected();
            false
        }
    }

    /// Select a block; an unknown id clears the selection.
    pub fn select_block(&mut self, section_id: Identifier, block_id: Identifier) -> bool {
        let exists = self
            .section(section_id)
            .is_some_and(|s| s.block(block_id).is_some());
        if exists {
            self.selection = Selection::Block {
                section_id,
                block_id,
            };
        } else {
            self.not_selected();
        }
        exists
    }

    /// Select one image of a gallery; an unknown target clears the selection.
    pub fn select_image(
        &mut self,
        section_id: Identifier,
        block_id: Identifier,
        image_index: usize,
    ) -> bool {
        let exists = matches!(
            self.section(section_id).and_then(|s| s.block(block_id)),
            Some(Block::Gallery(g)) if image_index < g.images.len()
        );
        if exists {
            self.selection = Selection::Image {
                section_id,
                block_id,
                image_index,
            };
        } else {
            self.not_selected();
        }
        exists
    }

    pub fn not_selected(&mut self) {
        self.selection = Selection::None;
    }

    // --- Deletion ---

    /// Delete whatever is selected, releasing the handles it owned.
    pub fn delete_selected(&mut self) -> bool {
        match self.selection {
            Selection::None => false,
            Selection::Section { section_id } => {
                let Some(index) = self.section_index(section_id) else {
                    self.not_selected();
                    return false;
                };
                let section = self.sections.remove(index);
                for handle in section.transient_refs() {
                    self.release_unreferenced(handle);
                }
                self.pending.remove(&section_id);
                self.not_selected();
                true
            }
            Selection::Block {
                section_id,
                block_id,
            } => self.delete_block(section_id, block_id),
            Selection::Image {
                section_id,
                block_id,
                image_index,
            } => {
                let Some(section) = self.sections.iter_mut().find(|s| s.id == section_id) else {
                    self.not_selected();
                    return false;
                };
                let Some(Block::Gallery(gallery)) = section.block_mut(block_id) else {
                    return self.delete_block(section_id, block_id);
                };
                if image_index >= gallery.images.len() {
                    return self.delete_block(section_id, block_id);
                }

                let removed = gallery.images.remove(image_index);
                let emptied = gallery.images.is_empty();
                if let Some(handle) = removed.transient_ref {
                    self.release_unreferenced(&handle);
                }
                if emptied {
                    return self.delete_block(section_id, block_id);
                }
                self.selection = Selection::Block {
                    section_id,
                    block_id,
                };
                true
            }
        }
    }

    /// Remove a block and select its section.
    fn delete_block(&mut self, section_id: Identifier, block_id: Identifier) -> bool {
        let Some(section) = self.sections.iter_mut().find(|s| s.id == section_id) else {
            self.not_selected();
            return false;
        };
        let Some(index) = section.block_index(block_id) else {
            self.selection = Selection::Section { section_id };
            return false;
        };
        let block = section.blocks.remove(index);
        for handle in block.transient_refs() {
            self.release_unreferenced(handle);
        }
        self.selection = Selection::Section { section_id };
        true
    }

    fn is_referenced(&self, handle: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.transient_refs().any(|h| h == handle))
    }

    /// Release a transient handle once no document field refers to it.
    fn release_unreferenced(&mut self, handle: &str) -> bool {
        if !is_transient(handle) {
            return false;
        }
        if self.is_referenced(handle) {
            log::debug!("keeping {handle}, still referenced");
            return false;
        }
        self.blobs.revoke(handle)
    }

    /// Release every transient handle held by the document.
    ///
    /// Returns the number of handles released.
    pub fn revoke_all_blobs(&mut self) -> usize {
        let mut released = 0;
        for section in self.sections.iter_mut() {
            if let Some(handle) = section.props.transient_ref.take() {
                released += usize::from(self.blobs.revoke(&handle));
            }
            for block in section.blocks.iter_mut() {
                for image in block.images_mut() {
                    if let Some(handle) = image.transient_ref.take() {
                        released += usize::from(self.blobs.revoke(&handle));
                    }
                }
            }
        }
        released
    }

    /// Release all handles and empty the document and selection.
    pub fn clear_all_sections(&mut self) {
        self.revoke_all_blobs();
        self.sections.clear();
        self.pending.clear();
        self.not_selected();
    }

    // --- Storage ---

    /// Replace the document from storage data.
    ///
    /// Accepts a JSON string holding a section array, or a section array
    /// value. On any format error the current document is left untouched.
    pub fn load_sections(&mut self, data: &Value) -> Result<usize> {
        match data {
            Value::String(json) => self.load_json(json),
            Value::Array(_) => {
                let sections: Vec<Section> = serde_json::from_value(data.clone())
                    .map_err(|e| Error::LoadFormat(e.to_string()))?;
                Ok(self.adopt(sections))
            }
            other => Err(Error::LoadFormat(format!(
                "expected a JSON string or an array of sections, got {}",
                json_kind(other)
            ))),
        }
    }

    /// Replace the document from its serialized JSON form.
    pub fn load_json(&mut self, json: &str) -> Result<usize> {
        let sections: Vec<Section> =
            serde_json::from_str(json).map_err(|e| Error::LoadFormat(e.to_string()))?;
        Ok(self.adopt(sections))
    }

    /// Replace the document with a copy of already-structured sections.
    pub fn load_document(&mut self, sections: &[Section]) -> usize {
        self.adopt(sections.to_vec())
    }

    /// Serialize the document for storage.
    pub fn to_json(&self) -> Result<String> {
        Ok(sections_to_json(&self.sections)?)
    }

    /// Take ownership of new sections after clearing the current ones.
    ///
    /// Duplicate identifiers are re-allocated and every identifier is
    /// observed so fresh allocations cannot collide with loaded ones.
    /// Handles that this session no longer owns are dropped.
    fn adopt(&mut self, mut sections: Vec<Section>) -> usize {
        self.clear_all_sections();

        for section in &sections {
            self.ids.observe(section.id);
            for block in &section.blocks {
                if let Some(id) = block.id() {
                    self.ids.observe(id);
                }
                for image in block.images() {
                    self.ids.observe(image.id);
                }
            }
        }

        let mut seen = HashSet::new();
        let ids = &mut self.ids;
        let mut claim = |id: &mut Identifier| {
            if !seen.insert(*id) {
                *id = ids.next();
                seen.insert(*id);
            }
        };
        for section in sections.iter_mut() {
            claim(&mut section.id);
            if section
                .props
                .transient_ref
                .as_deref()
                .is_some_and(|h| !self.blobs.contains(h))
            {
                section.props.transient_ref = None;
            }
            for block in section.blocks.iter_mut() {
                match block {
                    Block::Text(b) => claim(&mut b.id),
                    Block::Gallery(b) => claim(&mut b.id),
                    Block::FullWidthImage(b) => claim(&mut b.id),
                    Block::FloatImage(b) => claim(&mut b.id),
                    Block::Video(b) => claim(&mut b.id),
                    Block::Unknown => {}
                }
                for image in block.images_mut() {
                    claim(&mut image.id);
                    if image
                        .transient_ref
                        .as_deref()
                        .is_some_and(|h| !self.blobs.contains(h))
                    {
                        image.transient_ref = None;
                    }
                }
            }
        }

        log::debug!("loaded {} sections", sections.len());
        self.sections = sections;
        self.sections.len()
    }

    // --- HTML ---

    /// Encode the document as HTML, externalizing transient images first.
    ///
    /// Works on a copy; the live document keeps its handles.
    pub fn export_html(&self, config: &HtmlConfig) -> String {
        let mut sections = self.sections.clone();
        externalize_sections(&mut sections, &self.blobs);
        encode_html(&sections, config)
    }

    /// Replace the document with sections decoded from HTML.
    pub fn import_html(&mut self, html: &str) -> usize {
        let sections = crate::import::decode(html, &mut self.ids);
        self.adopt(sections)
    }

    /// Replace the document with sections decoded from raw HTML bytes.
    ///
    /// Unreadable input leaves an empty document and returns the error.
    pub fn import_html_bytes(&mut self, bytes: &[u8]) -> Result<usize> {
        match crate::import::decode_bytes(bytes, &mut self.ids) {
            Ok(sections) => Ok(self.adopt(sections)),
            Err(e) => {
                log::error!("{e}");
                self.clear_all_sections();
                Err(e)
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
