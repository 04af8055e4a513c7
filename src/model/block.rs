//! Content blocks.
//!
//! Blocks are internally tagged by `type` in their serialized form, so a
//! stored document reads `{"id": …, "type": "text", "html": …}`. Unknown
//! tags deserialize to [`Block::Unknown`], which renders as nothing.

use serde::{Deserialize, Serialize};

use super::id::Identifier;
use super::image::{FloatImage, FullWidthImage, ImageItem};

/// Maximum number of images held by one gallery block.
pub const GALLERY_CAPACITY: usize = 4;

pub const DEFAULT_TEXT_WIDTH: &str = "65ch";
pub const DEFAULT_LAYOUT: &str = "inline";

fn default_text_width() -> String {
    DEFAULT_TEXT_WIDTH.to_string()
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProps {
    /// CSS length used as the block's max-width.
    #[serde(default = "default_text_width")]
    pub width: String,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            width: default_text_width(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: Identifier,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub align: TextAlign,
    #[serde(default)]
    pub props: TextProps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryBlock {
    pub id: Identifier,
    #[serde(default)]
    pub images: Vec<ImageItem>,
    #[serde(default = "default_layout")]
    pub layout: String,
}

impl GalleryBlock {
    pub fn is_full(&self) -> bool {
        self.images.len() >= GALLERY_CAPACITY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullWidthImageBlock {
    pub id: Identifier,
    pub image: FullWidthImage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatImageBlock {
    pub id: Identifier,
    pub image: FloatImage,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoBlock {
    pub id: Identifier,
    #[serde(default)]
    pub url: String,
    pub video_id: String,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    #[serde(default)]
    pub keep_ratio: bool,
}

/// One content unit within a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    #[serde(rename = "text")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Gallery(GalleryBlock),
    #[serde(rename = "fullwidth-image")]
    FullWidthImage(FullWidthImageBlock),
    #[serde(rename = "float-image")]
    FloatImage(FloatImageBlock),
    #[serde(rename = "video")]
    Video(VideoBlock),
    /// A block type this version does not know about.
    #[serde(other)]
    Unknown,
}

impl Block {
    pub fn id(&self) -> Option<Identifier> {
        match self {
            Block::Text(b) => Some(b.id),
            Block::Gallery(b) => Some(b.id),
            Block::FullWidthImage(b) => Some(b.id),
            Block::FloatImage(b) => Some(b.id),
            Block::Video(b) => Some(b.id),
            Block::Unknown => None,
        }
    }

    /// The serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Text(_) => "text",
            Block::Gallery(_) => "image",
            Block::FullWidthImage(_) => "fullwidth-image",
            Block::FloatImage(_) => "float-image",
            Block::Video(_) => "video",
            Block::Unknown => "unknown",
        }
    }

    /// Image items owned by this block.
    pub fn images(&self) -> Vec<&ImageItem> {
        match self {
            Block::Gallery(b) => b.images.iter().collect(),
            Block::FullWidthImage(b) => vec![&b.image.item],
            Block::FloatImage(b) => vec![&b.image.item],
            _ => Vec::new(),
        }
    }

    /// Mutable image items owned by this block.
    pub fn images_mut(&mut self) -> Vec<&mut ImageItem> {
        match self {
            Block::Gallery(b) => b.images.iter_mut().collect(),
            Block::FullWidthImage(b) => vec![&mut b.image.item],
            Block::FloatImage(b) => vec![&mut b.image.item],
            _ => Vec::new(),
        }
    }

    pub fn transient_refs(&self) -> impl Iterator<Item = &str> {
        self.images()
            .into_iter()
            .filter_map(|img| img.transient_ref.as_deref())
    }
}
