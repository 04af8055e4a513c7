use serde::{Deserialize, Serialize};

use super::block::Block;
use super::id::Identifier;
use super::image::non_empty;

pub const DEFAULT_SECTION_HEIGHT: u32 = 300;
/// Width a standalone page gives sections without one.
pub const DEFAULT_SECTION_WIDTH: u32 = 1200;
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Which background property of a section is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BackgroundType {
    #[default]
    #[serde(rename = "color")]
    Color,
    #[serde(rename = "image", alias = "img")]
    Image,
}

fn default_height() -> u32 {
    DEFAULT_SECTION_HEIGHT
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

/// Section geometry and background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default)]
    pub bg_type: BackgroundType,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub bg_img: String,
    /// Transient blob handle backing `bg_img`, if any.
    #[serde(
        rename = "_blobUrl",
        alias = "_transientAssetRef",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub transient_ref: Option<String>,
}

impl Default for SectionProps {
    fn default() -> Self {
        Self {
            width: None,
            height: DEFAULT_SECTION_HEIGHT,
            bg_type: BackgroundType::Color,
            background: default_background(),
            bg_img: String::new(),
            transient_ref: None,
        }
    }
}

impl SectionProps {
    /// The image source when the image background is active and set.
    pub fn active_image(&self) -> Option<&str> {
        (self.bg_type == BackgroundType::Image && !self.bg_img.is_empty())
            .then_some(self.bg_img.as_str())
    }
}

/// A vertically stacked container of blocks with its own background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: Identifier,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub props: SectionProps,
}

impl Section {
    pub fn new(id: Identifier) -> Self {
        Self {
            id,
            blocks: Vec::new(),
            props: SectionProps::default(),
        }
    }

    pub fn block(&self, id: Identifier) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == Some(id))
    }

    pub fn block_mut(&mut self, id: Identifier) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|b| b.id() == Some(id))
    }

    pub fn block_index(&self, id: Identifier) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == Some(id))
    }

    /// Every transient handle owned by this section and its blocks.
    pub fn transient_refs(&self) -> impl Iterator<Item = &str> {
        self.props
            .transient_ref
            .as_deref()
            .into_iter()
            .chain(self.blocks.iter().flat_map(|b| b.transient_refs()))
    }
}
