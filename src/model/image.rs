//! Image items held by image-bearing blocks.

use serde::{Deserialize, Serialize};

use super::id::Identifier;

fn default_caption_position() -> String {
    "bottom".to_string()
}

fn default_ratio() -> f64 {
    1.0
}

fn default_true() -> bool {
    true
}

/// One image's source, geometry and caption metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageItem {
    pub id: Identifier,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default = "default_ratio")]
    pub aspect_ratio: f64,
    #[serde(default = "default_true")]
    pub keep_ratio: bool,
    #[serde(default)]
    pub caption: String,
    #[serde(default = "default_caption_position")]
    pub caption_position: String,
    #[serde(default)]
    pub caption_bubble_animated: bool,
    /// Transient blob handle backing `src`, if any.
    #[serde(
        rename = "_blobUrl",
        alias = "_transientAssetRef",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_empty"
    )]
    pub transient_ref: Option<String>,
}

impl ImageItem {
    /// Create an item with the given geometry and default caption settings.
    pub fn new(id: Identifier, src: impl Into<String>, width: u32, height: u32) -> Self {
        let src = src.into();
        let transient_ref = crate::assets::is_transient(&src).then(|| src.clone());
        Self {
            id,
            src,
            width,
            height,
            aspect_ratio: ratio_of(width, height),
            keep_ratio: true,
            caption: String::new(),
            caption_position: default_caption_position(),
            caption_bubble_animated: false,
            transient_ref,
        }
    }
}

/// `width / height`, or 1.0 for degenerate sizes.
pub fn ratio_of(width: u32, height: u32) -> f64 {
    if width == 0 || height == 0 {
        1.0
    } else {
        width as f64 / height as f64
    }
}

/// Full-width image sizing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FullWidthMode {
    /// Height follows the image.
    #[default]
    Auto,
    /// Explicit height, image cropped to cover.
    Fixed,
}

/// The image of a full-width block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullWidthImage {
    #[serde(flatten)]
    pub item: ImageItem,
    #[serde(default)]
    pub mode: FullWidthMode,
}

/// Which side of the text a float image sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FloatAlign {
    Left,
    #[default]
    Right,
}

pub const FLOAT_WIDTH_MIN: u32 = 20;
pub const FLOAT_WIDTH_MAX: u32 = 70;
pub const FLOAT_WIDTH_DEFAULT: u32 = 45;

fn default_float_width() -> u32 {
    FLOAT_WIDTH_DEFAULT
}

/// The image of a float block, sized as a percentage of the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatImage {
    #[serde(flatten)]
    pub item: ImageItem,
    #[serde(default)]
    pub align: FloatAlign,
    #[serde(default = "default_float_width")]
    pub width_percent: u32,
}

/// Empty strings and nulls both mean "no handle".
pub(crate) fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}
