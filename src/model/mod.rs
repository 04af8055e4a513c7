//! Document model: sections, blocks, image items and the selection cursor.
//!
//! A document is an ordered `Vec<Section>`; each section owns its blocks and
//! each image-bearing block owns its image items. Mutation goes through
//! [`crate::Editor`], which keeps selection and transient handles consistent.
//!
//! # Example
//!
//! ```
//! use newsworthy::model::{sections_from_json, sections_to_json};
//!
//! let json = r##"[{"id": 1, "blocks": [
//!     {"id": 2, "type": "text", "html": "<p>Hi</p>", "align": "left", "props": {"width": "65ch"}}
//! ], "props": {"height": 300, "bgType": "color", "background": "#ffffff", "bgImg": ""}}]"##;
//!
//! let sections = sections_from_json(json).unwrap();
//! assert_eq!(sections[0].blocks[0].kind(), "text");
//! let again = sections_from_json(&sections_to_json(&sections).unwrap()).unwrap();
//! assert_eq!(sections, again);
//! ```

mod block;
mod id;
mod image;
mod section;
mod selection;

pub use block::{
    Block, DEFAULT_LAYOUT, DEFAULT_TEXT_WIDTH, FloatImageBlock, FullWidthImageBlock,
    GALLERY_CAPACITY, GalleryBlock, TextAlign, TextBlock, TextProps, VideoBlock,
};
pub use id::{IdAllocator, Identifier, MAX_IDENTIFIER};
pub use image::{
    FLOAT_WIDTH_DEFAULT, FLOAT_WIDTH_MAX, FLOAT_WIDTH_MIN, FloatAlign, FloatImage,
    FullWidthImage, FullWidthMode, ImageItem, ratio_of,
};
pub use section::{
    BackgroundType, DEFAULT_BACKGROUND, DEFAULT_SECTION_HEIGHT, DEFAULT_SECTION_WIDTH, Section,
    SectionProps,
};
pub use selection::Selection;

/// A whole page: sections rendered top to bottom.
pub type Document = Vec<Section>;

/// Serialize sections for the storage collaborator.
pub fn sections_to_json(sections: &[Section]) -> serde_json::Result<String> {
    serde_json::to_string(sections)
}

/// Parse sections produced by [`sections_to_json`] (or the older store format).
pub fn sections_from_json(json: &str) -> serde_json::Result<Document> {
    serde_json::from_str(json)
}
