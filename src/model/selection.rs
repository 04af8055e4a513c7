use serde::Serialize;

use super::id::Identifier;

/// The single editing cursor.
///
/// Serializes in the flat `{type, sectionId, blockId, imageIndex}` shape
/// UI code expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    None,
    #[serde(rename_all = "camelCase")]
    Section { section_id: Identifier },
    #[serde(rename_all = "camelCase")]
    Block {
        section_id: Identifier,
        block_id: Identifier,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        section_id: Identifier,
        block_id: Identifier,
        image_index: usize,
    },
}

impl Selection {
    pub fn section_id(&self) -> Option<Identifier> {
        match *self {
            Selection::None => None,
            Selection::Section { section_id }
            | Selection::Block { section_id, .. }
            | Selection::Image { section_id, .. } => Some(section_id),
        }
    }

    pub fn block_id(&self) -> Option<Identifier> {
        match *self {
            Selection::Block { block_id, .. } | Selection::Image { block_id, .. } => {
                Some(block_id)
            }
            _ => None,
        }
    }

    pub fn image_index(&self) -> Option<usize> {
        match *self {
            Selection::Image { image_index, .. } => Some(image_index),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }
}
