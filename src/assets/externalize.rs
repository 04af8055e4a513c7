//! Conversion of transient references into self-contained data URIs.

use crate::error::{Error, Result};
use crate::model::Section;
use crate::util::detect_image_mime;

use super::blob::{Blob, BlobStore};
use super::data_uri::encode_data_uri;
use super::is_transient;

/// Supplies the bytes behind transient handles.
pub trait AssetSource {
    fn fetch(&self, handle: &str) -> Result<Blob>;
}

impl AssetSource for BlobStore {
    fn fetch(&self, handle: &str) -> Result<Blob> {
        self.get(handle)
            .cloned()
            .ok_or_else(|| Error::AssetExternalize(format!("{handle} is not a live handle")))
    }
}

/// Turn a source into a durable string.
///
/// Transient handles become `data:` URIs; everything else is returned as is.
/// A handle that cannot be fetched is passed through unchanged and logged,
/// so one dead asset never aborts an export.
pub fn externalize(src: &str, source: &impl AssetSource) -> String {
    if !is_transient(src) {
        return src.to_string();
    }

    match source.fetch(src) {
        Ok(blob) => {
            let mime = if blob.mime.is_empty() {
                detect_image_mime(&blob.data).unwrap_or("application/octet-stream")
            } else {
                blob.mime.as_str()
            };
            encode_data_uri(mime, &blob.data)
        }
        Err(e) => {
            log::warn!("{e}; exporting the original reference");
            src.to_string()
        }
    }
}

/// Externalize every section background and image source in place.
///
/// Operates on whatever it is given; callers pass a deep copy of the live
/// document. Transient bookkeeping is cleared on rewritten fields.
pub fn externalize_sections(sections: &mut [Section], source: &impl AssetSource) {
    for section in sections.iter_mut() {
        if is_transient(&section.props.bg_img) {
            section.props.bg_img = externalize(&section.props.bg_img, source);
            section.props.transient_ref = None;
        }

        for block in section.blocks.iter_mut() {
            for image in block.images_mut() {
                if is_transient(&image.src) {
                    image.src = externalize(&image.src, source);
                    image.transient_ref = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Block, GalleryBlock, IdAllocator, ImageItem};

    #[test]
    fn test_durable_sources_unchanged() {
        let store = BlobStore::new();
        assert_eq!(externalize("https://x/a.png", &store), "https://x/a.png");
        assert_eq!(externalize("data:,x", &store), "data:,x");
        assert_eq!(externalize("", &store), "");
    }

    #[test]
    fn test_transient_becomes_data_uri() {
        let mut store = BlobStore::new();
        let handle = store.create(vec![1, 2, 3], "image/png");
        assert_eq!(externalize(&handle, &store), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_missing_mime_is_sniffed() {
        let mut store = BlobStore::new();
        let handle = store.create(b"GIF89a\x01\x00\x01\x00".to_vec(), "");
        assert!(externalize(&handle, &store).starts_with("data:image/gif;base64,"));
    }

    #[test]
    fn test_dead_handle_passes_through() {
        let mut store = BlobStore::new();
        let handle = store.create(vec![1], "image/png");
        store.revoke(&handle);
        assert_eq!(externalize(&handle, &store), handle);
    }

    #[test]
    fn test_externalize_sections() {
        let mut ids = IdAllocator::new();
        let mut store = BlobStore::new();
        let bg = store.create(vec![9], "image/jpeg");
        let img = store.create(vec![8], "image/png");

        let mut section = Section::new(ids.next());
        section.props.bg_img = bg.clone();
        section.props.transient_ref = Some(bg);
        section.blocks.push(Block::Gallery(GalleryBlock {
            id: ids.next(),
            images: vec![ImageItem::new(ids.next(), img, 10, 10)],
            layout: "inline".to_string(),
        }));

        let mut sections = vec![section];
        externalize_sections(&mut sections, &store);

        assert_eq!(sections[0].props.bg_img, "data:image/jpeg;base64,CQ==");
        assert_eq!(sections[0].props.transient_ref, None);
        let images = sections[0].blocks[0].images();
        assert_eq!(images[0].src, "data:image/png;base64,CA==");
        assert_eq!(images[0].transient_ref, None);
    }
}
