//! Natural-dimension probing for image sources.

use crate::error::{Error, Result};
use crate::util::extract_image_dimensions;

use super::blob::BlobStore;
use super::data_uri::decode_data_uri;
use super::is_transient;

/// Natural size of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Resolves an image source to its natural dimensions.
///
/// The editor's own [`BlobStore`] answers for blob handles and data URIs;
/// callers that can fetch remote URLs provide their own implementation.
pub trait ImageProbe {
    fn probe(&self, src: &str) -> Result<Dimensions>;
}

impl ImageProbe for BlobStore {
    fn probe(&self, src: &str) -> Result<Dimensions> {
        let data = if is_transient(src) {
            self.get(src)
                .map(|blob| blob.data.clone())
                .ok_or_else(|| Error::ImageLoad(format!("{src} has been released")))?
        } else if let Some((_, data)) = decode_data_uri(src) {
            data
        } else {
            return Err(Error::ImageLoad(format!("cannot read {src}")));
        };

        extract_image_dimensions(&data)
            .map(|(width, height)| Dimensions { width, height })
            .ok_or_else(|| Error::ImageLoad(format!("unrecognised image data in {src}")))
    }
}

/// A probe that answers every source with the same size.
#[derive(Debug, Clone, Copy)]
pub struct FixedProbe(pub Dimensions);

impl ImageProbe for FixedProbe {
    fn probe(&self, _src: &str) -> Result<Dimensions> {
        Ok(self.0)
    }
}
