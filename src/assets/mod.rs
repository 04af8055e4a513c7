//! Image assets: transient handles, data URIs, probing and externalization.
//!
//! Images dropped into the editor live in memory behind `blob:` handles
//! owned by a [`BlobStore`]. Before export every such handle is rewritten to
//! a self-contained `data:` URI so the HTML never references memory that
//! will not outlive the session.
//!
//! # Example
//!
//! ```
//! use newsworthy::assets::{BlobStore, externalize};
//!
//! let mut store = BlobStore::new();
//! let handle = store.create(vec![1, 2, 3], "image/png");
//! assert_eq!(externalize(&handle, &store), "data:image/png;base64,AQID");
//! assert_eq!(externalize("https://example.com/a.png", &store), "https://example.com/a.png");
//! ```

mod blob;
mod data_uri;
mod externalize;
mod probe;

pub use blob::{Blob, BlobStore};
pub use data_uri::{decode_data_uri, encode_data_uri};
pub use externalize::{AssetSource, externalize, externalize_sections};
pub use probe::{Dimensions, FixedProbe, ImageProbe};

/// URL scheme of transient in-memory handles.
pub const TRANSIENT_SCHEME: &str = "blob:";

/// Whether a source refers to a transient in-memory handle.
pub fn is_transient(src: &str) -> bool {
    src.starts_with(TRANSIENT_SCHEME)
}
