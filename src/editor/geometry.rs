//! Width/height updates that honour a locked aspect ratio.

use crate::model::{ImageItem, VideoBlock, ratio_of};

/// Something with a pixel size and an optional locked aspect ratio.
///
/// When the ratio is locked, setting one dimension re-derives the other as
/// the nearest integer, never leaving the two inconsistent.
pub trait Geometry {
    fn size(&self) -> (u32, u32);
    fn set_size(&mut self, width: u32, height: u32);
    fn aspect_ratio(&self) -> f64;
    fn set_aspect_ratio(&mut self, ratio: f64);
    fn keep_ratio(&self) -> bool;
    fn set_keep_ratio_flag(&mut self, keep: bool);

    fn locked_ratio(&self) -> Option<f64> {
        let ratio = self.aspect_ratio();
        (self.keep_ratio() && ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }

    fn set_width(&mut self, width: u32) {
        let width = width.max(1);
        let (_, height) = self.size();
        match self.locked_ratio() {
            Some(ratio) => self.set_size(width, derive(width as f64 / ratio)),
            None => self.set_size(width, height),
        }
    }

    fn set_height(&mut self, height: u32) {
        let height = height.max(1);
        let (width, _) = self.size();
        match self.locked_ratio() {
            Some(ratio) => self.set_size(derive(height as f64 * ratio), height),
            None => self.set_size(width, height),
        }
    }

    /// Locking re-captures the ratio from the current size.
    fn set_keep_ratio(&mut self, keep: bool) {
        if keep {
            let (width, height) = self.size();
            self.set_aspect_ratio(ratio_of(width, height));
        }
        self.set_keep_ratio_flag(keep);
    }
}

fn derive(value: f64) -> u32 {
    (value.round() as u32).max(1)
}

impl Geometry for ImageItem {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    fn set_aspect_ratio(&mut self, ratio: f64) {
        self.aspect_ratio = ratio;
    }

    fn keep_ratio(&self) -> bool {
        self.keep_ratio
    }

    fn set_keep_ratio_flag(&mut self, keep: bool) {
        self.keep_ratio = keep;
    }
}

impl Geometry for VideoBlock {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn aspect_ratio(&self) -> f64 {
        self.aspect_ratio
    }

    fn set_aspect_ratio(&mut self, ratio: f64) {
        self.aspect_ratio = ratio;
    }

    fn keep_ratio(&self) -> bool {
        self.keep_ratio
    }

    fn set_keep_ratio_flag(&mut self, keep: bool) {
        self.keep_ratio = keep;
    }
}

/// Fit a natural size inside a `max`×`max` box, preserving its ratio.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    let (width, height) = (width.max(1), height.max(1));
    if width <= max && height <= max {
        return (width, height);
    }
    let ratio = ratio_of(width, height);
    if width >= height {
        (max, derive(max as f64 / ratio))
    } else {
        (derive(max as f64 * ratio), max)
    }
}
