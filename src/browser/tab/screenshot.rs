//! Viewport screenshots.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as Base64Standard;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use tracing::debug;

use crate::error::Result;
use crate::har::{ON_PNG_RENDERED, ON_SCREENSHOT_PREPARED};

use super::Tab;

// ============================================================================
// ScreenshotBuilder
// ============================================================================

/// Builder for a PNG capture of the current viewport.
///
/// The viewport is rendered at the tab's configured viewport size. A width
/// scales the image preserving its aspect ratio; a height on top of that
/// crops (or pads with transparency) to exactly `width x height`, anchored
/// at the top-left corner.
///
/// # Example
///
/// ```ignore
/// // Full viewport, raw PNG bytes
/// let png = tab.screenshot().capture()?;
///
/// // 200x100 thumbnail as base64 text
/// let thumb = tab.screenshot().width(200).height(100).base64().capture()?;
/// ```
pub struct ScreenshotBuilder<'a> {
    tab: &'a mut Tab,
    width: Option<u32>,
    height: Option<u32>,
    base64: bool,
}

impl<'a> ScreenshotBuilder<'a> {
    pub(crate) fn new(tab: &'a mut Tab) -> Self {
        Self {
            tab,
            width: None,
            height: None,
            base64: false,
        }
    }

    /// Scales the image to this width. `0` keeps the rendered size.
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = (width > 0).then_some(width);
        self
    }

    /// Crops the scaled image to this height. Ignored without a width.
    #[must_use]
    pub fn height(mut self, height: u32) -> Self {
        self.height = (height > 0).then_some(height);
        self
    }

    /// Returns base64 text (as bytes) instead of raw PNG.
    #[must_use]
    pub fn base64(mut self) -> Self {
        self.base64 = true;
        self
    }

    /// Renders, resizes and encodes the viewport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`](crate::Error::Image) if PNG encoding fails.
    pub fn capture(self) -> Result<Vec<u8>> {
        let Self {
            tab,
            width,
            height,
            base64,
        } = self;

        let image = tab.engine.render_viewport();
        tab.har.store_timing(ON_SCREENSHOT_PREPARED);

        let (source_width, source_height) = image.dimensions();
        let image = match width {
            Some(width) => fit_to_width(image, width, height),
            None => image,
        };
        debug!(
            uid = %tab.uid(),
            source_width,
            source_height,
            width = image.width(),
            height = image.height(),
            "Screenshot prepared"
        );

        let png = encode_png(image)?;
        let output = if base64 {
            Base64Standard.encode(&png).into_bytes()
        } else {
            png
        };

        tab.har.store_timing(ON_PNG_RENDERED);
        Ok(output)
    }
}

// ============================================================================
// Tab - Screenshot
// ============================================================================

impl Tab {
    /// Creates a screenshot builder for the current viewport.
    #[must_use]
    pub fn screenshot(&mut self) -> ScreenshotBuilder<'_> {
        ScreenshotBuilder::new(self)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Height that keeps the aspect ratio of `source_width x source_height` at
/// `width`, rounded to the nearest pixel and never below 1.
pub(crate) fn scaled_height(source_width: u32, source_height: u32, width: u32) -> u32 {
    if source_width == 0 {
        return source_height.max(1);
    }
    let height = (f64::from(source_height) * f64::from(width) / f64::from(source_width)).round();
    (height as u32).max(1)
}

/// Scales `image` to `width`, then crops or pads to `height` if given.
pub(crate) fn fit_to_width(image: RgbaImage, width: u32, height: Option<u32>) -> RgbaImage {
    if image.width() == 0 || image.height() == 0 {
        return image;
    }

    let natural_height = scaled_height(image.width(), image.height(), width);
    let scaled = if image.dimensions() == (width, natural_height) {
        image
    } else {
        imageops::resize(&image, width, natural_height, FilterType::Triangle)
    };

    match height {
        Some(height) if height != natural_height => {
            let mut canvas = RgbaImage::new(width, height);
            imageops::replace(&mut canvas, &scaled, 0, 0);
            canvas
        }
        _ => scaled,
    }
}

fn encode_png(image: RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(image).write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}

// ============================================================================
// Tests
// ============================================================================
