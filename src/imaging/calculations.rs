//! Pure calculation functions for bleed geometry.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! The bleed is a fixed physical fraction of the finished card width. Since
//! the card's physical width is known, the source DPI is implied by its pixel
//! width and never needs to be read from metadata.

use thiserror::Error;

/// Physical bleed allowance, summed over both opposite edges (inches).
pub const BLEED_WIDTH_IN: f64 = 0.24;

/// Physical width of a finished card without bleed (inches).
pub const CARD_WIDTH_NO_BLEED_IN: f64 = 2.48;

/// Length of the short side of each corner repair strip, as a fraction of the bleed.
pub const CORNER_STRIP_RATIO: f64 = 0.75;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("image width must be positive")]
    ZeroWidth,
    #[error("image height must be positive")]
    ZeroHeight,
}

/// Axis-aligned pixel rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Shrink by `by` pixels on all four sides.
    pub fn inset(&self, by: u32) -> Rect {
        Rect {
            x: self.x + by,
            y: self.y + by,
            width: self.width.saturating_sub(by * 2),
            height: self.height.saturating_sub(by * 2),
        }
    }

    /// Overlap of two rectangles; empty (zero-sized) when they don't touch.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect {
            x,
            y,
            width: right.saturating_sub(x),
            height: bottom.saturating_sub(y),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Compute the per-edge bleed in pixels for a card of the given pixel width.
///
/// `floor(round(width * 0.24 / 2.48) / 2)`: the nominal bleed is the sum of
/// both edges' insets, so each edge receives half of it.
///
/// # Examples
/// ```
/// # use bleeder::imaging::bleed_width_px;
/// // 750px wide card: round(72.58) = 73, halved → 36px on each edge
/// assert_eq!(bleed_width_px(750).unwrap(), 36);
/// ```
pub fn bleed_width_px(width: u32) -> Result<u32, GeometryError> {
    if width == 0 {
        return Err(GeometryError::ZeroWidth);
    }
    let total = ((width as f64 * BLEED_WIDTH_IN) / CARD_WIDTH_NO_BLEED_IN).round() as u32;
    Ok(total / 2)
}

/// Layout of a card once bleed has been added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BleedGeometry {
    /// Bleed added on each edge.
    pub bleed_px: u32,
    /// The whole output canvas.
    pub outer: Rect,
    /// Where the original artwork lands inside the canvas.
    pub inner: Rect,
}

impl BleedGeometry {
    /// Geometry for an original image of `width` x `height` pixels.
    pub fn for_dimensions(width: u32, height: u32) -> Result<Self, GeometryError> {
        if height == 0 {
            return Err(GeometryError::ZeroHeight);
        }
        let bleed_px = bleed_width_px(width)?;
        let outer = Rect::new(0, 0, width + bleed_px * 2, height + bleed_px * 2);
        Ok(Self {
            bleed_px,
            outer,
            inner: outer.inset(bleed_px),
        })
    }

    /// The eight rectangles painted by corner repair, two per inner corner.
    ///
    /// Each corner gets a strip `floor(0.75 * bleed)` wide and `bleed` tall plus
    /// one `bleed` wide and `floor(0.75 * bleed)` tall, both anchored on the
    /// corner and growing toward the artwork, so together they form an L
    /// hugging the corner. Rectangles are clipped to the canvas; empty ones
    /// are dropped.
    pub fn corner_repair_rects(&self) -> Vec<Rect> {
        let bleed = self.bleed_px;
        if bleed == 0 {
            return Vec::new();
        }
        let strip = (bleed as f64 * CORNER_STRIP_RATIO) as u32;
        let inner = self.inner;

        // (corner x, corner y, grows right?, grows down?)
        let corners = [
            (inner.x, inner.y, true, true),
            (inner.right(), inner.y, false, true),
            (inner.right(), inner.bottom(), false, false),
            (inner.x, inner.bottom(), true, false),
        ];

        let mut rects = Vec::with_capacity(8);
        for (cx, cy, rightward, downward) in corners {
            for (w, h) in [(strip, bleed), (bleed, strip)] {
                let x = if rightward { cx } else { cx.saturating_sub(w) };
                let y = if downward { cy } else { cy.saturating_sub(h) };
                let rect = Rect::new(x, y, w, h).intersect(&self.outer);
                if !rect.is_empty() {
                    rects.push(rect);
                }
            }
        }
        rects
    }
}
