use serde::{Deserialize, Serialize};

/// Width/height pair in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub const fn square(side: usize) -> Self {
        Self::new(side, side)
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Integer rectangle in image coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering a whole `width × height` image.
    pub fn full(size: Size) -> Self {
        Self::new(0, 0, size.width as i32, size.height as i32)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn area(&self) -> i64 {
        self.width.max(0) as i64 * self.height.max(0) as i64
    }

    /// True when the rectangle lies entirely inside a `size` image.
    pub fn is_inside(&self, size: Size) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.right() <= size.width as i32
            && self.bottom() <= size.height as i32
    }

    /// Clip the rectangle to the image extents.
    pub fn clamp_to(&self, size: Size) -> Self {
        let (w, h) = (size.width as i32, size.height as i32);
        let x0 = self.x.clamp(0, w);
        let y0 = self.y.clamp(0, h);
        let x1 = self.right().clamp(x0, w);
        let y1 = self.bottom().clamp(y0, h);
        Self::new(x0, y0, x1 - x0, y1 - y0)
    }

    /// Overlap extent along x and y (zero when disjoint on that axis).
    pub fn intersection_extent(&self, other: &Rect) -> (i32, i32) {
        let iw = self.right().min(other.right()) - self.x.max(other.x);
        let ih = self.bottom().min(other.bottom()) - self.y.max(other.y);
        (iw.max(0), ih.max(0))
    }
}

/// A positively scored window before clustering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Candidate {
    /// Window in original-image coordinates.
    pub rect: Rect,
    /// Scale factor at which the window was evaluated.
    pub factor: f64,
    pub score: f32,
}

/// A clustered detection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Detection {
    pub rect: Rect,
    pub confidence: f32,
    /// Number of candidates merged into this detection (0 for the fallback).
    pub neighbors: usize,
}

impl Detection {
    /// Confidence reported for the synthetic whole-image detection.
    pub const FALLBACK_CONFIDENCE: f32 = 1.0;

    pub fn fallback(size: Size) -> Self {
        Self {
            rect: Rect::full(size),
            confidence: Self::FALLBACK_CONFIDENCE,
            neighbors: 0,
        }
    }
}
