// Viewport calculation - Fits the logical framebuffer into the window
//
// Integer-only arithmetic. Repeated resizes never accumulate rounding drift
// because every result is derived from the current window size alone.

/// Scaling policy applied when the window is resized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScalingPolicy {
    /// Keep the logical width:height ratio, letterboxing the remainder
    pub lock_aspect_ratio: bool,
    /// Only display whole multiples of the logical resolution
    pub lock_integer_scaling: bool,
}

impl ScalingPolicy {
    /// Stretch to fill the whole window
    pub const STRETCH: Self = Self {
        lock_aspect_ratio: false,
        lock_integer_scaling: false,
    };

    /// Set aspect ratio locking
    pub fn with_aspect_ratio(mut self, lock: bool) -> Self {
        self.lock_aspect_ratio = lock;
        self
    }

    /// Set integer scaling locking
    pub fn with_integer_scaling(mut self, lock: bool) -> Self {
        self.lock_integer_scaling = lock;
        self
    }
}

/// Drawable rectangle inside the output surface
///
/// Offsets are measured from the top-left corner of the surface. Because the
/// rectangle is centered, the bars on opposite sides differ by at most one
/// pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    /// Horizontal offset of the drawable area
    pub x: u32,
    /// Vertical offset of the drawable area
    pub y: u32,
    /// Drawable width
    pub width: u32,
    /// Drawable height
    pub height: u32,
}

impl Viewport {
    /// Whether the rectangle covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the surface pixel (px, py) lies inside the rectangle
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && py >= self.y
            && u64::from(px) < u64::from(self.x) + u64::from(self.width)
            && u64::from(py) < u64::from(self.y) + u64::from(self.height)
    }
}

/// Compute the drawable rectangle for a window
///
/// # Arguments
/// * `window_width`, `window_height` - Output surface size in pixels
/// * `logical_width`, `logical_height` - Framebuffer size, both non-zero
/// * `policy` - Aspect and integer locks
///
/// # Returns
/// The centered viewport. Its size never exceeds the window.
pub fn compute_viewport(
    window_width: u32,
    window_height: u32,
    logical_width: u32,
    logical_height: u32,
    policy: ScalingPolicy,
) -> Viewport {
    debug_assert!(
        logical_width > 0 && logical_height > 0,
        "logical dimensions must be non-zero"
    );

    // Cross products can exceed u32 for large windows
    let w = u64::from(window_width);
    let h = u64::from(window_height);
    let lw = u64::from(logical_width);
    let lh = u64::from(logical_height);

    let mut draw_w = w;
    let mut draw_h = h;

    if policy.lock_aspect_ratio {
        let width_term = w * lh;
        let height_term = h * lw;
        if width_term > height_term {
            // Window is proportionally too wide
            draw_w = h * lw / lh;
        } else if width_term < height_term {
            // Window is proportionally too tall
            draw_h = w * lh / lw;
        }
    }

    if policy.lock_integer_scaling {
        draw_w -= draw_w % lw;
        draw_h -= draw_h % lh;
    }

    // draw_w <= w and draw_h <= h, so every value fits back into u32
    Viewport {
        x: ((w - draw_w) / 2) as u32,
        y: ((h - draw_h) / 2) as u32,
        width: draw_w as u32,
        height: draw_h as u32,
    }
}
