/// Bounding box in viewport coordinates, as reported by `getBoundingClientRect`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            right: left + width,
            bottom: top + height,
            left,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            top: self.top + dy,
            right: self.right + dx,
            bottom: self.bottom + dy,
            left: self.left + dx,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Prefers the window's inner size and falls back to the root element's
    /// client size when the inner size is missing or zero.
    pub fn resolve(
        inner_width: Option<f64>,
        inner_height: Option<f64>,
        client_width: f64,
        client_height: f64,
    ) -> Self {
        Self {
            width: nonzero(inner_width).unwrap_or(client_width),
            height: nonzero(inner_height).unwrap_or(client_height),
        }
    }
}

fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|value| *value != 0.0 && !value.is_nan())
}

/// True when any part of `rect` lies inside the viewport. Edges that only
/// touch the viewport boundary do not count.
pub fn intersects_viewport(rect: &Rect, viewport: ViewportSize) -> bool {
    rect.bottom > 0.0 && rect.top < viewport.height && rect.right > 0.0 && rect.left < viewport.width
}
