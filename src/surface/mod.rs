//! Drawing surface abstraction shared by every layer of the card.
//!
//! Scene code only ever talks to [`Surface`]; the software [`Canvas`] is the
//! one real implementation and the [`TerminalPresenter`] turns it into ANSI
//! half-blocks.

pub mod canvas;
pub mod terminal;

pub use canvas::Canvas;
pub use terminal::{TerminalPresenter, TextOverlay};

/// Straight (non-premultiplied) colour with an alpha channel in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0.0, g: 0.0, b: 0.0, a: 0.0 };

    pub fn from_rgb(color: (u8, u8, u8), a: f32) -> Self {
        Self {
            r: color.0 as f32,
            g: color.1 as f32,
            b: color.2 as f32,
            a,
        }
    }

    pub fn opaque(color: (u8, u8, u8)) -> Self {
        Self::from_rgb(color, 1.0)
    }
}

/// One colour stop of a radial gradient; `offset` is in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

/// Radial gradient from the centre (offset 0) to `radius` (offset 1).
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub cx: f32,
    pub cy: f32,
    pub radius: f32,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    pub fn new(cx: f32, cy: f32, radius: f32) -> Self {
        Self {
            cx,
            cy,
            radius,
            stops: Vec::with_capacity(2),
        }
    }

    pub fn with_stop(mut self, offset: f32, color: Rgba) -> Self {
        let offset = offset.clamp(0.0, 1.0);
        let idx = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(idx, GradientStop { offset, color });
        self
    }

    /// Colour at distance `dist` from the centre.
    ///
    /// Interpolation happens in premultiplied space so a transparent stop
    /// fades the other stop out instead of blending its hue toward black.
    pub fn sample(&self, dist: f32) -> Rgba {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return Rgba::TRANSPARENT;
        };
        let t = if self.radius > 0.0 { dist / self.radius } else { 1.0 };
        if t <= first.offset {
            return first.color;
        }
        if t >= last.offset {
            return last.color;
        }

        let upper = self.stops.partition_point(|s| s.offset <= t);
        let lo = self.stops[upper - 1];
        let hi = self.stops[upper];
        let span = hi.offset - lo.offset;
        let f = if span > 0.0 { (t - lo.offset) / span } else { 1.0 };

        let a = lo.color.a + (hi.color.a - lo.color.a) * f;
        if a <= 0.0 {
            return Rgba::TRANSPARENT;
        }
        let mix = |l: f32, h: f32| (l * lo.color.a * (1.0 - f) + h * hi.color.a * f) / a;
        Rgba {
            r: mix(lo.color.r, hi.color.r),
            g: mix(lo.color.g, hi.color.g),
            b: mix(lo.color.b, hi.color.b),
            a,
        }
    }
}

/// Axis-aligned rectangle in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl Paint {
    pub fn color_at(&self, x: f32, y: f32) -> Rgba {
        match self {
            Paint::Solid(c) => *c,
            Paint::Radial(g) => {
                let dx = x - g.cx;
                let dy = y - g.cy;
                g.sample((dx * dx + dy * dy).sqrt())
            }
        }
    }
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::Radial(g)
    }
}

/// Minimal 2D context: filled shapes, radial gradients and a global alpha
/// multiplier applied to every subsequent draw.
pub trait Surface {
    /// Logical width in pixels.
    fn width(&self) -> f32;
    /// Logical height in pixels.
    fn height(&self) -> f32;
    fn global_alpha(&self) -> f32;
    fn set_global_alpha(&mut self, alpha: f32);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_clamps_outside_stop_range() {
        let g = RadialGradient::new(0.0, 0.0, 10.0)
            .with_stop(0.0, Rgba::opaque((255, 0, 0)))
            .with_stop(1.0, Rgba::TRANSPARENT);
        assert_eq!(g.sample(0.0), Rgba::opaque((255, 0, 0)));
        assert_eq!(g.sample(25.0), Rgba::TRANSPARENT);
    }

    #[test]
    fn gradient_fades_without_darkening() {
        let g = RadialGradient::new(0.0, 0.0, 10.0)
            .with_stop(0.0, Rgba::from_rgb((200, 100, 50), 0.8))
            .with_stop(1.0, Rgba::TRANSPARENT);
        let mid = g.sample(5.0);
        assert!((mid.a - 0.4).abs() < 1e-5);
        assert!((mid.r - 200.0).abs() < 1e-3);
        assert!((mid.g - 100.0).abs() < 1e-3);
        assert!((mid.b - 50.0).abs() < 1e-3);
    }

    #[test]
    fn stops_are_kept_sorted() {
        let g = RadialGradient::new(0.0, 0.0, 1.0)
            .with_stop(1.0, Rgba::TRANSPARENT)
            .with_stop(0.0, Rgba::opaque((1, 2, 3)));
        assert_eq!(g.stops[0].offset, 0.0);
        assert_eq!(g.stops[1].offset, 1.0);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(r.contains(10.0, 10.0));
        assert!(r.contains(14.9, 14.9));
        assert!(!r.contains(15.0, 12.0));
        assert!(!r.contains(9.9, 12.0));
    }

    #[test]
    fn empty_gradient_is_transparent() {
        let g = RadialGradient::new(0.0, 0.0, 1.0);
        assert_eq!(Paint::from(g).color_at(0.0, 0.0), Rgba::TRANSPARENT);
    }
}
