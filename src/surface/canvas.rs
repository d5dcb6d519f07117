use super::{Paint, Surface};

/// Software raster at terminal half-block resolution.
///
/// Pixels are stored as linear `f32` RGB in `0..=255`. Callers work in
/// logical pixels; `scale` logical pixels map onto one raster pixel.
pub struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    pixels: Vec<[f32; 3]>,
    global_alpha: f32,
}

impl Canvas {
    pub fn new(width: usize, height: usize, scale: f32, background: (u8, u8, u8)) -> Self {
        let bg = [background.0 as f32, background.1 as f32, background.2 as f32];
        Self {
            width,
            height,
            scale,
            pixels: vec![bg; width * height],
            global_alpha: 1.0,
        }
    }

    pub fn raster_width(&self) -> usize {
        self.width
    }

    pub fn raster_height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let [r, g, b] = self.pixels[y * self.width + x];
        (to_u8(r), to_u8(g), to_u8(b))
    }

    /// Overwrite this canvas with `other`, which must have the same raster size.
    pub fn copy_from(&mut self, other: &Canvas) {
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Inclusive-exclusive raster range touched by `[lo, hi]` in logical space.
    fn span(&self, lo: f32, hi: f32, limit: usize) -> (usize, usize) {
        let start = (lo / self.scale).floor().max(0.0) as usize;
        let end = ((hi / self.scale).ceil().max(0.0) as usize).min(limit);
        (start.min(limit), end)
    }

    fn blend(&mut self, idx: usize, paint: &Paint, x: f32, y: f32, coverage: f32) {
        let src = paint.color_at(x, y);
        let a = (src.a * self.global_alpha * coverage).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[idx];
        dst[0] += (src.r - dst[0]) * a;
        dst[1] += (src.g - dst[1]) * a;
        dst[2] += (src.b - dst[2]) * a;
    }
}

impl Surface for Canvas {
    fn width(&self) -> f32 {
        self.width as f32 * self.scale
    }

    fn height(&self) -> f32 {
        self.height as f32 * self.scale
    }

    fn global_alpha(&self) -> f32 {
        self.global_alpha
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: &Paint) {
        let (x0, x1) = self.span(x, x + w, self.width);
        let (y0, y1) = self.span(y, y + h, self.height);
        for py in y0..y1 {
            let ly = (py as f32 + 0.5) * self.scale;
            for px in x0..x1 {
                let lx = (px as f32 + 0.5) * self.scale;
                self.blend(py * self.width + px, paint, lx, ly, 1.0);
            }
        }
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, paint: &Paint) {
        if radius <= 0.0 {
            return;
        }
        let reach = radius + self.scale;
        let (x0, x1) = self.span(cx - reach, cx + reach, self.width);
        let (y0, y1) = self.span(cy - reach, cy + reach, self.height);

        // Disks narrower than a raster pixel would otherwise vanish between
        // pixel centres; deposit their area into the pixel under the centre.
        let area = (std::f32::consts::PI * radius * radius) / (self.scale * self.scale);
        let home = (
            (cx / self.scale).floor() as isize,
            (cy / self.scale).floor() as isize,
        );

        for py in y0..y1 {
            let ly = (py as f32 + 0.5) * self.scale;
            for px in x0..x1 {
                let lx = (px as f32 + 0.5) * self.scale;
                let dx = lx - cx;
                let dy = ly - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                let mut coverage = ((radius - dist) / self.scale + 0.5).clamp(0.0, 1.0);
                let is_home = (px as isize, py as isize) == home;
                if is_home {
                    coverage = coverage.max(area.min(1.0));
                }
                if coverage > 0.0 {
                    // A sub-pixel disk's home pixel centre can lie outside the
                    // disk; sample its gradient at the true centre instead.
                    let (sx, sy) = if is_home && dist > radius { (cx, cy) } else { (lx, ly) };
                    self.blend(py * self.width + px, paint, sx, sy, coverage);
                }
            }
        }
    }
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
