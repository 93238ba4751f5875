use std::ops::{Mul, MulAssign};

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Point {
        Point { x, y }
    }

    pub fn offset(&self, tx: f32, ty: f32) -> Point {
        Point::new(self.x + tx, self.y + ty)
    }

    pub fn distance(self, pt: Point) -> f32 {
        let dx = pt.x - self.x;
        let dy = pt.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Point::new(x, y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x as f32, y as f32)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Extent {
        Extent { width, height }
    }
}

impl From<(f32, f32)> for Extent {
    fn from((width, height): (f32, f32)) -> Self {
        Extent::new(width, height)
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub xy: Point,
    pub size: Extent,
}

impl Rect {
    pub fn new(xy: Point, size: Extent) -> Rect {
        Rect { xy, size }
    }

    pub fn corners(&self) -> [Point; 4] {
        let Rect { xy, size } = *self;
        [
            xy,
            xy.offset(size.width, 0.0),
            xy.offset(size.width, size.height),
            xy.offset(0.0, size.height),
        ]
    }

    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.xy.x
            && pt.y >= self.xy.y
            && pt.x < self.xy.x + self.size.width
            && pt.y < self.xy.y + self.size.height
    }
}

impl From<(f32, f32, f32, f32)> for Rect {
    fn from((x, y, w, h): (f32, f32, f32, f32)) -> Self {
        Rect::new((x, y).into(), (w, h).into())
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Smallest box holding every point, `None` for an empty iterator.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<Bounds> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            min: first,
            max: first,
        };
        for pt in iter {
            bounds.min.x = bounds.min.x.min(pt.x);
            bounds.min.y = bounds.min.y.min(pt.y);
            bounds.max.x = bounds.max.x.max(pt.x);
            bounds.max.y = bounds.max.y.max(pt.y);
        }
        Some(bounds)
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.min, Extent::new(self.width(), self.height()))
    }
}

/// 2D affine matrix `[a, b, c, d, e, f]` mapping `(x, y)` to
/// `(a*x + c*y + e, b*x + d*y + f)`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform(pub [f32; 6]);

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

impl Transform {
    pub fn identity() -> Transform {
        Transform([1.0, 0.0, 0.0, 1.0, 0.0, 0.0])
    }

    pub fn translate(tx: f32, ty: f32) -> Transform {
        Transform([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    pub fn scale(sx: f32, sy: f32) -> Transform {
        Transform([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// Clockwise on a y-down canvas, `a` in radians.
    pub fn rotate(a: f32) -> Transform {
        let cs = a.cos();
        let sn = a.sin();
        Transform([cs, sn, -sn, cs, 0.0, 0.0])
    }

    pub fn skew_x(a: f32) -> Transform {
        Transform([1.0, 0.0, a.tan(), 1.0, 0.0, 0.0])
    }

    pub fn skew_y(a: f32) -> Transform {
        Transform([1.0, a.tan(), 0.0, 1.0, 0.0, 0.0])
    }

    /// Maps `src` onto `dst` with an axis-aligned scale and offset.
    pub fn rect_to_rect(src: Rect, dst: Rect) -> Transform {
        let sx = if src.size.width != 0.0 {
            dst.size.width / src.size.width
        } else {
            1.0
        };
        let sy = if src.size.height != 0.0 {
            dst.size.height / src.size.height
        } else {
            1.0
        };
        Transform([
            sx,
            0.0,
            0.0,
            sy,
            dst.xy.x - src.xy.x * sx,
            dst.xy.y - src.xy.y * sy,
        ])
    }

    pub fn is_identity(&self) -> bool {
        *self == Transform::identity()
    }

    pub fn inverse(self) -> Transform {
        let t = &self.0;
        let det = t[0] * t[3] - t[2] * t[1];
        if det > -1e-6 && det < 1e-6 {
            return Transform::identity();
        }
        let invdet = 1.0 / det;
        let mut inv = [0f32; 6];
        inv[0] = t[3] * invdet;
        inv[2] = -t[2] * invdet;
        inv[4] = (t[2] * t[5] - t[3] * t[4]) * invdet;
        inv[1] = -t[1] * invdet;
        inv[3] = t[0] * invdet;
        inv[5] = (t[1] * t[4] - t[0] * t[5]) * invdet;
        Transform(inv)
    }

    pub fn transform_point(&self, pt: Point) -> Point {
        let t = &self.0;
        Point::new(
            pt.x * t[0] + pt.y * t[2] + t[4],
            pt.x * t[1] + pt.y * t[3] + t[5],
        )
    }

    /// Mean axis scale, used to size strokes and glyphs.
    pub fn average_scale(&self) -> f32 {
        let t = &self.0;
        let sx = (t[0] * t[0] + t[2] * t[2]).sqrt();
        let sy = (t[1] * t[1] + t[3] * t[3]).sqrt();
        (sx + sy) * 0.5
    }
}

/// `a * b` applies `a` first, then `b`.
impl Mul for Transform {
    type Output = Transform;

    fn mul(mut self, rhs: Self) -> Self::Output {
        let t = &mut self.0;
        let s = &rhs.0;
        let t0 = t[0] * s[0] + t[1] * s[2];
        let t2 = t[2] * s[0] + t[3] * s[2];
        let t4 = t[4] * s[0] + t[5] * s[2] + s[4];
        t[1] = t[0] * s[1] + t[1] * s[3];
        t[3] = t[2] * s[1] + t[3] * s[3];
        t[5] = t[4] * s[1] + t[5] * s[3] + s[5];
        t[0] = t0;
        t[2] = t2;
        t[4] = t4;
        self
    }
}

impl MulAssign for Transform {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl From<[f32; 6]> for Transform {
    fn from(values: [f32; 6]) -> Self {
        Transform(values)
    }
}
