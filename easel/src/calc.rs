//! Scalar helpers and the curve bases shared by the drawing context and the
//! shape builder.

use crate::math::Point;
use clamped::Clamp;

pub fn lerp(start: f32, stop: f32, amount: f32) -> f32 {
    start + (stop - start) * amount
}

pub fn norm(value: f32, start: f32, stop: f32) -> f32 {
    (value - start) / (stop - start)
}

/// Re-maps `value` from one range to another; not clamped.
pub fn map(value: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    start2 + (stop2 - start2) * ((value - start1) / (stop1 - start1))
}

pub fn constrain(value: f32, min: f32, max: f32) -> f32 {
    value.clamped(min, max)
}

pub fn sq(value: f32) -> f32 {
    value * value
}

pub fn mag(x: f32, y: f32, z: f32) -> f32 {
    (x * x + y * y + z * z).sqrt()
}

pub fn dist(x1: f32, y1: f32, z1: f32, x2: f32, y2: f32, z2: f32) -> f32 {
    mag(x2 - x1, y2 - y1, z2 - z1)
}

pub fn radians(degrees: f32) -> f32 {
    degrees.to_radians()
}

pub fn degrees(radians: f32) -> f32 {
    radians.to_degrees()
}

/// Catmull-Rom point between `b` and `c`, `s` being the curve tightness.
pub fn curve_point(s: f32, a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let tt = t * t;
    let ttt = tt * t;
    let m1 = (s - 1.0) / 2.0;
    let m2 = s;
    let f1 = m1 * ttt + (1.0 - m2) * tt + m1 * t;
    let f2 = (s + 3.0) / 2.0 * ttt + (-5.0 - s) / 2.0 * tt + 1.0;
    let f3 = (-3.0 - s) / 2.0 * ttt + (s + 2.0) * tt + (1.0 - s) / 2.0 * t;
    let f4 = (1.0 - s) / 2.0 * ttt + (s - 1.0) / 2.0 * tt;
    a * f1 + b * f2 + c * f3 + d * f4
}

pub fn curve_tangent(s: f32, a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let tt3 = t * t * 3.0;
    let t2 = t * 2.0;
    let f1 = (s - 1.0) / 2.0 * tt3 + (1.0 - s) * t2 + (s - 1.0) / 2.0;
    let f2 = (s + 3.0) / 2.0 * tt3 + (-5.0 - s) / 2.0 * t2;
    let f3 = (-3.0 - s) / 2.0 * tt3 + (s + 2.0) * t2 + (1.0 - s) / 2.0;
    let f4 = (1.0 - s) / 2.0 * tt3 + (s - 1.0) / 2.0 * t2;
    a * f1 + b * f2 + c * f3 + d * f4
}

pub fn bezier_point(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let tt = 1.0 - t;
    tt * tt * tt * a + 3.0 * tt * tt * t * b + 3.0 * t * t * tt * c + t * t * t * d
}

pub fn bezier_tangent(a: f32, b: f32, c: f32, d: f32, t: f32) -> f32 {
    let tt = 1.0 - t;
    3.0 * d * t * t - 3.0 * c * t * t + 6.0 * c * tt * t - 6.0 * b * tt * t + 3.0 * b * tt * tt
        - 3.0 * a * tt * tt
}

/// `detail + 1` points from `p[1]` to `p[2]` along a Catmull-Rom spline.
pub fn curve_vertices(tightness: f32, p: [Point; 4], detail: usize) -> Vec<Point> {
    let detail = detail.max(1);
    (0..=detail)
        .map(|i| {
            let t = i as f32 / detail as f32;
            Point::new(
                curve_point(tightness, p[0].x, p[1].x, p[2].x, p[3].x, t),
                curve_point(tightness, p[0].y, p[1].y, p[2].y, p[3].y, t),
            )
        })
        .collect()
}

/// `detail + 1` points from `p[0]` to `p[3]` along a cubic Bezier.
pub fn bezier_vertices(p: [Point; 4], detail: usize) -> Vec<Point> {
    let detail = detail.max(1);
    (0..=detail)
        .map(|i| {
            let t = i as f32 / detail as f32;
            Point::new(
                bezier_point(p[0].x, p[1].x, p[2].x, p[3].x, t),
                bezier_point(p[0].y, p[1].y, p[2].y, p[3].y, t),
            )
        })
        .collect()
}

/// Outline of the ellipse inscribed in `(x, y, w, h)` between two angles in
/// degrees, counter-clockwise on screen. `segments` covers a full turn.
pub fn arc_points(x: f32, y: f32, w: f32, h: f32, from: f32, to: f32, segments: usize) -> Vec<Point> {
    let (cx, cy) = (x + w / 2.0, y + h / 2.0);
    let (rx, ry) = (w / 2.0, h / 2.0);
    let (from, to) = if from <= to { (from, to) } else { (to, from) };
    let sweep = (to - from).min(360.0);
    let count = ((segments.max(3) as f32) * sweep / 360.0).ceil().max(1.0) as usize;
    (0..=count)
        .map(|i| {
            let a = (from + sweep * i as f32 / count as f32).to_radians();
            Point::new(cx + rx * a.cos(), cy - ry * a.sin())
        })
        .collect()
}

/// Segment count that keeps flattening error under a quarter pixel.
pub fn ellipse_segments(rx: f32, ry: f32) -> usize {
    let r = rx.abs().max(ry.abs()).max(0.5);
    let da = (r / (r + 0.25)).acos() * 2.0;
    ((std::f32::consts::PI * 2.0 / da).ceil() as usize).max(8).min(360)
}
