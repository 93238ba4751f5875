use crate::mode::AngleMode;
use crate::random::Random;
use std::cmp::Ordering;
use std::f32::consts::PI;
use std::fmt;

/// 3D vector following the Processing vector algebra.
///
/// The angle mode used by [`Vector::rotate`] is captured when the vector is
/// created, usually from the drawing context that handed it out.
#[derive(Debug, Copy, Clone, Default)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    angle_mode: AngleMode,
}

impl Vector {
    pub fn new(x: f32, y: f32, z: f32) -> Vector {
        Vector {
            x,
            y,
            z,
            angle_mode: AngleMode::Radians,
        }
    }

    pub fn xy(x: f32, y: f32) -> Vector {
        Vector::new(x, y, 0.0)
    }

    pub fn with_angle_mode(mut self, mode: AngleMode) -> Vector {
        self.angle_mode = mode;
        self
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    /// Replaces the components, keeping the captured angle mode.
    pub fn set<V: Into<Vector>>(&mut self, v: V) -> &mut Self {
        let v = v.into();
        self.x = v.x;
        self.y = v.y;
        self.z = v.z;
        self
    }

    pub fn copy(&self) -> Vector {
        *self
    }

    pub fn array(&self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn lerp<V: Into<Vector>>(&mut self, v: V, amount: f32) -> &mut Self {
        let v = v.into();
        self.x += (v.x - self.x) * amount;
        self.y += (v.y - self.y) * amount;
        self.z += (v.z - self.z) * amount;
        self
    }

    pub fn lerp_vectors(v1: &Vector, v2: &Vector, amount: f32) -> Vector {
        let mut v = *v1;
        v.lerp(*v2, amount);
        v
    }

    pub fn add<V: Into<Vector>>(&mut self, v: V) -> &mut Self {
        let v = v.into();
        self.x += v.x;
        self.y += v.y;
        self.z += v.z;
        self
    }

    pub fn sub<V: Into<Vector>>(&mut self, v: V) -> &mut Self {
        let v = v.into();
        self.x -= v.x;
        self.y -= v.y;
        self.z -= v.z;
        self
    }

    pub fn mult(&mut self, num: f32) -> &mut Self {
        self.x *= num;
        self.y *= num;
        self.z *= num;
        self
    }

    pub fn div(&mut self, num: f32) -> &mut Self {
        self.x /= num;
        self.y /= num;
        self.z /= num;
        self
    }

    /// Returns `v1 + v2`, also writing it into `target` when one is given.
    pub fn add_vectors(v1: &Vector, v2: &Vector, target: Option<&mut Vector>) -> Vector {
        store(*v1 + *v2, target)
    }

    pub fn sub_vectors(v1: &Vector, v2: &Vector, target: Option<&mut Vector>) -> Vector {
        store(*v1 - *v2, target)
    }

    pub fn mult_vector(v: &Vector, num: f32, target: Option<&mut Vector>) -> Vector {
        store(*v * num, target)
    }

    pub fn div_vector(v: &Vector, num: f32, target: Option<&mut Vector>) -> Vector {
        store(*v / num, target)
    }

    pub fn mag(&self) -> f32 {
        self.mag_sq().sqrt()
    }

    pub fn mag_sq(&self) -> f32 {
        self.dot(*self)
    }

    fn normal(&self) -> Vector {
        let len = self.mag();
        if len == 0.0 {
            return *self;
        }
        *self / len
    }

    pub fn set_mag(&mut self, len: f32) -> &mut Self {
        let v = self.normal() * len;
        self.set(v)
    }

    pub fn set_mag_into(&self, target: &mut Vector, len: f32) {
        target.set(self.normal() * len);
    }

    pub fn normalize(&mut self) -> &mut Self {
        let v = self.normal();
        self.set(v)
    }

    pub fn normalize_into(&self, target: &mut Vector) {
        target.set(self.normal());
    }

    pub fn limit(&mut self, max: f32) -> &mut Self {
        if self.mag_sq() > max * max {
            self.set_mag(max);
        }
        self
    }

    pub fn dist<V: Into<Vector>>(&self, v: V) -> f32 {
        (*self - v.into()).mag()
    }

    pub fn dot<V: Into<Vector>>(&self, v: V) -> f32 {
        let v = v.into();
        self.x * v.x + self.y * v.y + self.z * v.z
    }

    pub fn cross<V: Into<Vector>>(&self, v: V) -> Vector {
        let v = v.into();
        Vector {
            x: self.y * v.z - self.z * v.y,
            y: self.z * v.x - self.x * v.z,
            z: self.x * v.y - self.y * v.x,
            angle_mode: self.angle_mode,
        }
    }

    pub fn cross_into<V: Into<Vector>>(&self, v: V, target: &mut Vector) -> Vector {
        let v = self.cross(v);
        target.set(v);
        v
    }

    /// Rotates around the z axis; `angle` is read in the captured angle mode.
    pub fn rotate(&mut self, angle: f32) -> &mut Self {
        let mode = self.angle_mode;
        self.rotate_in(angle, mode)
    }

    pub fn rotate_in(&mut self, angle: f32, mode: AngleMode) -> &mut Self {
        let rad = mode.to_degrees(angle).to_radians();
        let (sn, cs) = rad.sin_cos();
        let x = self.x * cs - self.y * sn;
        let y = self.x * sn + self.y * cs;
        self.x = x;
        self.y = y;
        self
    }

    /// Angle of the xy projection in radians.
    pub fn heading(&self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Unit vector pointing at `angle` (read in `mode`).
    pub fn from_angle(angle: f32, mode: AngleMode, target: Option<&mut Vector>) -> Vector {
        let mut v = Vector::new(1.0, 0.0, 0.0).with_angle_mode(mode);
        v.rotate(angle);
        store(v, target)
    }

    /// Radians between two vectors, zero when either has no length.
    pub fn angle_between(v1: &Vector, v2: &Vector) -> f32 {
        if v1.mag_sq() == 0.0 || v2.mag_sq() == 0.0 {
            return 0.0;
        }
        let x = v1.dot(*v2) / (v1.mag() * v2.mag());
        if x <= -1.0 {
            return PI;
        }
        if x >= 1.0 {
            return 0.0;
        }
        x.acos()
    }

    pub fn random2d(rng: &mut Random, target: Option<&mut Vector>) -> Vector {
        let mut v = Vector::new(1.0, 0.0, 0.0);
        v.rotate_in(rng.range(0.0, 360.0), AngleMode::Degrees);
        store(v, target)
    }

    /// Uniformly distributed on the unit sphere.
    pub fn random3d(rng: &mut Random, target: Option<&mut Vector>) -> Vector {
        let angle = rng.range(0.0, PI * 2.0);
        let z = rng.range(-1.0, 1.0);
        let r = (1.0 - z * z).sqrt();
        store(Vector::new(r * angle.cos(), r * angle.sin(), z), target)
    }
}

fn store(v: Vector, target: Option<&mut Vector>) -> Vector {
    if let Some(target) = target {
        target.set(v);
    }
    v
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

impl PartialOrd for Vector {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.x.partial_cmp(&other.x)? {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
        match self.y.partial_cmp(&other.y)? {
            Ordering::Equal => {}
            ord => return Some(ord),
        }
        self.z.partial_cmp(&other.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(f32, f32)> for Vector {
    fn from((x, y): (f32, f32)) -> Self {
        Vector::xy(x, y)
    }
}

impl From<(f32, f32, f32)> for Vector {
    fn from((x, y, z): (f32, f32, f32)) -> Self {
        Vector::new(x, y, z)
    }
}

impl From<[f32; 3]> for Vector {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Vector::new(x, y, z)
    }
}

impl From<&Vector> for Vector {
    fn from(v: &Vector) -> Self {
        *v
    }
}

impl std::ops::Add for Vector {
    type Output = Vector;

    fn add(mut self, rhs: Vector) -> Vector {
        Vector::add(&mut self, rhs);
        self
    }
}

impl std::ops::Sub for Vector {
    type Output = Vector;

    fn sub(mut self, rhs: Vector) -> Vector {
        Vector::sub(&mut self, rhs);
        self
    }
}

impl std::ops::Mul<f32> for Vector {
    type Output = Vector;

    fn mul(mut self, rhs: f32) -> Vector {
        self.mult(rhs);
        self
    }
}

impl std::ops::Div<f32> for Vector {
    type Output = Vector;

    fn div(mut self, rhs: f32) -> Vector {
        Vector::div(&mut self, rhs);
        self
    }
}

impl std::ops::Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn add_chains_in_place() {
        let mut v = Vector::new(1.0, 2.0, 3.0);
        v.add((4.0, 5.0, 6.0)).mult(2.0);
        assert_eq!(v, Vector::new(10.0, 14.0, 18.0));
        let mut w = Vector::new(1.0, 2.0, 3.0);
        w.add(Vector::new(4.0, 5.0, 6.0));
        assert_eq!(w, Vector::new(5.0, 7.0, 9.0));
    }

    #[test]
    fn operators_copy() {
        let v = Vector::new(1.0, 2.0, 3.0);
        let sum = v + Vector::new(1.0, 1.0, 1.0);
        assert_eq!(v, Vector::new(1.0, 2.0, 3.0));
        assert_eq!(sum, Vector::new(2.0, 3.0, 4.0));
        assert_eq!(v * 2.0, Vector::new(2.0, 4.0, 6.0));
        assert_eq!(v / 2.0, Vector::new(0.5, 1.0, 1.5));
        assert_eq!(-v, Vector::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn static_helpers_write_target() {
        let v1 = Vector::new(1.0, 2.0, 3.0);
        let v2 = Vector::new(4.0, 5.0, 6.0);
        let mut target = Vector::default();
        let result = Vector::add_vectors(&v1, &v2, Some(&mut target));
        assert_eq!(result, Vector::new(5.0, 7.0, 9.0));
        assert_eq!(target, result);
        assert_eq!(Vector::sub_vectors(&v2, &v1, None), Vector::new(3.0, 3.0, 3.0));
        assert_eq!(Vector::mult_vector(&v1, 3.0, None), Vector::new(3.0, 6.0, 9.0));
    }

    #[test]
    fn cross_and_mag() {
        let z = Vector::new(1.0, 0.0, 0.0).cross(Vector::new(0.0, 1.0, 0.0));
        assert_eq!(z, Vector::new(0.0, 0.0, 1.0));
        let mut target = Vector::default();
        Vector::xy(0.0, 1.0).cross_into((1.0, 0.0, 0.0), &mut target);
        assert_eq!(target, Vector::new(0.0, 0.0, -1.0));
        assert!(near(Vector::xy(1.0, 2.0).mag(), 5f32.sqrt()));
        assert_eq!(Vector::new(1.0, 2.0, 3.0).mag_sq(), 14.0);
    }

    #[test]
    fn normalize_and_limit() {
        let mut v = Vector::xy(3.0, 4.0);
        let mut target = Vector::default();
        v.normalize_into(&mut target);
        assert_eq!(v, Vector::xy(3.0, 4.0));
        assert!(near(target.x, 0.6) && near(target.y, 0.8));
        v.limit(10.0);
        assert_eq!(v, Vector::xy(3.0, 4.0));
        v.limit(2.5);
        assert!(near(v.mag(), 2.5));
        v.set_mag(10.0);
        assert!(near(v.x, 6.0) && near(v.y, 8.0));
        let mut zero = Vector::default();
        zero.normalize();
        assert_eq!(zero, Vector::default());
    }

    #[test]
    fn rotate_uses_captured_mode() {
        let mut v = Vector::xy(1.0, 0.0).with_angle_mode(AngleMode::Degrees);
        v.rotate(90.0);
        assert!(near(v.x, 0.0) && near(v.y, 1.0));
        let mut r = Vector::xy(1.0, 0.0);
        r.rotate(PI);
        assert!(near(r.x, -1.0) && near(r.y, 0.0));
        let mut e = Vector::xy(0.0, 2.0);
        e.rotate_in(-90.0, AngleMode::Degrees);
        assert!(near(e.x, 2.0) && near(e.y, 0.0));
    }

    #[test]
    fn angles() {
        assert!(near(Vector::xy(0.0, 1.0).heading(), PI / 2.0));
        let a = Vector::from_angle(PI / 2.0, AngleMode::Radians, None);
        assert!(near(a.x, 0.0) && near(a.y, 1.0));
        assert_eq!(Vector::angle_between(&Vector::default(), &a), 0.0);
        let between = Vector::angle_between(&Vector::xy(1.0, 0.0), &Vector::xy(0.0, 1.0));
        assert!(near(between, PI / 2.0));
        assert_eq!(Vector::angle_between(&Vector::xy(1.0, 0.0), &Vector::xy(-2.0, 0.0)), PI);
    }

    #[test]
    fn lerp_dist_dot() {
        let mut v = Vector::xy(0.0, 0.0);
        v.lerp((10.0, 20.0), 0.5);
        assert_eq!(v, Vector::xy(5.0, 10.0));
        assert_eq!(Vector::xy(0.0, 0.0).dist((3.0, 4.0)), 5.0);
        assert_eq!(Vector::new(1.0, 2.0, 3.0).dot((4.0, 5.0, 6.0)), 32.0);
    }

    #[test]
    fn random_generators_are_unit_length() {
        let mut rng = Random::new(5);
        for _ in 0..50 {
            assert!(near(Vector::random2d(&mut rng, None).mag(), 1.0));
            let v = Vector::random3d(&mut rng, None);
            assert!((v.mag() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Vector::new(1.0, 9.0, 9.0) < Vector::new(2.0, 0.0, 0.0));
        assert!(Vector::new(1.0, 2.0, 3.0) < Vector::new(1.0, 2.0, 4.0));
    }
}
