use std::fmt;

use crate::{Vector3, Vector3f64};

/// Miller index triple.
pub type Vector3i32 = Vector3<i32>;

impl Vector3i32 {
    pub fn to_f64(&self) -> Vector3f64 {
        Vector3f64::new(self.x as f64, self.y as f64, self.z as f64)
    }
}

impl fmt::Display for Vector3i32 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}
