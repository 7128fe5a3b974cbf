use super::*;

#[test]
fn test_cross_product_right_handed() {
    let a = Vector3f64::new(1.0, 0.0, 0.0);
    let b = Vector3f64::new(0.0, 1.0, 0.0);

    let c = a.cross_product(&b);

    assert_eq!(c, Vector3f64::new(0.0, 0.0, 1.0));
    assert_eq!(a.dot_product(&c), 0.0);
}

#[test]
fn test_arithmetic() {
    let a = Vector3f64::new(1.0, 2.0, 2.0);
    let b = Vector3f64::from_slice(&[0.5, 0.5, 0.5]);

    assert_eq!(a.norm2(), 3.0);
    assert_eq!(a - b, Vector3f64::new(0.5, 1.5, 1.5));
    assert_eq!(2.0 * b, Vector3f64::new(1.0, 1.0, 1.0));
    assert_eq!(-b + b, Vector3f64::zeros());
}

#[test]
fn test_miller_to_f64() {
    let m = Vector3i32::new(-1, 0, 3);

    assert_eq!(m.to_f64(), Vector3f64::new(-1.0, 0.0, 3.0));
    assert_eq!(format!("{}", m), "-1 0 3");
}
