use proptest::prelude::*;
use schemacanvas_core::{Point, Rect};

fn point() -> impl Strategy<Value = Point> {
    (-1.0e4f64..1.0e4, -1.0e4f64..1.0e4).prop_map(|(x, y)| Point::new(x, y))
}

fn rect() -> impl Strategy<Value = Rect> {
    (point(), 0.0f64..500.0, 0.0f64..500.0)
        .prop_map(|(p, w, h)| Rect::new(p.x, p.y, w, h))
}

// right/bottom are recomputed as x + width, which may round
fn covers(rect: &Rect, p: &Point) -> bool {
    const EPS: f64 = 1e-6;
    p.x >= rect.left() - EPS
        && p.x <= rect.right() + EPS
        && p.y >= rect.top() - EPS
        && p.y <= rect.bottom() + EPS
}

proptest! {
    #[test]
    fn bounding_contains_every_point(points in prop::collection::vec(point(), 1..32)) {
        let rect = Rect::bounding(points.iter().copied()).unwrap();
        for p in &points {
            prop_assert!(covers(&rect, p));
        }
        prop_assert!(rect.width >= 0.0 && rect.height >= 0.0);
    }

    #[test]
    fn united_contains_both(a in rect(), b in rect()) {
        let u = a.united(&b);
        for r in [a, b] {
            prop_assert!(covers(&u, &r.top_left()));
            prop_assert!(covers(&u, &r.bottom_right()));
        }
    }

    #[test]
    fn from_corners_is_order_independent(a in point(), b in point()) {
        prop_assert_eq!(Rect::from_corners(a, b), Rect::from_corners(b, a));
    }
}

#[test]
fn test_bounding_of_nothing() {
    assert_eq!(Rect::bounding(std::iter::empty()), None);
}

#[test]
fn test_adjusted_grows_each_edge() {
    let r = Rect::new(10.0, 10.0, 100.0, 50.0).adjusted(-5.0, -20.0, 5.0, 5.0);
    assert_eq!(r, Rect::new(5.0, -10.0, 110.0, 75.0));
}

#[test]
fn test_nan_sentinel() {
    assert!(Point::NAN.is_nan());
    assert!(!Point::default().is_nan());
    assert_eq!(
        Point::new(-3.0, 4.0).clamped_non_negative(),
        Point::new(0.0, 4.0)
    );
}
