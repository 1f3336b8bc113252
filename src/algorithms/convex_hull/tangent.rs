//! Tangents from an outside point to a convex polygon.
//!
//! Polygons are expected in clockwise order, as produced by
//! [`graham_scan`](super::graham_scan). For [`Rotation::CounterClockWise`] the
//! tangent `t` is the vertex with no other vertex counter-clockwise of the ray
//! `p -> t`; for [`Rotation::ClockWise`] it is the mirror image. Vertices that
//! are colinear with the ray are resolved in favour of the farther one, and a
//! vertex coincident with `p` never wins while another vertex exists.
use std::cmp::Ordering;

use crate::data::{AsPoint, Point};
use crate::{Error, Rotation};

/// Does `cand` beat `best` as the extreme vertex seen from `p`?
pub(crate) fn beats(p: &Point, best: &Point, cand: &Point, order: Rotation) -> bool {
  if cand == p {
    return false;
  }
  if best == p {
    return true;
  }
  let area = order.orient(p, best, cand);
  area > 0.0 || (area == 0.0 && p.cmp_distance_to(cand, best) == Ordering::Greater)
}

/// $O(k)$ Tangent vertex by scanning every vertex.
///
/// Returns `None` for an empty polygon. Ties between equally good vertices
/// keep the earliest index.
pub fn tangent_linear<P: AsPoint>(poly: &[P], p: &Point, order: Rotation) -> Option<usize> {
  let mut best: Option<usize> = None;
  for (i, v) in poly.iter().enumerate() {
    match best {
      Some(b) if !beats(p, poly[b].as_point(), v.as_point(), order) => {}
      _ => best = Some(i),
    }
  }
  best
}

/// $O(\log k)$ Tangent vertex by bisection.
///
/// Seen from `p`, the vertices of a convex polygon rise to the tangent and
/// then fall back, once around the cycle. An edge `i -> i+1` is rising when
/// its head beats its tail. The search keeps an interval `[a, b]` of the
/// cycle that contains the tangent and halves it by comparing the edge at
/// `a` with the edge at the midpoint `c`:
///
/// | edge `a` | edge `c` | keep                                |
/// |----------|----------|-------------------------------------|
/// | rising   | falling  | `[a, c]`                            |
/// | rising   | rising   | `[c, b]` if `c` beats `a`, else `[a, c]` |
/// | falling  | rising   | `[c, b]`                            |
/// | falling  | falling  | `[c, b]` if `a` beats `c`, else `[a, c]` |
///
/// Polygons with fewer than three vertices use [`tangent_linear`].
///
/// If the interval stops shrinking without finding the tangent, `p` has to be
/// a vertex of the polygon. In that case the neighbour of `p` in the
/// requested direction is returned: the next vertex for
/// [`Rotation::CounterClockWise`], the previous one for
/// [`Rotation::ClockWise`].
///
/// # Errors
/// [`Error::TangentInconsistency`] if the polygon is empty, or if the search
/// collapses and `p` is not one of its vertices.
pub fn tangent<P: AsPoint>(poly: &[P], p: &Point, order: Rotation) -> Result<usize, Error> {
  let n = poly.len();
  if n < 3 {
    return tangent_linear(poly, p, order).ok_or(Error::TangentInconsistency);
  }
  let vertex = |i: usize| poly[i % n].as_point();
  let ahead = |i: usize, j: usize| beats(p, vertex(i), vertex(j), order);
  let rising = |i: usize| ahead(i, i + 1);
  // `i + n - 1` stays non-negative; the modulus is taken in `vertex`.
  let is_tangent = |i: usize| vertex(i) != p && !ahead(i, i + 1) && !ahead(i, i + n - 1);

  if is_tangent(0) {
    return Ok(0);
  }
  // The chain [a, b] with b == a + n covers the whole cycle.
  let (mut a, mut b) = (0, n);
  loop {
    let c = a + (b - a) / 2;
    if is_tangent(c) {
      return Ok(c % n);
    }
    let (next_a, next_b) = match (rising(a), rising(c)) {
      (true, false) => (a, c),
      (true, true) => {
        if ahead(a, c) {
          (c, b)
        } else {
          (a, c)
        }
      }
      (false, true) => (c, b),
      (false, false) => {
        if ahead(c, a) {
          (c, b)
        } else {
          (a, c)
        }
      }
    };
    if (next_a, next_b) == (a, b) {
      break;
    }
    a = next_a;
    b = next_b;
  }

  log::trace!("tangent bisection collapsed at {a}..{b}, locating {p}");
  let pos = poly
    .iter()
    .position(|v| v.as_point() == p)
    .ok_or(Error::TangentInconsistency)?;
  Ok(match order {
    Rotation::CounterClockWise => (pos + 1) % n,
    Rotation::ClockWise => (pos + n - 1) % n,
  })
}

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
mod tests {
  use super::*;
  use crate::algorithms::convex_hull::graham_scan;
  use crate::data::{locate, PointLocation};
  use crate::testing::*;

  use proptest::prelude::*;
  use test_strategy::proptest;

  // Clockwise.
  fn square() -> Vec<Point> {
    vec![
      Point::new([-1.0, -1.0]),
      Point::new([-1.0, 1.0]),
      Point::new([1.0, 1.0]),
      Point::new([1.0, -1.0]),
    ]
  }

  fn octagon() -> Vec<Point> {
    graham_scan::convex_hull(vec![
      Point::new([-1.0, -2.0]),
      Point::new([1.0, -2.0]),
      Point::new([2.0, -1.0]),
      Point::new([2.0, 1.0]),
      Point::new([1.0, 2.0]),
      Point::new([-1.0, 2.0]),
      Point::new([-2.0, 1.0]),
      Point::new([-2.0, -1.0]),
    ])
  }

  // No vertex is strictly further in `order` than the answer.
  fn is_extreme(poly: &[Point], p: &Point, t: usize, order: Rotation) -> bool {
    poly
      .iter()
      .all(|v| v == p || order.orient(p, &poly[t], v) <= 0.0)
  }

  #[test]
  fn square_from_the_right() {
    let sq = square();
    let p = Point::new([5.0, 0.0]);
    // Looking left, the ray through the bottom right corner is the most
    // counter-clockwise one.
    assert_eq!(tangent_linear(&sq, &p, Rotation::CounterClockWise), Some(3));
    assert_eq!(tangent(&sq, &p, Rotation::CounterClockWise), Ok(3));
    assert_eq!(tangent_linear(&sq, &p, Rotation::ClockWise), Some(2));
    assert_eq!(tangent(&sq, &p, Rotation::ClockWise), Ok(2));
  }

  #[test]
  fn colinear_edge_prefers_farther_vertex() {
    let sq = square();
    // On the extension of the top edge.
    let p = Point::new([3.0, 1.0]);
    assert_eq!(tangent_linear(&sq, &p, Rotation::ClockWise), Some(1));
    assert_eq!(tangent(&sq, &p, Rotation::ClockWise), Ok(1));
    assert_eq!(tangent(&sq, &p, Rotation::CounterClockWise), Ok(3));
  }

  #[test]
  fn point_on_polygon_returns_neighbour() {
    let sq = square();
    for (i, p) in sq.iter().enumerate() {
      assert_eq!(tangent(&sq, p, Rotation::CounterClockWise), Ok((i + 1) % 4));
      assert_eq!(tangent(&sq, p, Rotation::ClockWise), Ok((i + 3) % 4));
      assert_eq!(
        tangent_linear(&sq, p, Rotation::CounterClockWise),
        Some((i + 1) % 4)
      );
    }
  }

  #[test]
  fn octagon_all_directions() {
    let oct = octagon();
    for p in [
      Point::new([10.0, 0.0]),
      Point::new([-10.0, 3.0]),
      Point::new([0.0, 7.0]),
      Point::new([3.0, -3.0]),
      Point::new([-2.0, -2.0]),
    ] {
      for order in [Rotation::CounterClockWise, Rotation::ClockWise] {
        let t = tangent(&oct, &p, order).unwrap();
        assert!(is_extreme(&oct, &p, t, order), "{p:?} {order:?} -> {t}");
        assert_eq!(Some(t), tangent_linear(&oct, &p, order));
      }
    }
  }

  #[test]
  fn degenerate_polygons() {
    let p = Point::new([5.0, 5.0]);
    let empty: Vec<Point> = vec![];
    assert_eq!(tangent(&empty, &p, Rotation::CounterClockWise), Err(Error::TangentInconsistency));
    let seg = vec![Point::new([0.0, 0.0]), Point::new([1.0, 0.0])];
    assert_eq!(tangent(&seg, &p, Rotation::CounterClockWise), Ok(0));
    assert_eq!(tangent(&seg, &p, Rotation::ClockWise), Ok(1));
    assert_eq!(tangent(&seg[..1], &seg[0], Rotation::ClockWise), Ok(0));
  }

  #[test]
  fn interior_query_is_inconsistent() {
    // The search collapses without finding the center among the vertices.
    let sq = square();
    let center = Point::new([0.0, 0.0]);
    for order in [Rotation::CounterClockWise, Rotation::ClockWise] {
      assert_eq!(tangent(&sq, &center, order), Err(Error::TangentInconsistency));
    }
    let oct = octagon();
    assert_eq!(
      tangent(&oct, &Point::new([0.0, 1.0]), Rotation::ClockWise),
      Err(Error::TangentInconsistency)
    );
  }

  #[proptest]
  fn bisection_matches_linear_scan(
    #[strategy(any_convex_polygon())] poly: Vec<Point>,
    #[strategy(any_grid_point())] p: Point,
    ccw: bool,
  ) {
    // Outside, or exactly on a vertex. Points inside an edge are not valid queries.
    prop_assume!(locate(&poly, &p) == PointLocation::Outside || poly.contains(&p));
    let order = if ccw { Rotation::CounterClockWise } else { Rotation::ClockWise };
    let fast = tangent(&poly, &p, order);
    prop_assert!(fast.is_ok());
    let fast = fast.unwrap();
    let slow = tangent_linear(&poly, &p, order).unwrap();
    prop_assert!(is_extreme(&poly, &p, fast, order));
    prop_assert_eq!(poly[fast], poly[slow]);
  }
}
