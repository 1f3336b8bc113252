use std::ops::Range;

use super::{AsPoint, IndexedPoint, PointLocation};
use crate::data::Point;
use crate::{orientation, Orientation};

/// The clockwise hull of one contiguous group of the input.
///
/// `range` is the half-open range of input indices the hull was computed
/// from. The vertices never change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SubHull<P = IndexedPoint> {
  pub range: Range<usize>,
  pub points: Vec<P>,
}

impl<P: AsPoint> SubHull<P> {
  pub fn new(range: Range<usize>, points: Vec<P>) -> SubHull<P> {
    SubHull { range, points }
  }

  pub fn len(&self) -> usize {
    self.points.len()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// $O(n)$ Locate `pt` relative to a clockwise convex polygon.
///
/// Polygons with fewer than three vertices are treated as a point or a
/// segment: nothing is inside them.
pub fn locate<P: AsPoint>(poly: &[P], pt: &Point) -> PointLocation {
  match poly {
    [] => PointLocation::Outside,
    [a] => {
      if a.as_point() == pt {
        PointLocation::OnBoundary
      } else {
        PointLocation::Outside
      }
    }
    [a, b] => {
      let (a, b) = (a.as_point(), b.as_point());
      let on_line = Orientation::new(a, b, pt).is_colinear();
      let within = a.squared_euclidean_distance(pt) <= a.squared_euclidean_distance(b)
        && b.squared_euclidean_distance(pt) <= a.squared_euclidean_distance(b);
      if on_line && within {
        PointLocation::OnBoundary
      } else {
        PointLocation::Outside
      }
    }
    _ => {
      let n = poly.len();
      let mut on_edge = false;
      for i in 0..n {
        let a = poly[i].as_point();
        let b = poly[(i + 1) % n].as_point();
        let area = orientation(a, b, pt);
        if area > 0.0 {
          return PointLocation::Outside;
        }
        on_edge |= area == 0.0;
      }
      if on_edge {
        PointLocation::OnBoundary
      } else {
        PointLocation::Inside
      }
    }
  }
}

/// Every consecutive triple of vertices makes a strict clockwise turn.
pub fn is_strictly_convex<P: AsPoint>(poly: &[P]) -> bool {
  let n = poly.len();
  if n < 3 {
    return true;
  }
  (0..n).all(|i| {
    Orientation::new(
      poly[i].as_point(),
      poly[(i + 1) % n].as_point(),
      poly[(i + 2) % n].as_point(),
    )
    .is_cw()
  })
}
