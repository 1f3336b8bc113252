use std::cmp::Ordering;

use crate::data::{AsPoint, Point};
use crate::{orientation, Orientation};

// https://en.wikipedia.org/wiki/Graham_scan

// Doesn't allocate.
// Properties:
//    No panics.
//    Output is strictly convex and clockwise.
//    No points are outside the resulting polygon.
/// $O(n \log n)$ Convex hull of a set of points.
///
/// [Graham scan][wiki] algorithm for finding the smallest convex polygon which
/// contains all the given points. The vertices are returned in clockwise order
/// starting with the lowest (then leftmost) point. Colinear boundary points
/// and duplicate coordinates are dropped.
///
/// Inputs with fewer than three points are returned unchanged.
///
/// # Properties
/// * No points from the input set will be outside the returned polygon.
/// * All vertices in the returned polygon are from the input set.
///
/// # Examples
///
/// ```rust
/// # use chanhull::algorithms::convex_hull::graham_scan::convex_hull;
/// # use chanhull::data::Point;
/// let pts = vec![
///   Point::new([0.0, 0.0]),
///   Point::new([2.0, 0.0]),
///   Point::new([1.0, 1.0]),
///   Point::new([0.0, 2.0]),
///   Point::new([2.0, 2.0]),
/// ];
/// let hull = convex_hull(pts);
/// assert_eq!(hull, vec![
///   Point::new([0.0, 0.0]),
///   Point::new([0.0, 2.0]),
///   Point::new([2.0, 2.0]),
///   Point::new([2.0, 0.0]),
/// ]);
/// ```
///
/// [wiki]: https://en.wikipedia.org/wiki/Graham_scan
pub fn convex_hull<P>(mut pts: Vec<P>) -> Vec<P>
where
  P: AsPoint,
{
  if pts.len() < 3 {
    return pts;
  }
  let pivot_idx = pivot_index(&pts);
  pts.swap(0, pivot_idx);
  let pivot: Point = *pts[0].as_point();

  {
    let rest = &mut pts[1..];
    rest.sort_by(|a, b| cmp_around(&pivot, a.as_point(), b.as_point()));
  }
  // Coincident points sort next to each other, and the pivot sorts first.
  pts.dedup_by(|a, b| a.as_point() == b.as_point());

  // pts[..=top] is the stack.
  let mut top = 0;
  for read in 1..pts.len() {
    while top >= 1
      && Orientation::new(pts[top - 1].as_point(), pts[top].as_point(), pts[read].as_point())
        != Orientation::ClockWise
    {
      top -= 1;
    }
    top += 1;
    pts.swap(top, read);
  }
  pts.truncate(top + 1);
  pts
}

// Clockwise polar order around the pivot, nearest first on ties.
//
// Every other point lies in the half-plane above the pivot (or on its right
// at equal height), so the cross product alone is a consistent order.
fn cmp_around(pivot: &Point, a: &Point, b: &Point) -> Ordering {
  if a == pivot || b == pivot {
    // Duplicates of the pivot sort first.
    return (a != pivot).cmp(&(b != pivot));
  }
  match orientation(pivot, a, b).partial_cmp(&0.0) {
    Some(Ordering::Less) => Ordering::Less,
    Some(Ordering::Greater) => Ordering::Greater,
    _ => pivot.cmp_distance_to(a, b),
  }
}

// Lowest point, leftmost on ties. First index wins.
fn pivot_index<P: AsPoint>(pts: &[P]) -> usize {
  (0..pts.len())
    .min_by(|&i, &j| pts[i].as_point().cmp_lowest(pts[j].as_point()))
    .unwrap_or(0)
}

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
mod tests {
  use super::*;
  use crate::data::{is_strictly_convex, locate, IndexedPoint, PointLocation};
  use crate::testing::*;

  use proptest::collection::*;
  use proptest::prelude::*;
  use test_strategy::proptest;

  #[test]
  fn convex_hull_colinear() {
    let points = vec![
      Point::new([0.0, 0.0]),
      Point::new([1.0, 0.0]),
      Point::new([2.0, 0.0]),
      Point::new([3.0, 0.0]),
      Point::new([4.0, 0.0]),
      Point::new([1.0, 1.0]),
    ];
    let hull = convex_hull(points);
    assert_eq!(
      hull,
      vec![
        Point::new([0.0, 0.0]),
        Point::new([1.0, 1.0]),
        Point::new([4.0, 0.0]),
      ]
    );
  }

  #[test]
  fn convex_hull_colinear_rev() {
    let points = vec![
      Point::new([0.0, 0.0]),
      Point::new([1.0, 0.0]),
      Point::new([0.0, 9.0]),
      Point::new([0.0, 8.0]),
      Point::new([0.0, 7.0]),
      Point::new([0.0, 6.0]),
    ];
    let hull = convex_hull(points);
    assert_eq!(
      hull,
      vec![
        Point::new([0.0, 0.0]),
        Point::new([0.0, 9.0]),
        Point::new([1.0, 0.0]),
      ]
    );
  }

  #[test]
  fn convex_hull_dups() {
    let points = vec![
      Point::new([0.0, 0.0]),
      Point::new([1.0, 0.0]),
      Point::new([0.0, 0.0]),
      Point::new([1.0, 0.0]),
      Point::new([2.0, 2.0]),
      Point::new([2.0, 2.0]),
      Point::new([5.0, 1.0]),
      Point::new([5.0, 1.0]),
    ];
    let hull = convex_hull(points);
    assert_eq!(hull.len(), 4);
    assert!(is_strictly_convex(&hull));
  }

  #[test]
  fn all_points_on_a_line() {
    let points = vec![
      Point::new([2.0, 2.0]),
      Point::new([0.0, 0.0]),
      Point::new([1.0, 1.0]),
      Point::new([3.0, 3.0]),
    ];
    assert_eq!(
      convex_hull(points),
      vec![Point::new([0.0, 0.0]), Point::new([3.0, 3.0])]
    );
  }

  #[test]
  fn all_points_identical() {
    let points = vec![Point::new([1.0, 1.0]); 5];
    assert_eq!(convex_hull(points), vec![Point::new([1.0, 1.0])]);
  }

  #[test]
  fn small_inputs_unchanged() {
    let points = vec![Point::new([1.0, 1.0]), Point::new([0.0, 0.0])];
    assert_eq!(convex_hull(points.clone()), points);
    let empty: Vec<Point> = vec![];
    assert!(convex_hull(empty).is_empty());
  }

  #[test]
  fn keeps_point_identity() {
    let pts = vec![
      Point::new([0.0, 0.0]),
      Point::new([0.5, 0.5]),
      Point::new([0.0, 1.0]),
      Point::new([1.0, 0.0]),
    ];
    let hull = convex_hull(IndexedPoint::index_all(&pts));
    let ids: Vec<usize> = hull.iter().map(|p| p.id.usize()).collect();
    assert_eq!(ids, vec![0, 2, 3]);
  }

  #[proptest]
  fn convex_hull_prop(#[strategy(vec(any_grid_point(), 0..100))] pts: Vec<Point>) {
    let hull = convex_hull(pts.clone());
    if pts.len() < 3 {
      prop_assert_eq!(&hull, &pts);
    } else {
      // Prop #1: Results are strictly convex and clockwise.
      prop_assert!(is_strictly_convex(&hull));
      // Prop #2: No points from the input set are outside the polygon.
      for pt in pts.iter() {
        prop_assert_ne!(locate(&hull, pt), PointLocation::Outside)
      }
    }
    // Prop #3: All vertices are in the input set.
    for pt in hull.iter() {
      prop_assert!(pts.contains(pt))
    }
  }
}
