use super::tangent::tangent_linear;
use crate::data::AsPoint;
use crate::utils::leftmost_lowest;
use crate::Rotation;

// https://en.wikipedia.org/wiki/Gift_wrapping_algorithm

// Properties:
//    No panics.
//    Output is clockwise and drops colinear boundary points.
//    No points are outside the resulting convex polygon.
/// Convex hull of a set of points.
///
/// [Gift Wrapping][wiki] algorithm for finding the smallest convex polygon which
/// contains all the given points. The walk starts at the leftmost (then
/// lowest) point and picks, at every step, the point with nothing
/// counter-clockwise of it. Of several colinear candidates the farthest one is
/// taken, so intermediate boundary points are skipped.
///
/// Inputs with fewer than three points are returned unchanged.
///
/// # Properties
/// * No points from the input set will be outside the returned convex polygon.
/// * All vertices in the convex polygon are from the input set.
///
/// # Time complexity
/// $O(n h)$ as h is the size of the points on convex hull
///
/// # Examples
///
/// ```rust
/// # use chanhull::algorithms::convex_hull::gift_wrapping::convex_hull;
/// # use chanhull::data::Point;
/// let pts = vec![
///   Point::new([0.0, 0.0]),
///   Point::new([1.0, 0.0]),
///   Point::new([2.0, 0.0]),
///   Point::new([1.0, 1.0]),
///   Point::new([1.0, 0.5]),
/// ];
/// assert_eq!(convex_hull(&pts), vec![
///   Point::new([0.0, 0.0]),
///   Point::new([1.0, 1.0]),
///   Point::new([2.0, 0.0]),
/// ]);
/// ```
///
/// [wiki]: https://en.wikipedia.org/wiki/Gift_wrapping_algorithm
pub fn convex_hull<P>(pts: &[P]) -> Vec<P>
where
  P: AsPoint + Clone,
{
  let n = pts.len();
  if n < 3 {
    return pts.to_vec();
  }
  let Some(start) = leftmost_lowest(pts) else {
    return Vec::new();
  };
  let origin = *pts[start].as_point();

  let mut hull: Vec<P> = Vec::new();
  let mut p = start;
  loop {
    hull.push(pts[p].clone());
    let Some(q) = tangent_linear(pts, pts[p].as_point(), Rotation::CounterClockWise) else {
      break;
    };
    let next = pts[q].as_point();
    // Every point coincides with `p`, or the walk is back where it started.
    if next == pts[p].as_point() || *next == origin || hull.len() == n {
      break;
    }
    p = q;
  }
  hull
}
