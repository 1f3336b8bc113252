use crate::data::{AsPoint, Point};

/// Euclidean distance between two points.
///
/// Only used to break ties between colinear candidates.
pub fn distance(a: &Point, b: &Point) -> f64 {
  a.squared_euclidean_distance(b).sqrt()
}

// First index whose key beats every earlier key under a strict comparison.
fn first_extreme<P, F>(pts: &[P], better: F) -> Option<usize>
where
  P: AsPoint,
  F: Fn(&Point, &Point) -> bool,
{
  let mut best: Option<usize> = None;
  for (i, pt) in pts.iter().enumerate() {
    match best {
      Some(b) if !better(pt.as_point(), pts[b].as_point()) => {}
      _ => best = Some(i),
    }
  }
  best
}

/// $O(n)$ Index of the first point with the smallest x coordinate.
pub fn leftmost<P: AsPoint>(pts: &[P]) -> Option<usize> {
  first_extreme(pts, |a, b| a.x_coord() < b.x_coord())
}

/// $O(n)$ Index of the first point with the largest x coordinate.
pub fn rightmost<P: AsPoint>(pts: &[P]) -> Option<usize> {
  first_extreme(pts, |a, b| a.x_coord() > b.x_coord())
}

/// $O(n)$ Index of the first point with the smallest y coordinate.
pub fn lowest<P: AsPoint>(pts: &[P]) -> Option<usize> {
  first_extreme(pts, |a, b| a.y_coord() < b.y_coord())
}

/// $O(n)$ Index of the first point with the largest y coordinate.
pub fn highest<P: AsPoint>(pts: &[P]) -> Option<usize> {
  first_extreme(pts, |a, b| a.y_coord() > b.y_coord())
}

// Leftmost point, lowest on ties. Always a strict corner of the hull.
pub(crate) fn leftmost_lowest<P: AsPoint>(pts: &[P]) -> Option<usize> {
  first_extreme(pts, |a, b| {
    a.x_coord() < b.x_coord() || (a.x_coord() == b.x_coord() && a.y_coord() < b.y_coord())
  })
}

// Rightmost point, highest on ties. Always a strict corner of the hull.
pub(crate) fn rightmost_highest<P: AsPoint>(pts: &[P]) -> Option<usize> {
  first_extreme(pts, |a, b| {
    a.x_coord() > b.x_coord() || (a.x_coord() == b.x_coord() && a.y_coord() > b.y_coord())
  })
}
