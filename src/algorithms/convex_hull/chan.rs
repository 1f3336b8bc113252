use std::time::Instant;

use super::parallel_chan::{group_size, ChanConfig};
use super::subhulls::SubHulls;
use super::wrap::merge_sequential;
use crate::data::{IndexedPoint, Point};
use crate::Error;

// https://en.wikipedia.org/wiki/Chan%27s_algorithm

/// $O(n \log h)$ Convex hull by Chan's algorithm on the calling thread.
///
/// Starts with groups of `2^(2^3)` points and squares the group size until a
/// single clockwise wrap over the group hulls closes within one group's worth
/// of vertices. The result is clockwise and starts at the leftmost (then
/// lowest) point.
///
/// Inputs with fewer than three points are returned unchanged.
///
/// # Errors
/// [`Error::ExponentOverflow`] if the group size can no longer be squared.
/// This only happens for inputs too large to address.
///
/// ```rust
/// # use chanhull::algorithms::convex_hull::chan::convex_hull;
/// # use chanhull::data::Point;
/// let pts = vec![
///   Point::new([0.0, 0.0]),
///   Point::new([1.0, 1.0]),
///   Point::new([2.0, 2.0]),
///   Point::new([0.0, 2.0]),
///   Point::new([2.0, 0.0]),
/// ];
/// assert_eq!(convex_hull(&pts).unwrap(), vec![
///   Point::new([0.0, 0.0]),
///   Point::new([0.0, 2.0]),
///   Point::new([2.0, 2.0]),
///   Point::new([2.0, 0.0]),
/// ]);
/// ```
pub fn convex_hull(pts: &[Point]) -> Result<Vec<Point>, Error> {
  convex_hull_from(pts, ChanConfig::default().initial_exponent)
}

/// Like [`convex_hull`], with groups of `2^(2^initial_exponent)` points in the
/// first attempt.
pub fn convex_hull_from(pts: &[Point], initial_exponent: u32) -> Result<Vec<Point>, Error> {
  if pts.len() < 3 {
    return Ok(pts.to_vec());
  }
  let indexed = IndexedPoint::index_all(pts);
  let mut exponent = initial_exponent;
  loop {
    let m = group_size(exponent, indexed.len())?;
    log::debug!("sequential chan: exponent {exponent}, group size {m}");

    let clock = Instant::now();
    let hulls = SubHulls::sequential(&indexed, m);
    log::debug!(
      "sequential chan: {} sub-hull points in {:?}",
      hulls.points.len(),
      clock.elapsed()
    );

    let clock = Instant::now();
    let wrapped = merge_sequential(&hulls, m)?;
    log::debug!("sequential chan: wrap took {:?}", clock.elapsed());

    if let Some(hull) = wrapped {
      return Ok(hull.into_iter().map(|p| p.point).collect());
    }
    exponent = exponent
      .checked_add(1)
      .ok_or(Error::ExponentOverflow { exponent })?;
  }
}
