use std::thread;

use crate::data::{AsPoint, Point};
use crate::orientation;
use crate::utils::{leftmost_lowest, rightmost_highest};

// https://en.wikipedia.org/wiki/Quickhull

/// $O(n \log n)$ expected. Convex hull by recursive partitioning.
///
/// The leftmost and rightmost points split the input into an upper and a
/// lower half. Each half is refined by the point farthest from the current
/// chord until no point is left strictly outside. The result is clockwise and
/// starts at the leftmost (then lowest) point. Colinear boundary points are
/// dropped.
///
/// Inputs with fewer than three points are returned unchanged.
///
/// ```rust
/// # use chanhull::algorithms::convex_hull::quickhull::convex_hull;
/// # use chanhull::data::Point;
/// let pts = vec![
///   Point::new([0.0, 0.0]),
///   Point::new([4.0, 0.0]),
///   Point::new([2.0, 1.0]),
///   Point::new([2.0, 3.0]),
///   Point::new([2.0, -3.0]),
/// ];
/// assert_eq!(convex_hull(&pts), vec![
///   Point::new([0.0, 0.0]),
///   Point::new([2.0, 3.0]),
///   Point::new([4.0, 0.0]),
///   Point::new([2.0, -3.0]),
/// ]);
/// ```
pub fn convex_hull<P>(pts: &[P]) -> Vec<P>
where
  P: AsPoint + Clone,
{
  if pts.len() < 3 {
    return pts.to_vec();
  }
  let (Some(left), Some(right)) = (leftmost_lowest(pts), rightmost_highest(pts)) else {
    return Vec::new();
  };
  let (a, b) = (*pts[left].as_point(), *pts[right].as_point());
  if a == b {
    return vec![pts[left].clone()];
  }

  let everything: Vec<usize> = (0..pts.len()).collect();
  let mut out = vec![left];
  // Above the chord, walking left to right.
  chain(pts, left, right, outside(pts, &a, &b, &everything), &mut out);
  out.push(right);
  // Below the chord, walking back.
  chain(pts, right, left, outside(pts, &b, &a, &everything), &mut out);
  out.into_iter().map(|i| pts[i].clone()).collect()
}

// Chords are split on new threads until this depth, then recursively on the
// thread that reached it.
const FORK_DEPTH: u32 = 6;
// Sets smaller than this are not worth a thread.
const FORK_MIN: usize = 1024;

/// [`convex_hull`] with the two sides of every chord refined concurrently.
///
/// Returns exactly what [`convex_hull`] returns for the same input.
///
/// # Panics
/// Re-raises a panic from a worker thread.
pub fn convex_hull_parallel<P>(pts: &[P]) -> Vec<P>
where
  P: AsPoint + Clone + Sync,
{
  if pts.len() < 3 {
    return pts.to_vec();
  }
  let (Some(left), Some(right)) = (leftmost_lowest(pts), rightmost_highest(pts)) else {
    return Vec::new();
  };
  let (a, b) = (*pts[left].as_point(), *pts[right].as_point());
  if a == b {
    return vec![pts[left].clone()];
  }

  let everything: Vec<usize> = (0..pts.len()).collect();
  let (upper, lower) = thread::scope(|s| {
    let upper = s.spawn(|| {
      let above = outside(pts, &a, &b, &everything);
      fork_chain(pts, left, right, above, 1)
    });
    let lower = fork_chain(pts, right, left, outside(pts, &b, &a, &everything), 1);
    (join(upper), lower)
  });

  let mut out = Vec::with_capacity(upper.len() + lower.len() + 2);
  out.push(left);
  out.extend(upper);
  out.push(right);
  out.extend(lower);
  out.into_iter().map(|i| pts[i].clone()).collect()
}

fn join<T>(handle: thread::ScopedJoinHandle<'_, T>) -> T {
  match handle.join() {
    Ok(out) => out,
    Err(panic) => std::panic::resume_unwind(panic),
  }
}

// Same vertices as `chain`, returned instead of appended.
fn fork_chain<P>(pts: &[P], a: usize, b: usize, set: Vec<usize>, depth: u32) -> Vec<usize>
where
  P: AsPoint + Sync,
{
  if depth >= FORK_DEPTH || set.len() < FORK_MIN {
    let mut out = Vec::new();
    chain(pts, a, b, set, &mut out);
    return out;
  }
  let Some(c) = farthest(pts, a, b, &set) else {
    return Vec::new();
  };
  let (pa, pb, pc) = (pts[a].as_point(), pts[b].as_point(), pts[c].as_point());
  let first = outside(pts, pa, pc, &set);
  let second = outside(pts, pc, pb, &set);
  drop(set);
  let (mut out, tail) = thread::scope(|s| {
    let head = s.spawn(|| fork_chain(pts, a, c, first, depth + 1));
    let tail = fork_chain(pts, c, b, second, depth + 1);
    (join(head), tail)
  });
  out.push(c);
  out.extend(tail);
  out
}

// Indices in `set` strictly counter-clockwise of `a -> b`.
fn outside<P: AsPoint>(pts: &[P], a: &Point, b: &Point, set: &[usize]) -> Vec<usize> {
  set
    .iter()
    .copied()
    .filter(|&i| orientation(a, b, pts[i].as_point()) > 0.0)
    .collect()
}

// Position of `pt` along `a -> b`, scaled by the chord length.
fn projection(a: &Point, b: &Point, pt: &Point) -> f64 {
  let dx = f64::from(b.x_coord()) - f64::from(a.x_coord());
  let dy = f64::from(b.y_coord()) - f64::from(a.y_coord());
  let px = f64::from(pt.x_coord()) - f64::from(a.x_coord());
  let py = f64::from(pt.y_coord()) - f64::from(a.y_coord());
  px * dx + py * dy
}

// Farthest from the chord `a -> b`. Of several equally far points the one
// nearest to `a` along the chord is a corner; the others may not be.
fn farthest<P: AsPoint>(pts: &[P], a: usize, b: usize, set: &[usize]) -> Option<usize> {
  let (pa, pb) = (pts[a].as_point(), pts[b].as_point());
  let mut best: Option<(usize, f64, f64)> = None;
  for &i in set {
    let pt = pts[i].as_point();
    let area = orientation(pa, pb, pt);
    let along = projection(pa, pb, pt);
    match best {
      Some((_, area_best, along_best))
        if area < area_best || (area == area_best && along >= along_best) => {}
      _ => best = Some((i, area, along)),
    }
  }
  best.map(|(i, _, _)| i)
}

// Appends the hull vertices strictly between `a` and `b`. Every index in
// `set` lies strictly counter-clockwise of `a -> b`.
fn chain<P: AsPoint>(pts: &[P], a: usize, b: usize, set: Vec<usize>, out: &mut Vec<usize>) {
  let Some(c) = farthest(pts, a, b, &set) else {
    return;
  };
  let (pa, pb, pc) = (pts[a].as_point(), pts[b].as_point(), pts[c].as_point());
  let first = outside(pts, pa, pc, &set);
  let second = outside(pts, pc, pb, &set);
  drop(set);
  chain(pts, a, c, first, out);
  out.push(c);
  chain(pts, c, b, second, out);
}
