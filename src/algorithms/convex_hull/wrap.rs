// Gift wrapping over a set of sub-hulls.
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use super::subhulls::SubHulls;
use super::tangent::{beats, tangent};
use crate::data::{ConcurrentMap, ConcurrentPointSet, IndexedPoint, MapStats, Point};
use crate::utils::{leftmost_lowest, rightmost_highest};
use crate::{Error, Rotation};

// Hull vertices are walked clockwise, so the next vertex is the one with
// nothing counter-clockwise of it.
const WALK: Rotation = Rotation::CounterClockWise;

/// The hull vertex following `cur` in clockwise order.
///
/// Each sub-hull offers its tangent from `cur`; the best offer wins. Ties keep
/// the earlier sub-hull. `cur` must be a vertex of the hull of all sub-hulls.
pub(crate) fn successor(hulls: &SubHulls, cur: &Point) -> Result<Option<IndexedPoint>, Error> {
  let mut best: Option<IndexedPoint> = None;
  for group in hulls.groups().filter(|group| !group.is_empty()) {
    let cand = group[tangent(group, cur, WALK)?];
    match best {
      Some(b) if !beats(cur, &b.point, &cand.point, WALK) => {}
      _ => best = Some(cand),
    }
  }
  Ok(best)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
  Left,
  Right,
}

#[derive(Debug)]
pub(crate) struct Merged {
  // `None` when the step budget ran out.
  pub hull: Option<Vec<IndexedPoint>>,
  pub claims: MapStats,
}

/// Single clockwise walk from the leftmost point. Fails once the hull would
/// need more than `budget` vertices.
pub(crate) fn merge_sequential(
  hulls: &SubHulls,
  budget: usize,
) -> Result<Option<Vec<IndexedPoint>>, Error> {
  let Some(start) = leftmost_lowest(&hulls.points) else {
    return Ok(Some(Vec::new()));
  };
  let start = hulls.points[start];
  let mut hull = Vec::new();
  let mut cur = start;
  loop {
    if hull.len() == budget {
      log::trace!("sequential wrap exceeded {budget} vertices");
      return Ok(None);
    }
    hull.push(cur);
    match successor(hulls, &cur.point)? {
      Some(next) if next.point != cur.point && next.point != start.point => cur = next,
      _ => break,
    }
  }
  Ok(Some(hull))
}

/// Two clockwise walks, one from the leftmost and one from the rightmost
/// point, running on separate threads.
///
/// Every vertex is claimed in a shared [`ConcurrentPointSet`] before it is
/// recorded, and a walk stops at the first vertex that is already claimed.
/// The left walk's arc followed by the right walk's arc is then the whole
/// hull in clockwise order. A shared counter caps the total number of claims
/// at `budget`; going over it fails the merge for both walks.
pub(crate) fn merge_parallel(hulls: &SubHulls, budget: usize) -> Result<Merged, Error> {
  let pts = &hulls.points;
  let (Some(left), Some(right)) = (leftmost_lowest(pts), rightmost_highest(pts)) else {
    return Ok(Merged {
      hull: Some(Vec::new()),
      claims: MapStats::default(),
    });
  };

  let claimed: ConcurrentPointSet<Side> = ConcurrentMap::new(budget.min(pts.len()).max(1));
  let steps = AtomicUsize::new(0);
  let failed = AtomicBool::new(false);

  let walk = |start: IndexedPoint, side: Side| -> Result<Vec<IndexedPoint>, Error> {
    let mut arc = Vec::new();
    let mut cur = start;
    loop {
      if failed.load(Ordering::Acquire) {
        break;
      }
      if !claimed.insert_if_absent(cur.id, side) {
        log::trace!("{side:?} walk met a claimed vertex after {} steps", arc.len());
        break;
      }
      arc.push(cur);
      if steps.fetch_add(1, Ordering::AcqRel) + 1 > budget {
        log::trace!("{side:?} walk exhausted the budget of {budget}");
        failed.store(true, Ordering::Release);
        break;
      }
      match successor(hulls, &cur.point)? {
        Some(next) if next.point != cur.point => cur = next,
        _ => break,
      }
    }
    Ok(arc)
  };

  let (left_arc, right_arc) = thread::scope(|s| {
    let walk = &walk;
    let right_walk = s.spawn(move || walk(pts[right], Side::Right));
    let left_arc = walk(pts[left], Side::Left);
    let right_arc = match right_walk.join() {
      Ok(arc) => arc,
      Err(panic) => std::panic::resume_unwind(panic),
    };
    (left_arc, right_arc)
  });
  let (mut hull, right_arc) = (left_arc?, right_arc?);

  let claims = claimed.stats();
  if failed.load(Ordering::Acquire) {
    return Ok(Merged { hull: None, claims });
  }
  hull.extend(right_arc);
  Ok(Merged {
    hull: Some(hull),
    claims,
  })
}
