//! Chan's algorithm with parallel sub-hulls, a two-sided merge and racing
//! group size guesses.
//!
//! One attempt with exponent `t` splits the input into contiguous groups of
//! `m = 2^(2^t)` points (capped at the input size), builds the hull of every
//! group on a bounded worker pool and wraps the group hulls from both sides at
//! once. The wrap gives up as soon as more than `m` vertices have been
//! claimed. Several attempts with consecutive exponents race on detached
//! threads; the first one to close the hull wins and the others are left to
//! finish on their own.
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use super::subhulls::{Coalescing, SubHulls};
use super::wrap::merge_parallel;
use crate::data::{IndexedPoint, Point};
use crate::Error;

pub use super::subhulls::GlobalSubhullCache;

/// Tuning knobs for [`convex_hull_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChanConfig {
  /// Exponent `t` of the first group size `2^(2^t)`.
  pub initial_exponent: u32,
  /// Upper bound on sub-hull worker threads per attempt.
  pub max_workers: usize,
  /// Attempts started together in every round.
  pub simultaneous_guesses: u32,
  /// Reuse sub-hulls of earlier attempts as input to later ones.
  pub coalesce: bool,
}

impl Default for ChanConfig {
  fn default() -> Self {
    ChanConfig {
      initial_exponent: 3,
      max_workers: 300,
      simultaneous_guesses: 2,
      coalesce: false,
    }
  }
}

impl ChanConfig {
  pub const MAX_SIMULTANEOUS_GUESSES: u32 = 16;

  /// # Errors
  /// [`Error::InvalidConfig`] if there are no workers, or if the number of
  /// simultaneous guesses is zero or above [`Self::MAX_SIMULTANEOUS_GUESSES`].
  pub fn validate(&self) -> Result<(), Error> {
    if self.max_workers == 0 {
      return Err(Error::InvalidConfig("max_workers must be positive"));
    }
    if !(1..=Self::MAX_SIMULTANEOUS_GUESSES).contains(&self.simultaneous_guesses) {
      return Err(Error::InvalidConfig(
        "simultaneous_guesses must be between 1 and 16",
      ));
    }
    Ok(())
  }
}

/// What one attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttemptMetrics {
  pub exponent: u32,
  pub group_size: usize,
  /// Points on all sub-hulls together.
  pub subhull_points: usize,
  /// Input points that cached sub-hulls spared the Graham scans.
  pub coalesced_savings: usize,
  pub claimed_points: usize,
  pub wasted_insertions: usize,
  pub subhull_time: Duration,
  pub merge_time: Duration,
  pub succeeded: bool,
}

/// Per-call counters returned by [`convex_hull_with`].
///
/// Attempts appear in the order their results arrived. Attempts that were
/// still running when the winner arrived are not included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HullMetrics {
  pub rounds: usize,
  pub attempts: Vec<AttemptMetrics>,
  pub total_time: Duration,
}

impl HullMetrics {
  pub fn winner(&self) -> Option<&AttemptMetrics> {
    self.attempts.iter().find(|attempt| attempt.succeeded)
  }
}

/// Group size `2^(2^exponent)`, capped at `n`.
///
/// # Errors
/// [`Error::ExponentOverflow`] if `2^(2^exponent)` does not fit in a `usize`,
/// whatever `n` is.
///
/// ```rust
/// # use chanhull::algorithms::convex_hull::parallel_chan::group_size;
/// assert_eq!(group_size(3, 1_000), Ok(256));
/// assert_eq!(group_size(4, 1_000), Ok(1_000));
/// assert!(group_size(7, 1_000).is_err());
/// ```
pub fn group_size(exponent: u32, n: usize) -> Result<usize, Error> {
  let overflow = Error::ExponentOverflow { exponent };
  let bits = 1u32.checked_shl(exponent).ok_or(overflow)?;
  let size = 1usize.checked_shl(bits).ok_or(overflow)?;
  Ok(size.min(n))
}

/// Convex hull with the default [`ChanConfig`].
///
/// The vertices are returned in clockwise order without colinear boundary
/// points. Inputs with fewer than three points are returned unchanged.
///
/// # Errors
/// See [`convex_hull_with`].
pub fn convex_hull(pts: &[Point]) -> Result<Vec<Point>, Error> {
  convex_hull_with(pts, &ChanConfig::default()).map(|(hull, _)| hull)
}

/// Convex hull and metrics for one call.
///
/// # Errors
/// * [`Error::InvalidConfig`] if `config` does not validate.
/// * [`Error::ExponentOverflow`] if every attempt of a round failed and at
///   least one of them could not size its groups.
/// * [`Error::TangentInconsistency`] if a merge walked off the hull, which
///   points to inconsistent floating point predicates.
///
/// # Panics
/// Re-raises a panic from an attempt thread.
pub fn convex_hull_with(
  pts: &[Point],
  config: &ChanConfig,
) -> Result<(Vec<Point>, HullMetrics), Error> {
  config.validate()?;
  let clock = Instant::now();
  let mut metrics = HullMetrics::default();
  if pts.len() < 3 {
    return Ok((pts.to_vec(), metrics));
  }

  let data: Arc<[IndexedPoint]> = IndexedPoint::index_all(pts).into();
  let coalescing = if config.coalesce {
    let base = group_size(config.initial_exponent, data.len())?;
    Some(Arc::new(Coalescing::new(base, data.len())))
  } else {
    None
  };

  let guesses = config.simultaneous_guesses;
  let mut exponent = config.initial_exponent;
  loop {
    metrics.rounds += 1;
    log::debug!(
      "round {}: exponents {}..{}",
      metrics.rounds,
      exponent,
      exponent.saturating_add(guesses)
    );

    let (tx, rx) = mpsc::channel();
    let handles: Vec<_> = (0..guesses)
      .map(|k| {
        let guess = exponent.saturating_add(k);
        let tx = tx.clone();
        let data = Arc::clone(&data);
        let coalescing = coalescing.clone();
        let max_workers = config.max_workers;
        thread::spawn(move || {
          let outcome = attempt(&data, guess, max_workers, coalescing.as_deref());
          // The caller stops listening once a winner has arrived.
          let _ = tx.send(outcome);
        })
      })
      .collect();
    drop(tx);

    let mut error = None;
    for outcome in rx.iter() {
      match outcome {
        Ok((Some(hull), stats)) => {
          metrics.attempts.push(stats);
          metrics.total_time = clock.elapsed();
          log::debug!("hull of {} points in {:?}", hull.len(), metrics.total_time);
          return Ok((hull, metrics));
        }
        Ok((None, stats)) => {
          log::warn!(
            "group size {} too small, {} points claimed",
            stats.group_size,
            stats.claimed_points
          );
          metrics.attempts.push(stats);
        }
        Err(err) => {
          log::warn!("attempt failed: {err}");
          error.get_or_insert(err);
        }
      }
    }
    // Every sender is gone. An attempt that never reported has panicked.
    for handle in handles {
      if let Err(panic) = handle.join() {
        std::panic::resume_unwind(panic);
      }
    }
    if let Some(err) = error {
      return Err(err);
    }
    exponent = exponent
      .checked_add(guesses)
      .ok_or(Error::ExponentOverflow { exponent })?;
  }
}

fn attempt(
  data: &[IndexedPoint],
  exponent: u32,
  max_workers: usize,
  coalescing: Option<&Coalescing>,
) -> Result<(Option<Vec<Point>>, AttemptMetrics), Error> {
  let m = group_size(exponent, data.len())?;
  let mut metrics = AttemptMetrics {
    exponent,
    group_size: m,
    ..AttemptMetrics::default()
  };
  log::debug!("exponent {exponent}: group size {m}");

  let clock = Instant::now();
  let (hulls, saved) = SubHulls::parallel(data, m, max_workers, coalescing);
  metrics.subhull_time = clock.elapsed();
  metrics.subhull_points = hulls.points.len();
  metrics.coalesced_savings = saved;
  log::debug!(
    "exponent {exponent}: {} sub-hull points in {:?}, {saved} points coalesced",
    metrics.subhull_points,
    metrics.subhull_time
  );

  let clock = Instant::now();
  let merged = merge_parallel(&hulls, m)?;
  metrics.merge_time = clock.elapsed();
  metrics.claimed_points = merged.claims.len;
  metrics.wasted_insertions = merged.claims.wasted_insertions;
  log::debug!("exponent {exponent}: merge took {:?}", metrics.merge_time);

  let hull = merged
    .hull
    .map(|hull| hull.into_iter().map(|p| p.point).collect());
  metrics.succeeded = hull.is_some();
  Ok((hull, metrics))
}

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
mod tests {
  use super::*;
  use crate::algorithms::convex_hull::{chan, graham_scan};
  use crate::data::{is_strictly_convex, locate, PointLocation};
  use crate::testing::*;
  use crate::utils::leftmost_lowest;

  use claims::{assert_err, assert_ok};
  use proptest::prelude::*;
  use test_strategy::proptest;

  // Parallel hulls may start at the rightmost point.
  fn from_leftmost(mut hull: Vec<Point>) -> Vec<Point> {
    if let Some(k) = leftmost_lowest(&hull) {
      hull.rotate_left(k);
    }
    hull
  }

  #[test]
  fn square_scenario() {
    let pts = vec![
      Point::new([0.0, 0.0]),
      Point::new([1.0, 0.0]),
      Point::new([1.0, 1.0]),
      Point::new([0.0, 1.0]),
      Point::new([0.5, 0.5]),
    ];
    let hull = from_leftmost(convex_hull(&pts).unwrap());
    assert_eq!(
      hull,
      vec![
        Point::new([0.0, 0.0]),
        Point::new([0.0, 1.0]),
        Point::new([1.0, 1.0]),
        Point::new([1.0, 0.0]),
      ]
    );
  }

  #[test]
  fn colinear_scenario() {
    let pts = vec![
      Point::new([0.0, 0.0]),
      Point::new([1.0, 0.0]),
      Point::new([2.0, 0.0]),
      Point::new([1.0, 1.0]),
    ];
    let hull = from_leftmost(convex_hull(&pts).unwrap());
    assert_eq!(
      hull,
      vec![
        Point::new([0.0, 0.0]),
        Point::new([1.0, 1.0]),
        Point::new([2.0, 0.0]),
      ]
    );
  }

  fn centred_square() -> Vec<Point> {
    vec![
      Point::new([-1.0, -1.0]),
      Point::new([-1.0, 1.0]),
      Point::new([1.0, 1.0]),
      Point::new([1.0, -1.0]),
    ]
  }

  #[test]
  fn centred_square_with_interior_points() {
    let mut pts = vec![
      Point::new([0.0, 0.0]),
      Point::new([0.5, -0.5]),
      Point::new([-0.25, 0.75]),
    ];
    pts.extend(centred_square());
    pts.push(Point::new([0.9, 0.9]));
    for config in [
      ChanConfig::default(),
      ChanConfig {
        initial_exponent: 0,
        coalesce: true,
        ..ChanConfig::default()
      },
    ] {
      let (hull, _) = convex_hull_with(&pts, &config).unwrap();
      assert_eq!(from_leftmost(hull), centred_square());
    }
  }

  #[test]
  fn centred_square_with_colinear_edge_point() {
    let pts = vec![
      Point::new([-1.0, -1.0]),
      Point::new([0.0, -1.0]),
      Point::new([1.0, -1.0]),
      Point::new([1.0, 1.0]),
      Point::new([-1.0, 1.0]),
    ];
    let hull = from_leftmost(convex_hull(&pts).unwrap());
    assert_eq!(hull, centred_square());
    assert!(!hull.contains(&Point::new([0.0, -1.0])));
  }

  #[test]
  fn small_inputs_unchanged() {
    let two = vec![Point::new([3.0, 1.0]), Point::new([0.0, 0.0])];
    assert_eq!(convex_hull(&two).unwrap(), two);
    assert!(convex_hull(&[]).unwrap().is_empty());
  }

  #[test]
  fn cloud_with_corners() {
    let mut pts = grid_cloud(10_000, 1000, 42);
    for corner in [[-1.0, -1.0], [-1.0, 1001.0], [1001.0, 1001.0], [1001.0, -1.0]] {
      pts.push(Point::new(corner));
    }
    let expected = vec![
      Point::new([-1.0, -1.0]),
      Point::new([-1.0, 1001.0]),
      Point::new([1001.0, 1001.0]),
      Point::new([1001.0, -1.0]),
    ];
    let configs = [
      ChanConfig::default(),
      ChanConfig {
        initial_exponent: 1,
        simultaneous_guesses: 1,
        ..ChanConfig::default()
      },
      ChanConfig {
        initial_exponent: 0,
        max_workers: 4,
        simultaneous_guesses: 3,
        coalesce: true,
      },
    ];
    for config in configs {
      let (hull, metrics) = convex_hull_with(&pts, &config).unwrap();
      assert_eq!(from_leftmost(hull), expected);
      assert!(metrics.rounds >= 1);
      assert!(metrics.winner().is_some());
    }
  }

  #[test]
  fn small_guesses_take_several_rounds() {
    let pts = grid_cloud(2_000, 300, 5);
    let config = ChanConfig {
      initial_exponent: 0,
      simultaneous_guesses: 1,
      ..ChanConfig::default()
    };
    let (hull, metrics) = convex_hull_with(&pts, &config).unwrap();
    assert!(is_strictly_convex(&hull));
    // Groups of two points can't wrap a hull with more than two vertices.
    assert!(metrics.rounds >= 2);
    assert!(!metrics.attempts[0].succeeded);
    assert_eq!(metrics.attempts[0].group_size, 2);
  }

  #[test]
  fn coalescing_reports_savings() {
    let pts = grid_cloud(4_096, 500, 9);
    let config = ChanConfig {
      initial_exponent: 1,
      simultaneous_guesses: 1,
      coalesce: true,
      ..ChanConfig::default()
    };
    let (hull, metrics) = convex_hull_with(&pts, &config).unwrap();
    assert_eq!(sorted(hull), sorted(graham_scan::convex_hull(pts.clone())));
    // Later attempts run on the cached hulls of the first one.
    assert!(metrics.attempts.len() >= 2);
    assert_eq!(metrics.attempts[0].coalesced_savings, 0);
    assert!(metrics.attempts[1].coalesced_savings > 0);
  }

  #[test]
  fn exponent_overflow() {
    let pts = grid_cloud(100, 10, 0);
    let config = ChanConfig {
      initial_exponent: 6,
      simultaneous_guesses: 1,
      ..ChanConfig::default()
    };
    assert_eq!(
      convex_hull_with(&pts, &config).map(|(hull, _)| hull),
      Err(Error::ExponentOverflow { exponent: 6 })
    );
  }

  #[test]
  fn invalid_configs() {
    let pts = grid_cloud(10, 10, 0);
    for config in [
      ChanConfig {
        max_workers: 0,
        ..ChanConfig::default()
      },
      ChanConfig {
        simultaneous_guesses: 0,
        ..ChanConfig::default()
      },
      ChanConfig {
        simultaneous_guesses: 17,
        ..ChanConfig::default()
      },
    ] {
      assert_err!(config.validate());
      assert!(matches!(
        convex_hull_with(&pts, &config),
        Err(Error::InvalidConfig(_))
      ));
    }
    assert_ok!(ChanConfig::default().validate());
  }

  #[test]
  fn group_sizes() {
    assert_eq!(group_size(0, 100), Ok(2));
    assert_eq!(group_size(1, 100), Ok(4));
    assert_eq!(group_size(2, 100), Ok(16));
    assert_eq!(group_size(3, 100), Ok(100));
    assert_eq!(group_size(6, 1), Err(Error::ExponentOverflow { exponent: 6 }));
    assert_eq!(
      group_size(u32::MAX, 1),
      Err(Error::ExponentOverflow {
        exponent: u32::MAX
      })
    );
  }

  #[proptest]
  fn matches_sequential_chan(#[strategy(any_grid_points(300))] pts: Vec<Point>) {
    let config = ChanConfig {
      initial_exponent: 1,
      max_workers: 8,
      ..ChanConfig::default()
    };
    let (hull, _) = convex_hull_with(&pts, &config).unwrap();
    if pts.len() < 3 {
      prop_assert_eq!(&hull, &pts);
    } else {
      prop_assert!(is_strictly_convex(&hull));
      for pt in pts.iter() {
        prop_assert_ne!(locate(&hull, pt), PointLocation::Outside)
      }
      let seq = chan::convex_hull_from(&pts, 1).unwrap();
      prop_assert_eq!(from_leftmost(hull), seq);
    }
  }
}
