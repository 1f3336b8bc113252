use std::ops::Range;
use std::sync::{mpsc, Arc, Mutex, PoisonError};
use std::thread;

use super::graham_scan;
use crate::data::{ConcurrentMap, IndexedPoint, SubHull};

/// Sub-hulls computed by earlier attempts, keyed by the `(start, end)` input
/// range they cover.
pub type GlobalSubhullCache = ConcurrentMap<(usize, usize), Arc<[IndexedPoint]>>;

// Sub-hull reuse across attempts of one top-level call.
pub(crate) struct Coalescing {
  pub cache: GlobalSubhullCache,
  // Group size of the first attempt. Only ranges of this size are looked up.
  pub base: usize,
}

impl Coalescing {
  pub fn new(base: usize, n: usize) -> Coalescing {
    Coalescing {
      cache: GlobalSubhullCache::new(2 * (n / base.max(1)).max(1)),
      base: base.max(1),
    }
  }
}

// Every sub-hull laid out back to back in group order.
#[derive(Debug, Clone, Default)]
pub(crate) struct SubHulls {
  pub points: Vec<IndexedPoint>,
  pub sizes: Vec<usize>,
}

impl SubHulls {
  fn from_ordered(hulls: impl IntoIterator<Item = SubHull>) -> SubHulls {
    let mut out = SubHulls::default();
    for hull in hulls {
      out.sizes.push(hull.len());
      out.points.extend(hull.points);
    }
    out
  }

  pub fn groups(&self) -> impl Iterator<Item = &[IndexedPoint]> + '_ {
    let mut rest = self.points.as_slice();
    self.sizes.iter().map(move |&size| {
      let (group, tail) = rest.split_at(size);
      rest = tail;
      group
    })
  }

  /// One Graham scan per group, on the calling thread.
  pub fn sequential(pts: &[IndexedPoint], group_size: usize) -> SubHulls {
    SubHulls::from_ordered(
      group_ranges(pts.len(), group_size)
        .map(|range| SubHull::new(range.clone(), graham_scan::convex_hull(pts[range].to_vec()))),
    )
  }

  /// One Graham scan per group on a pool of at most `max_workers` threads.
  ///
  /// The calling thread feeds group ranges into a bounded work channel. Each
  /// worker pulls a range, builds its hull and sends it to a result channel
  /// drained by a single manager thread, which restores group order. Returns
  /// the hulls and the number of input points that coalescing spared the
  /// Graham scans from looking at.
  pub fn parallel(
    pts: &[IndexedPoint],
    group_size: usize,
    max_workers: usize,
    coalescing: Option<&Coalescing>,
  ) -> (SubHulls, usize) {
    let ranges: Vec<Range<usize>> = group_ranges(pts.len(), group_size).collect();
    let groups = ranges.len();
    let workers = groups.min(max_workers).max(1);

    let (work_tx, work_rx) = mpsc::sync_channel::<(usize, Range<usize>)>(workers);
    let work_rx = Mutex::new(work_rx);
    let (result_tx, result_rx) = mpsc::channel::<(usize, SubHull, usize)>();

    thread::scope(|s| {
      for _ in 0..workers {
        let work_rx = &work_rx;
        let result_tx = result_tx.clone();
        s.spawn(move || loop {
          let job = work_rx.lock().unwrap_or_else(PoisonError::into_inner).recv();
          let Ok((idx, range)) = job else {
            break;
          };
          let (hull, saved) = build(pts, range, coalescing);
          if result_tx.send((idx, hull, saved)).is_err() {
            break;
          }
        });
      }
      drop(result_tx);

      let manager = s.spawn(move || {
        let mut slots: Vec<Option<SubHull>> = vec![None; groups];
        let mut saved = 0;
        for (idx, hull, group_saved) in result_rx {
          if let Some(coalescing) = coalescing {
            let key = (hull.range.start, hull.range.end);
            coalescing.cache.put(key, Arc::from(hull.points.as_slice()));
          }
          saved += group_saved;
          slots[idx] = Some(hull);
        }
        (SubHulls::from_ordered(slots.into_iter().flatten()), saved)
      });

      for job in ranges.into_iter().enumerate() {
        if work_tx.send(job).is_err() {
          break;
        }
      }
      drop(work_tx);

      match manager.join() {
        Ok(out) => out,
        Err(panic) => std::panic::resume_unwind(panic),
      }
    })
  }
}

// Contiguous `[start, end)` ranges of `group_size` points. The last one may
// be shorter.
fn group_ranges(n: usize, group_size: usize) -> impl Iterator<Item = Range<usize>> {
  let step = group_size.max(1);
  (0..n).step_by(step).map(move |start| start..(start + step).min(n))
}

fn build(
  pts: &[IndexedPoint],
  range: Range<usize>,
  coalescing: Option<&Coalescing>,
) -> (SubHull, usize) {
  let Some(coalescing) = coalescing.filter(|c| range.len() > c.base) else {
    let hull = graham_scan::convex_hull(pts[range.clone()].to_vec());
    return (SubHull::new(range, hull), 0);
  };

  let mut input = Vec::with_capacity(range.len());
  let mut saved = 0;
  for sub in group_ranges(range.len(), coalescing.base) {
    let (start, end) = (range.start + sub.start, range.start + sub.end);
    match coalescing.cache.get(&(start, end)) {
      Some(cached) => {
        saved += (end - start).saturating_sub(cached.len());
        input.extend_from_slice(&cached);
      }
      None => input.extend_from_slice(&pts[start..end]),
    }
  }
  let hull = graham_scan::convex_hull(input);
  (SubHull::new(range, hull), saved)
}
