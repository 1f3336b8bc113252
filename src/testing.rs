// This module contains strategies for:
//  * points on a small integer grid
//  * convex polygons built from such points
// Grid coordinates keep every orientation test exact in floating point.
use crate::algorithms::convex_hull::graham_scan;
use crate::data::Point;

use proptest::collection::*;
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const GRID: i16 = 20;

pub fn any_grid_point() -> impl Strategy<Value = Point> {
  (-GRID..=GRID, -GRID..=GRID).prop_map(|(x, y)| Point::new([f32::from(x), f32::from(y)]))
}

pub fn any_grid_points(max: usize) -> impl Strategy<Value = Vec<Point>> {
  vec(any_grid_point(), 0..max)
}

// Clockwise, strictly convex, at least three vertices.
pub fn any_convex_polygon() -> impl Strategy<Value = Vec<Point>> {
  vec(any_grid_point(), 3..40)
    .prop_map(graham_scan::convex_hull)
    .prop_filter("Need a proper polygon", |poly| poly.len() >= 3)
}

// `n` points on the integer grid `[0, side)^2`, deterministic for a seed.
pub fn grid_cloud(n: usize, side: u16, seed: u64) -> Vec<Point> {
  let mut rng = SmallRng::seed_from_u64(seed);
  (0..n)
    .map(|_| {
      let x = rng.gen_range(0..side);
      let y = rng.gen_range(0..side);
      Point::new([f32::from(x), f32::from(y)])
    })
    .collect()
}

// Canonical order for comparing hulls that start at different vertices.
pub fn sorted(mut pts: Vec<Point>) -> Vec<Point> {
  pts.sort_by(|a, b| a.cmp_lowest(b));
  pts
}
