use rand::distributions::{Distribution, Standard};
use rand::Rng;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A point in the plane with `f32` coordinates.
///
/// Equality is exact value equality on both coordinates. Two points that are
/// `==` are said to be coincident; identity of input points is tracked
/// separately with [`PointId`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Point {
  pub array: [f32; 2],
}

// Random sampling in the unit square.
impl Distribution<Point> for Standard {
  fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
    Point {
      array: [rng.gen(), rng.gen()],
    }
  }
}

impl Point {
  pub const fn new(array: [f32; 2]) -> Point {
    Point { array }
  }

  pub fn x_coord(&self) -> f32 {
    self.array[0]
  }

  pub fn y_coord(&self) -> f32 {
    self.array[1]
  }

  pub fn squared_euclidean_distance(&self, rhs: &Point) -> f64 {
    let dx = f64::from(self.x_coord()) - f64::from(rhs.x_coord());
    let dy = f64::from(self.y_coord()) - f64::from(rhs.y_coord());
    dx * dx + dy * dy
  }

  /// Compare the distances from `self` to `p` and from `self` to `q`.
  pub fn cmp_distance_to(&self, p: &Point, q: &Point) -> Ordering {
    self
      .squared_euclidean_distance(p)
      .total_cmp(&self.squared_euclidean_distance(q))
  }

  /// Lexicographic order on `(y, x)`. Used to pick Graham scan pivots.
  pub fn cmp_lowest(&self, other: &Point) -> Ordering {
    self
      .y_coord()
      .total_cmp(&other.y_coord())
      .then_with(|| self.x_coord().total_cmp(&other.x_coord()))
  }
}

impl fmt::Display for Point {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.6},{:.6}", self.x_coord(), self.y_coord())
  }
}

/// Position of a point in the caller's input slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(pub usize);

impl PointId {
  pub fn usize(self) -> usize {
    self.0
  }
}

/// A point tagged with its [`PointId`].
///
/// Equality and hashing only look at the id, so duplicate coordinates from
/// different input positions stay distinct.
#[derive(Debug, Clone, Copy)]
pub struct IndexedPoint {
  pub id: PointId,
  pub point: Point,
}

impl IndexedPoint {
  pub fn new(id: usize, point: Point) -> IndexedPoint {
    IndexedPoint {
      id: PointId(id),
      point,
    }
  }

  /// Tag every point with its position in `pts`.
  pub fn index_all(pts: &[Point]) -> Vec<IndexedPoint> {
    pts
      .iter()
      .enumerate()
      .map(|(i, pt)| IndexedPoint::new(i, *pt))
      .collect()
  }
}

impl PartialEq for IndexedPoint {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for IndexedPoint {}

impl Hash for IndexedPoint {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

/// Anything that has a location in the plane.
///
/// The hull algorithms are generic over this so the same code runs on bare
/// [`Point`]s and on [`IndexedPoint`]s.
pub trait AsPoint {
  fn as_point(&self) -> &Point;
}

impl AsPoint for Point {
  fn as_point(&self) -> &Point {
    self
  }
}

impl AsPoint for IndexedPoint {
  fn as_point(&self) -> &Point {
    &self.point
  }
}

impl<P: AsPoint> AsPoint for &P {
  fn as_point(&self) -> &Point {
    (*self).as_point()
  }
}
