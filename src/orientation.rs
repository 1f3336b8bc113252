use std::cmp::Ordering;

use crate::data::Point;

/// Twice the signed area of the triangle `(a, b, c)`.
///
/// Positive when `c` lies counter-clockwise of the directed segment `a -> b`,
/// negative when clockwise and zero when the three points are colinear.
///
/// The inputs are `f32` but the arithmetic is carried out in `f64`. For
/// coordinates of similar magnitude the differences and products are exact,
/// so the sign is reliable even though no robust predicate is used.
///
/// ```rust
/// # use chanhull::data::Point;
/// # use chanhull::orientation;
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// assert_eq!(orientation(&a, &b, &Point::new([0.0, 1.0])), 1.0);
/// assert_eq!(orientation(&a, &b, &Point::new([0.0, -1.0])), -1.0);
/// assert_eq!(orientation(&a, &b, &Point::new([5.0, 0.0])), 0.0);
/// ```
pub fn orientation(a: &Point, b: &Point, c: &Point) -> f64 {
  let (ax, ay) = (f64::from(a.x_coord()), f64::from(a.y_coord()));
  let ux = f64::from(b.x_coord()) - ax;
  let uy = f64::from(b.y_coord()) - ay;
  let vx = f64::from(c.x_coord()) - ax;
  let vy = f64::from(c.y_coord()) - ay;
  ux * vy - uy * vx
}

#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Copy, Clone)]
pub enum Orientation {
  CounterClockWise,
  ClockWise,
  CoLinear,
}

impl Orientation {
  /// Determine the direction you have to turn if you walk from `p1`
  /// to `p2` to `p3`.
  ///
  /// ```rust
  /// # use chanhull::data::Point;
  /// # use chanhull::Orientation;
  /// let p1 = Point::new([0.0, 0.0]);
  /// let p2 = Point::new([0.0, 1.0]); // One unit above p1.
  /// assert!(Orientation::new(&p1, &p2, &Point::new([0.0, 2.0])).is_colinear());
  /// assert!(Orientation::new(&p1, &p2, &Point::new([-1.0, 2.0])).is_ccw());
  /// assert!(Orientation::new(&p1, &p2, &Point::new([1.0, 2.0])).is_cw());
  /// ```
  pub fn new(p1: &Point, p2: &Point, p3: &Point) -> Orientation {
    Orientation::from_signed(orientation(p1, p2, p3))
  }

  pub fn from_signed(area: f64) -> Orientation {
    match area.partial_cmp(&0.0) {
      Some(Ordering::Greater) => Orientation::CounterClockWise,
      Some(Ordering::Less) => Orientation::ClockWise,
      _ => Orientation::CoLinear,
    }
  }

  pub fn is_colinear(self) -> bool {
    matches!(self, Orientation::CoLinear)
  }

  pub fn is_ccw(self) -> bool {
    matches!(self, Orientation::CounterClockWise)
  }

  pub fn is_cw(self) -> bool {
    matches!(self, Orientation::ClockWise)
  }
}

/// Rotational sense used when picking an extreme vertex of a polygon.
///
/// `CounterClockWise` selects the vertex with nothing counter-clockwise of it
/// (the `+1` order), `ClockWise` the vertex with nothing clockwise of it (`-1`).
#[derive(PartialEq, Eq, Debug, Copy, Clone, Default)]
pub enum Rotation {
  #[default]
  CounterClockWise,
  ClockWise,
}

impl Rotation {
  pub fn sign(self) -> f64 {
    match self {
      Rotation::CounterClockWise => 1.0,
      Rotation::ClockWise => -1.0,
    }
  }

  /// Signed area of `(a, b, c)` scaled so that positive means "further in
  /// this rotation".
  pub fn orient(self, a: &Point, b: &Point, c: &Point) -> f64 {
    orientation(a, b, c) * self.sign()
  }
}
