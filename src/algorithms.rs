pub mod convex_hull;

#[doc(inline)]
pub use convex_hull::parallel_chan::convex_hull;
