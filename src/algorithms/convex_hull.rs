pub mod chan;
pub mod gift_wrapping;
pub mod graham_scan;
pub mod parallel_chan;
pub mod quickhull;
pub mod tangent;

mod subhulls;
mod wrap;
