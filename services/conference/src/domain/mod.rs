//! Domain layer

mod outcome;

pub use outcome::GoodsReleaseOutcome;
