//! Collision-free allocation of random values from a bounded range.

pub mod source;
pub mod unique;
pub mod value;

pub use source::{OsRandom, RandomSource};
pub use unique::UniqueAllocator;
pub use value::{UpperBound, Value};
