pub mod digg;
pub mod traits;

pub use digg::{DiggContract, RatioConverter};
pub use traits::FragmentSource;
