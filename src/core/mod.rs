pub mod abi;
pub mod constants;
pub mod errors;

pub use errors::{Result, UtilsError};
