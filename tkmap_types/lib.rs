pub mod errors;
pub mod map;

pub use errors::Result;
