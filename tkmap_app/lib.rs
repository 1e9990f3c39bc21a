pub mod config;
pub mod details;
pub mod payload;
pub mod test_utils;
pub mod transport;
pub mod world_map;

pub use world_map::{WorldMap, slice_map};
