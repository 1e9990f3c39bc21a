pub mod cell;
pub mod kingdom;
pub mod player;
pub mod region;
pub mod snapshot;

pub mod fields;
