//! Device controller and its connection lifecycle

pub mod controller;
pub mod state;

pub use controller::{MonomeDevice, MAX_ENCODERS, MAX_GRID_SIDE};
pub use state::{LinkEvent, LinkState, Mode};
