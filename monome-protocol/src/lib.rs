//! monome Serial Protocol
//!
//! This crate defines the byte-level protocol spoken by monome grids
//! (button + LED matrix) and arcs (encoder + LED ring) over a serial line.
//!
//! # Protocol Overview
//!
//! Every message is a command byte followed by a fixed-size payload:
//! ```text
//! ┌─────────┬──────────────────────────┐
//! │ COMMAND │ PAYLOAD                  │
//! │ 1B      │ 0–34B, implied by COMMAND│
//! └─────────┴──────────────────────────┘
//! ```
//!
//! The high nibble of the command selects a section (system, LED grid, key
//! grid, encoder, tilt, LED ring) and the low nibble the command within it.
//! Payload lengths depend on which side sent the byte, so parsers are built
//! for one [`Origin`].

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod frame;
pub mod messages;
pub mod rotation;

pub use command::{Origin, ID_LEN};
pub use events::{ArcEvent, GridEvent};
pub use frame::{Frame, FrameError, FrameParser, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{DeviceId, DeviceMessage, HostMessage, MAX_LEVEL, QUAD_LEDS, RING_LEDS};
pub use rotation::Rotation;
