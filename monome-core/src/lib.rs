//! Board-agnostic device model for monome grids and arcs
//!
//! This crate contains everything between the byte transport and the
//! application that does not depend on specific hardware:
//!
//! - Bounded grid and arc event queues, safe to fill from an interrupt
//! - LED frame buffer with per-region change tracking
//! - Tilt report suppression
//! - Connection lifecycle state machine
//! - The device controller tying them to a transport
//!
//! ```text
//! transport bytes ─▶ FrameParser ─▶ EventQueue ─▶ application
//! application ─▶ LED setters ─▶ LedFrame ─▶ refresh ─▶ transport
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod device;
pub mod error;
pub mod leds;
pub mod queue;
pub mod tilt;

pub use config::DeviceConfig;
pub use device::{LinkState, Mode, MonomeDevice};
pub use error::DeviceError;
pub use leds::LedFrame;
pub use queue::{EventQueue, EVENT_QUEUE_CAPACITY};
pub use tilt::{TiltSample, TiltTracker};

pub use monome_protocol::{ArcEvent, GridEvent, Rotation};
