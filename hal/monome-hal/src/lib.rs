//! monome Hardware Abstraction Layer
//!
//! This crate defines the byte-transport traits the device controller is
//! generic over. The firmware supplies an implementation backed by its USB
//! host or UART driver, and tests supply an in-memory one.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application control loop               │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  monome-core (MonomeDevice)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  monome-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialTx`], [`serial::SerialRx`] - Byte stream to the device

#![no_std]
#![deny(unsafe_code)]

pub mod serial;

// Re-export key traits at crate root for convenience
pub use serial::{LinkError, Serial, SerialRx, SerialTx};
