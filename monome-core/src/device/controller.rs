//! Device controller
//!
//! Owns everything that belongs to one physical connection: the transport,
//! the frame parser, the event queues, the LED frame and the tilt cache.
//! The application drives it from a single control loop:
//!
//! - [`MonomeDevice::poll`] drains bytes that have already arrived, decodes
//!   them and queues key and encoder events
//! - [`MonomeDevice::refresh`] sends the LED regions that changed since the
//!   last refresh
//!
//! Neither call blocks, and both are no-ops on an inactive device.
//!
//! LED output and probing use host-side frames. The `send_sys_*`,
//! `send_tilt_event` and `send_*_key`/`send_arc_delta` calls write
//! device-side frames and are meant for a controller that stands in for a
//! grid or arc towards a host; a real device does not understand them.

use monome_hal::{SerialRx, SerialTx};
use monome_protocol::command::{SECTION_ENCODER, SECTION_KEY_GRID, SECTION_LED_GRID};
use monome_protocol::{
    ArcEvent, DeviceId, DeviceMessage, Frame, FrameError, FrameParser, GridEvent, HostMessage, Origin,
    Rotation, MAX_FRAME_SIZE, RING_LEDS,
};

use super::state::{LinkEvent, LinkState, Mode};
use crate::config::DeviceConfig;
use crate::error::DeviceError;
use crate::leds::{LedFrame, MAX_REGIONS, QUAD_SIZE};
use crate::queue::EventQueue;
use crate::tilt::{TiltSample, TiltTracker, TILT_SENSORS};

/// What became of one decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Applied,
    /// Well formed but not for us in the current mode
    Ignored,
    /// Cannot be right for this device; its payload is rescanned
    Malformed,
}

/// Largest grid side, in LEDs
pub const MAX_GRID_SIDE: u8 = 16;

/// Most encoders on an arc
pub const MAX_ENCODERS: u8 = 4;

/// Bytes read from the transport per call
const RX_CHUNK_SIZE: usize = 64;

/// One grid or arc attached over a serial transport
pub struct MonomeDevice<T> {
    transport: T,
    config: DeviceConfig,
    parser: FrameParser,
    events: EventQueue,
    leds: LedFrame,
    tilt: TiltTracker,
    state: LinkState,
    /// Mode lock; survives a lost transport, released by `initialize`
    mode: Option<Mode>,
    is_monome: bool,
    rows: u8,
    columns: u8,
    encoders: u8,
    rotation: Rotation,
    device_id: DeviceId,
}

impl<T> MonomeDevice<T>
where
    T: SerialTx + SerialRx,
{
    /// Create a controller with the default configuration
    pub fn new(transport: T) -> Self {
        Self::build(transport, DeviceConfig::default())
    }

    /// Create a controller with a custom configuration
    pub fn with_config(transport: T, config: DeviceConfig) -> Result<Self, DeviceError> {
        config.validate()?;
        Ok(Self::build(transport, config))
    }

    fn build(transport: T, config: DeviceConfig) -> Self {
        Self {
            transport,
            config,
            parser: FrameParser::new(Origin::Device),
            events: EventQueue::new(),
            leds: LedFrame::new(),
            tilt: TiltTracker::new(),
            state: LinkState::Unconfigured,
            mode: None,
            is_monome: false,
            rows: 0,
            columns: 0,
            encoders: 0,
            rotation: config.rotation,
            device_id: DeviceId::new(),
        }
    }

    /// Forget everything about the previous connection
    ///
    /// Queues are emptied, LEDs cleared, tilt sensors disabled and the mode
    /// lock released.
    pub fn initialize(&mut self) {
        self.state = self.state.transition(LinkEvent::Reset);
        self.mode = None;
        self.is_monome = false;
        self.rows = 0;
        self.columns = 0;
        self.encoders = 0;
        self.rotation = self.config.rotation;
        self.device_id.clear();
        self.parser.reset();
        self.events.reset();
        self.leds.clear();
        self.tilt.reset();
    }

    /// Configure as a `columns` × `rows` grid
    ///
    /// Fails with [`DeviceError::ModeLocked`] if already set up as an arc.
    pub fn setup_as_grid(&mut self, rows: u8, columns: u8) -> Result<(), DeviceError> {
        if !valid_grid_size(rows, columns) {
            return Err(DeviceError::InvalidSize);
        }
        self.claim_mode(Mode::Grid)?;

        self.resize_grid(rows, columns);
        self.encoders = 0;
        self.state = self.state.transition(LinkEvent::Configure(Mode::Grid));
        Ok(())
    }

    /// Configure as an arc with `encoders` rings
    ///
    /// Fails with [`DeviceError::ModeLocked`] if already set up as a grid.
    pub fn setup_as_arc(&mut self, encoders: u8) -> Result<(), DeviceError> {
        if !(1..=MAX_ENCODERS).contains(&encoders) {
            return Err(DeviceError::InvalidSize);
        }
        self.claim_mode(Mode::Arc)?;

        self.encoders = encoders;
        self.rows = 0;
        self.columns = 0;
        self.state = self.state.transition(LinkEvent::Configure(Mode::Arc));
        Ok(())
    }

    fn claim_mode(&mut self, mode: Mode) -> Result<(), DeviceError> {
        match self.mode {
            Some(current) if current != mode => {
                #[cfg(feature = "defmt")]
                defmt::warn!("already configured as {}, ignoring {}", current, mode);
                Err(DeviceError::ModeLocked)
            }
            _ => {
                self.mode = Some(mode);
                Ok(())
            }
        }
    }

    fn resize_grid(&mut self, rows: u8, columns: u8) {
        // Buffer stride is the column count, old contents no longer line up
        if (rows, columns) != (self.rows, self.columns) {
            self.leds.clear();
        }
        self.rows = rows;
        self.columns = columns;
    }

    /// Ask the device what it is
    ///
    /// Sends query, id and size requests and starts reading replies. A query
    /// reply configures an unconfigured controller.
    pub fn get_device_info(&mut self) -> Result<(), DeviceError> {
        self.state = self.state.transition(LinkEvent::Probe);
        self.send_host(&HostMessage::Query)?;
        self.send_host(&HostMessage::RequestId)?;
        self.send_host(&HostMessage::RequestSize)?;
        self.flush()
    }

    /// Read and decode whatever bytes have arrived
    ///
    /// Reads at most `max_poll_bytes`. Returns the number of frames that were
    /// decoded and applied. A transport error deactivates the device.
    ///
    /// A frame that cannot be right for this device (a key outside the grid,
    /// an unknown encoder, a garbled id) gives its payload back to the
    /// parser, so a damaged frame costs only its own command byte.
    pub fn poll(&mut self) -> Result<usize, DeviceError> {
        if !self.state.reads_input() {
            return Ok(0);
        }

        let mut buf = [0u8; RX_CHUNK_SIZE];
        let mut received = 0;
        let mut applied = 0;

        while received < self.config.max_poll_bytes {
            let want = (self.config.max_poll_bytes - received).min(RX_CHUNK_SIZE);
            let n = match self.transport.read_available(&mut buf[..want]) {
                Ok(n) => n.min(want),
                Err(_) => {
                    self.lose_link();
                    return Err(DeviceError::Transport);
                }
            };
            if n == 0 {
                break;
            }
            received += n;

            for &byte in &buf[..n] {
                match self.parser.feed(byte) {
                    Ok(Some(frame)) => applied += self.dispatch(frame),
                    Ok(None) => {}
                    Err(_e) => {
                        #[cfg(feature = "defmt")]
                        defmt::trace!("skipping byte: {}", _e);
                    }
                }
            }
        }

        if received == 0 {
            if let Err(_e) = self.parser.expire(self.config.stale_poll_limit) {
                #[cfg(feature = "defmt")]
                defmt::debug!("partial frame dropped: {}", _e);
                if let Some(frame) = self.parser.replay() {
                    applied += self.dispatch(frame);
                }
            }
        }

        Ok(applied)
    }

    /// Apply `frame` and every frame recovered from bytes it gave back
    ///
    /// Returns the number of frames applied.
    fn dispatch(&mut self, frame: Frame) -> usize {
        let mut applied = 0;
        let mut next = Some(frame);
        while let Some(frame) = next {
            match self.apply_frame(&frame) {
                Outcome::Applied => applied += 1,
                Outcome::Ignored => {}
                Outcome::Malformed => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("rescanning after bad frame {=u8:#x}", frame.command);
                    self.parser.reject(&frame);
                }
            }
            next = self.parser.replay();
        }
        applied
    }

    fn apply_frame(&mut self, frame: &Frame) -> Outcome {
        let message = match DeviceMessage::from_frame(frame) {
            Ok(message) => message,
            Err(FrameError::Unsupported(_)) => return Outcome::Ignored,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("dropping frame {=u8:#x}: {}", frame.command, _e);
                return Outcome::Malformed;
            }
        };

        match message {
            DeviceMessage::Key { x, y, pressed } => self.queue_key(x, y, pressed),
            DeviceMessage::EncoderDelta { index, delta } => self.queue_delta(index, delta),
            DeviceMessage::QueryResponse { section, count } => self.apply_query(section, count),
            DeviceMessage::Id(id) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("device id {}", id.as_str());
                self.device_id = id;
                self.is_monome = true;
                Outcome::Applied
            }
            DeviceMessage::GridSize { columns, rows } => {
                if self.mode != Some(Mode::Grid) {
                    return Outcome::Ignored;
                }
                if !valid_grid_size(rows, columns) {
                    return Outcome::Malformed;
                }
                self.resize_grid(rows, columns);
                Outcome::Applied
            }
            DeviceMessage::Rotation(rotation) => {
                if self.mode != Some(Mode::Grid) {
                    return Outcome::Ignored;
                }
                self.rotation = rotation;
                Outcome::Applied
            }
            DeviceMessage::Tilt { sensor, .. } if sensor as usize >= TILT_SENSORS => {
                Outcome::Malformed
            }
            DeviceMessage::EncoderSwitch { .. }
            | DeviceMessage::Tilt { .. }
            | DeviceMessage::TiltStates(_)
            | DeviceMessage::GridOffset { .. }
            | DeviceMessage::Version(_) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("ignoring {}", message);
                Outcome::Applied
            }
        }
    }

    fn queue_key(&mut self, x: u8, y: u8, pressed: bool) -> Outcome {
        if self.state.mode() != Some(Mode::Grid) {
            return Outcome::Ignored;
        }
        match self.rotation.to_logical(x, y, self.columns, self.rows) {
            Some((lx, ly)) => {
                self.events.add_grid_event(lx, ly, pressed);
                Outcome::Applied
            }
            None => Outcome::Malformed,
        }
    }

    fn queue_delta(&mut self, index: u8, delta: i8) -> Outcome {
        if self.state.mode() != Some(Mode::Arc) {
            return Outcome::Ignored;
        }
        if index >= self.encoders {
            return Outcome::Malformed;
        }
        self.events.add_arc_event(index, delta);
        Outcome::Applied
    }

    fn apply_query(&mut self, section: u8, count: u8) -> Outcome {
        let mode = match section {
            SECTION_LED_GRID | SECTION_KEY_GRID => Mode::Grid,
            SECTION_ENCODER => Mode::Arc,
            // Sections are a nibble
            0x10..=u8::MAX => return Outcome::Malformed,
            // Other subsystems (tilt, analog) need no setup
            _ => return Outcome::Applied,
        };
        self.is_monome = true;

        if let Some(current) = self.mode {
            if current != mode {
                #[cfg(feature = "defmt")]
                defmt::warn!("device reports {} but controller is {}", mode, current);
                return Outcome::Ignored;
            }
            return Outcome::Applied;
        }

        let configured = match mode {
            Mode::Grid => match grid_size_for_quads(count) {
                Some((rows, columns)) => self.setup_as_grid(rows, columns),
                None => Err(DeviceError::InvalidSize),
            },
            Mode::Arc => self.setup_as_arc(count),
        };

        match configured {
            Ok(()) => Outcome::Applied,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("query reply {} x{} rejected: {}", mode, count, _e);
                Outcome::Malformed
            }
        }
    }

    /// Send every dirty LED region
    ///
    /// No-op, with no traffic, when nothing changed or the device is
    /// inactive. Returns whether anything was sent.
    pub fn refresh(&mut self) -> Result<bool, DeviceError> {
        if !self.state.is_active() || !self.leds.is_dirty() {
            return Ok(false);
        }
        match self.mode {
            Some(Mode::Grid) => self.refresh_grid(),
            Some(Mode::Arc) => self.refresh_arc(),
            None => Ok(false),
        }
    }

    /// Send each dirty 8×8 quad as a level map
    pub fn refresh_grid(&mut self) -> Result<bool, DeviceError> {
        self.require_mode(Mode::Grid)?;
        if !self.state.is_active() {
            return Ok(false);
        }

        let mut sent = 0u8;
        for quad in 0..MAX_REGIONS {
            if !self.leds.is_region_dirty(quad) {
                continue;
            }
            let x = (quad % 2) * QUAD_SIZE;
            let y = (quad / 2) * QUAD_SIZE;
            let levels = self.leds.quad_levels(x, y, self.columns, self.rows);
            self.send_host(&HostMessage::LevelMap { x, y, levels })?;
            sent |= 1 << quad;
        }
        self.finish_refresh(sent)
    }

    /// Send each dirty ring as a ring map
    pub fn refresh_arc(&mut self) -> Result<bool, DeviceError> {
        self.require_mode(Mode::Arc)?;
        if !self.state.is_active() {
            return Ok(false);
        }

        let mut sent = 0u8;
        for ring in 0..self.encoders {
            if !self.leds.is_region_dirty(ring) {
                continue;
            }
            let levels = self.leds.ring_levels(ring);
            self.send_host(&HostMessage::RingMap { ring, levels })?;
            sent |= 1 << ring;
        }
        self.finish_refresh(sent)
    }

    fn finish_refresh(&mut self, sent: u8) -> Result<bool, DeviceError> {
        if sent == 0 {
            return Ok(false);
        }
        self.flush()?;
        self.leds.mark_clean(sent);
        Ok(true)
    }

    /// Report the configured size (grid columns/rows or encoder count)
    ///
    /// Writes device-side report frames (0x03, or a 0x00 query reply for an
    /// arc) for use when emulating a device towards a host. To resize an
    /// attached grid, send [`HostMessage::SetSize`] instead.
    pub fn send_sys_size(&mut self) -> Result<(), DeviceError> {
        let message = match self.state.mode() {
            Some(Mode::Grid) => DeviceMessage::GridSize {
                columns: self.columns,
                rows: self.rows,
            },
            Some(Mode::Arc) => DeviceMessage::QueryResponse {
                section: SECTION_ENCODER,
                count: self.encoders,
            },
            None => return Err(DeviceError::Inactive),
        };
        self.send_device(&message)?;
        self.flush()
    }

    /// Report the current rotation, device-side like [`Self::send_sys_size`]
    pub fn send_sys_rotation(&mut self) -> Result<(), DeviceError> {
        self.require_active()?;
        self.send_device(&DeviceMessage::Rotation(self.rotation))?;
        self.flush()
    }

    /// Set the mounting rotation (0..=3 for 0/90/180/270 degrees)
    ///
    /// The LED buffer is kept in physical order, so lit LEDs stay where
    /// they are; later writes and key events use the new orientation.
    pub fn set_rotation(&mut self, rotation: u8) -> Result<(), DeviceError> {
        self.rotation = Rotation::try_from(rotation).map_err(|_| DeviceError::InvalidRotation)?;
        Ok(())
    }

    /// Set one grid LED, logical coordinates
    pub fn set_grid_led(&mut self, x: u8, y: u8, level: u8) -> Result<(), DeviceError> {
        let (px, py) = self.physical(x, y)?;
        let index = LedFrame::grid_index(px, py, self.columns);
        self.leds.set(index, LedFrame::grid_region(px, py), level);
        Ok(())
    }

    pub fn clear_grid_led(&mut self, x: u8, y: u8) -> Result<(), DeviceError> {
        self.set_grid_led(x, y, 0)
    }

    /// Current level of one grid LED, logical coordinates
    pub fn grid_led(&self, x: u8, y: u8) -> Result<u8, DeviceError> {
        let (px, py) = self.physical(x, y)?;
        let index = LedFrame::grid_index(px, py, self.columns);
        self.leds.level(index).ok_or(DeviceError::OutOfBounds)
    }

    /// Set one LED of one ring
    pub fn set_arc_led(&mut self, ring: u8, led: u8, level: u8) -> Result<(), DeviceError> {
        self.check_ring_led(ring, led)?;
        self.leds.set(LedFrame::ring_index(ring, led), ring, level);
        Ok(())
    }

    pub fn clear_arc_led(&mut self, ring: u8, led: u8) -> Result<(), DeviceError> {
        self.set_arc_led(ring, led, 0)
    }

    /// Current level of one ring LED
    pub fn arc_led(&self, ring: u8, led: u8) -> Result<u8, DeviceError> {
        self.check_ring_led(ring, led)?;
        self.leds
            .level(LedFrame::ring_index(ring, led))
            .ok_or(DeviceError::OutOfBounds)
    }

    /// Turn off every LED of one ring
    pub fn clear_arc_ring(&mut self, ring: u8) -> Result<(), DeviceError> {
        self.check_ring_led(ring, 0)?;
        let start = LedFrame::ring_index(ring, 0);
        self.leds.fill(start..start + RING_LEDS, 0, 1 << ring);
        Ok(())
    }

    /// Set every LED of the device to `level`
    pub fn set_all_leds(&mut self, level: u8) -> Result<(), DeviceError> {
        match self.mode {
            Some(Mode::Grid) => {
                let count = self.rows as usize * self.columns as usize;
                let quads = self.grid_quad_mask();
                self.leds.fill(0..count, level, quads);
            }
            Some(Mode::Arc) => {
                let count = self.encoders as usize * RING_LEDS;
                let rings = (1u8 << self.encoders) - 1;
                self.leds.fill(0..count, level, rings);
            }
            None => return Err(DeviceError::WrongMode),
        }
        Ok(())
    }

    pub fn clear_all_leds(&mut self) -> Result<(), DeviceError> {
        self.set_all_leds(0)
    }

    fn grid_quad_mask(&self) -> u8 {
        let mut mask = 0;
        for qy in 0..self.rows.div_ceil(QUAD_SIZE) {
            for qx in 0..self.columns.div_ceil(QUAD_SIZE) {
                mask |= 1 << (qy * 2 + qx);
            }
        }
        mask
    }

    /// Enable or disable reporting for one tilt sensor
    pub fn set_tilt_active(&mut self, sensor: u8, active: bool) -> Result<(), DeviceError> {
        self.tilt.set_active(sensor, active)
    }

    /// Send a tilt sample unless it repeats the last one sent
    ///
    /// Returns `Ok(true)` if a frame went out, `Ok(false)` if the sample was
    /// suppressed (sensor disabled or unchanged).
    pub fn send_tilt_event(&mut self, sensor: u8, x: i16, y: i16, z: i16) -> Result<bool, DeviceError> {
        let sample = TiltSample::new(x, y, z);
        if !self.tilt.should_report(sensor, sample)? {
            return Ok(false);
        }
        self.require_active()?;

        self.send_device(&DeviceMessage::Tilt { sensor, x, y, z })?;
        self.flush()?;
        self.tilt.record(sensor, sample)?;
        Ok(true)
    }

    /// Forward a key transition, logical coordinates
    pub fn send_grid_key(&mut self, x: u8, y: u8, pressed: bool) -> Result<(), DeviceError> {
        let (px, py) = self.physical(x, y)?;
        self.require_active()?;
        self.send_device(&DeviceMessage::Key {
            x: px,
            y: py,
            pressed,
        })?;
        self.flush()
    }

    /// Forward an encoder movement
    pub fn send_arc_delta(&mut self, index: u8, delta: i8) -> Result<(), DeviceError> {
        self.check_ring_led(index, 0)?;
        self.require_active()?;
        self.send_device(&DeviceMessage::EncoderDelta { index, delta })?;
        self.flush()
    }

    /// Forward an encoder push switch transition
    pub fn send_arc_key(&mut self, index: u8, pressed: bool) -> Result<(), DeviceError> {
        self.check_ring_led(index, 0)?;
        self.require_active()?;
        self.send_device(&DeviceMessage::EncoderSwitch { index, pressed })?;
        self.flush()
    }

    fn require_mode(&self, mode: Mode) -> Result<(), DeviceError> {
        if self.mode == Some(mode) {
            Ok(())
        } else {
            Err(DeviceError::WrongMode)
        }
    }

    fn require_active(&self) -> Result<(), DeviceError> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(DeviceError::Inactive)
        }
    }

    fn physical(&self, x: u8, y: u8) -> Result<(u8, u8), DeviceError> {
        self.require_mode(Mode::Grid)?;
        self.rotation
            .to_physical(x, y, self.columns, self.rows)
            .ok_or(DeviceError::OutOfBounds)
    }

    fn check_ring_led(&self, ring: u8, led: u8) -> Result<(), DeviceError> {
        self.require_mode(Mode::Arc)?;
        if ring >= self.encoders || led as usize >= RING_LEDS {
            return Err(DeviceError::OutOfBounds);
        }
        Ok(())
    }

    fn send_host(&mut self, message: &HostMessage) -> Result<(), DeviceError> {
        let frame = message.to_frame()?;
        self.send_frame(&frame)
    }

    fn send_device(&mut self, message: &DeviceMessage) -> Result<(), DeviceError> {
        let frame = message.to_frame()?;
        self.send_frame(&frame)
    }

    fn send_frame(&mut self, frame: &Frame) -> Result<(), DeviceError> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        let len = frame.encode(&mut buffer)?;
        if self.transport.write_all(&buffer[..len]).is_err() {
            self.lose_link();
            return Err(DeviceError::Transport);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DeviceError> {
        if self.transport.flush().is_err() {
            self.lose_link();
            return Err(DeviceError::Transport);
        }
        Ok(())
    }

    fn lose_link(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::warn!("transport failed, device inactive");
        self.state = self.state.transition(LinkEvent::TransportLost);
    }

    // Event queue delegation

    /// The event queues; producers may push from another context
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn grid_event_available(&self) -> bool {
        self.events.grid_event_available()
    }

    pub fn read_grid_event(&self) -> GridEvent {
        self.events.read_grid_event()
    }

    pub fn arc_event_available(&self) -> bool {
        self.events.arc_event_available()
    }

    pub fn read_arc_event(&self) -> ArcEvent {
        self.events.read_arc_event()
    }

    // State accessors

    /// Configured and with a working transport
    pub fn active(&self) -> bool {
        self.state.is_active()
    }

    /// A device info reply has been received
    pub fn is_monome(&self) -> bool {
        self.is_monome
    }

    pub fn is_grid(&self) -> bool {
        self.mode == Some(Mode::Grid)
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    /// Logical (width, height) after rotation
    pub fn grid_size(&self) -> (u8, u8) {
        self.rotation.logical_size(self.columns, self.rows)
    }

    pub fn encoders(&self) -> u8 {
        self.encoders
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn device_id(&self) -> &str {
        self.device_id.as_str()
    }

    /// Grid LED changes are waiting for a refresh
    pub fn grid_dirty(&self) -> bool {
        self.is_grid() && self.leds.is_dirty()
    }

    /// Arc LED changes are waiting for a refresh
    pub fn arc_dirty(&self) -> bool {
        self.mode == Some(Mode::Arc) && self.leds.is_dirty()
    }

    pub fn tilt(&self) -> &TiltTracker {
        &self.tilt
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back, ending this connection
    pub fn release(self) -> T {
        self.transport
    }
}

fn valid_grid_size(rows: u8, columns: u8) -> bool {
    (1..=MAX_GRID_SIDE).contains(&rows) && (1..=MAX_GRID_SIDE).contains(&columns)
}

/// (rows, columns) for a grid reporting `quads` 8×8 quads
fn grid_size_for_quads(quads: u8) -> Option<(u8, u8)> {
    match quads {
        1 => Some((8, 8)),
        2 => Some((8, 16)),
        4 => Some((16, 16)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_grid_size() {
        assert!(valid_grid_size(8, 16));
        assert!(valid_grid_size(16, 16));
        assert!(!valid_grid_size(0, 8));
        assert!(!valid_grid_size(8, 17));
    }

    #[test]
    fn test_grid_size_for_quads() {
        assert_eq!(grid_size_for_quads(1), Some((8, 8)));
        assert_eq!(grid_size_for_quads(2), Some((8, 16)));
        assert_eq!(grid_size_for_quads(4), Some((16, 16)));
        assert_eq!(grid_size_for_quads(3), None);
    }
}
