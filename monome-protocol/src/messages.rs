//! Message types for the monome serial protocol
//!
//! Message types are divided by sender:
//! - Device → host: key and encoder input, tilt samples, system replies
//! - Host → device: LED and ring updates, system requests
//!
//! LED levels are 4-bit on the wire. Anything brighter than
//! [`MAX_LEVEL`] is clamped while encoding.

use heapless::String;

use crate::command::*;
use crate::frame::{Frame, FrameError};
use crate::rotation::Rotation;

/// Brightest level the wire can carry
pub const MAX_LEVEL: u8 = 15;

/// LEDs in one 8×8 grid quad
pub const QUAD_LEDS: usize = 64;

/// LEDs in one arc ring
pub const RING_LEDS: usize = 64;

/// Device id string
pub type DeviceId = String<ID_LEN>;

/// Messages sent by a grid or arc
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMessage {
    /// Reply to a query: one subsystem and how many of it
    QueryResponse { section: u8, count: u8 },
    /// Device id string
    Id(DeviceId),
    /// Offset of one quad of a multi-part grid
    GridOffset { index: u8, x: u8, y: u8 },
    /// Grid size report or acknowledgement
    GridSize { columns: u8, rows: u8 },
    /// Rotation report or acknowledgement
    Rotation(Rotation),
    /// Firmware version string
    Version([u8; 8]),
    /// Grid key transition, physical coordinates
    Key { x: u8, y: u8, pressed: bool },
    /// Encoder movement
    EncoderDelta { index: u8, delta: i8 },
    /// Encoder push switch
    EncoderSwitch { index: u8, pressed: bool },
    /// Bitmask of enabled tilt sensors
    TiltStates(u8),
    /// Tilt sample
    Tilt { sensor: u8, x: i16, y: i16, z: i16 },
}

impl DeviceMessage {
    /// Parse a message from a device-originated frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let expected = Origin::Device
            .payload_len(frame.command)
            .ok_or(FrameError::UnknownCommand(frame.command))?;
        if frame.payload.len() != expected {
            return Err(FrameError::InvalidFrame);
        }
        let p = &frame.payload;

        match frame.command {
            SYS_QUERY_RESPONSE => Ok(DeviceMessage::QueryResponse {
                section: p[0],
                count: p[1],
            }),
            SYS_ID => {
                let end = p.iter().position(|&b| b == 0).unwrap_or(p.len());
                // Printable text, NUL padded; anything else is line noise
                let printable = p[..end].iter().all(|&b| b == b' ' || b.is_ascii_graphic());
                if !printable || p[end..].iter().any(|&b| b != 0) {
                    return Err(FrameError::InvalidFrame);
                }
                let text = core::str::from_utf8(&p[..end]).map_err(|_| FrameError::InvalidFrame)?;
                let mut id = DeviceId::new();
                id.push_str(text).map_err(|_| FrameError::InvalidFrame)?;
                Ok(DeviceMessage::Id(id))
            }
            SYS_GRID_OFFSET => Ok(DeviceMessage::GridOffset {
                index: p[0],
                x: p[1],
                y: p[2],
            }),
            SYS_GRID_SIZE => Ok(DeviceMessage::GridSize {
                columns: p[0],
                rows: p[1],
            }),
            SYS_ROTATION => Ok(DeviceMessage::Rotation(Rotation::try_from(p[0])?)),
            SYS_VERSION => {
                let mut version = [0u8; 8];
                version.copy_from_slice(&p[..]);
                Ok(DeviceMessage::Version(version))
            }
            KEY_UP | KEY_DOWN => Ok(DeviceMessage::Key {
                x: p[0],
                y: p[1],
                pressed: frame.command == KEY_DOWN,
            }),
            ENC_DELTA => Ok(DeviceMessage::EncoderDelta {
                index: p[0],
                delta: p[1] as i8,
            }),
            ENC_SWITCH_UP | ENC_SWITCH_DOWN => Ok(DeviceMessage::EncoderSwitch {
                index: p[0],
                pressed: frame.command == ENC_SWITCH_DOWN,
            }),
            TILT_STATES => Ok(DeviceMessage::TiltStates(p[0])),
            TILT => Ok(DeviceMessage::Tilt {
                sensor: p[0],
                x: i16::from_be_bytes([p[1], p[2]]),
                y: i16::from_be_bytes([p[3], p[4]]),
                z: i16::from_be_bytes([p[5], p[6]]),
            }),
            // Framed but not modelled (address)
            other => Err(FrameError::Unsupported(other)),
        }
    }

    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            DeviceMessage::QueryResponse { section, count } => {
                Frame::new(SYS_QUERY_RESPONSE, &[*section, *count])
            }
            DeviceMessage::Id(id) => {
                let mut payload = [0u8; ID_LEN];
                let bytes = id.as_bytes();
                payload[..bytes.len()].copy_from_slice(bytes);
                Frame::new(SYS_ID, &payload)
            }
            DeviceMessage::GridOffset { index, x, y } => {
                Frame::new(SYS_GRID_OFFSET, &[*index, *x, *y])
            }
            DeviceMessage::GridSize { columns, rows } => {
                Frame::new(SYS_GRID_SIZE, &[*columns, *rows])
            }
            DeviceMessage::Rotation(rotation) => Frame::new(SYS_ROTATION, &[rotation.as_u8()]),
            DeviceMessage::Version(version) => Frame::new(SYS_VERSION, version),
            DeviceMessage::Key { x, y, pressed } => {
                let command = if *pressed { KEY_DOWN } else { KEY_UP };
                Frame::new(command, &[*x, *y])
            }
            DeviceMessage::EncoderDelta { index, delta } => {
                Frame::new(ENC_DELTA, &[*index, *delta as u8])
            }
            DeviceMessage::EncoderSwitch { index, pressed } => {
                let command = if *pressed {
                    ENC_SWITCH_DOWN
                } else {
                    ENC_SWITCH_UP
                };
                Frame::new(command, &[*index])
            }
            DeviceMessage::TiltStates(mask) => Frame::new(TILT_STATES, &[*mask]),
            DeviceMessage::Tilt { sensor, x, y, z } => {
                let [xh, xl] = x.to_be_bytes();
                let [yh, yl] = y.to_be_bytes();
                let [zh, zl] = z.to_be_bytes();
                Frame::new(TILT, &[*sensor, xh, xl, yh, yl, zh, zl])
            }
        }
    }
}

/// Messages sent by the host to a grid or arc
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostMessage {
    /// Ask which subsystems the device has
    Query,
    /// Ask for the id string
    RequestId,
    /// Ask for the grid size
    RequestSize,
    /// Set the grid size
    SetSize { columns: u8, rows: u8 },
    /// Set the mounting rotation
    SetRotation(Rotation),
    /// Single LED off
    LedOff { x: u8, y: u8 },
    /// Single LED on
    LedOn { x: u8, y: u8 },
    /// Every LED off
    AllOff,
    /// Every LED on
    AllOn,
    /// Global brightness
    Intensity(u8),
    /// Single LED level
    LevelSet { x: u8, y: u8, level: u8 },
    /// Every LED to one level
    LevelAll(u8),
    /// Eight LEDs of one row starting at `x`
    LevelRow { x: u8, y: u8, levels: [u8; 8] },
    /// One 8×8 quad with its top-left corner at `(x, y)`, row-major
    LevelMap { x: u8, y: u8, levels: [u8; QUAD_LEDS] },
    /// Start reporting a tilt sensor
    TiltEnable(u8),
    /// Stop reporting a tilt sensor
    TiltDisable(u8),
    /// Single ring LED
    RingSet { ring: u8, led: u8, level: u8 },
    /// Whole ring to one level
    RingAll { ring: u8, level: u8 },
    /// All 64 LEDs of a ring
    RingMap { ring: u8, levels: [u8; RING_LEDS] },
    /// LEDs `start..=end` of a ring, wrapping past 63
    RingRange { ring: u8, start: u8, end: u8, level: u8 },
}

impl HostMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            HostMessage::Query => Ok(Frame::empty(SYS_QUERY)),
            HostMessage::RequestId => Ok(Frame::empty(SYS_GET_ID)),
            HostMessage::RequestSize => Ok(Frame::empty(SYS_GET_SIZE)),
            HostMessage::SetSize { columns, rows } => Frame::new(SYS_SET_SIZE, &[*columns, *rows]),
            HostMessage::SetRotation(rotation) => {
                Frame::new(SYS_SET_ROTATION, &[rotation.as_u8()])
            }
            HostMessage::LedOff { x, y } => Frame::new(LED_OFF, &[*x, *y]),
            HostMessage::LedOn { x, y } => Frame::new(LED_ON, &[*x, *y]),
            HostMessage::AllOff => Ok(Frame::empty(LED_ALL_OFF)),
            HostMessage::AllOn => Ok(Frame::empty(LED_ALL_ON)),
            HostMessage::Intensity(level) => Frame::new(LED_INTENSITY, &[clamp(*level)]),
            HostMessage::LevelSet { x, y, level } => {
                Frame::new(LED_LEVEL_SET, &[*x, *y, clamp(*level)])
            }
            HostMessage::LevelAll(level) => Frame::new(LED_LEVEL_ALL, &[clamp(*level)]),
            HostMessage::LevelRow { x, y, levels } => {
                let mut payload = [0u8; 6];
                payload[0] = *x;
                payload[1] = *y;
                pack_levels(levels, &mut payload[2..]);
                Frame::new(LED_LEVEL_ROW, &payload)
            }
            HostMessage::LevelMap { x, y, levels } => {
                let mut payload = [0u8; 34];
                payload[0] = *x;
                payload[1] = *y;
                pack_levels(levels, &mut payload[2..]);
                Frame::new(LED_LEVEL_MAP, &payload)
            }
            HostMessage::TiltEnable(sensor) => Frame::new(TILT_ENABLE, &[*sensor]),
            HostMessage::TiltDisable(sensor) => Frame::new(TILT_DISABLE, &[*sensor]),
            HostMessage::RingSet { ring, led, level } => {
                Frame::new(RING_SET, &[*ring, *led, clamp(*level)])
            }
            HostMessage::RingAll { ring, level } => Frame::new(RING_ALL, &[*ring, clamp(*level)]),
            HostMessage::RingMap { ring, levels } => {
                let mut payload = [0u8; 33];
                payload[0] = *ring;
                pack_levels(levels, &mut payload[1..]);
                Frame::new(RING_MAP, &payload)
            }
            HostMessage::RingRange {
                ring,
                start,
                end,
                level,
            } => Frame::new(RING_RANGE, &[*ring, *start, *end, clamp(*level)]),
        }
    }

    /// Parse a message from a host-originated frame
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let expected = Origin::Host
            .payload_len(frame.command)
            .ok_or(FrameError::UnknownCommand(frame.command))?;
        if frame.payload.len() != expected {
            return Err(FrameError::InvalidFrame);
        }
        let p = &frame.payload;

        match frame.command {
            SYS_QUERY => Ok(HostMessage::Query),
            SYS_GET_ID => Ok(HostMessage::RequestId),
            SYS_GET_SIZE => Ok(HostMessage::RequestSize),
            SYS_SET_SIZE => Ok(HostMessage::SetSize {
                columns: p[0],
                rows: p[1],
            }),
            SYS_SET_ROTATION => Ok(HostMessage::SetRotation(Rotation::try_from(p[0])?)),
            LED_OFF => Ok(HostMessage::LedOff { x: p[0], y: p[1] }),
            LED_ON => Ok(HostMessage::LedOn { x: p[0], y: p[1] }),
            LED_ALL_OFF => Ok(HostMessage::AllOff),
            LED_ALL_ON => Ok(HostMessage::AllOn),
            LED_INTENSITY => Ok(HostMessage::Intensity(p[0])),
            LED_LEVEL_SET => Ok(HostMessage::LevelSet {
                x: p[0],
                y: p[1],
                level: p[2],
            }),
            LED_LEVEL_ALL => Ok(HostMessage::LevelAll(p[0])),
            LED_LEVEL_ROW => {
                let mut levels = [0u8; 8];
                unpack_levels(&p[2..], &mut levels);
                Ok(HostMessage::LevelRow {
                    x: p[0],
                    y: p[1],
                    levels,
                })
            }
            LED_LEVEL_MAP => {
                let mut levels = [0u8; QUAD_LEDS];
                unpack_levels(&p[2..], &mut levels);
                Ok(HostMessage::LevelMap {
                    x: p[0],
                    y: p[1],
                    levels,
                })
            }
            TILT_ENABLE => Ok(HostMessage::TiltEnable(p[0])),
            TILT_DISABLE => Ok(HostMessage::TiltDisable(p[0])),
            RING_SET => Ok(HostMessage::RingSet {
                ring: p[0],
                led: p[1],
                level: p[2],
            }),
            RING_ALL => Ok(HostMessage::RingAll {
                ring: p[0],
                level: p[1],
            }),
            RING_MAP => {
                let mut levels = [0u8; RING_LEDS];
                unpack_levels(&p[1..], &mut levels);
                Ok(HostMessage::RingMap {
                    ring: p[0],
                    levels,
                })
            }
            RING_RANGE => Ok(HostMessage::RingRange {
                ring: p[0],
                start: p[1],
                end: p[2],
                level: p[3],
            }),
            // Framed but not modelled (id write, offsets, address, 1-bit maps)
            other => Err(FrameError::Unsupported(other)),
        }
    }
}

fn clamp(level: u8) -> u8 {
    level.min(MAX_LEVEL)
}

/// Pack levels two per byte, first level in the high nibble
///
/// Stops at whichever of `levels` (in pairs) or `out` runs out first.
pub fn pack_levels(levels: &[u8], out: &mut [u8]) {
    for (byte, pair) in out.iter_mut().zip(levels.chunks(2)) {
        let high = clamp(pair[0]);
        let low = pair.get(1).copied().map(clamp).unwrap_or(0);
        *byte = (high << 4) | low;
    }
}

/// Inverse of [`pack_levels`]
pub fn unpack_levels(packed: &[u8], out: &mut [u8]) {
    for (pair, &byte) in out.chunks_mut(2).zip(packed) {
        pair[0] = byte >> 4;
        if let Some(low) = pair.get_mut(1) {
            *low = byte & 0x0F;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_frame() {
        let frame = Frame::new(KEY_DOWN, &[3, 4]).unwrap();
        let msg = DeviceMessage::from_frame(&frame).unwrap();
        assert_eq!(
            msg,
            DeviceMessage::Key {
                x: 3,
                y: 4,
                pressed: true
            }
        );
    }

    #[test]
    fn test_encoder_delta_is_signed() {
        let frame = Frame::new(ENC_DELTA, &[2, 0xFD]).unwrap();
        let msg = DeviceMessage::from_frame(&frame).unwrap();
        assert_eq!(msg, DeviceMessage::EncoderDelta { index: 2, delta: -3 });
    }

    #[test]
    fn test_id_strips_padding() {
        let mut payload = [0u8; ID_LEN];
        payload[..8].copy_from_slice(b"m1000123");
        let frame = Frame::new(SYS_ID, &payload).unwrap();

        match DeviceMessage::from_frame(&frame).unwrap() {
            DeviceMessage::Id(id) => assert_eq!(id.as_str(), "m1000123"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_id_rejects_binary_payload() {
        let mut payload = [0u8; ID_LEN];
        payload[..4].copy_from_slice(&[KEY_DOWN, 2, 2, KEY_UP]);
        let frame = Frame::new(SYS_ID, &payload).unwrap();
        assert_eq!(DeviceMessage::from_frame(&frame), Err(FrameError::InvalidFrame));

        // Text after the padding
        let mut payload = [0u8; ID_LEN];
        payload[..2].copy_from_slice(b"m1");
        payload[10] = b'x';
        let frame = Frame::new(SYS_ID, &payload).unwrap();
        assert_eq!(DeviceMessage::from_frame(&frame), Err(FrameError::InvalidFrame));
    }

    #[test]
    fn test_id_encodes_padded() {
        let mut id = DeviceId::new();
        id.push_str("m0000001").unwrap();
        let frame = DeviceMessage::Id(id).to_frame().unwrap();

        assert_eq!(frame.payload.len(), ID_LEN);
        assert_eq!(&frame.payload[..8], b"m0000001");
        assert!(frame.payload[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_tilt_big_endian() {
        let msg = DeviceMessage::Tilt {
            sensor: 1,
            x: 0x0102,
            y: -2,
            z: 0,
        };
        let frame = msg.to_frame().unwrap();
        assert_eq!(frame.command, TILT);
        assert_eq!(&frame.payload[..], &[1, 0x01, 0x02, 0xFF, 0xFE, 0, 0]);
        assert_eq!(DeviceMessage::from_frame(&frame).unwrap(), msg);
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let frame = Frame::new(SYS_ROTATION, &[4]).unwrap();
        assert_eq!(
            DeviceMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_wrong_payload_length_rejected() {
        let frame = Frame::new(KEY_DOWN, &[1]).unwrap();
        assert_eq!(
            DeviceMessage::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_unmodelled_command() {
        let frame = Frame::new(SYS_ADDR, &[0, 0]).unwrap();
        assert_eq!(
            DeviceMessage::from_frame(&frame),
            Err(FrameError::Unsupported(SYS_ADDR))
        );
    }

    #[test]
    fn test_level_map_packing() {
        let mut levels = [0u8; QUAD_LEDS];
        levels[0] = 15;
        levels[1] = 3;
        levels[63] = 200; // clamped

        let frame = HostMessage::LevelMap { x: 8, y: 0, levels }
            .to_frame()
            .unwrap();
        assert_eq!(frame.command, LED_LEVEL_MAP);
        assert_eq!(frame.payload.len(), 34);
        assert_eq!(frame.payload[0], 8);
        assert_eq!(frame.payload[1], 0);
        assert_eq!(frame.payload[2], 0xF3);
        assert_eq!(frame.payload[33], 0x0F);

        match HostMessage::from_frame(&frame).unwrap() {
            HostMessage::LevelMap { levels: decoded, .. } => {
                assert_eq!(decoded[0], 15);
                assert_eq!(decoded[1], 3);
                assert_eq!(decoded[63], 15);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ring_map_frame() {
        let mut levels = [0u8; RING_LEDS];
        levels[10] = 7;
        let frame = HostMessage::RingMap { ring: 2, levels }.to_frame().unwrap();

        assert_eq!(frame.command, RING_MAP);
        assert_eq!(frame.payload.len(), 33);
        assert_eq!(frame.payload[0], 2);
        assert_eq!(frame.payload[1 + 5], 0x70);
    }

    #[test]
    fn test_level_set_clamps() {
        let frame = HostMessage::LevelSet {
            x: 1,
            y: 2,
            level: 255,
        }
        .to_frame()
        .unwrap();
        assert_eq!(&frame.payload[..], &[1, 2, MAX_LEVEL]);
    }

    #[test]
    fn test_host_message_roundtrip() {
        let original = HostMessage::RingRange {
            ring: 1,
            start: 60,
            end: 4,
            level: 9,
        };
        let frame = original.to_frame().unwrap();
        assert_eq!(HostMessage::from_frame(&frame).unwrap(), original);
    }
}
