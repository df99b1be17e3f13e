//! Command bytes and payload lengths
//!
//! A command byte is `(section << 4) | command`. There is no length prefix on
//! the wire: the payload length is implied by the command byte and by which
//! side of the link sent it, so the same byte can mean different things in
//! the two directions (0x01 is "request id" from the host, "id" from the
//! device).

// Sections
pub const SECTION_SYSTEM: u8 = 0x0;
pub const SECTION_LED_GRID: u8 = 0x1;
pub const SECTION_KEY_GRID: u8 = 0x2;
pub const SECTION_ENCODER: u8 = 0x5;
pub const SECTION_TILT: u8 = 0x8;
pub const SECTION_LED_RING: u8 = 0x9;

// System: host → device
pub const SYS_QUERY: u8 = 0x00;
pub const SYS_GET_ID: u8 = 0x01;
pub const SYS_SET_ID: u8 = 0x02;
pub const SYS_GET_OFFSETS: u8 = 0x03;
pub const SYS_SET_OFFSET: u8 = 0x04;
pub const SYS_GET_SIZE: u8 = 0x05;
pub const SYS_SET_SIZE: u8 = 0x06;
pub const SYS_GET_ADDR: u8 = 0x07;
pub const SYS_SET_ADDR: u8 = 0x08;
pub const SYS_SET_ROTATION: u8 = 0x0E;
pub const SYS_GET_VERSION: u8 = 0x0F;

// System: device → host
pub const SYS_QUERY_RESPONSE: u8 = 0x00;
pub const SYS_ID: u8 = 0x01;
pub const SYS_GRID_OFFSET: u8 = 0x02;
pub const SYS_GRID_SIZE: u8 = 0x03;
pub const SYS_ADDR: u8 = 0x04;
pub const SYS_ROTATION: u8 = 0x0E;
pub const SYS_VERSION: u8 = 0x0F;

// LED grid: host → device
pub const LED_OFF: u8 = 0x10;
pub const LED_ON: u8 = 0x11;
pub const LED_ALL_OFF: u8 = 0x12;
pub const LED_ALL_ON: u8 = 0x13;
pub const LED_MAP: u8 = 0x14;
pub const LED_ROW: u8 = 0x15;
pub const LED_COLUMN: u8 = 0x16;
pub const LED_INTENSITY: u8 = 0x17;
pub const LED_LEVEL_SET: u8 = 0x18;
pub const LED_LEVEL_ALL: u8 = 0x19;
pub const LED_LEVEL_MAP: u8 = 0x1A;
pub const LED_LEVEL_ROW: u8 = 0x1B;
pub const LED_LEVEL_COLUMN: u8 = 0x1C;

// Key grid: device → host
pub const KEY_UP: u8 = 0x20;
pub const KEY_DOWN: u8 = 0x21;

// Encoder: device → host
pub const ENC_DELTA: u8 = 0x50;
pub const ENC_SWITCH_UP: u8 = 0x51;
pub const ENC_SWITCH_DOWN: u8 = 0x52;

// Tilt
pub const TILT_STATES: u8 = 0x80;
pub const TILT: u8 = 0x81;
pub const TILT_ENABLE: u8 = 0x82;
pub const TILT_DISABLE: u8 = 0x83;

// LED ring: host → device
pub const RING_SET: u8 = 0x90;
pub const RING_ALL: u8 = 0x91;
pub const RING_MAP: u8 = 0x92;
pub const RING_RANGE: u8 = 0x93;

/// Length of the NUL-padded device id string
pub const ID_LEN: usize = 32;

/// Side of the link a byte stream originates from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Origin {
    /// Bytes written by a grid or arc (key presses, encoder deltas, replies)
    Device,
    /// Bytes written by the host driving the device (LED updates, requests)
    Host,
}

impl Origin {
    /// Payload length implied by `command`, or `None` if the command is
    /// not recognized for this origin
    pub fn payload_len(self, command: u8) -> Option<usize> {
        match self {
            Origin::Device => device_payload_len(command),
            Origin::Host => host_payload_len(command),
        }
    }
}

fn device_payload_len(command: u8) -> Option<usize> {
    let len = match command {
        SYS_QUERY_RESPONSE => 2,
        SYS_ID => ID_LEN,
        SYS_GRID_OFFSET => 3,
        SYS_GRID_SIZE => 2,
        SYS_ADDR => 2,
        SYS_ROTATION => 1,
        SYS_VERSION => 8,
        KEY_UP | KEY_DOWN => 2,
        ENC_DELTA => 2,
        ENC_SWITCH_UP | ENC_SWITCH_DOWN => 1,
        TILT_STATES => 1,
        TILT => 7,
        _ => return None,
    };
    Some(len)
}

fn host_payload_len(command: u8) -> Option<usize> {
    let len = match command {
        SYS_QUERY | SYS_GET_ID | SYS_GET_OFFSETS | SYS_GET_SIZE | SYS_GET_ADDR
        | SYS_GET_VERSION => 0,
        SYS_SET_ID => ID_LEN,
        SYS_SET_OFFSET => 3,
        SYS_SET_SIZE | SYS_SET_ADDR => 2,
        SYS_SET_ROTATION => 1,
        LED_OFF | LED_ON => 2,
        LED_ALL_OFF | LED_ALL_ON => 0,
        LED_MAP => 10,
        LED_ROW | LED_COLUMN => 3,
        LED_INTENSITY => 1,
        LED_LEVEL_SET => 3,
        LED_LEVEL_ALL => 1,
        LED_LEVEL_MAP => 34,
        LED_LEVEL_ROW | LED_LEVEL_COLUMN => 6,
        TILT_STATES => 0,
        TILT_ENABLE | TILT_DISABLE => 1,
        RING_SET => 3,
        RING_ALL => 2,
        RING_MAP => 33,
        RING_RANGE => 4,
        _ => return None,
    };
    Some(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_byte_differs_by_origin() {
        assert_eq!(Origin::Host.payload_len(SYS_GET_ID), Some(0));
        assert_eq!(Origin::Device.payload_len(SYS_ID), Some(ID_LEN));
        assert_eq!(Origin::Host.payload_len(SYS_GET_OFFSETS), Some(0));
        assert_eq!(Origin::Device.payload_len(SYS_GRID_SIZE), Some(2));
    }

    #[test]
    fn test_section_nibble() {
        assert_eq!(KEY_DOWN >> 4, SECTION_KEY_GRID);
        assert_eq!(ENC_DELTA >> 4, SECTION_ENCODER);
        assert_eq!(RING_MAP >> 4, SECTION_LED_RING);
        assert_eq!(LED_LEVEL_MAP >> 4, SECTION_LED_GRID);
        assert_eq!(TILT >> 4, SECTION_TILT);
        assert_eq!(SYS_ROTATION >> 4, SECTION_SYSTEM);
    }

    #[test]
    fn test_unknown_commands() {
        assert_eq!(Origin::Device.payload_len(0xFF), None);
        assert_eq!(Origin::Device.payload_len(LED_LEVEL_MAP), None);
        assert_eq!(Origin::Host.payload_len(KEY_DOWN), None);
    }
}
