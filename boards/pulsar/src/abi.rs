//! Feature report encoding for the Pulsar lighting controller.
//!
//! Packet structure (65 bytes):
//! - Byte 0: Report id (always 0)
//! - Bytes 1-3: Reserved (0)
//! - Byte 4: Command class (0x02 keylight, 0x03 backlight and brightness)
//! - Byte 5: Sub-selector (0x01)
//! - Bytes 6-9: Class specific payload
//! - Bytes 10-62: Reserved (0)
//! - Byte 63: Checksum (XOR of bytes 4 through the end of the payload)
//! - Byte 64: Reserved (0)

use crate::checksum::checksum;
use crate::consts::{CHECKSUM_OFFSET, PACKET_LEN, PAYLOAD_OFFSET};
use crate::types::{BacklightMode, KeylightMode, ModeRequest};

/// Command class identifiers
pub mod class {
    /// Keylight effects
    pub const KEYLIGHT: u8 = 0x02;
    /// Backlight effects and brightness
    pub const BACKLIGHT: u8 = 0x03;
}

/// Sub-selector shared by every known command
pub const SET: u8 = 0x01;
/// Keylight marker in byte 6
pub const KEYLIGHT_MARKER: u8 = 0x04;
/// Brightness marker in byte 6
pub const BRIGHTNESS_MARKER: u8 = 0x02;
/// Fixed low nibble of the keylight speed byte
pub const KEYLIGHT_FLAG: u8 = 0x0A;

/// Raw feature report, including the leading report id
pub type Packet = [u8; PACKET_LEN];

/// Build a zero filled packet carrying `payload` at byte 4, checksummed over exactly the payload.
pub fn build_packet(payload: &[u8]) -> Packet {
    let mut packet = [0u8; PACKET_LEN];
    let end = PAYLOAD_OFFSET + payload.len();
    debug_assert!(end <= CHECKSUM_OFFSET);
    packet[PAYLOAD_OFFSET..end].copy_from_slice(payload);
    packet[CHECKSUM_OFFSET] = checksum(&packet[PAYLOAD_OFFSET..end]);
    packet
}

/// Map a speed (0 slowest, 255 fastest) onto the backlight period register.
///
/// 0 maps to 15 and 255 maps to 1. Division truncates toward zero.
pub const fn backlight_speed(speed: u8) -> u8 {
    (15 + (speed as i32 * -14) / 255) as u8
}

/// Map a speed onto the keylight speed byte: a step in the high nibble, `0xA` in the low nibble.
///
/// The step is 5 for speeds below 51 and drops by one for every multiple of 51.
pub const fn keylight_speed(speed: u8) -> u8 {
    (((5 + speed as i32 / -51) << 4) as u8) | KEYLIGHT_FLAG
}

/// Construct a packet for setting the backlight effect.
///
/// Payload: class, sub-selector, mode (u16 LE), reserved, speed register.
/// Some effects (off, static) ignore the speed but it is always written.
pub fn backlight(mode: BacklightMode, speed: u8) -> Packet {
    let [lo, hi] = mode.code().to_le_bytes();
    build_packet(&[class::BACKLIGHT, SET, lo, hi, 0x00, backlight_speed(speed)])
}

/// Construct a packet for setting the keylight effect.
///
/// Payload: class, sub-selector, marker, mode, speed byte.
pub fn keylight(mode: KeylightMode, speed: u8) -> Packet {
    build_packet(&[
        class::KEYLIGHT,
        SET,
        KEYLIGHT_MARKER,
        mode.code(),
        keylight_speed(speed),
    ])
}

/// Construct a packet for setting the backlight brightness.
///
/// Payload: class, sub-selector, marker, reserved, reserved, level.
pub fn brightness(level: u8) -> Packet {
    build_packet(&[class::BACKLIGHT, SET, BRIGHTNESS_MARKER, 0x00, 0x00, level])
}

/// Construct the packet for any request
pub fn encode(request: ModeRequest) -> Packet {
    match request {
        ModeRequest::Backlight { mode, speed } => backlight(mode, speed),
        ModeRequest::Keylight { mode, speed } => keylight(mode, speed),
        ModeRequest::Brightness { level } => brightness(level),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert every byte outside `used` (and the checksum) is zero
    fn assert_reserved_zero(packet: &Packet, used: std::ops::Range<usize>) {
        for (i, byte) in packet.iter().enumerate() {
            if !used.contains(&i) && i != CHECKSUM_OFFSET {
                assert_eq!(*byte, 0, "byte {i} should be zero");
            }
        }
    }

    #[test]
    fn backlight_static_slowest() {
        let packet = backlight(BacklightMode::Static, 0);
        assert_eq!(packet.len(), 65);
        assert_eq!(packet[4..10], [0x03u8, 0x01, 0x00, 0x01, 0x00, 15]);
        assert_eq!(packet[63], 0x03 ^ 0x01 ^ 0x00 ^ 0x01 ^ 0x00 ^ 15);
        assert_reserved_zero(&packet, 4..10);
    }

    #[test]
    fn backlight_modes_little_endian() {
        for mode in BacklightMode::ALL {
            let packet = backlight(mode, 128);
            assert_eq!(u16::from_le_bytes([packet[6], packet[7]]), mode.code());
            assert_eq!(packet[63], checksum(&packet[4..10]), "{mode}");
            assert_reserved_zero(&packet, 4..10);
        }
        let packet = backlight(BacklightMode::RipplingLeft, 0);
        assert_eq!((packet[6], packet[7]), (0x01, 0x07));
    }

    #[test]
    fn keylight_runin() {
        let packet = keylight(KeylightMode::RunIn, 255);
        assert_eq!(packet[4..9], [0x02u8, 0x01, 0x04, 7, 0x0A]);
        assert_eq!(packet[63], 0x02 ^ 0x01 ^ 0x04 ^ 7 ^ 0x0A);
        assert_reserved_zero(&packet, 4..9);

        let packet = keylight(KeylightMode::RunIn, 0);
        assert_eq!(packet[8], 0x5A);
        assert_eq!(packet[63], 0x02 ^ 0x01 ^ 0x04 ^ 7 ^ 0x5A);
    }

    #[test]
    fn keylight_modes() {
        for mode in KeylightMode::ALL {
            let packet = keylight(mode, 100);
            assert_eq!(packet[7], mode.code());
            assert_eq!(packet[63], checksum(&packet[4..9]), "{mode}");
            assert_reserved_zero(&packet, 4..9);
        }
    }

    #[test]
    fn brightness_level_verbatim() {
        let packet = brightness(128);
        assert_eq!(packet[4..10], [0x03u8, 0x01, 0x02, 0x00, 0x00, 128]);
        assert_eq!(packet[63], 0x03 ^ 0x01 ^ 0x02 ^ 128);
        assert_reserved_zero(&packet, 4..10);

        for level in 0..=255u8 {
            let packet = brightness(level);
            assert_eq!(packet[9], level);
            assert_eq!(packet[63], checksum(&packet[4..10]));
        }
    }

    #[test]
    fn backlight_speed_bounds() {
        assert_eq!(backlight_speed(0), 15);
        assert_eq!(backlight_speed(18), 15);
        assert_eq!(backlight_speed(19), 14);
        assert_eq!(backlight_speed(254), 2);
        assert_eq!(backlight_speed(255), 1);
    }

    #[test]
    fn backlight_speed_non_increasing() {
        for speed in 0..255u8 {
            assert!(backlight_speed(speed) >= backlight_speed(speed + 1), "speed {speed}");
        }
    }

    #[test]
    fn keylight_speed_steps() {
        assert_eq!(keylight_speed(0), 0x5A);
        assert_eq!(keylight_speed(50), 0x5A);
        assert_eq!(keylight_speed(51), 0x4A);
        assert_eq!(keylight_speed(101), 0x4A);
        assert_eq!(keylight_speed(102), 0x3A);
        assert_eq!(keylight_speed(204), 0x1A);
        assert_eq!(keylight_speed(254), 0x1A);
        assert_eq!(keylight_speed(255), 0x0A);

        for speed in 0..255u8 {
            assert!(keylight_speed(speed) >> 4 >= keylight_speed(speed + 1) >> 4);
            assert_eq!(keylight_speed(speed) & 0x0F, KEYLIGHT_FLAG);
        }
    }

    #[test]
    fn encode_dispatches() {
        assert_eq!(
            encode(ModeRequest::Backlight {
                mode: BacklightMode::Boom,
                speed: 3
            }),
            backlight(BacklightMode::Boom, 3)
        );
        assert_eq!(
            encode(ModeRequest::Keylight {
                mode: KeylightMode::Hexagon,
                speed: 3
            }),
            keylight(KeylightMode::Hexagon, 3)
        );
        assert_eq!(encode(ModeRequest::Brightness { level: 9 }), brightness(9));
    }
}
