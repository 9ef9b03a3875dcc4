/// Checksum validated by the firmware before applying a command.
///
/// Bytewise XOR over the command's payload range.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, byte| acc ^ byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checksum_test() {
        // brightness 128
        assert_eq!(checksum(&[0x03, 0x01, 0x02, 0x00, 0x00, 0x80]), 0x80);
        // backlight static at speed 0
        assert_eq!(checksum(&[0x03, 0x01, 0x00, 0x01, 0x00, 0x0F]), 0x0C);
    }

    #[test]
    fn checksum_empty() {
        assert_eq!(checksum(&[]), 0);
    }

    #[test]
    fn checksum_cancels_pairs() {
        assert_eq!(checksum(&[0xAB, 0x12, 0xAB]), 0x12);
    }
}
