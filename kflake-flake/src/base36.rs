//! base 36 text encoding for ids
//!
//! encodes with the lowercase digits `0-9a-z`. decoding accepts either case
//! since it defers to [`u64::from_str_radix`].

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// longest possible encoding of a u64, `u64::MAX` is `3w5e11264sgsf`
const MAX_LEN: usize = 13;

/// encodes the given integer as a lowercase base 36 string
///
/// ```rust
/// assert_eq!(kflake_flake::base36::encode(0), "0");
/// assert_eq!(kflake_flake::base36::encode(36), "10");
/// ```
pub fn encode(mut value: u64) -> String {
    let mut buf = [0u8; MAX_LEN];
    let mut pos = MAX_LEN;

    loop {
        pos -= 1;
        buf[pos] = DIGITS[(value % 36) as usize];
        value /= 36;

        if value == 0 {
            break;
        }
    }

    buf[pos..].iter().map(|b| *b as char).collect()
}

/// decodes a base 36 string back into an integer
pub fn decode(src: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(src, 36)
}
