//! Nano base32 encoding

/// Nano's base32 alphabet (no 0, 2, l, v)
pub const NANO_ALPHABET: &str = "13456789abcdefghijkmnopqrstuwxyz";

/// Encode `data` as Nano base32, treating it as preceded by `pad_bits` zero bits.
///
/// A 32-byte public key is encoded with 4 pad bits (260 bits, 52 chars); the
/// 5-byte checksum with none (40 bits, 8 chars). Trailing bits that do not
/// fill a symbol are zero-padded on the right.
pub fn nano_base32_encode(data: &[u8], pad_bits: u32) -> String {
    let alphabet = NANO_ALPHABET.as_bytes();
    let mut result = String::with_capacity((data.len() * 8 + pad_bits as usize + 4) / 5);
    let mut bits = pad_bits;
    let mut value = 0u64;

    for &byte in data {
        value = (value << 8) | (byte as u64);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            result.push(alphabet[((value >> bits) & 0x1F) as usize] as char);
        }
    }

    if bits > 0 {
        result.push(alphabet[((value << (5 - bits)) & 0x1F) as usize] as char);
    }

    result
}

/// Whether `c` is a symbol of the Nano base32 alphabet
pub fn is_nano_base32_char(c: char) -> bool {
    NANO_ALPHABET.contains(c)
}
