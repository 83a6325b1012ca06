//! Reversible byte transform used to obscure values at rest.
//!
//! Every byte is XORed with a fixed mask and a two-byte marker is appended.
//! This is obfuscation, not encryption: anyone holding this file can undo it.

/// Mask applied to every byte (XOR is its own inverse)
const MASK: u8 = 3;

/// Marker appended by [`encode`] and stripped by [`decode`]
pub const MARKER: &[u8; 2] = b"!@";

/// Obscure a plaintext value.
pub fn encode(plain: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = plain.iter().map(|b| b ^ MASK).collect();
    out.extend_from_slice(MARKER);
    out
}

/// Recover the plaintext of an obscured value.
///
/// The trailing two bytes are dropped without checking that they are the
/// marker. Input shorter than the marker decodes to an empty value.
pub fn decode(obscured: &[u8]) -> Vec<u8> {
    if obscured.len() < MARKER.len() {
        return Vec::new();
    }
    obscured[..obscured.len() - MARKER.len()]
        .iter()
        .map(|b| b ^ MASK)
        .collect()
}
