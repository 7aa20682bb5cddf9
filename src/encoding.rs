//! Reinterpretation of UTF-16 code units as Lua bytes.
//!
//! Lua treats source text as an opaque byte string. The lexer works
//! on 16-bit code units, so anything outside ASCII is turned back
//! into the UTF-8 bytes it would have occupied in a byte-oriented
//! source file. Unpaired surrogates are encoded as three-byte
//! sequences rather than rejected.

/// Appends the UTF-8 encoding of `codepoint` to `out`.
///
/// Surrogate values are encoded like any other codepoint. Values
/// past `0x10FFFF` use the four-byte form with the leading bits
/// truncated; callers reject those before getting here.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_utf8(codepoint: u32, out: &mut Vec<u8>) {
    let cp = codepoint;
    if cp < 0x80 {
        out.push(cp as u8);
    } else if cp < 0x800 {
        out.extend_from_slice(&[0xC0 | (cp >> 6) as u8, 0x80 | (cp & 0x3F) as u8]);
    } else if cp < 0x10000 {
        out.extend_from_slice(&[
            0xE0 | (cp >> 12) as u8,
            0x80 | ((cp >> 6) & 0x3F) as u8,
            0x80 | (cp & 0x3F) as u8,
        ]);
    } else {
        out.extend_from_slice(&[
            0xF0 | ((cp >> 18) & 0x07) as u8,
            0x80 | ((cp >> 12) & 0x3F) as u8,
            0x80 | ((cp >> 6) & 0x3F) as u8,
            0x80 | (cp & 0x3F) as u8,
        ]);
    }
}

/// Appends `units` to `out` as bytes.
///
/// ASCII units map to themselves, surrogate pairs are combined into
/// one supplementary codepoint, and every other unit is treated as a
/// codepoint of its own.
pub fn fixup(units: &[u16], out: &mut Vec<u8>) {
    for decoded in char::decode_utf16(units.iter().copied()) {
        match decoded {
            Ok(ch) => {
                let mut buf = [0; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            }
            Err(lone) => encode_utf8(u32::from(lone.unpaired_surrogate()), out),
        }
    }
}

/// Convenience wrapper around [`fixup`] returning a fresh buffer.
#[must_use]
pub fn fixup_to_vec(units: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(units.len());
    fixup(units, &mut out);
    out
}
