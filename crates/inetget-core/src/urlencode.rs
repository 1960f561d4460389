//! `application/x-www-form-urlencoded` encode/decode (spec §4.3 step 1).
//!
//! RFC 3986 unreserved characters pass through unchanged, space becomes
//! `+`, and everything else becomes `%HH`. This differs from path-segment
//! percent-encoding (which escapes space as `%20`), so it is implemented
//! here rather than delegating to a general-purpose URL-encoding crate.

/// Encode raw bytes as `application/x-www-form-urlencoded`.
pub fn encode(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Decode an `application/x-www-form-urlencoded` string back to bytes.
/// Malformed `%HH` escapes are passed through literally rather than
/// rejected — this tool only round-trips its own encodings.
pub fn decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(value) => {
                        out.push(value);
                        i += 3;
                    }
                    None => {
                        out.push(bytes[i]);
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}
