//! FastLZ block decompressor

use crate::error::{FastLzError, FastLzResult};
use crate::{Level, MAX_L2_DISTANCE};

/// Largest output buffer reserved before the first token is decoded
const MAX_PREALLOCATION: usize = 1 << 20;

/// Read the compression level of a block without decompressing it
pub fn block_level(data: &[u8]) -> FastLzResult<Level> {
    let first = data
        .first()
        .ok_or(FastLzError::TruncatedInput { offset: 0 })?;
    Level::from_marker(*first)
}

#[inline]
fn next_byte(data: &[u8], ip: &mut usize) -> FastLzResult<usize> {
    let byte = data
        .get(*ip)
        .ok_or(FastLzError::TruncatedInput { offset: *ip })?;
    *ip += 1;
    Ok(usize::from(*byte))
}

/// Decompress a FastLZ block into exactly `expected_len` bytes
///
/// The level is taken from the block's first byte. Every token is checked
/// against the output bounds before it is copied; any violation aborts with
/// [`FastLzError::CorruptData`] and no partial output is returned.
pub fn decompress(data: &[u8], expected_len: usize) -> FastLzResult<Vec<u8>> {
    if data.is_empty() {
        return if expected_len == 0 {
            Ok(Vec::new())
        } else {
            Err(FastLzError::TruncatedInput { offset: 0 })
        };
    }

    let level = Level::from_marker(data[0])?;
    // Grow while decoding so a bogus length cannot force a huge allocation up front
    let mut out: Vec<u8> = Vec::with_capacity(expected_len.min(MAX_PREALLOCATION));
    let mut ip = 1usize;
    let mut ctrl = usize::from(data[0] & 31);

    loop {
        let token = ip - 1;

        if ctrl >= 32 {
            let mut len = (ctrl >> 5) - 1;
            let ofs = (ctrl & 31) << 8;

            if len == 6 {
                match level {
                    Level::One => len += next_byte(data, &mut ip)?,
                    Level::Two => loop {
                        let code = next_byte(data, &mut ip)?;
                        len += code;
                        if code != 255 {
                            break;
                        }
                    },
                }
            }

            let code = next_byte(data, &mut ip)?;
            // Distance minus one, zero repeats the last written byte
            let mut back = ofs + code;
            if level == Level::Two && code == 255 && ofs == (31 << 8) {
                let high = next_byte(data, &mut ip)?;
                let low = next_byte(data, &mut ip)?;
                back = ((high << 8) | low) + MAX_L2_DISTANCE;
            }

            let count = len + 3;
            if out.len() + count > expected_len {
                return Err(FastLzError::CorruptData {
                    offset: token,
                    reason: format!(
                        "match of {count} bytes at output {} overruns {expected_len}",
                        out.len()
                    ),
                });
            }
            if back + 1 > out.len() {
                return Err(FastLzError::CorruptData {
                    offset: token,
                    reason: format!(
                        "back-reference of {} bytes precedes output start at {}",
                        back + 1,
                        out.len()
                    ),
                });
            }

            if back == 0 {
                let last = out[out.len() - 1];
                out.resize(out.len() + count, last);
            } else {
                // Source and destination may overlap, copy forward one byte at a time
                let start = out.len() - back - 1;
                for i in start..start + count {
                    let byte = out[i];
                    out.push(byte);
                }
            }
        } else {
            let run = ctrl + 1;
            if out.len() + run > expected_len {
                return Err(FastLzError::CorruptData {
                    offset: token,
                    reason: format!(
                        "literal run of {run} bytes at output {} overruns {expected_len}",
                        out.len()
                    ),
                });
            }
            if ip + run > data.len() {
                return Err(FastLzError::TruncatedInput { offset: data.len() });
            }
            out.extend_from_slice(&data[ip..ip + run]);
            ip += run;
        }

        if ip >= data.len() {
            break;
        }
        ctrl = usize::from(data[ip]);
        ip += 1;
    }

    if out.len() != expected_len {
        return Err(FastLzError::LengthMismatch {
            expected: expected_len,
            actual: out.len(),
        });
    }

    Ok(out)
}
