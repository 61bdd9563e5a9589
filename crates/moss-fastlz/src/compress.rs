//! FastLZ block compressor

use crate::{
    HASH_LOG, HASH_SIZE, Level, MAX_COPY, MAX_FAR_DISTANCE, MAX_L1_DISTANCE, MAX_L2_DISTANCE,
    MAX_LEN,
};

/// Upper bound of the compressed size of an input of `len` bytes
///
/// Incompressible data grows by one control byte per 32 literals, so 6% plus a
/// fixed floor of 66 bytes always suffices.
pub fn max_compressed_len(len: usize) -> usize {
    len.saturating_mul(106).div_ceil(100).max(66)
}

/// Compress `data`, choosing the level from the input size
///
/// Inputs shorter than [`LEVEL_TWO_THRESHOLD`](crate::LEVEL_TWO_THRESHOLD)
/// use [`Level::One`], longer ones [`Level::Two`].
pub fn compress(data: &[u8]) -> Vec<u8> {
    compress_with_level(data, Level::for_length(data.len()))
}

/// Compress `data` at an explicit level
///
/// An empty input produces an empty block.
pub fn compress_with_level(data: &[u8], level: Level) -> Vec<u8> {
    let mut out = Vec::with_capacity(max_compressed_len(data.len()));
    if data.is_empty() {
        return out;
    }

    if data.len() < 4 {
        // Too short to hold a match, emit a single literal run
        out.push((data.len() - 1) as u8);
        out.extend_from_slice(data);
    } else {
        compress_block(data, level, &mut out);
    }

    out[0] |= level.marker();
    out
}

/// Hash of the three bytes starting at `pos`
#[inline]
fn hash_at(input: &[u8], pos: usize) -> usize {
    let v = u32::from(input[pos]) | (u32::from(input[pos + 1]) << 8);
    let w = u32::from(input[pos + 1]) | (u32::from(input[pos + 2]) << 8);
    ((v ^ w ^ (v >> (16 - HASH_LOG))) as usize) & (HASH_SIZE - 1)
}

/// Patch the pending literal-run length byte, or drop it when the run is empty
#[inline]
fn close_literal_run(out: &mut Vec<u8>, copy: usize) {
    if copy > 0 {
        let at = out.len() - copy - 1;
        out[at] = (copy - 1) as u8;
    } else {
        out.pop();
    }
}

fn compress_block(input: &[u8], level: Level, out: &mut Vec<u8>) {
    let length = input.len();
    let ip_bound = length - 2;
    let ip_limit = length.saturating_sub(12);

    // Every slot starts at the beginning of the input, which reads as "no match"
    let mut htab = vec![0usize; HASH_SIZE];

    let max_distance = match level {
        Level::One => MAX_L1_DISTANCE,
        Level::Two => MAX_FAR_DISTANCE,
    };

    let mut copy = 2usize;
    out.push((MAX_COPY - 1) as u8);
    out.extend_from_slice(&input[..2]);
    let mut ip = 2usize;

    while ip < ip_limit {
        let anchor = ip;
        let mut len = 3usize;
        let mut reference;
        let mut distance;

        if level == Level::Two
            && input[ip] == input[ip - 1]
            && input[ip - 1..=ip] == input[ip + 1..ip + 3]
        {
            // Run of the previous byte
            distance = 1;
            reference = anchor + 2;
        } else {
            let slot = hash_at(input, ip);
            reference = htab[slot];
            distance = anchor - reference;
            htab[slot] = anchor;

            let is_match = distance != 0
                && distance < max_distance
                && input[reference..reference + 3] == input[ip..ip + 3];
            let is_match = is_match
                && (level == Level::One
                    || distance < MAX_L2_DISTANCE
                    || input[reference + 3..reference + 5] == input[ip + 3..ip + 5]);

            if !is_match {
                out.push(input[anchor]);
                ip = anchor + 1;
                copy += 1;
                if copy == MAX_COPY {
                    copy = 0;
                    out.push((MAX_COPY - 1) as u8);
                }
                continue;
            }

            if level == Level::Two && distance >= MAX_L2_DISTANCE {
                // Far references need five matching bytes
                len += 2;
            }
            reference += len;
        }

        ip = anchor + len;
        distance -= 1;

        if distance == 0 {
            let last = input[ip - 1];
            while ip < ip_bound {
                let byte = input[reference];
                reference += 1;
                if byte != last {
                    break;
                }
                ip += 1;
            }
        } else {
            while ip < ip_bound {
                let matches = input[reference] == input[ip];
                reference += 1;
                ip += 1;
                if !matches {
                    break;
                }
            }
        }

        close_literal_run(out, copy);
        copy = 0;

        // Match length is biased, 1 means three bytes
        ip -= 3;
        let match_len = ip - anchor;

        match level {
            Level::One => encode_level1(out, match_len, distance),
            Level::Two => encode_level2(out, match_len, distance),
        }

        htab[hash_at(input, ip)] = ip;
        ip += 1;
        htab[hash_at(input, ip)] = ip;
        ip += 1;

        out.push((MAX_COPY - 1) as u8);
    }

    while ip < length {
        out.push(input[ip]);
        ip += 1;
        copy += 1;
        if copy == MAX_COPY {
            copy = 0;
            out.push((MAX_COPY - 1) as u8);
        }
    }

    close_literal_run(out, copy);
}

fn encode_level1(out: &mut Vec<u8>, mut len: usize, distance: usize) {
    let high = (distance >> 8) as u8;
    let low = (distance & 0xFF) as u8;

    while len > MAX_LEN - 2 {
        out.push((7 << 5) + high);
        out.push((MAX_LEN - 2 - 7 - 2) as u8);
        out.push(low);
        len -= MAX_LEN - 2;
    }

    if len < 7 {
        out.push(((len as u8) << 5) + high);
        out.push(low);
    } else {
        out.push((7 << 5) + high);
        out.push((len - 7) as u8);
        out.push(low);
    }
}

fn push_extended_len(out: &mut Vec<u8>, mut len: usize) {
    len -= 7;
    while len >= 255 {
        out.push(255);
        len -= 255;
    }
    out.push(len as u8);
}

fn encode_level2(out: &mut Vec<u8>, len: usize, distance: usize) {
    if distance < MAX_L2_DISTANCE {
        let high = (distance >> 8) as u8;
        if len < 7 {
            out.push(((len as u8) << 5) + high);
        } else {
            out.push((7 << 5) + high);
            push_extended_len(out, len);
        }
        out.push((distance & 0xFF) as u8);
    } else {
        let far = distance - MAX_L2_DISTANCE;
        if len < 7 {
            out.push(((len as u8) << 5) + 31);
        } else {
            out.push((7 << 5) + 31);
            push_extended_len(out, len);
        }
        out.push(255);
        out.push((far >> 8) as u8);
        out.push((far & 0xFF) as u8);
    }
}
