//! Test utilities for building chunk streams by hand
//!
//! Shared by the unit tests of the chunk and wav modules.

use std::sync::Once;

/// Encode a little-endian chunk header
pub fn chunk_header(id: &[u8; 4], size: u32) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&size.to_le_bytes());
    out
}

/// Encode a complete leaf chunk, pad byte included
pub fn leaf_bytes(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = chunk_header(id, payload.len() as u32);
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// Encode a `RIFF` form around already encoded children
pub fn riff_form(form_type: &[u8; 4], body: &[u8]) -> Vec<u8> {
    let mut out = chunk_header(b"RIFF", 4 + body.len() as u32);
    out.extend_from_slice(form_type);
    out.extend_from_slice(body);
    out
}

/// Deterministic pseudo-random bytes
pub fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut out = vec![0u8; len];
    rng.fill(&mut out);
    out
}

/// Route `tracing` output to the test harness, once per process
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
