//! Successor-table prediction.
//!
//! Layout: format byte, a 256-byte table giving the predicted successor of
//! every byte value, the first data byte verbatim, then one residual per
//! remaining byte with `x[i] = table[x[i-1]] - residual[i]` (wrapping).

use crate::error::{Result, TransformError};
use crate::TransformKind;

const TABLE_LEN: usize = 256;
const HEADER_LEN: usize = 1 + TABLE_LEN;

/// Strip one successor-prediction layer.
pub fn invert(buf: &[u8]) -> Result<Vec<u8>> {
    if buf.len() < HEADER_LEN {
        return Err(TransformError::truncated(
            TransformKind::Follow1,
            HEADER_LEN,
            buf.len(),
        ));
    }
    let table = &buf[1..HEADER_LEN];
    let body = &buf[HEADER_LEN..];

    let mut out = Vec::with_capacity(body.len());
    let mut residuals = body.iter();
    if let Some(&first) = residuals.next() {
        out.push(first);
        let mut prev = first;
        for &residual in residuals {
            prev = table[prev as usize].wrapping_sub(residual);
            out.push(prev);
        }
    }
    Ok(out)
}

/// Wrap `data` in a successor-prediction layer, predicting each byte's
/// most frequent successor.
pub fn apply(data: &[u8]) -> Vec<u8> {
    let table = successor_table(data);

    let mut out = Vec::with_capacity(HEADER_LEN + data.len());
    out.push(TransformKind::Follow1.format_byte());
    out.extend_from_slice(&table);
    if let Some(&first) = data.first() {
        out.push(first);
        out.extend(
            data.windows(2)
                .map(|pair| table[pair[0] as usize].wrapping_sub(pair[1])),
        );
    }
    out
}

fn successor_table(data: &[u8]) -> [u8; TABLE_LEN] {
    let mut counts = vec![[0u32; TABLE_LEN]; TABLE_LEN];
    for pair in data.windows(2) {
        counts[pair[0] as usize][pair[1] as usize] += 1;
    }

    let mut table = [0u8; TABLE_LEN];
    for (prev, successors) in counts.iter().enumerate() {
        let mut best = 0;
        for (next, &count) in successors.iter().enumerate() {
            if count > successors[best] {
                best = next;
            }
        }
        table[prev] = best as u8;
    }
    table
}
