// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Calibrated 8x8 inverse DCT.
//!
//! Separable column pass then row pass, using the rotation constants of
//! the Loeffler factorization shared by the scaled-integer decoder
//! lineage. The arithmetic is f32, but first-pass intermediates are
//! snapped to quarter-sample precision, reproducing the truncation of a
//! reference decoder that narrows its column pass into a 16-bit working
//! buffer. Images must decode pixel for pixel like that reference, so the
//! snap is part of the contract.

use crate::{BLOCK_DIM, BLOCK_SIZE};

/// One 8-point inverse pass over a single line. The output is a factor
/// 2*sqrt(2) above the orthonormal transform; the two passes together come
/// out a factor 8 high, which [`idct8x8`] removes at the end.
#[inline]
fn idct1d(s: [f32; BLOCK_DIM]) -> [f32; BLOCK_DIM] {
    // Even part.
    let p2 = s[2];
    let p3 = s[6];
    let p1 = (p2 + p3) * 0.5411961;
    let t2 = p1 - p3 * 1.847759065;
    let t3 = p1 + p2 * 0.765366865;
    let p2 = s[0];
    let p3 = s[4];
    let t0 = p2 + p3;
    let t1 = p2 - p3;
    let x0 = t0 + t3;
    let x3 = t0 - t3;
    let x1 = t1 + t2;
    let x2 = t1 - t2;
    // Odd part.
    let t0 = s[7];
    let t1 = s[5];
    let t2 = s[3];
    let t3 = s[1];
    let p3 = t0 + t2;
    let p4 = t1 + t3;
    let p1 = t0 + t3;
    let p2 = t1 + t2;
    let p5 = (p3 + p4) * 1.175875602;
    let t0 = t0 * 0.298631336;
    let t1 = t1 * 2.053119869;
    let t2 = t2 * 3.072711026;
    let t3 = t3 * 1.501321110;
    let p1 = p5 - p1 * 0.899976223;
    let p2 = p5 - p2 * 2.562915447;
    let p3 = p3 * -1.961570560;
    let p4 = p4 * -0.390180644;
    let t3 = t3 + p1 + p4;
    let t2 = t2 + p2 + p3;
    let t1 = t1 + p2 + p4;
    let t0 = t0 + p1 + p3;
    [
        x0 + t3,
        x1 + t2,
        x2 + t1,
        x3 + t0,
        x3 - t0,
        x2 - t1,
        x1 - t2,
        x0 - t3,
    ]
}

/// Snaps a first-pass intermediate to quarter-sample precision, rounding
/// half up, the way the fixed-point reference loses precision when it
/// narrows the column pass.
#[inline]
fn narrow(v: f32) -> f32 {
    (v * 4.0 + 0.5).floor() * 0.25
}

/// In-place 8x8 inverse DCT on a dequantized working block.
///
/// Output values are in spatial-sample units; rounding to integral samples
/// and range clamping are left to the caller.
pub fn idct8x8(block: &mut [f32; BLOCK_SIZE]) {
    // Column pass.
    for x in 0..BLOCK_DIM {
        let col: [f32; BLOCK_DIM] = std::array::from_fn(|y| block[y * BLOCK_DIM + x]);
        if col[1..].iter().all(|&v| v == 0.0) {
            // A DC-only column transforms to a constant, exactly.
            let dc = narrow(col[0]);
            for y in 0..BLOCK_DIM {
                block[y * BLOCK_DIM + x] = dc;
            }
            continue;
        }
        let out = idct1d(col);
        for y in 0..BLOCK_DIM {
            block[y * BLOCK_DIM + x] = narrow(out[y]);
        }
    }
    // Row pass. No shortcut here: the column pass spreads components out.
    for y in 0..BLOCK_DIM {
        let row: [f32; BLOCK_DIM] = std::array::from_fn(|x| block[y * BLOCK_DIM + x]);
        let out = idct1d(row);
        for x in 0..BLOCK_DIM {
            block[y * BLOCK_DIM + x] = out[x] * 0.125;
        }
    }
}
