// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Direct-form inverse transform in double precision, used as the ground
//! truth for the calibrated [`crate::idct`] implementation.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{BLOCK_DIM, BLOCK_SIZE};

#[inline(always)]
fn alpha(u: usize) -> f64 {
    if u == 0 { FRAC_1_SQRT_2 } else { 1.0 }
}

/// 8x8 inverse DCT as the literal basis-function sum, with the 1/4
/// normalization that makes a DC-only block come out at DC/8.
pub fn idct8x8(block: &[f32; BLOCK_SIZE]) -> [f32; BLOCK_SIZE] {
    let mut out = [0.0f32; BLOCK_SIZE];
    for y in 0..BLOCK_DIM {
        for x in 0..BLOCK_DIM {
            let mut sum = 0.0f64;
            for v in 0..BLOCK_DIM {
                for u in 0..BLOCK_DIM {
                    sum += alpha(u) * alpha(v) / 4.0
                        * block[v * BLOCK_DIM + u] as f64
                        * (((2 * x + 1) * u) as f64 * PI / 16.0).cos()
                        * (((2 * y + 1) * v) as f64 * PI / 16.0).cos();
                }
            }
            out[y * BLOCK_DIM + x] = sum as f32;
        }
    }
    out
}
