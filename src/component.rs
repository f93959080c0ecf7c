// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::error::{Error, Result};
use crate::{BLOCK_DIM, BLOCK_SIZE};

/// Largest sampling factor the format allows in either direction.
pub const MAX_SAMPLING_FACTOR: u32 = 4;

/// Per-frequency dequantization multipliers in natural order, selected
/// once per component and fixed for the whole frame.
#[derive(Clone, Debug)]
pub struct QuantTable {
    values: [f32; BLOCK_SIZE],
}

impl QuantTable {
    pub fn new(values: [f32; BLOCK_SIZE]) -> QuantTable {
        QuantTable { values }
    }

    /// Builds a table from the raw 16-bit values of a quantization
    /// segment.
    pub fn from_raw(raw: &[u16; BLOCK_SIZE]) -> QuantTable {
        QuantTable {
            values: array_init::array_init(|i| raw[i] as f32),
        }
    }

    pub fn values(&self) -> &[f32; BLOCK_SIZE] {
        &self.values
    }
}

/// Subsampling divisors of one component relative to the full-resolution
/// grid. A component stored at half resolution both ways has factors
/// (2, 2), so one coefficient block covers a 16x16 spatial tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingFactors {
    horizontal: u32,
    vertical: u32,
}

impl SamplingFactors {
    pub fn new(horizontal: u32, vertical: u32) -> Result<SamplingFactors> {
        if !(1..=MAX_SAMPLING_FACTOR).contains(&horizontal)
            || !(1..=MAX_SAMPLING_FACTOR).contains(&vertical)
        {
            return Err(Error::InvalidSamplingFactors(horizontal, vertical));
        }
        Ok(SamplingFactors {
            horizontal,
            vertical,
        })
    }

    pub fn horizontal(&self) -> usize {
        self.horizontal as usize
    }

    pub fn vertical(&self) -> usize {
        self.vertical as usize
    }

    /// Spatial tile covered by one coefficient block after replication.
    pub fn tile_size(&self) -> (usize, usize) {
        (
            BLOCK_DIM * self.horizontal as usize,
            BLOCK_DIM * self.vertical as usize,
        )
    }
}
