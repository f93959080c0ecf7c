// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use tracing::debug;

use crate::BLOCK_SIZE;
use crate::error::{Error, Result};

/// One quantized frequency-domain block in natural (de-zigzagged,
/// row-major) order.
pub type CoeffBlock = [i16; BLOCK_SIZE];

/// Per-component 2D grid of coefficient blocks, addressed as
/// (block column, block row).
///
/// The grid belongs to the entropy-decode stage, which fills it scan by
/// scan; the post-processor only borrows it. One block maps to one 8x8
/// spatial tile before subsampling replication.
pub struct CoeffGrid {
    size: (usize, usize),
    blocks: Vec<CoeffBlock>,
}

impl CoeffGrid {
    pub fn new(size: (usize, usize)) -> Result<CoeffGrid> {
        let (xsize, ysize) = size;
        if xsize == 0 || ysize == 0 {
            return Err(Error::InvalidImageSize(xsize, ysize));
        }
        let total = xsize
            .checked_mul(ysize)
            .ok_or(Error::ImageSizeTooLarge(xsize, ysize))?;
        debug!(xsize, ysize, "allocating coefficient grid");
        let mut blocks = vec![];
        blocks.try_reserve_exact(total)?;
        blocks.resize(total, [0; BLOCK_SIZE]);
        Ok(CoeffGrid { size, blocks })
    }

    /// Grid dimensions in blocks.
    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn block(&self, x: usize, y: usize) -> &CoeffBlock {
        debug_assert!(x < self.size.0 && y < self.size.1);
        &self.blocks[y * self.size.0 + x]
    }

    pub fn block_mut(&mut self, x: usize, y: usize) -> &mut CoeffBlock {
        debug_assert!(x < self.size.0 && y < self.size.1);
        &mut self.blocks[y * self.size.0 + x]
    }

    /// All blocks of one grid row, left to right.
    pub fn block_row(&self, y: usize) -> &[CoeffBlock] {
        debug_assert!(y < self.size.1);
        &self.blocks[y * self.size.0..(y + 1) * self.size.0]
    }

    /// Zeroes every coefficient, so the grid can accumulate the next
    /// refinement pass of a progressive decode from a clean baseline.
    pub fn clear(&mut self) {
        for block in &mut self.blocks {
            block.fill(0);
        }
    }
}
