// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use tracing::debug;

use crate::error::{Error, Result};

/// Row alignment of the canvas, in samples: one 64-byte cache line of f32.
const ROW_ALIGN: usize = 16;

/// Reusable spatial-domain buffer holding one step's worth of decoded,
/// replicated samples for a single component.
///
/// Rows live in one contiguous allocation with a stride rounded up to
/// [`ROW_ALIGN`], and `pad_rows` extra rows are allocated past the visible
/// height. A mutable window of up to `pad_rows` consecutive rows starting
/// at any visible row is therefore always inside the owned buffer, which
/// is what tile-by-tile replication relies on. The buffer is allocated
/// once, overwritten by every step, and released when the canvas is
/// dropped.
pub struct Canvas {
    size: (usize, usize),
    stride: usize,
    data: Vec<f32>,
}

impl Canvas {
    pub fn new(size: (usize, usize), pad_rows: usize) -> Result<Canvas> {
        let (xsize, ysize) = size;
        if xsize == 0 || ysize == 0 {
            return Err(Error::InvalidImageSize(xsize, ysize));
        }
        // These limits let us not worry about overflows.
        if xsize as u64 >= i64::MAX as u64 / 4 || ysize as u64 >= i64::MAX as u64 / 4 {
            return Err(Error::ImageSizeTooLarge(xsize, ysize));
        }
        let stride = xsize
            .checked_next_multiple_of(ROW_ALIGN)
            .ok_or(Error::ArithmeticOverflow)?;
        let rows = ysize
            .checked_add(pad_rows)
            .ok_or(Error::ArithmeticOverflow)?;
        let total = stride
            .checked_mul(rows)
            .ok_or(Error::ImageSizeTooLarge(xsize, ysize))?;
        debug!(xsize, ysize, stride, pad_rows, "allocating canvas");
        let mut data = vec![];
        data.try_reserve_exact(total)?;
        data.resize(total, 0.0);
        Ok(Canvas { size, stride, data })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    /// Distance between the starts of consecutive rows, in samples.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row(&self, row: usize) -> &[f32] {
        debug_assert!(row < self.size.1);
        let start = row * self.stride;
        &self.data[start..start + self.size.0]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f32] {
        debug_assert!(row < self.size.1);
        let start = row * self.stride;
        &mut self.data[start..start + self.size.0]
    }

    /// Mutable stride-flattened window over `rows` consecutive rows
    /// starting at `row`; offsets within it are `y * stride + x`. The
    /// window may reach into the trailing padding but never outside the
    /// allocation.
    pub fn row_group_mut(&mut self, row: usize, rows: usize) -> &mut [f32] {
        debug_assert!(row < self.size.1);
        let start = row * self.stride;
        &mut self.data[start..start + rows * self.stride]
    }
}
