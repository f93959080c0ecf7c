// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors, detected at construction.
    #[error("Invalid sampling factors {0}x{1}")]
    InvalidSamplingFactors(u32, u32),
    #[error("Quantization table index {0} out of range, {1} tables available")]
    QuantTableOutOfRange(usize, usize),
    #[error("Invalid bit depth: {0}")]
    InvalidBitDepth(u32),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(usize, usize),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(usize, usize),
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
    #[error("Step height {0} is not a nonzero multiple of the tile height {1}")]
    InvalidStepHeight(usize, usize),
    #[error("Grid height of {0} block rows is not a multiple of {1} block rows per step")]
    StepGeometryMismatch(usize, usize),
    // Caller-contract violations, fatal to the enclosing decode.
    #[error("Step {0} out of range: grid has {1} block rows, {2} per step")]
    StepOutOfBounds(usize, usize, usize),
    #[error("Coefficient grid is {0}x{1} blocks, expected {2}x{3}")]
    GridSizeMismatch(usize, usize, usize, usize),
    // Generic arithmetic overflow. Prefer using other errors if possible.
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

pub type Result<T> = std::result::Result<T, Error>;
