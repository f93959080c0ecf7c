// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

#![deny(unsafe_code)]
pub mod canvas;
pub mod coeffs;
pub mod component;
pub mod error;
pub mod idct;
pub mod idct_slow;
pub mod metadata;
pub mod postprocess;
pub mod util;

/// Samples along one side of a transform block.
pub const BLOCK_DIM: usize = 8;
/// Samples in a full transform block.
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;
