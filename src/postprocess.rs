// Copyright (c) the jpeg-post Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Per-component post-processing: dequantization, inverse transform,
//! rounding and clamping, and subsampling replication into the step
//! canvas.

use tracing::{debug, trace};

use crate::{
    BLOCK_DIM, BLOCK_SIZE,
    canvas::Canvas,
    coeffs::{CoeffBlock, CoeffGrid},
    component::{QuantTable, SamplingFactors},
    error::{Error, Result},
    idct::idct8x8,
};

/// Widens a coefficient block to floats and multiplies elementwise by the
/// component's dequantization table.
pub fn dequantize(block: &CoeffBlock, table: &QuantTable, out: &mut [f32; BLOCK_SIZE]) {
    for ((out, &coeff), &mul) in out.iter_mut().zip(block).zip(table.values()) {
        *out = coeff as f32 * mul;
    }
}

/// Converts one component's coefficient blocks into replicated spatial
/// samples, one bounded step at a time.
///
/// The processor owns its canvas; the coefficient grid stays with the
/// entropy stage and is borrowed per call. The canvas is single-buffered:
/// step N's rows must be fully consumed before step N+1 is produced, and
/// steps of one component must run in increasing order without overlap.
/// Distinct components have disjoint state and may be processed on
/// separate threads, provided the driver places a barrier between a step
/// and its downstream consumption.
pub struct ComponentPostProcessor {
    quant: QuantTable,
    sampling: SamplingFactors,
    grid_size: (usize, usize),
    block_rows_per_step: usize,
    max_value: f32,
    canvas: Canvas,
}

impl ComponentPostProcessor {
    /// Validates the component configuration and allocates the step
    /// canvas.
    ///
    /// `step_height` (in samples) bounds the memory used per step. It
    /// must be a nonzero multiple of the component's tile height, and the
    /// grid height must divide evenly into the derived block rows per
    /// step; a mismatch is a configuration error, never padded or
    /// truncated.
    pub fn new(
        grid_size: (usize, usize),
        quant_tables: &[QuantTable],
        quant_index: usize,
        sampling: SamplingFactors,
        bit_depth: u32,
        step_height: usize,
    ) -> Result<ComponentPostProcessor> {
        let quant = quant_tables
            .get(quant_index)
            .ok_or(Error::QuantTableOutOfRange(
                quant_index,
                quant_tables.len(),
            ))?
            .clone();
        if !(1..=16).contains(&bit_depth) {
            return Err(Error::InvalidBitDepth(bit_depth));
        }
        let (tile_width, tile_height) = sampling.tile_size();
        if step_height == 0 || !step_height.is_multiple_of(tile_height) {
            return Err(Error::InvalidStepHeight(step_height, tile_height));
        }
        let block_rows_per_step = step_height / tile_height;
        if !grid_size.1.is_multiple_of(block_rows_per_step) {
            return Err(Error::StepGeometryMismatch(
                grid_size.1,
                block_rows_per_step,
            ));
        }
        let width = grid_size
            .0
            .checked_mul(tile_width)
            .ok_or(Error::ArithmeticOverflow)?;
        let canvas = Canvas::new((width, step_height), tile_height)?;
        debug!(
            ?grid_size,
            block_rows_per_step,
            canvas_width = width,
            step_height,
            "component post-processor ready"
        );
        Ok(ComponentPostProcessor {
            quant,
            sampling,
            grid_size,
            block_rows_per_step,
            max_value: ((1u32 << bit_depth) - 1) as f32,
            canvas,
        })
    }

    /// Number of steps needed to cover the whole grid.
    pub fn num_steps(&self) -> usize {
        self.grid_size.1 / self.block_rows_per_step
    }

    pub fn canvas_size(&self) -> (usize, usize) {
        self.canvas.size()
    }

    /// One canvas row of the most recent step. The view is valid until
    /// the next `process_step` overwrites it; out-of-range rows are a
    /// programming error and panic.
    pub fn row(&self, row: usize) -> &[f32] {
        self.canvas.row(row)
    }

    /// Decodes block rows `[step * n, (step + 1) * n)` of `grid` into the
    /// canvas, where `n` is the configured block rows per step.
    ///
    /// Every block in the range is dequantized, transformed, rounded half
    /// up, clamped to the component's sample range, and written as `h x v`
    /// constant patches into its tile. The whole step completes or an
    /// error is returned with the canvas contents unspecified.
    pub fn process_step(&mut self, grid: &CoeffGrid, step: usize) -> Result<()> {
        if grid.size() != self.grid_size {
            let (xsize, ysize) = grid.size();
            return Err(Error::GridSizeMismatch(
                xsize,
                ysize,
                self.grid_size.0,
                self.grid_size.1,
            ));
        }
        let out_of_bounds =
            Error::StepOutOfBounds(step, self.grid_size.1, self.block_rows_per_step);
        let base = step
            .checked_mul(self.block_rows_per_step)
            .ok_or(out_of_bounds)?;
        if base + self.block_rows_per_step > self.grid_size.1 {
            return Err(Error::StepOutOfBounds(
                step,
                self.grid_size.1,
                self.block_rows_per_step,
            ));
        }
        trace!(step, base, "processing step");
        let (tile_width, tile_height) = self.sampling.tile_size();
        let (h, v) = (self.sampling.horizontal(), self.sampling.vertical());
        let stride = self.canvas.stride();
        // Scratch block, fully overwritten for every coefficient block.
        let mut work = [0.0f32; BLOCK_SIZE];
        for y in 0..self.block_rows_per_step {
            for x in 0..self.grid_size.0 {
                dequantize(grid.block(x, base + y), &self.quant, &mut work);
                idct8x8(&mut work);
                for value in work.iter_mut() {
                    *value = (*value + 0.5).floor().clamp(0.0, self.max_value);
                }
                let tile = self.canvas.row_group_mut(y * tile_height, tile_height);
                for block_y in 0..BLOCK_DIM {
                    for rep_y in 0..v {
                        let start = (block_y * v + rep_y) * stride + x * tile_width;
                        let row = &mut tile[start..start + tile_width];
                        for block_x in 0..BLOCK_DIM {
                            let sample = work[block_y * BLOCK_DIM + block_x];
                            row[block_x * h..(block_x + 1) * h].fill(sample);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use test_log::test;

    use super::*;
    use crate::util::test::assert_all_almost_eq;

    fn unit_tables() -> Vec<QuantTable> {
        vec![QuantTable::new([1.0; BLOCK_SIZE])]
    }

    fn processor(
        grid_size: (usize, usize),
        sampling: SamplingFactors,
        step_height: usize,
    ) -> Result<ComponentPostProcessor> {
        ComponentPostProcessor::new(grid_size, &unit_tables(), 0, sampling, 8, step_height)
    }

    #[test]
    fn rejects_bad_configuration() -> Result<()> {
        let sampling = SamplingFactors::new(1, 1)?;
        assert!(matches!(
            ComponentPostProcessor::new((2, 2), &unit_tables(), 1, sampling, 8, 16),
            Err(Error::QuantTableOutOfRange(1, 1))
        ));
        assert!(matches!(
            ComponentPostProcessor::new((2, 2), &unit_tables(), 0, sampling, 0, 16),
            Err(Error::InvalidBitDepth(0))
        ));
        // Step height not a multiple of the tile height.
        assert!(matches!(
            processor((2, 2), sampling, 12),
            Err(Error::InvalidStepHeight(12, 8))
        ));
        assert!(matches!(
            processor((2, 2), sampling, 0),
            Err(Error::InvalidStepHeight(0, 8))
        ));
        // Grid height (3) does not divide into 2 block rows per step.
        assert!(matches!(
            processor((2, 3), sampling, 16),
            Err(Error::StepGeometryMismatch(3, 2))
        ));
        Ok(())
    }

    #[test]
    fn rejects_contract_violations() -> Result<()> {
        let sampling = SamplingFactors::new(1, 1)?;
        let mut pp = processor((2, 2), sampling, 8)?;
        let grid = CoeffGrid::new((2, 2))?;
        assert!(pp.process_step(&grid, 1).is_ok());
        assert!(matches!(
            pp.process_step(&grid, 2),
            Err(Error::StepOutOfBounds(2, 2, 1))
        ));
        let wrong = CoeffGrid::new((2, 4))?;
        assert!(matches!(
            pp.process_step(&wrong, 0),
            Err(Error::GridSizeMismatch(2, 4, 2, 2))
        ));
        Ok(())
    }

    #[test]
    fn flat_block_decodes_to_mid_gray() -> Result<()> {
        let sampling = SamplingFactors::new(1, 1)?;
        let mut pp = processor((2, 2), sampling, 16)?;
        let mut grid = CoeffGrid::new((2, 2))?;
        for y in 0..2 {
            for x in 0..2 {
                grid.block_mut(x, y)[0] = 1024;
            }
        }
        pp.process_step(&grid, 0)?;
        assert_eq!(pp.canvas_size(), (16, 16));
        for y in 0..16 {
            assert_all_almost_eq!(pp.row(y), [128.0f32; 16], 1.0);
        }
        Ok(())
    }

    #[test]
    fn scaling_quant_table_scales_transform_input() -> Result<()> {
        let mut rng = XorShiftRng::seed_from_u64(1);
        let block: CoeffBlock = std::array::from_fn(|_| rng.random_range(-16..=16));
        let single = QuantTable::new([2.0; BLOCK_SIZE]);
        let double = QuantTable::new([4.0; BLOCK_SIZE]);
        let mut dequant_single = [0.0f32; BLOCK_SIZE];
        let mut dequant_double = [0.0f32; BLOCK_SIZE];
        dequantize(&block, &single, &mut dequant_single);
        dequantize(&block, &double, &mut dequant_double);
        let scaled: Vec<f32> = dequant_single.iter().map(|v| v * 2.0).collect();
        assert_all_almost_eq!(dequant_double, scaled, 0.0);
        // The unclamped transform output scales along, up to the
        // calibration rounding of the transform itself.
        let mut out_single = dequant_single;
        let mut out_double = dequant_double;
        idct8x8(&mut out_single);
        idct8x8(&mut out_double);
        let scaled_out: Vec<f32> = out_single.iter().map(|v| v * 2.0).collect();
        assert_all_almost_eq!(out_double, scaled_out, 1.0);
        Ok(())
    }

    #[test]
    fn output_is_always_in_range() {
        arbtest::arbtest(|u| {
            let sampling = SamplingFactors::new(1, 1).unwrap();
            let tables = vec![QuantTable::new([255.0; BLOCK_SIZE])];
            let mut pp =
                ComponentPostProcessor::new((1, 1), &tables, 0, sampling, 8, 8).unwrap();
            let mut grid = CoeffGrid::new((1, 1)).unwrap();
            *grid.block_mut(0, 0) = u.arbitrary()?;
            pp.process_step(&grid, 0).unwrap();
            for y in 0..8 {
                assert!(pp.row(y).iter().all(|&v| (0.0..=255.0).contains(&v)));
            }
            Ok(())
        });
    }

    #[test]
    fn replication_produces_constant_patches() -> Result<()> {
        let sampling = SamplingFactors::new(2, 2)?;
        let mut pp = processor((1, 1), sampling, 16)?;
        let mut grid = CoeffGrid::new((1, 1))?;
        let mut rng = XorShiftRng::seed_from_u64(2);
        for coeff in grid.block_mut(0, 0).iter_mut() {
            *coeff = rng.random_range(-64..=64);
        }
        grid.block_mut(0, 0)[0] = 1024;
        pp.process_step(&grid, 0)?;
        assert_eq!(pp.canvas_size(), (16, 16));
        let mut distinct = std::collections::BTreeSet::new();
        for y in (0..16).step_by(2) {
            for x in (0..16).step_by(2) {
                let v = pp.row(y)[x];
                assert_eq!(pp.row(y)[x + 1], v);
                assert_eq!(pp.row(y + 1)[x], v);
                assert_eq!(pp.row(y + 1)[x + 1], v);
                distinct.insert(v.to_bits());
            }
        }
        // The input is not flat, so replication must not be either.
        assert!(distinct.len() > 1);
        Ok(())
    }

    #[test]
    fn canvas_is_reused_across_steps() -> Result<()> {
        let sampling = SamplingFactors::new(1, 1)?;
        let mut pp = processor((1, 2), sampling, 8)?;
        let mut grid = CoeffGrid::new((1, 2))?;
        grid.block_mut(0, 0)[0] = 1024;
        grid.block_mut(0, 1)[0] = 2048;
        assert_eq!(pp.num_steps(), 2);

        pp.process_step(&grid, 0)?;
        let location = pp.row(0).as_ptr() as usize;
        let first: Vec<f32> = pp.row(0).to_vec();
        assert_all_almost_eq!(first, [128.0f32; 8], 1.0);

        pp.process_step(&grid, 1)?;
        // Same buffer, fully overwritten by the second step.
        assert_eq!(pp.row(0).as_ptr() as usize, location);
        assert_all_almost_eq!(pp.row(0), [255.0f32; 8], 1.0);
        Ok(())
    }

    #[test]
    fn subsampled_grid_steps_cover_taller_canvas() -> Result<()> {
        // Factors (2, 2) double the tile height, so one block row per
        // step needs a 16-sample step height.
        let sampling = SamplingFactors::new(2, 2)?;
        let pp = processor((2, 4), sampling, 16)?;
        assert_eq!(pp.num_steps(), 4);
        assert_eq!(pp.canvas_size(), (32, 16));
        Ok(())
    }
}
