// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ndarray::{Array2, ArrayD, Axis, IxDyn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Builder of non-negative tables that sum to one.
///
/// The leading `conditioned_axes` axes index separate tables, each of which
/// is normalized on its own, which is the layout of a conditional table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableBuilder
{
    shape: Vec<usize>,
    conditioned_axes: usize,
    generator: TableGenerator,
}

/// How to fill each table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableGenerator
{
    /// Equal mass in every cell.
    Uniform,
    /// All mass on the cell with this row-major index, wrapped to the table size.
    OneHot(usize),
    /// Random mass drawn from a generator with this seed; roughly a quarter
    /// of the cells are left empty.
    Random(u64),
}

impl TableBuilder
{
    pub fn new(shape: &[usize]) -> Self
    {
        TableBuilder {
            shape: shape.to_vec(),
            conditioned_axes: 0,
            generator: TableGenerator::Uniform,
        }
    }

    /// Normalize each table selected by the first `axes` indices separately.
    ///
    /// **Panics** if `axes` exceeds the number of axes.
    pub fn conditioned_axes(mut self, axes: usize) -> Self
    {
        assert!(axes <= self.shape.len());
        self.conditioned_axes = axes;
        self
    }

    pub fn generator(mut self, generator: TableGenerator) -> Self
    {
        self.generator = generator;
        self
    }

    pub fn build(self) -> ArrayD<f64>
    {
        let parents: usize = self.shape[..self.conditioned_axes].iter().product();
        let cells: usize = self.shape[self.conditioned_axes..].iter().product();
        let mut flat = Array2::<f64>::zeros((parents, cells));
        let mut rng = match self.generator {
            TableGenerator::Random(seed) => Some(SmallRng::seed_from_u64(seed)),
            _ => None,
        };
        for mut table in flat.axis_iter_mut(Axis(0)) {
            if cells == 0 {
                continue;
            }
            match (self.generator, rng.as_mut()) {
                (TableGenerator::OneHot(i), _) => table[i % cells] = 1.,
                (TableGenerator::Random(_), Some(rng)) => {
                    table.mapv_inplace(|_| if rng.random::<f64>() < 0.25 { 0. } else { rng.random() });
                    // keep at least one cell alive
                    let keep = rng.random_range(0..cells);
                    table[keep] += 1e-3;
                }
                _ => table.fill(1.),
            }
            let total = table.sum();
            table /= total;
        }
        flat.into_shape_with_order(IxDyn(&self.shape)).unwrap()
    }
}

/// The grid `0, 1, …, len - 1`.
pub fn grid(len: usize) -> Vec<f64>
{
    (0..len).map(|i| i as f64).collect()
}

/// One grid per axis of `shape`, each offset so that grids of different
/// axes hold different values.
pub fn grids(shape: &[usize]) -> Vec<Vec<f64>>
{
    shape
        .iter()
        .enumerate()
        .map(|(axis, &len)| grid(len).into_iter().map(|x| x + 10. * axis as f64).collect())
        .collect()
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn assert_normalized(table: &ArrayD<f64>, conditioned_axes: usize)
    {
        let parents: usize = table.shape()[..conditioned_axes].iter().product();
        let rows = table.to_shape((parents, table.len() / parents)).unwrap();
        for row in rows.rows() {
            assert!((row.sum() - 1.).abs() < 1e-12);
            assert!(row.iter().all(|&p| p >= 0.));
        }
    }

    #[test]
    fn uniform_joint()
    {
        let t = TableBuilder::new(&[2, 4]).build();
        assert_eq!(t.shape(), &[2, 4]);
        assert!(t.iter().all(|&p| p == 0.125));
    }

    #[test]
    fn one_hot_conditional()
    {
        let t = TableBuilder::new(&[3, 2, 2])
            .conditioned_axes(1)
            .generator(TableGenerator::OneHot(5))
            .build();
        assert_normalized(&t, 1);
        for i in 0..3 {
            assert_eq!(t[[i, 0, 1]], 1.);
        }
    }

    #[test]
    fn random_is_seeded()
    {
        let build = |seed| {
            TableBuilder::new(&[2, 3, 2])
                .conditioned_axes(2)
                .generator(TableGenerator::Random(seed))
                .build()
        };
        let a = build(4);
        assert_normalized(&a, 2);
        assert_eq!(a, build(4));
        assert_ne!(a, build(5));
    }

    #[test]
    fn offset_grids()
    {
        assert_eq!(grids(&[2, 1]), vec![vec![0., 1.], vec![10.]]);
    }
}
