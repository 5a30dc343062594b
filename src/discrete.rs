// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Discrete multivariate distributions given by a joint probability table.

use ndarray::{Array, Array1, Array2, ArrayBase, ArrayD, ArrayViewD, Axis, Data, Dimension, IxDyn};
use rand::Rng;

use crate::distribution::Distribution;
use crate::error::{dimension_mismatch, DistributionError};
use crate::indexing::{self, unravel_index};
use crate::names::VariableNames;
use crate::PROBABILITY_TOLERANCE;

/// Discrete multivariate distribution.
///
/// Variable `i` takes its values in the grid `values()[i]`, and the entry of
/// `probabilities()` at index `(i_0, …, i_{N-1})` is the probability of the
/// combination `(values()[0][i_0], …, values()[N-1][i_{N-1}])`.
///
/// The table is validated on construction: its shape matches the grids, the
/// grids are strictly increasing, no entry is negative and the entries sum to
/// one within `PROBABILITY_TOLERANCE`.
///
/// ```
/// use ndarray::array;
/// use pgm_distributions::{Discrete, Distribution};
///
/// let d = Discrete::new(
///     vec![vec![1., 2., 3.], vec![4., 5., 6.]],
///     array![[0.2, 0.2, 0.6], [0., 0., 0.], [0., 0., 0.]],
///     ["a", "b"],
/// ).unwrap();
///
/// assert_eq!(d.sample()[0], 1.);
/// assert_eq!(d.probability_of(&[0.5, 6.5]).unwrap(), 0.6);
/// let a = d.marginalize("b").unwrap();
/// assert_eq!(a.probabilities(), array![1., 0., 0.].into_dyn());
/// ```
#[derive(Clone, Debug)]
pub struct Discrete
{
    names: VariableNames,
    values: Vec<Array1<f64>>,
    probabilities: ArrayD<f64>,
    /// Running sum of `probabilities` in row-major order.
    cumulative: Array1<f64>,
    /// Flat index of the last cell with nonzero mass.
    last_positive: usize,
}

impl Discrete
{
    /// Create a new discrete distribution.
    ///
    /// - `values`: the values obtainable by each variable; the first variable
    ///   takes values in the first grid, and so on. Each grid must be strictly
    ///   increasing.
    /// - `probabilities`: the probability of each value combination. With `D`
    ///   variables taking `n_1, …, n_D` values the shape must be
    ///   `(n_1, …, n_D)`.
    /// - `variable_names`: one unique name per variable.
    ///
    /// **Errors** with `DimensionMismatch`, `DuplicateVariable`,
    /// `UnsortedValues`, `NegativeProbability` or `ProbabilityNormalization`.
    pub fn new<V, S, D, I, N>(
        values: impl IntoIterator<Item = V>, probabilities: ArrayBase<S, D>, variable_names: I,
    ) -> Result<Self, DistributionError>
    where
        V: IntoIterator<Item = f64>,
        S: Data<Elem = f64>,
        D: Dimension,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names = VariableNames::new(variable_names)?;
        Self::from_parts(names, collect_grids(values), probabilities.into_owned().into_dyn())
    }

    /// Create a new discrete distribution with variables named `"0"`, `"1"`, ...
    pub fn with_default_names<V, S, D>(
        values: impl IntoIterator<Item = V>, probabilities: ArrayBase<S, D>,
    ) -> Result<Self, DistributionError>
    where
        V: IntoIterator<Item = f64>,
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let values = collect_grids(values);
        let names = VariableNames::numbered(values.len());
        Self::from_parts(names, values, probabilities.into_owned().into_dyn())
    }

    /// Create the distribution with all mass on the cell at `index`.
    ///
    /// **Errors** with `IndexOutOfBounds` if `index` lies outside the grids.
    pub fn one_hot<V, I, N>(
        values: impl IntoIterator<Item = V>, index: &[usize], variable_names: I,
    ) -> Result<Self, DistributionError>
    where
        V: IntoIterator<Item = f64>,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names = VariableNames::new(variable_names)?;
        let values = collect_grids(values);
        let shape = grid_shape(&values);
        if index.len() != shape.len() {
            return Err(dimension_mismatch(&[shape.len()], &[index.len()]));
        }
        if let Some((&i, &len)) = index.iter().zip(&shape).find(|&(&i, &len)| i >= len) {
            return Err(DistributionError::IndexOutOfBounds { index: i, len });
        }
        let mut probabilities = ArrayD::zeros(IxDyn(&shape));
        probabilities[index] = 1.;
        Self::from_parts(names, values, probabilities)
    }

    /// Create the distribution giving every value combination equal mass.
    pub fn uniform<V, I, N>(values: impl IntoIterator<Item = V>, variable_names: I) -> Result<Self, DistributionError>
    where
        V: IntoIterator<Item = f64>,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names = VariableNames::new(variable_names)?;
        let values = collect_grids(values);
        let shape = grid_shape(&values);
        let size: usize = shape.iter().product();
        let probabilities = ArrayD::from_elem(IxDyn(&shape), 1. / size as f64);
        Self::from_parts(names, values, probabilities)
    }

    pub(crate) fn from_parts(
        names: VariableNames, values: Vec<Array1<f64>>, probabilities: ArrayD<f64>,
    ) -> Result<Self, DistributionError>
    {
        if names.len() != values.len() {
            return Err(dimension_mismatch(&[values.len()], &[names.len()]));
        }
        let shape = grid_shape(&values);
        if probabilities.shape() != &shape[..] {
            return Err(dimension_mismatch(&shape, probabilities.shape()));
        }
        indexing::ensure_sorted(&values)?;
        validate_table(&probabilities)?;

        let probabilities = if probabilities.is_standard_layout() {
            probabilities
        } else {
            probabilities.as_standard_layout().into_owned()
        };
        let cumulative: Array1<f64> = probabilities
            .iter()
            .scan(0., |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        let last_positive = probabilities
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.)
            .map(|(i, _)| i)
            .last()
            .unwrap_or(0);

        #[cfg(feature = "tracing")]
        tracing::trace!(variables = ?names.as_slice(), shape = ?shape, "constructed discrete distribution");

        Ok(Discrete {
            names,
            values,
            probabilities,
            cumulative,
            last_positive,
        })
    }

    /// Values obtainable by each variable.
    pub fn values(&self) -> &[Array1<f64>]
    {
        &self.values
    }

    /// Probabilities of taking each value combination.
    pub fn probabilities(&self) -> ArrayViewD<'_, f64>
    {
        self.probabilities.view()
    }

    /// Shape of the probability table.
    pub fn shape(&self) -> &[usize]
    {
        self.probabilities.shape()
    }

    /// Probability of the grid cells nearest to each row of `evidence`.
    ///
    /// The last axis of `evidence` must have length `dim`; leading axes are
    /// batch axes and make up the shape of the result. Evidence need not lie
    /// on the grids: each coordinate selects the first grid value that is not
    /// less than it, or the largest grid value if it lies past the maximum.
    ///
    /// **Errors** with `DimensionMismatch` if the last axis has the wrong length.
    pub fn probability<S, D>(&self, evidence: &ArrayBase<S, D>) -> Result<ArrayD<f64>, DistributionError>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let (batch, rows) = batch_rows(evidence, self.dim())?;
        let probabilities: Vec<f64> = rows.rows().into_iter().map(|row| self.lookup(row.iter())).collect();
        ArrayD::from_shape_vec(IxDyn(&batch), probabilities)
            .map_err(|_| dimension_mismatch(&batch, &[rows.nrows()]))
    }

    /// Probability of the grid cell nearest to a single `evidence` point.
    ///
    /// See `probability` for how evidence is binned.
    pub fn probability_of(&self, evidence: &[f64]) -> Result<f64, DistributionError>
    {
        if evidence.len() != self.dim() {
            return Err(dimension_mismatch(&[self.dim()], &[evidence.len()]));
        }
        Ok(self.lookup(evidence.iter()))
    }

    fn lookup<'a, I>(&self, evidence: I) -> f64
    where I: Iterator<Item = &'a f64>
    {
        let index: Vec<usize> = evidence
            .zip(&self.values)
            .map(|(&x, grid)| indexing::nearest_upper_index(grid, x))
            .collect();
        self.probabilities[&index[..]]
    }
}

/// Two distributions are equal when they have the same names, grids and table.
impl PartialEq for Discrete
{
    fn eq(&self, other: &Self) -> bool
    {
        self.names == other.names && self.values == other.values && self.probabilities == other.probabilities
    }
}

impl Distribution for Discrete
{
    fn variable_names(&self) -> &[String]
    {
        &self.names
    }

    /// Inverse-CDF sampling over the flattened table: each uniform draw
    /// selects the first cell whose running sum exceeds it.
    fn sample_n_using<R>(&self, batches: usize, rng: &mut R) -> Array2<f64>
    where R: Rng + ?Sized
    {
        let shape = self.probabilities.shape();
        let mut samples = Array2::zeros((batches, self.dim()));
        for mut row in samples.rows_mut() {
            let w: f64 = rng.random();
            let flat = indexing::count_less_equal(&self.cumulative, w).min(self.last_positive);
            for ((x, grid), i) in row.iter_mut().zip(&self.values).zip(unravel_index(flat, shape)) {
                *x = grid[i];
            }
        }
        samples
    }

    fn marginalize(&self, variable_name: &str) -> Result<Self, DistributionError>
    {
        let axis = self.names.axis_of(variable_name)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(variable = variable_name, axis, "marginalizing discrete distribution");

        let mut values = self.values.clone();
        values.remove(axis);
        Discrete::from_parts(
            self.names.remove_axis(axis),
            values,
            self.probabilities.sum_axis(Axis(axis)),
        )
    }

    fn permute_variables(&self, variable_names: &[String]) -> Result<Self, DistributionError>
    {
        let perm = self.names.permutation_to(variable_names)?;
        let values = perm.iter().map(|&i| self.values[i].clone()).collect();
        let probabilities = self.probabilities.clone().permuted_axes(perm.clone());
        Discrete::from_parts(self.names.permuted(&perm), values, probabilities)
    }
}

fn collect_grids<V>(values: impl IntoIterator<Item = V>) -> Vec<Array1<f64>>
where V: IntoIterator<Item = f64>
{
    values.into_iter().map(Array1::from_iter).collect()
}

fn grid_shape(values: &[Array1<f64>]) -> Vec<usize>
{
    values.iter().map(|grid| grid.len()).collect()
}

/// Check that a table is non-negative and sums to one.
pub(crate) fn validate_table<S, D>(table: &ArrayBase<S, D>) -> Result<(), DistributionError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if table.iter().any(|&p| p < 0.) {
        return Err(DistributionError::NegativeProbability);
    }
    let sum = table.sum();
    if !((sum - 1.).abs() <= PROBABILITY_TOLERANCE) {
        return Err(DistributionError::ProbabilityNormalization { sum });
    }
    Ok(())
}

/// View `array` as rows of length `dim`, returning the batch shape too.
pub(crate) fn batch_rows<S, D>(
    array: &ArrayBase<S, D>, dim: usize,
) -> Result<(Vec<usize>, Array2<f64>), DistributionError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let (&last, batch) = match array.shape().split_last() {
        Some(split) => split,
        None => return Err(dimension_mismatch(&[dim], array.shape())),
    };
    if last != dim {
        return Err(dimension_mismatch(&[dim], &[last]));
    }
    let n: usize = batch.iter().product();
    let rows = Array::from_iter(array.iter().cloned())
        .into_shape_with_order((n, dim))
        .map_err(|_| dimension_mismatch(&[n, dim], array.shape()))?;
    Ok((batch.to_vec(), rows))
}
