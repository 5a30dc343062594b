// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use ndarray::{Array1, ArrayBase, ArrayD, ArrayViewD, Axis, Data, Dimension, IxDyn};

use super::Conditional;
use crate::discrete::{validate_table, Discrete};
use crate::error::{dimension_mismatch, DistributionError};
use crate::indexing::{self, unravel_index};
use crate::names::VariableNames;
use crate::PROBABILITY_TOLERANCE;

/// Discrete variables conditionally dependent on discrete parent variables.
///
/// With `M` parents taking `k_1, …, k_M` values and `N` children taking
/// `l_1, …, l_N` values, the probability tensor has shape
/// `(k_1, …, k_M, l_1, …, l_N)`: fixing the leading `M` indices selects a
/// table over the children that sums to one.
///
/// ```
/// use ndarray::array;
/// use pgm_distributions::{Conditional, ConditionalDiscrete, Discrete};
///
/// // P(child | parent) for a binary parent and a binary child
/// let c = ConditionalDiscrete::new(
///     vec![vec![0., 1.]],
///     vec![vec![0., 1.]],
///     array![[0.9, 0.1], [0.2, 0.8]],
///     ["child"],
///     ["parent"],
/// ).unwrap();
///
/// let given_one = c.by_evidence(&[1.]).unwrap();
/// assert_eq!(given_one.probabilities(), array![0.2, 0.8].into_dyn());
///
/// let parent = Discrete::new(vec![vec![0., 1.]], array![0.5, 0.5], ["parent"]).unwrap();
/// let child = c.marginalize(&parent).unwrap();
/// assert!((child.probabilities()[[0]] - 0.55).abs() < 1e-12);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ConditionalDiscrete
{
    names: VariableNames,
    conditioned_names: VariableNames,
    values: Vec<Array1<f64>>,
    conditioned_values: Vec<Array1<f64>>,
    probabilities: ArrayD<f64>,
}

impl ConditionalDiscrete
{
    /// Create a new conditional table.
    ///
    /// - `values`: grids of the child variables.
    /// - `conditioned_values`: grids of the parent variables.
    /// - `probabilities`: tensor of shape `parent_shape ++ child_shape`.
    /// - `variable_names`, `conditioned_names`: names of children and
    ///   parents, unique across both sets.
    ///
    /// **Errors** with `DimensionMismatch`, `DuplicateVariable`,
    /// `UnsortedValues`, `NegativeProbability` or `ProbabilityNormalization`.
    pub fn new<V, W, S, D, I, N, J, M>(
        values: impl IntoIterator<Item = V>, conditioned_values: impl IntoIterator<Item = W>,
        probabilities: ArrayBase<S, D>, variable_names: I, conditioned_names: J,
    ) -> Result<Self, DistributionError>
    where
        V: IntoIterator<Item = f64>,
        W: IntoIterator<Item = f64>,
        S: Data<Elem = f64>,
        D: Dimension,
        I: IntoIterator<Item = N>,
        N: Into<String>,
        J: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self::from_parts(
            VariableNames::new(variable_names)?,
            VariableNames::new(conditioned_names)?,
            values.into_iter().map(Array1::from_iter).collect(),
            conditioned_values.into_iter().map(Array1::from_iter).collect(),
            probabilities.into_owned().into_dyn(),
        )
    }

    /// Create a new conditional table with children named `"0"`, `"1"`, ...
    /// and parents named `"c0"`, `"c1"`, ...
    pub fn with_default_names<V, W, S, D>(
        values: impl IntoIterator<Item = V>, conditioned_values: impl IntoIterator<Item = W>,
        probabilities: ArrayBase<S, D>,
    ) -> Result<Self, DistributionError>
    where
        V: IntoIterator<Item = f64>,
        W: IntoIterator<Item = f64>,
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let values: Vec<Array1<f64>> = values.into_iter().map(Array1::from_iter).collect();
        let conditioned_values: Vec<Array1<f64>> = conditioned_values.into_iter().map(Array1::from_iter).collect();
        Self::from_parts(
            VariableNames::numbered(values.len()),
            VariableNames::with_prefix("c", conditioned_values.len()),
            values,
            conditioned_values,
            probabilities.into_owned().into_dyn(),
        )
    }

    fn from_parts(
        names: VariableNames, conditioned_names: VariableNames, values: Vec<Array1<f64>>,
        conditioned_values: Vec<Array1<f64>>, probabilities: ArrayD<f64>,
    ) -> Result<Self, DistributionError>
    {
        if let Some(shared) = names.iter().find(|name| conditioned_names.contains(name)) {
            return Err(DistributionError::DuplicateVariable(shared.clone()));
        }
        if names.len() != values.len() {
            return Err(dimension_mismatch(&[values.len()], &[names.len()]));
        }
        if conditioned_names.len() != conditioned_values.len() {
            return Err(dimension_mismatch(&[conditioned_values.len()], &[conditioned_names.len()]));
        }

        // tensor axes run over the parents first
        let grids: Vec<Array1<f64>> = conditioned_values.iter().chain(&values).cloned().collect();
        indexing::ensure_sorted(&grids)?;
        let shape: Vec<usize> = grids.iter().map(|grid| grid.len()).collect();
        if probabilities.shape() != &shape[..] {
            return Err(dimension_mismatch(&shape, probabilities.shape()));
        }
        if probabilities.iter().any(|&p| p < 0.) {
            return Err(DistributionError::NegativeProbability);
        }

        let parent_size: usize = shape[..conditioned_values.len()].iter().product();
        let child_size: usize = shape[conditioned_values.len()..].iter().product();
        let tables = probabilities
            .to_shape((parent_size, child_size))
            .map_err(|_| dimension_mismatch(&[parent_size, child_size], probabilities.shape()))?;
        for table in tables.rows() {
            validate_table(&table)?;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            variables = ?names.as_slice(),
            conditioned = ?conditioned_names.as_slice(),
            shape = ?shape,
            "constructed conditional discrete distribution"
        );

        Ok(ConditionalDiscrete {
            names,
            conditioned_names,
            values,
            conditioned_values,
            probabilities,
        })
    }

    /// Values obtainable by each child variable.
    pub fn values(&self) -> &[Array1<f64>]
    {
        &self.values
    }

    /// Values obtainable by each parent variable.
    pub fn conditioned_values(&self) -> &[Array1<f64>]
    {
        &self.conditioned_values
    }

    /// The full conditional probability tensor, parent axes first.
    pub fn probabilities(&self) -> ArrayViewD<'_, f64>
    {
        self.probabilities.view()
    }

    /// The child table selected by one index per parent axis.
    fn child_table(&self, parent_index: &[usize]) -> ArrayViewD<'_, f64>
    {
        parent_index
            .iter()
            .fold(self.probabilities.view(), |table, &i| table.index_axis_move(Axis(0), i))
    }
}

impl Conditional for ConditionalDiscrete
{
    type Parent = Discrete;
    type Output = Discrete;

    fn variable_names(&self) -> &[String]
    {
        &self.names
    }

    fn conditioned_names(&self) -> &[String]
    {
        &self.conditioned_names
    }

    /// Select the child table of the parent values `evidence`.
    ///
    /// **Errors** with `DimensionMismatch` if there is not one value per
    /// parent, or `ValueNotFound` if a value is not exactly on its grid.
    fn by_evidence(&self, evidence: &[f64]) -> Result<Discrete, DistributionError>
    {
        if evidence.len() != self.conditioned_values.len() {
            return Err(dimension_mismatch(&[self.conditioned_values.len()], &[evidence.len()]));
        }
        let index = evidence
            .iter()
            .zip(&self.conditioned_values)
            .zip(self.conditioned_names.iter())
            .map(|((&value, grid), variable)| {
                indexing::exact_index(grid, value).ok_or_else(|| DistributionError::ValueNotFound {
                    variable: variable.clone(),
                    value,
                })
            })
            .collect::<Result<Vec<usize>, _>>()?;
        Discrete::from_parts(self.names.clone(), self.values.clone(), self.child_table(&index).to_owned())
    }

    /// Sum the child tables weighted by the probabilities of `parent`.
    ///
    /// The grids of `parent` are matched to the parent grids of the table
    /// by position and must be identical.
    ///
    /// **Errors** with `ValueMismatch` if the grids differ.
    fn marginalize(&self, parent: &Discrete) -> Result<Discrete, DistributionError>
    {
        if parent.values() != &self.conditioned_values[..] {
            return Err(DistributionError::ValueMismatch);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            parents = ?self.conditioned_names.as_slice(),
            children = ?self.names.as_slice(),
            "marginalizing conditional discrete distribution"
        );

        let child_shape: Vec<usize> = self.values.iter().map(|grid| grid.len()).collect();
        let mut marginal = ArrayD::<f64>::zeros(IxDyn(&child_shape));
        for (flat, &weight) in parent.probabilities().iter().enumerate() {
            let index = unravel_index(flat, parent.shape());
            marginal.scaled_add(weight, &self.child_table(&index));
        }
        // inputs within tolerance of one can multiply out past it
        let total = marginal.sum();
        if (total - 1.).abs() > PROBABILITY_TOLERANCE {
            marginal /= total;
        }
        Discrete::from_parts(self.names.clone(), self.values.clone(), marginal)
    }
}
