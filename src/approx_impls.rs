// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Approximate comparison of distribution parameters.
//!
//! Variable names must match exactly; grids, tables, means and covariances
//! are compared elementwise.

use approx::{AbsDiffEq, RelativeEq};
use ndarray::{Array1, ArrayBase, Data, Dimension};

use crate::conditional::ConditionalDiscrete;
use crate::{Conditional, Discrete, Distribution, Gaussian};

fn grids_abs_diff_eq(a: &[Array1<f64>], b: &[Array1<f64>], epsilon: f64) -> bool
{
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.abs_diff_eq(y, epsilon))
}

fn grids_relative_eq(a: &[Array1<f64>], b: &[Array1<f64>], epsilon: f64, max_relative: f64) -> bool
{
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.relative_eq(y, epsilon, max_relative))
}

fn arrays_abs_diff_eq<S, S2, D>(a: &ArrayBase<S, D>, b: &ArrayBase<S2, D>, epsilon: f64) -> bool
where
    S: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    <ArrayBase<S, D> as AbsDiffEq<ArrayBase<S2, D>>>::abs_diff_eq(a, b, epsilon)
}

fn arrays_relative_eq<S, S2, D>(a: &ArrayBase<S, D>, b: &ArrayBase<S2, D>, epsilon: f64, max_relative: f64) -> bool
where
    S: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    <ArrayBase<S, D> as RelativeEq<ArrayBase<S2, D>>>::relative_eq(a, b, epsilon, max_relative)
}

/// **Requires crate feature `"approx"`**
impl AbsDiffEq for Discrete
{
    type Epsilon = f64;

    fn default_epsilon() -> f64
    {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool
    {
        self.variable_names() == other.variable_names()
            && grids_abs_diff_eq(self.values(), other.values(), epsilon)
            && arrays_abs_diff_eq(&self.probabilities(), &other.probabilities(), epsilon)
    }
}

/// **Requires crate feature `"approx"`**
impl RelativeEq for Discrete
{
    fn default_max_relative() -> f64
    {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool
    {
        self.variable_names() == other.variable_names()
            && grids_relative_eq(self.values(), other.values(), epsilon, max_relative)
            && arrays_relative_eq(&self.probabilities(), &other.probabilities(), epsilon, max_relative)
    }
}

/// **Requires crate feature `"approx"`**
impl AbsDiffEq for Gaussian
{
    type Epsilon = f64;

    fn default_epsilon() -> f64
    {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool
    {
        self.variable_names() == other.variable_names()
            && arrays_abs_diff_eq(&self.mean(), &other.mean(), epsilon)
            && arrays_abs_diff_eq(&self.covariance(), &other.covariance(), epsilon)
    }
}

/// **Requires crate feature `"approx"`**
impl RelativeEq for Gaussian
{
    fn default_max_relative() -> f64
    {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool
    {
        self.variable_names() == other.variable_names()
            && arrays_relative_eq(&self.mean(), &other.mean(), epsilon, max_relative)
            && arrays_relative_eq(&self.covariance(), &other.covariance(), epsilon, max_relative)
    }
}

/// **Requires crate feature `"approx"`**
impl AbsDiffEq for ConditionalDiscrete
{
    type Epsilon = f64;

    fn default_epsilon() -> f64
    {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool
    {
        self.variable_names() == other.variable_names()
            && self.conditioned_names() == other.conditioned_names()
            && grids_abs_diff_eq(self.values(), other.values(), epsilon)
            && grids_abs_diff_eq(self.conditioned_values(), other.conditioned_values(), epsilon)
            && arrays_abs_diff_eq(&self.probabilities(), &other.probabilities(), epsilon)
    }
}

/// **Requires crate feature `"approx"`**
impl RelativeEq for ConditionalDiscrete
{
    fn default_max_relative() -> f64
    {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool
    {
        self.variable_names() == other.variable_names()
            && self.conditioned_names() == other.conditioned_names()
            && grids_relative_eq(self.values(), other.values(), epsilon, max_relative)
            && grids_relative_eq(self.conditioned_values(), other.conditioned_values(), epsilon, max_relative)
            && arrays_relative_eq(&self.probabilities(), &other.probabilities(), epsilon, max_relative)
    }
}
