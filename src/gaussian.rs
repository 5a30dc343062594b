// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Multivariate normal distributions.

use std::f64::consts::{PI, SQRT_2};

use nalgebra::{Cholesky, DVector, Dyn};
use ndarray::{Array, Array1, Array2, ArrayBase, ArrayD, ArrayView1, ArrayView2, Axis, Data, Dimension, IxDyn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use statrs::function::erf::{erfc, erfc_inv};

use crate::discrete::batch_rows;
use crate::distribution::{Continuous, Distribution};
use crate::error::{dimension_mismatch, DistributionError};
use crate::linalg::CovarianceFactor;
use crate::names::VariableNames;

/// Smallest probability passed to the normal quantile by the CDF estimator.
const QUANTILE_CLAMP: f64 = 1e-16;

/// Standard normal CDF `Φ`.
fn normal_cdf(x: f64) -> f64
{
    0.5 * erfc(-x / SQRT_2)
}

/// Standard normal quantile `Φ⁻¹`, for `p` strictly inside `(0, 1)`.
fn normal_quantile(p: f64) -> f64
{
    -SQRT_2 * erfc_inv(2. * p)
}

/// Settings of the Monte Carlo estimator behind `Gaussian::cdf_probability`.
///
/// The estimator draws `points` quasi-independent integrand evaluations from
/// a `SmallRng` seeded with `seed`, so repeated evaluations agree exactly.
/// It is only used for two or more variables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CdfOptions
{
    points: usize,
    seed: u64,
}

impl Default for CdfOptions
{
    fn default() -> Self
    {
        CdfOptions {
            points: 25_000,
            seed: 0,
        }
    }
}

impl CdfOptions
{
    /// Number of integrand evaluations per target point; at least one is used.
    pub fn points(mut self, points: usize) -> Self
    {
        self.points = points.max(1);
        self
    }

    /// Seed of the estimator's random number generator.
    pub fn seed(mut self, seed: u64) -> Self
    {
        self.seed = seed;
        self
    }

    pub fn get_points(&self) -> usize
    {
        self.points
    }

    pub fn get_seed(&self) -> u64
    {
        self.seed
    }
}

/// Multivariate normal distribution with mean `μ` and covariance `Σ`.
///
/// The covariance is symmetrized on construction and factorized as `Σ = L Lᵀ`.
/// A semidefinite covariance is accepted and can be sampled from, but its
/// density and CDF are undefined and report `NotPositiveDefinite`.
///
/// Batched queries drop the last axis of their input, except for a single
/// variable, where that axis has length one and is kept.
///
/// ```
/// use ndarray::array;
/// use pgm_distributions::{Continuous, Distribution, Gaussian};
///
/// let g = Gaussian::new(&array![5., 3.], &array![[1., 0.8], [0.8, 1.]], Some(["a", "b"])).unwrap();
/// let b = g.marginalize("a").unwrap();
/// assert_eq!(b.mean(), array![3.]);
/// assert_eq!(b.covariance(), array![[1.]]);
///
/// let p = b.cdf_probability(&array![3.]).unwrap();
/// assert_eq!(p.shape(), &[1]);
/// assert!((p[[0]] - 0.5).abs() < 1e-15);
/// ```
#[derive(Clone, Debug)]
pub struct Gaussian
{
    names: VariableNames,
    mean: Array1<f64>,
    covariance: Array2<f64>,
    factor: CovarianceFactor,
    cdf: CdfOptions,
}

impl Gaussian
{
    /// Create a new normal distribution.
    ///
    /// `mean` is flattened into a vector of length `n`, and `covariance` must
    /// hold `n²` elements, read in row-major order as an `n × n` matrix.
    /// Without `variable_names` the variables are named `"0"`, `"1"`, ...
    ///
    /// **Errors** with `DimensionMismatch` or `DuplicateVariable`.
    pub fn new<S1, D1, S2, D2, I, N>(
        mean: &ArrayBase<S1, D1>, covariance: &ArrayBase<S2, D2>, variable_names: Option<I>,
    ) -> Result<Self, DistributionError>
    where
        S1: Data<Elem = f64>,
        D1: Dimension,
        S2: Data<Elem = f64>,
        D2: Dimension,
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let mean = Array::from_iter(mean.iter().cloned());
        let n = mean.len();
        if covariance.len() != n * n {
            return Err(dimension_mismatch(&[n, n], covariance.shape()));
        }
        let covariance = Array::from_iter(covariance.iter().cloned())
            .into_shape_with_order((n, n))
            .map_err(|_| dimension_mismatch(&[n, n], covariance.shape()))?;
        let covariance = (&covariance + &covariance.t()) * 0.5;
        let names = match variable_names {
            Some(names) => VariableNames::new(names)?,
            None => VariableNames::numbered(n),
        };
        Self::from_parts(names, mean, covariance, CdfOptions::default())
    }

    /// Create a new normal distribution with variables named `"0"`, `"1"`, ...
    ///
    /// **Errors** with `DimensionMismatch`.
    pub fn with_default_names<S1, D1, S2, D2>(
        mean: &ArrayBase<S1, D1>, covariance: &ArrayBase<S2, D2>,
    ) -> Result<Self, DistributionError>
    where
        S1: Data<Elem = f64>,
        D1: Dimension,
        S2: Data<Elem = f64>,
        D2: Dimension,
    {
        Self::new(mean, covariance, None::<Vec<String>>)
    }

    fn from_parts(
        names: VariableNames, mean: Array1<f64>, covariance: Array2<f64>, cdf: CdfOptions,
    ) -> Result<Self, DistributionError>
    {
        if names.len() != mean.len() {
            return Err(dimension_mismatch(&[mean.len()], &[names.len()]));
        }
        let factor = CovarianceFactor::new(&covariance);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            variables = ?names.as_slice(),
            positive_definite = factor.is_positive_definite(),
            "constructed gaussian distribution"
        );

        Ok(Gaussian {
            names,
            mean,
            covariance,
            factor,
            cdf,
        })
    }

    /// Replace the settings of the CDF estimator.
    pub fn with_cdf_options(mut self, options: CdfOptions) -> Self
    {
        self.cdf = options;
        self
    }

    pub fn cdf_options(&self) -> CdfOptions
    {
        self.cdf
    }

    /// Mean vector.
    pub fn mean(&self) -> ArrayView1<'_, f64>
    {
        self.mean.view()
    }

    /// Covariance matrix, symmetric.
    pub fn covariance(&self) -> ArrayView2<'_, f64>
    {
        self.covariance.view()
    }

    /// Return `true` if the covariance is numerically positive definite.
    pub fn is_positive_definite(&self) -> bool
    {
        self.factor.is_positive_definite()
    }

    fn positive_definite_factor(&self) -> Result<&Cholesky<f64, Dyn>, DistributionError>
    {
        self.factor.cholesky().ok_or(DistributionError::NotPositiveDefinite)
    }

    /// Shape of a batched query result for input of shape `batch ++ [dim]`.
    fn query_shape(&self, mut batch: Vec<usize>) -> Vec<usize>
    {
        if self.dim() == 1 {
            batch.push(1);
        }
        batch
    }

    fn log_density(&self, factor: &Cholesky<f64, Dyn>, x: ArrayView1<'_, f64>) -> f64
    {
        let diff = DVector::from_iterator(self.dim(), x.iter().zip(&self.mean).map(|(x, m)| x - m));
        let ln_det = 2. * factor.l_dirty().diagonal().iter().map(|d| d.ln()).sum::<f64>();
        -0.5 * (self.dim() as f64 * (2. * PI).ln() + ln_det + diff.dot(&factor.solve(&diff)))
    }

    /// Genz's separation-of-variables estimate of `P(X < upper)`.
    ///
    /// The outermost integral is evaluated exactly, so one variable and
    /// diagonal covariances give exact results regardless of the draws.
    fn genz_cdf<R>(&self, factor: &Cholesky<f64, Dyn>, upper: ArrayView1<'_, f64>, rng: &mut R) -> f64
    where R: Rng + ?Sized
    {
        let n = self.dim();
        if n == 0 {
            return 1.;
        }
        let l = factor.l();
        let b = &upper - &self.mean;
        let e1 = normal_cdf(b[0] / l[(0, 0)]);
        if n == 1 || e1 == 0. {
            return e1;
        }
        let mut y = Array1::<f64>::zeros(n);
        let mut total = 0.;
        for _ in 0..self.cdf.points {
            let mut e = e1;
            let mut f = e1;
            for i in 1..n {
                let w: f64 = rng.random();
                y[i - 1] = normal_quantile((w * e).clamp(QUANTILE_CLAMP, 1. - QUANTILE_CLAMP));
                let shift = (0..i).map(|j| l[(i, j)] * y[j]).sum::<f64>();
                e = normal_cdf((b[i] - shift) / l[(i, i)]);
                f *= e;
                if f == 0. {
                    break;
                }
            }
            total += f;
        }
        total / self.cdf.points as f64
    }
}

impl PartialEq for Gaussian
{
    fn eq(&self, other: &Self) -> bool
    {
        self.names == other.names && self.mean == other.mean && self.covariance == other.covariance
    }
}

impl Distribution for Gaussian
{
    fn variable_names(&self) -> &[String]
    {
        &self.names
    }

    fn sample_n_using<R>(&self, batches: usize, rng: &mut R) -> Array2<f64>
    where R: Rng + ?Sized
    {
        let z = Array2::from_shape_fn((batches, self.dim()), |_| rng.sample::<f64, _>(StandardNormal));
        z.dot(&self.factor.root().t()) + &self.mean
    }

    fn marginalize(&self, variable_name: &str) -> Result<Self, DistributionError>
    {
        let axis = self.names.axis_of(variable_name)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(variable = variable_name, axis, "marginalizing gaussian distribution");

        let keep: Vec<usize> = (0..self.dim()).filter(|&i| i != axis).collect();
        Gaussian::from_parts(
            self.names.remove_axis(axis),
            self.mean.select(Axis(0), &keep),
            self.covariance.select(Axis(0), &keep).select(Axis(1), &keep),
            self.cdf,
        )
    }

    fn permute_variables(&self, variable_names: &[String]) -> Result<Self, DistributionError>
    {
        let perm = self.names.permutation_to(variable_names)?;
        Gaussian::from_parts(
            self.names.permuted(&perm),
            self.mean.select(Axis(0), &perm),
            self.covariance.select(Axis(0), &perm).select(Axis(1), &perm),
            self.cdf,
        )
    }
}

impl Continuous for Gaussian
{
    /// Normal density at each row of `evidence`.
    ///
    /// The result has the batch shape of `evidence`, plus a trailing axis of
    /// length one for a single variable.
    ///
    /// **Errors** with `DimensionMismatch` if the last axis is not `dim`, or
    /// `NotPositiveDefinite` if the covariance is singular.
    fn likelihood<S, D>(&self, evidence: &ArrayBase<S, D>) -> Result<ArrayD<f64>, DistributionError>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let (batch, rows) = batch_rows(evidence, self.dim())?;
        let factor = self.positive_definite_factor()?;
        let density: Vec<f64> = rows
            .rows()
            .into_iter()
            .map(|row| self.log_density(factor, row).exp())
            .collect();
        let shape = self.query_shape(batch);
        ArrayD::from_shape_vec(IxDyn(&shape), density).map_err(|_| dimension_mismatch(&shape, &[rows.nrows()]))
    }

    /// Probability that every component lies below the corresponding
    /// component of each row of `target`.
    ///
    /// **Errors** with `DimensionMismatch` if the last axis is not `dim`, or
    /// `NotPositiveDefinite` if the covariance is singular.
    fn cdf_probability<S, D>(&self, target: &ArrayBase<S, D>) -> Result<ArrayD<f64>, DistributionError>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let (batch, rows) = batch_rows(target, self.dim())?;
        let factor = self.positive_definite_factor()?;
        let shape = self.query_shape(batch);
        let probabilities: Vec<f64> = rows
            .rows()
            .into_iter()
            .map(|row| {
                let mut rng = SmallRng::seed_from_u64(self.cdf.seed);
                self.genz_cdf(factor, row, &mut rng)
            })
            .collect();
        ArrayD::from_shape_vec(IxDyn(&shape), probabilities).map_err(|_| dimension_mismatch(&shape, &[rows.nrows()]))
    }
}

#[cfg(test)]
mod tests
{
    use ndarray::{array, Array3};

    use super::*;
    use crate::error::ErrorKind;

    fn correlated() -> Gaussian
    {
        Gaussian::new(&array![5., 3.], &array![[1., 0.8], [0.8, 1.]], Some(["a", "b"])).unwrap()
    }

    fn standard(n: usize) -> Gaussian
    {
        Gaussian::with_default_names(&Array1::<f64>::zeros(n), &Array2::<f64>::eye(n)).unwrap()
    }

    #[test]
    fn construction()
    {
        let g = Gaussian::with_default_names(&array![[1.], [2.]], &array![1., 0.5, 0.5, 2.]).unwrap();
        assert_eq!(g.mean(), array![1., 2.]);
        assert_eq!(g.covariance(), array![[1., 0.5], [0.5, 2.]]);
        assert_eq!(g.variable_names(), &["0", "1"]);
        assert!(g.is_positive_definite());

        let err = Gaussian::with_default_names(&array![0., 0.], &array![[1., 0., 0.]]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        let err = Gaussian::new(&array![0., 0.], &Array2::<f64>::eye(2), Some(["a"])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        let err = Gaussian::new(&array![0., 0.], &Array2::<f64>::eye(2), Some(["a", "a"])).unwrap_err();
        assert_eq!(err, DistributionError::DuplicateVariable("a".into()));
    }

    #[test]
    fn covariance_is_symmetrized()
    {
        let g = Gaussian::with_default_names(&array![0., 0.], &array![[1., 0.2], [0.4, 1.]]).unwrap();
        assert_eq!(g.covariance(), array![[1., 0.3], [0.3, 1.]]);
    }

    #[test]
    fn marginalize_drops_row_and_column()
    {
        let g = correlated();
        let b = g.marginalize("a").unwrap();
        assert_eq!(b.variable_names(), &["b"]);
        assert_eq!(b.mean(), array![3.]);
        assert_eq!(b.covariance(), array![[1.]]);
        assert_eq!(
            g.marginalize("c").unwrap_err(),
            DistributionError::VariableNotFound("c".into())
        );
    }

    #[test]
    fn permute_swaps_rows_and_columns()
    {
        let g = Gaussian::new(
            &array![1., 2., 3.],
            &array![[1., 0.1, 0.2], [0.1, 2., 0.3], [0.2, 0.3, 3.]],
            Some(["x", "y", "z"]),
        )
        .unwrap();
        let names: Vec<String> = ["z", "x", "y"].iter().map(|s| s.to_string()).collect();
        let p = g.permute_variables(&names).unwrap();
        assert_eq!(p.variable_names(), &["z", "x", "y"]);
        assert_eq!(p.mean(), array![3., 1., 2.]);
        assert_eq!(p.covariance(), array![[3., 0.2, 0.3], [0.2, 1., 0.1], [0.3, 0.1, 2.]]);
    }

    #[test]
    fn likelihood_shapes()
    {
        let g = standard(2);
        let expected = 1. / (2. * PI);

        let p = g.likelihood(&array![0., 0.]).unwrap();
        assert_eq!(p.ndim(), 0);
        assert!((p[[]] - expected).abs() < 1e-12);

        let p = g.likelihood(&Array3::<f64>::zeros((3, 1, 2))).unwrap();
        assert_eq!(p.shape(), &[3, 1]);
        assert!(p.iter().all(|&x| (x - expected).abs() < 1e-12));

        assert_eq!(g.likelihood(&array![0., 0., 0.]).unwrap_err().kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn likelihood_uses_correlation()
    {
        let g = correlated();
        let p = g.likelihood(&array![[5., 3.], [6., 4.]]).unwrap();
        let peak = 1. / (2. * PI * 0.6);
        assert!((p[[0]] - peak).abs() < 1e-12);
        // (1, 1) Σ⁻¹ (1, 1)ᵀ = 2 / 1.8
        assert!((p[[1]] - peak * (-1. / 1.8f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn singular_covariance()
    {
        let g = Gaussian::with_default_names(&array![0., 0.], &array![[1., 1.], [1., 1.]]).unwrap();
        assert!(!g.is_positive_definite());
        assert_eq!(g.likelihood(&array![0., 0.]), Err(DistributionError::NotPositiveDefinite));
        assert_eq!(g.cdf_probability(&array![0., 0.]), Err(DistributionError::NotPositiveDefinite));

        let samples = g.sample_n_using(100, &mut SmallRng::seed_from_u64(1));
        assert!(samples.rows().into_iter().all(|r| (r[0] - r[1]).abs() < 1e-12));
    }

    #[test]
    fn univariate_cdf_is_exact()
    {
        let g = Gaussian::with_default_names(&array![1.], &array![[4.]]).unwrap();
        let p = g.cdf_probability(&array![[1.], [3.], [-1.]]).unwrap();
        assert!((p[[0, 0]] - 0.5).abs() < 1e-15);
        assert!((p[[1, 0]] - 0.8413447460685429).abs() < 1e-14);
        assert!((p[[2, 0]] - 0.15865525393145707).abs() < 1e-14);
        assert_eq!(g.cdf_probability(&array![1.]).unwrap(), array![0.5].into_dyn());
    }

    #[test]
    fn univariate_queries_keep_last_axis()
    {
        let g = standard(1);
        let peak = 1. / (2. * PI).sqrt();

        let p = g.likelihood(&array![[0.], [1.], [2.]]).unwrap();
        assert_eq!(p.shape(), &[3, 1]);
        assert!((p[[0, 0]] - peak).abs() < 1e-15);
        assert!((p[[2, 0]] - peak * (-2f64).exp()).abs() < 1e-15);

        let p = g.likelihood(&array![0.]).unwrap();
        assert_eq!(p.shape(), &[1]);
        assert_eq!(g.cdf_probability(&Array3::<f64>::zeros((2, 1, 1))).unwrap().shape(), &[2, 1, 1]);

        // more than one variable drops the last axis
        assert_eq!(standard(2).likelihood(&array![[0., 0.]]).unwrap().shape(), &[1]);
        assert_eq!(standard(2).likelihood(&array![0., 0.]).unwrap().shape(), &[] as &[usize]);
    }

    // reference values from scipy.stats.norm
    #[test]
    fn normal_functions()
    {
        assert_eq!(normal_cdf(0.), 0.5);
        assert!((normal_cdf(1.) - 0.8413447460685429).abs() < 1e-15);
        assert!((normal_cdf(-1.96) - 0.024997895148220435).abs() < 1e-15);
        assert_eq!(normal_cdf(f64::NEG_INFINITY), 0.);
        assert_eq!(normal_cdf(f64::INFINITY), 1.);

        assert!((normal_quantile(0.975) - 1.959963984540054).abs() < 1e-12);
        assert!(normal_quantile(0.5).abs() < 1e-15);
        for &p in &[1e-10, 1e-4, 0.01, 0.1, 0.75, 0.999] {
            let x = normal_quantile(p);
            assert!((normal_cdf(x) - p).abs() < 1e-9 * p.max(1e-3), "p = {}", p);
        }
    }

    #[test]
    fn diagonal_cdf_is_exact()
    {
        let g = Gaussian::with_default_names(&array![0., 1.], &array![[1., 0.], [0., 4.]])
            .unwrap()
            .with_cdf_options(CdfOptions::default().points(10));
        let p = g.cdf_probability(&array![1., 1.]).unwrap();
        assert!((p[[]] - 0.8413447460685429 * 0.5).abs() < 1e-12);
        let p = g.cdf_probability(&array![f64::NEG_INFINITY, 1.]).unwrap();
        assert_eq!(p[[]], 0.);
    }

    #[test]
    fn cdf_is_deterministic()
    {
        let g = correlated();
        let a = g.cdf_probability(&array![5., 3.]).unwrap();
        let b = g.cdf_probability(&array![5., 3.]).unwrap();
        assert_eq!(a, b);
        let rho: f64 = 0.8;
        assert!((a[[]] - (0.25 + rho.asin() / (2. * PI))).abs() < 5e-3);
    }

    #[test]
    fn sample_moments()
    {
        let g = correlated();
        let samples = g.sample_n_using(20_000, &mut SmallRng::seed_from_u64(42));
        assert_eq!(samples.shape(), &[20_000, 2]);
        let mean = samples.mean_axis(Axis(0)).unwrap();
        assert!((mean[0] - 5.).abs() < 0.05 && (mean[1] - 3.).abs() < 0.05);
        assert_eq!(g.sample().len(), 2);
    }

    #[test]
    fn options_builder()
    {
        let o = CdfOptions::default();
        assert_eq!((o.get_points(), o.get_seed()), (25_000, 0));
        let o = o.points(0).seed(9);
        assert_eq!((o.get_points(), o.get_seed()), (1, 9));
        assert_eq!(correlated().with_cdf_options(o).cdf_options(), o);
    }
}
