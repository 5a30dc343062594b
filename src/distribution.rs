// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The interface shared by all distributions.

use ndarray::{Array1, Array2, ArrayBase, ArrayD, Axis, Data, Dimension};
use rand::Rng;

use crate::error::DistributionError;
use crate::names::VariableNames;
use crate::{Discrete, Gaussian};

/// A multivariate distribution over named variables.
///
/// The variable names fix the order of the output axes: column `i` of a
/// sample is the value of the variable `variable_names()[i]`. Marginalization
/// and reordering address variables by name, never by position.
///
/// Every method is a pure query, producing new arrays or new distributions.
pub trait Distribution: Clone
{
    /// Names of the output variables, in axis order.
    fn variable_names(&self) -> &[String];

    /// Dimension in which the distribution generates samples.
    #[inline]
    fn dim(&self) -> usize
    {
        self.variable_names().len()
    }

    /// Draw `batches` samples using the random number generator `rng`.
    ///
    /// The samples are stacked along the first axis, so the result has shape
    /// `(batches, dim)`.
    fn sample_n_using<R>(&self, batches: usize, rng: &mut R) -> Array2<f64>
    where R: Rng + ?Sized;

    /// Draw a single sample of shape `(dim,)` using `rng`.
    fn sample_using<R>(&self, rng: &mut R) -> Array1<f64>
    where R: Rng + ?Sized
    {
        self.sample_n_using(1, rng).index_axis_move(Axis(0), 0)
    }

    /// Draw a single sample of shape `(dim,)` using the thread-local generator.
    fn sample(&self) -> Array1<f64>
    {
        self.sample_using(&mut rand::rng())
    }

    /// Draw `batches` samples, shape `(batches, dim)`, using the thread-local
    /// generator.
    fn sample_n(&self, batches: usize) -> Array2<f64>
    {
        self.sample_n_using(batches, &mut rand::rng())
    }

    /// Remove the variable `variable_name` by summing or integrating it out.
    ///
    /// The result is a distribution over the remaining `dim - 1` variables,
    /// in their current order.
    ///
    /// **Errors** with `VariableNotFound` if no such variable exists.
    fn marginalize(&self, variable_name: &str) -> Result<Self, DistributionError>;

    /// Rearrange the axes so that the variables appear in the order of
    /// `variable_names`, which must be a rearrangement of the current names.
    ///
    /// This is the primitive behind `reorder`, which also takes care of
    /// marginalizing variables that are not requested.
    fn permute_variables(&self, variable_names: &[String]) -> Result<Self, DistributionError>;

    /// Return the distribution of the requested variables, in the requested order.
    ///
    /// Variables that are held but not requested are marginalized out first,
    /// in the order they appear in `variable_names()`. The request must only
    /// name variables that are currently held and may not repeat a name.
    ///
    /// ```
    /// use ndarray::array;
    /// use pgm_distributions::{Discrete, Distribution};
    ///
    /// let d = Discrete::new(
    ///     vec![vec![0., 1.], vec![10., 20.], vec![5.]],
    ///     array![[[0.1], [0.2]], [[0.3], [0.4]]],
    ///     ["a", "b", "c"],
    /// ).unwrap();
    /// let r = d.reorder(&["b", "a"]).unwrap();
    /// assert_eq!(r.variable_names(), &["b", "a"]);
    /// assert_eq!(r.probabilities(), array![[0.1, 0.3], [0.2, 0.4]].into_dyn());
    /// ```
    fn reorder<S>(&self, variable_names: &[S]) -> Result<Self, DistributionError>
    where S: AsRef<str>
    {
        let requested = VariableNames::new(variable_names.iter().map(|s| s.as_ref()))?;
        if let Some(missing) = requested
            .iter()
            .find(|name| !self.variable_names().contains(*name))
        {
            return Err(DistributionError::VariableNotFound(missing.clone()));
        }
        let dropped: Vec<String> = self
            .variable_names()
            .iter()
            .filter(|name| !requested.contains(*name))
            .cloned()
            .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(?dropped, requested = ?requested.as_slice(), "reordering variables");

        let mut dist = self.clone();
        for name in &dropped {
            dist = dist.marginalize(name)?;
        }
        dist.permute_variables(&requested)
    }
}

/// A distribution over continuous variables, with a density and a CDF.
///
/// Both queries operate on the last axis of their input, which must have
/// length `dim`; all leading axes are batch axes and are kept in the output.
/// An input of shape `(dim,)` therefore produces a zero-dimensional array.
pub trait Continuous: Distribution
{
    /// Density of the distribution at each row of `evidence`.
    fn likelihood<S, D>(&self, evidence: &ArrayBase<S, D>) -> Result<ArrayD<f64>, DistributionError>
    where
        S: Data<Elem = f64>,
        D: Dimension;

    /// Probability `P(X < t)` for each row `t` of `target`, componentwise.
    fn cdf_probability<S, D>(&self, target: &ArrayBase<S, D>) -> Result<ArrayD<f64>, DistributionError>
    where
        S: Data<Elem = f64>,
        D: Dimension;
}

/// Any of the concrete distributions of this crate.
///
/// Use `cast` to narrow a generic reference down to the concrete type when
/// its extra operations are needed, for example the density of a
/// `Gaussian`.
#[derive(Clone, Debug)]
pub enum AnyDistribution
{
    Discrete(Discrete),
    Gaussian(Gaussian),
}

/// A concrete distribution type that `AnyDistribution` can be narrowed to.
pub trait Variant: Distribution
{
    /// Name of the type, used in error messages.
    const NAME: &'static str;

    #[doc(hidden)]
    fn from_any(any: &AnyDistribution) -> Option<&Self>;

    #[doc(hidden)]
    fn from_any_owned(any: AnyDistribution) -> Result<Self, AnyDistribution>;
}

impl Variant for Discrete
{
    const NAME: &'static str = "Discrete";

    fn from_any(any: &AnyDistribution) -> Option<&Self>
    {
        match *any {
            AnyDistribution::Discrete(ref d) => Some(d),
            _ => None,
        }
    }

    fn from_any_owned(any: AnyDistribution) -> Result<Self, AnyDistribution>
    {
        match any {
            AnyDistribution::Discrete(d) => Ok(d),
            other => Err(other),
        }
    }
}

impl Variant for Gaussian
{
    const NAME: &'static str = "Gaussian";

    fn from_any(any: &AnyDistribution) -> Option<&Self>
    {
        match *any {
            AnyDistribution::Gaussian(ref g) => Some(g),
            _ => None,
        }
    }

    fn from_any_owned(any: AnyDistribution) -> Result<Self, AnyDistribution>
    {
        match any {
            AnyDistribution::Gaussian(g) => Ok(g),
            other => Err(other),
        }
    }
}

impl AnyDistribution
{
    /// Name of the concrete type held.
    pub fn variant_name(&self) -> &'static str
    {
        match *self {
            AnyDistribution::Discrete(_) => Discrete::NAME,
            AnyDistribution::Gaussian(_) => Gaussian::NAME,
        }
    }

    /// View the distribution as the concrete type `T`.
    ///
    /// **Errors** with `Cast` if the distribution is not a `T`.
    ///
    /// ```
    /// use ndarray::array;
    /// use pgm_distributions::{AnyDistribution, Discrete, Gaussian};
    ///
    /// let g = Gaussian::with_default_names(&array![0., 0.], &array![[1., 0.], [0., 1.]]).unwrap();
    /// let any = AnyDistribution::from(g);
    /// assert!(any.cast::<Gaussian>().is_ok());
    /// assert!(any.cast::<Discrete>().is_err());
    /// ```
    pub fn cast<T: Variant>(&self) -> Result<&T, DistributionError>
    {
        T::from_any(self).ok_or(DistributionError::Cast {
            expected: T::NAME,
            found: self.variant_name(),
        })
    }

    /// Convert into the concrete type `T`.
    ///
    /// **Errors** with `Cast` if the distribution is not a `T`.
    pub fn into_cast<T: Variant>(self) -> Result<T, DistributionError>
    {
        T::from_any_owned(self).map_err(|other| DistributionError::Cast {
            expected: T::NAME,
            found: other.variant_name(),
        })
    }
}

impl From<Discrete> for AnyDistribution
{
    fn from(d: Discrete) -> Self
    {
        AnyDistribution::Discrete(d)
    }
}

impl From<Gaussian> for AnyDistribution
{
    fn from(g: Gaussian) -> Self
    {
        AnyDistribution::Gaussian(g)
    }
}

impl Distribution for AnyDistribution
{
    fn variable_names(&self) -> &[String]
    {
        match *self {
            AnyDistribution::Discrete(ref d) => d.variable_names(),
            AnyDistribution::Gaussian(ref g) => g.variable_names(),
        }
    }

    fn sample_n_using<R>(&self, batches: usize, rng: &mut R) -> Array2<f64>
    where R: Rng + ?Sized
    {
        match *self {
            AnyDistribution::Discrete(ref d) => d.sample_n_using(batches, rng),
            AnyDistribution::Gaussian(ref g) => g.sample_n_using(batches, rng),
        }
    }

    fn marginalize(&self, variable_name: &str) -> Result<Self, DistributionError>
    {
        match *self {
            AnyDistribution::Discrete(ref d) => d.marginalize(variable_name).map(Self::from),
            AnyDistribution::Gaussian(ref g) => g.marginalize(variable_name).map(Self::from),
        }
    }

    fn permute_variables(&self, variable_names: &[String]) -> Result<Self, DistributionError>
    {
        match *self {
            AnyDistribution::Discrete(ref d) => d.permute_variables(variable_names).map(Self::from),
            AnyDistribution::Gaussian(ref g) => g.permute_variables(variable_names).map(Self::from),
        }
    }
}
