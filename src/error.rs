// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

/// An error produced while constructing or querying a distribution.
///
/// Every operation in this crate validates its input up front, so an error
/// always means that nothing was constructed.
#[derive(Clone, Debug, PartialEq)]
pub enum DistributionError
{
    /// Array shape or name count disagrees with the declared dimension.
    DimensionMismatch
    {
        expected: Vec<usize>,
        found: Vec<usize>,
    },
    /// A joint or conditional probability tensor does not sum to one.
    ProbabilityNormalization
    {
        sum: f64,
    },
    /// A probability entry is negative.
    NegativeProbability,
    /// A value grid is not strictly increasing.
    UnsortedValues
    {
        axis: usize,
    },
    /// Evidence has no exact match in the value grid of `variable`.
    ValueNotFound
    {
        variable: String,
        value: f64,
    },
    /// The value grids of a parent distribution differ from the conditioned grids.
    ValueMismatch,
    /// A narrowing cast to a concrete distribution failed.
    Cast
    {
        expected: &'static str,
        found: &'static str,
    },
    /// No variable with this name is held by the distribution.
    VariableNotFound(String),
    /// A variable name occurs more than once.
    DuplicateVariable(String),
    /// An index is out of range for an axis of length `len`.
    IndexOutOfBounds
    {
        index: usize,
        len: usize,
    },
    /// The covariance matrix has no strictly positive Cholesky factorization.
    NotPositiveDefinite,
}

/// Error code of a `DistributionError`, without the attached details.
///
/// This enumeration is not exhaustive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind
{
    /// shape or length mismatch
    DimensionMismatch,
    /// probabilities do not sum to one
    ProbabilityNormalization,
    /// negative probability
    NegativeProbability,
    /// value grid not strictly increasing
    UnsortedValues,
    /// evidence value missing from a grid
    ValueNotFound,
    /// parent grids differ from conditioned grids
    ValueMismatch,
    /// failed narrowing cast
    Cast,
    /// unknown variable name
    VariableNotFound,
    /// repeated variable name
    DuplicateVariable,
    /// index out of range
    IndexOutOfBounds,
    /// covariance not positive definite
    NotPositiveDefinite,
}

impl DistributionError
{
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind
    {
        match *self {
            DistributionError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            DistributionError::ProbabilityNormalization { .. } => ErrorKind::ProbabilityNormalization,
            DistributionError::NegativeProbability => ErrorKind::NegativeProbability,
            DistributionError::UnsortedValues { .. } => ErrorKind::UnsortedValues,
            DistributionError::ValueNotFound { .. } => ErrorKind::ValueNotFound,
            DistributionError::ValueMismatch => ErrorKind::ValueMismatch,
            DistributionError::Cast { .. } => ErrorKind::Cast,
            DistributionError::VariableNotFound(_) => ErrorKind::VariableNotFound,
            DistributionError::DuplicateVariable(_) => ErrorKind::DuplicateVariable,
            DistributionError::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            DistributionError::NotPositiveDefinite => ErrorKind::NotPositiveDefinite,
        }
    }
}

#[inline]
pub(crate) fn dimension_mismatch(expected: &[usize], found: &[usize]) -> DistributionError
{
    DistributionError::DimensionMismatch {
        expected: expected.to_vec(),
        found: found.to_vec(),
    }
}

impl Error for DistributionError {}

impl fmt::Display for DistributionError
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match *self {
            DistributionError::DimensionMismatch {
                ref expected,
                ref found,
            } => write!(f, "dimension mismatch, expected: {:?}, found: {:?}", expected, found),
            DistributionError::ProbabilityNormalization { sum } => {
                write!(f, "probabilities need to sum to one, sum was {}", sum)
            }
            DistributionError::NegativeProbability => write!(f, "probabilities cannot be negative"),
            DistributionError::UnsortedValues { axis } => {
                write!(f, "values of axis {} must be in strictly increasing order", axis)
            }
            DistributionError::ValueNotFound { ref variable, value } => {
                write!(f, "value {} not found among the values of variable {:?}", value, variable)
            }
            DistributionError::ValueMismatch => {
                write!(f, "values of the given distribution do not align with the conditioned values")
            }
            DistributionError::Cast { expected, found } => {
                write!(f, "failed casting from {} to {}", found, expected)
            }
            DistributionError::VariableNotFound(ref name) => write!(f, "no variable named {:?}", name),
            DistributionError::DuplicateVariable(ref name) => {
                write!(f, "variable name {:?} occurs more than once", name)
            }
            DistributionError::IndexOutOfBounds { index, len } => {
                write!(f, "index {} out of bounds for axis of length {}", index, len)
            }
            DistributionError::NotPositiveDefinite => write!(f, "covariance matrix is not positive definite"),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn kind_matches_variant()
    {
        let err = dimension_mismatch(&[2, 3], &[3]);
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
        assert_eq!(DistributionError::ValueMismatch.kind(), ErrorKind::ValueMismatch);
        assert_eq!(
            DistributionError::VariableNotFound("x".into()).kind(),
            ErrorKind::VariableNotFound
        );
    }

    #[test]
    fn display()
    {
        let err = DistributionError::Cast {
            expected: "Gaussian",
            found: "Discrete",
        };
        assert_eq!(err.to_string(), "failed casting from Discrete to Gaussian");
        let err = dimension_mismatch(&[2], &[3]);
        assert_eq!(err.to_string(), "dimension mismatch, expected: [2], found: [3]");
    }
}
