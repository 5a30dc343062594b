// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Distributions conditioned on the values of other variables.

use crate::error::DistributionError;

pub use self::discrete::ConditionalDiscrete;

mod discrete;

/// A distribution of child variables given the values of parent variables.
///
/// A conditional is turned into an ordinary distribution either by fixing
/// the parents to observed values (`by_evidence`) or by summing over a
/// distribution of the parents (`marginalize`).
pub trait Conditional
{
    /// Distribution type describing the parent variables.
    type Parent;
    /// Distribution type of the children once the parents are resolved.
    type Output;

    /// Names of the child variables.
    fn variable_names(&self) -> &[String];

    /// Names of the parent variables.
    fn conditioned_names(&self) -> &[String];

    /// Distribution of the children given that parent `i` takes the value
    /// `evidence[i]`.
    fn by_evidence(&self, evidence: &[f64]) -> Result<Self::Output, DistributionError>;

    /// Distribution of the children with the parents summed out, weighted by
    /// `parent`.
    fn marginalize(&self, parent: &Self::Parent) -> Result<Self::Output, DistributionError>;
}
