// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
#![doc(html_root_url = "https://docs.rs/pgm-distributions/0.3/")]
#![allow(clippy::many_single_char_names, clippy::type_complexity)]

//! The `pgm-distributions` crate provides multivariate probability
//! distributions over named variables, the building blocks of discrete and
//! linear-Gaussian belief networks.
//!
//! - [`Discrete`]: a joint probability table over value grids.
//! - [`Gaussian`]: a multivariate normal distribution.
//! - [`ConditionalDiscrete`]: a table of child distributions indexed by the
//!   values of parent variables, which is resolved into a `Discrete` either
//!   from evidence or by summing over a parent distribution.
//!
//! Every distribution implements [`Distribution`], which samples, removes a
//! variable by name (`marginalize`) and restricts to a requested variable
//! order (`reorder`). Arrays are [`ndarray`] arrays; a query over a batch of
//! points takes the coordinates on the last axis and keeps all leading axes.
//!
//! ```
//! use ndarray::array;
//! use pgm_distributions::prelude::*;
//!
//! let rain = Discrete::new(vec![vec![0., 1.]], array![0.8, 0.2], ["rain"]).unwrap();
//! let wet_given_rain = ConditionalDiscrete::new(
//!     vec![vec![0., 1.]],
//!     vec![vec![0., 1.]],
//!     array![[0.9, 0.1], [0.1, 0.9]],
//!     ["wet"],
//!     ["rain"],
//! ).unwrap();
//!
//! let wet = wet_given_rain.marginalize(&rain).unwrap();
//! assert!((wet.probability_of(&[1.]).unwrap() - 0.26).abs() < 1e-12);
//! ```
//!
//! ## Crate Feature Flags
//!
//! - `approx`
//!   - Implementations of traits from the [`approx`] crate for the
//!     distribution types.
//! - `tracing`
//!   - Emit `tracing` events when distributions are constructed,
//!     marginalized, reordered or composed.
//!
//! [`approx`]: https://docs.rs/approx

pub use crate::conditional::{Conditional, ConditionalDiscrete};
pub use crate::discrete::Discrete;
pub use crate::distribution::{AnyDistribution, Continuous, Distribution, Variant};
pub use crate::error::{DistributionError, ErrorKind};
pub use crate::gaussian::{CdfOptions, Gaussian};
pub use crate::names::VariableNames;

#[cfg(feature = "approx")]
mod approx_impls;
mod conditional;
mod discrete;
mod distribution;
mod error;
mod gaussian;
pub mod indexing;
mod linalg;
mod names;
pub mod prelude;

/// Largest deviation from one tolerated in the total mass of a probability
/// table.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;
