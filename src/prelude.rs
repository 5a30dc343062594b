// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! pgm-distributions prelude.
//!
//! This module contains the distribution types and the traits needed to call
//! their methods, so that they can be imported as a group.
//!
//! ```
//! use pgm_distributions::prelude::*;
//! ```

#[doc(no_inline)]
pub use crate::{AnyDistribution, ConditionalDiscrete, Discrete, Gaussian};

#[doc(no_inline)]
pub use crate::{Conditional, Continuous, Distribution, Variant};

#[doc(no_inline)]
pub use crate::{CdfOptions, DistributionError, ErrorKind, VariableNames};
