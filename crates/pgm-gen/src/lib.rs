// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Build valid probability tables and value grids for tests.

mod table_builder;

pub use table_builder::{grid, grids, TableBuilder, TableGenerator};
