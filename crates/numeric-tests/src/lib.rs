// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Empirical statistics of sample batches.

use ndarray::{Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};

/// Sample mean and unbiased sample covariance of the rows of `samples`.
///
/// **Panics** if there are fewer than two rows.
pub fn mean_and_covariance<S>(samples: &ArrayBase<S, Ix2>) -> (Array1<f64>, Array2<f64>)
where S: Data<Elem = f64>
{
    let n = samples.nrows();
    assert!(n > 1);
    let mean = samples.mean_axis(Axis(0)).unwrap();
    let centered = samples - &mean;
    let covariance = centered.t().dot(&centered) / (n - 1) as f64;
    (mean, covariance)
}

/// Relative frequency of each value of `grid` in `column`.
pub fn frequencies<S, T>(column: &ArrayBase<S, Ix1>, grid: &ArrayBase<T, Ix1>) -> Array1<f64>
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    let n = column.len() as f64;
    grid.map(|&value| column.iter().filter(|&&x| x == value).count() as f64 / n)
}

/// Fraction of rows of `samples` that lie componentwise below `target`.
pub fn empirical_cdf<S, T>(samples: &ArrayBase<S, Ix2>, target: &ArrayBase<T, Ix1>) -> f64
where
    S: Data<Elem = f64>,
    T: Data<Elem = f64>,
{
    let below = samples
        .rows()
        .into_iter()
        .filter(|row| row.iter().zip(target).all(|(x, t)| x < t))
        .count();
    below as f64 / samples.nrows() as f64
}
