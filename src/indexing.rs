// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Index arithmetic over value grids and row-major (C order) tensors.

use itertools::Itertools;
use ndarray::{Array1, ArrayBase, Data, Ix1};

use crate::error::DistributionError;

/// Unravel the row-major flat index `flat` into one index per axis of `shape`.
///
/// **Panics** if `flat` is not less than the product of `shape`.
pub fn unravel_index(mut flat: usize, shape: &[usize]) -> Vec<usize>
{
    let size: usize = shape.iter().product();
    assert!(flat < size, "flat index {} out of bounds for shape {:?}", flat, shape);
    let mut index = vec![0; shape.len()];
    for (ix, &len) in index.iter_mut().zip(shape).rev() {
        *ix = flat % len;
        flat /= len;
    }
    index
}

/// Index of the first element of `xs` for which `pred` is false, assuming
/// `xs` is partitioned so that `pred` holds for a prefix.
fn partition_point<S, F>(xs: &ArrayBase<S, Ix1>, pred: F) -> usize
where
    S: Data<Elem = f64>,
    F: Fn(f64) -> bool,
{
    let (mut lo, mut hi) = (0, xs.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if pred(xs[mid]) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// Number of entries of the sorted array `xs` that are strictly less than `x`.
#[inline]
pub fn count_less<S>(xs: &ArrayBase<S, Ix1>, x: f64) -> usize
where S: Data<Elem = f64>
{
    partition_point(xs, |v| v < x)
}

/// Number of entries of the sorted array `xs` that are less than or equal to `x`.
#[inline]
pub fn count_less_equal<S>(xs: &ArrayBase<S, Ix1>, x: f64) -> usize
where S: Data<Elem = f64>
{
    partition_point(xs, |v| v <= x)
}

/// Bin `x` into `grid`: the first grid value not less than `x`, or the last
/// grid value when `x` lies past the maximum.
///
/// **Panics** if `grid` is empty.
#[inline]
pub fn nearest_upper_index<S>(grid: &ArrayBase<S, Ix1>, x: f64) -> usize
where S: Data<Elem = f64>
{
    count_less(grid, x).min(grid.len() - 1)
}

/// Position of an exact match of `x` in the sorted `grid`.
pub fn exact_index<S>(grid: &ArrayBase<S, Ix1>, x: f64) -> Option<usize>
where S: Data<Elem = f64>
{
    let i = count_less(grid, x);
    if i < grid.len() && grid[i] == x {
        Some(i)
    } else {
        None
    }
}

/// Return `true` if every adjacent pair of `values` is strictly increasing.
pub fn is_strictly_increasing<S>(values: &ArrayBase<S, Ix1>) -> bool
where S: Data<Elem = f64>
{
    values.iter().tuple_windows().all(|(a, b)| a < b)
}

/// Check that every grid is strictly increasing, reporting the first failing axis.
pub(crate) fn ensure_sorted(grids: &[Array1<f64>]) -> Result<(), DistributionError>
{
    match grids.iter().position(|grid| !is_strictly_increasing(grid)) {
        Some(axis) => Err(DistributionError::UnsortedValues { axis }),
        None => Ok(()),
    }
}

/// The permutation taking the order `current` to the order `requested`.
///
/// Axis `i` of the result is axis `perm[i]` of the current order, which is the
/// convention of `ArrayBase::permuted_axes`. Returns `None` unless `requested`
/// is a rearrangement of `current`.
pub fn permutation_between<T: PartialEq>(current: &[T], requested: &[T]) -> Option<Vec<usize>>
{
    if current.len() != requested.len() {
        return None;
    }
    let mut used = vec![false; current.len()];
    let mut perm = Vec::with_capacity(requested.len());
    for name in requested {
        let axis = current.iter().position(|n| n == name)?;
        if used[axis] {
            return None;
        }
        used[axis] = true;
        perm.push(axis);
    }
    Some(perm)
}

#[cfg(test)]
mod tests
{
    use ndarray::{array, Array1};

    use super::*;

    #[test]
    fn unravel()
    {
        assert_eq!(unravel_index(0, &[2, 3]), vec![0, 0]);
        assert_eq!(unravel_index(4, &[2, 3]), vec![1, 1]);
        assert_eq!(unravel_index(5, &[2, 3]), vec![1, 2]);
        assert_eq!(unravel_index(13, &[2, 3, 4]), vec![1, 0, 1]);
        assert_eq!(unravel_index(0, &[]), Vec::<usize>::new());
    }

    #[test]
    #[should_panic]
    fn unravel_out_of_bounds()
    {
        unravel_index(6, &[2, 3]);
    }

    #[test]
    fn counting()
    {
        let xs = array![0.25, 0.5, 0.5, 1.0];
        assert_eq!(count_less(&xs, 0.5), 1);
        assert_eq!(count_less_equal(&xs, 0.5), 3);
        assert_eq!(count_less_equal(&xs, 0.0), 0);
        assert_eq!(count_less(&xs, 2.0), 4);
        assert_eq!(count_less(&Array1::<f64>::zeros(0), 2.0), 0);
    }

    #[test]
    fn binning_rounds_up_and_clamps()
    {
        let grid = array![1., 2., 3.];
        assert_eq!(nearest_upper_index(&grid, 0.5), 0);
        assert_eq!(nearest_upper_index(&grid, 1.0), 0);
        assert_eq!(nearest_upper_index(&grid, 1.5), 1);
        assert_eq!(nearest_upper_index(&grid, 6.5), 2);
    }

    #[test]
    fn exact_lookup()
    {
        let grid = array![4., 5., 6.];
        assert_eq!(exact_index(&grid, 5.), Some(1));
        assert_eq!(exact_index(&grid, 5.5), None);
        assert_eq!(exact_index(&grid, 7.), None);
    }

    #[test]
    fn sortedness()
    {
        assert!(is_strictly_increasing(&array![1., 2., 3.]));
        assert!(is_strictly_increasing(&Array1::<f64>::zeros(0)));
        assert!(!is_strictly_increasing(&array![1., 1.]));
        assert!(!is_strictly_increasing(&array![2., 1.]));
        assert_eq!(
            ensure_sorted(&[array![1., 2.], array![3., 2.]]),
            Err(DistributionError::UnsortedValues { axis: 1 })
        );
    }

    #[test]
    fn permutations()
    {
        let current = ["a", "b", "c"];
        assert_eq!(permutation_between(&current, &["c", "a", "b"]), Some(vec![2, 0, 1]));
        assert_eq!(permutation_between(&current, &["a", "b", "c"]), Some(vec![0, 1, 2]));
        assert_eq!(permutation_between(&current, &["a", "a", "c"]), None);
        assert_eq!(permutation_between(&current, &["a", "b"]), None);
        assert_eq!(permutation_between(&current, &["a", "b", "d"]), None);
    }
}
