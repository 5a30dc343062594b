// Copyright 2021 the pgm-distributions developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Square roots of covariance matrices.

use nalgebra::{Cholesky, DMatrix, Dyn, SymmetricEigen};
use ndarray::{Array2, ArrayBase, Data, Ix2};

/// A square root `A = F Fᵀ` of a symmetric positive semidefinite matrix.
///
/// A positive definite matrix keeps its Cholesky decomposition, and `F` is
/// the lower Cholesky factor. Otherwise `F = V Λ^½` is taken from the
/// symmetric eigendecomposition with non-positive eigenvalues cut to zero,
/// which is all that sampling needs.
#[derive(Clone, Debug)]
pub struct CovarianceFactor
{
    root: Array2<f64>,
    cholesky: Option<Cholesky<f64, Dyn>>,
}

impl CovarianceFactor
{
    /// Factorize the symmetric matrix `a`.
    ///
    /// Pivots that are not clearly positive relative to the largest diagonal
    /// entry mark the matrix as semidefinite.
    ///
    /// **Panics** if `a` is not square.
    pub fn new<S>(a: &ArrayBase<S, Ix2>) -> Self
    where S: Data<Elem = f64>
    {
        let n = a.nrows();
        assert_eq!(n, a.ncols(), "factorization of a non-square matrix");
        let matrix = DMatrix::from_fn(n, n, |i, j| a[[i, j]]);
        let scale = a.diag().iter().fold(0f64, |m, &x| m.max(x.abs()));
        let tol = n.max(1) as f64 * f64::EPSILON * scale;

        let cholesky = matrix
            .clone()
            .cholesky()
            .filter(|c| c.l_dirty().diagonal().iter().all(|&d| d * d > tol));
        match cholesky {
            Some(cholesky) => {
                let l = cholesky.l();
                CovarianceFactor {
                    root: Array2::from_shape_fn((n, n), |(i, j)| l[(i, j)]),
                    cholesky: Some(cholesky),
                }
            }
            None => CovarianceFactor {
                root: eigen_root(matrix),
                cholesky: None,
            },
        }
    }

    /// The factor `F`; lower triangular when the matrix is positive definite.
    pub fn root(&self) -> &Array2<f64>
    {
        &self.root
    }

    /// The Cholesky decomposition, if the matrix is positive definite.
    pub fn cholesky(&self) -> Option<&Cholesky<f64, Dyn>>
    {
        self.cholesky.as_ref()
    }

    pub fn is_positive_definite(&self) -> bool
    {
        self.cholesky.is_some()
    }
}

fn eigen_root(matrix: DMatrix<f64>) -> Array2<f64>
{
    let n = matrix.nrows();
    let eigen = SymmetricEigen::new(matrix);
    let largest = eigen.eigenvalues.iter().fold(0f64, |m, &x| m.max(x.abs()));
    let tol = n.max(1) as f64 * f64::EPSILON * largest;
    Array2::from_shape_fn((n, n), |(i, k)| {
        let lambda = eigen.eigenvalues[k];
        if lambda > tol {
            eigen.eigenvectors[(i, k)] * lambda.sqrt()
        } else {
            0.
        }
    })
}

#[cfg(test)]
mod tests
{
    use ndarray::array;

    use super::*;

    fn assert_close(a: &Array2<f64>, b: &Array2<f64>)
    {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.iter().zip(b) {
            assert!((x - y).abs() < 1e-12, "{} != {}", a, b);
        }
    }

    #[test]
    fn factorizes_positive_definite()
    {
        let a = array![[4., 2., 0.4], [2., 2., 0.5], [0.4, 0.5, 3.]];
        let f = CovarianceFactor::new(&a);
        assert!(f.is_positive_definite());
        let l = f.root();
        assert_eq!(l[[0, 1]], 0.);
        assert_eq!(l[[1, 2]], 0.);
        assert_close(&l.dot(&l.t()), &a);
    }

    #[test]
    fn semidefinite_falls_back_to_eigen_root()
    {
        let a = array![[1., 1.], [1., 1.]];
        let f = CovarianceFactor::new(&a);
        assert!(!f.is_positive_definite());
        assert!(f.cholesky().is_none());
        assert_close(&f.root().dot(&f.root().t()), &a);
    }

    #[test]
    fn nearly_singular_is_not_positive_definite()
    {
        let a = array![[1., 1. - 1e-16], [1. - 1e-16, 1.]];
        assert!(!CovarianceFactor::new(&a).is_positive_definite());
    }

    #[test]
    fn solve_through_cholesky()
    {
        let a = array![[1., 0.8], [0.8, 1.]];
        let f = CovarianceFactor::new(&a);
        let c = f.cholesky().unwrap();
        let x = c.solve(&nalgebra::DVector::from_vec(vec![1., 1.]));
        // (1, 1) is an eigenvector of a with eigenvalue 1.8
        assert!((x[0] - 1. / 1.8).abs() < 1e-12 && (x[1] - 1. / 1.8).abs() < 1e-12);
    }

    #[test]
    fn empty_matrix()
    {
        let f = CovarianceFactor::new(&Array2::<f64>::zeros((0, 0)));
        assert!(f.is_positive_definite());
        assert_eq!(f.root().shape(), &[0, 0]);
    }
}
