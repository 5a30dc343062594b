use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use ndarray::{array, Array2, Array4, Axis};
use pgm_distributions::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn correlated() -> Gaussian
{
    Gaussian::new(&array![5., 3.], &array![[1., 0.8], [0.8, 1.]], Some(["a", "b"])).unwrap()
}

#[test]
fn marginalizing_first_axis()
{
    let g = correlated().marginalize("a").unwrap();
    assert_eq!(g.mean(), array![3.]);
    assert_eq!(g.covariance(), array![[1.]]);
}

#[test]
fn standard_density_at_mean()
{
    let g = Gaussian::with_default_names(&array![0., 0.], &Array2::<f64>::eye(2)).unwrap();
    let p = g.likelihood(&array![0., 0.]).unwrap();
    assert_abs_diff_eq!(p[[]], 0.15915494309189535, epsilon = 1e-12);

    let p = g.likelihood(&Array4::<f64>::zeros((2, 1, 3, 2))).unwrap();
    assert_eq!(p.shape(), &[2, 1, 3]);
    for &x in p.iter() {
        assert_abs_diff_eq!(x, 1. / (2. * PI), epsilon = 1e-12);
    }
}

#[test]
fn reorder_round_trip()
{
    let g = Gaussian::new(
        &array![1., 2., 3.],
        &array![[2., 0.3, 0.1], [0.3, 1., 0.2], [0.1, 0.2, 3.]],
        Some(["x", "y", "z"]),
    )
    .unwrap();
    let r = g.reorder(&["z", "x", "y"]).unwrap();
    assert_eq!(r.mean(), array![3., 1., 2.]);
    assert_eq!(r.reorder(&["x", "y", "z"]).unwrap(), g);

    let yz = g.reorder(&["z", "y"]).unwrap();
    assert_eq!(yz.mean(), array![3., 2.]);
    assert_eq!(yz.covariance(), array![[3., 0.2], [0.2, 1.]]);
}

#[test]
fn density_is_invariant_under_reorder()
{
    let g = correlated();
    let r = g.reorder(&["b", "a"]).unwrap();
    let p = g.likelihood(&array![4.5, 3.2]).unwrap();
    let q = r.likelihood(&array![3.2, 4.5]).unwrap();
    assert_abs_diff_eq!(p[[]], q[[]], epsilon = 1e-14);
}

#[test]
fn sample_covariance()
{
    let g = correlated();
    let samples = g.sample_n_using(50_000, &mut SmallRng::seed_from_u64(17));
    let mean = samples.mean_axis(Axis(0)).unwrap();
    let centered = &samples - &mean;
    let cov = centered.t().dot(&centered) / (samples.nrows() - 1) as f64;
    assert_abs_diff_eq!(mean, array![5., 3.], epsilon = 0.03);
    assert_abs_diff_eq!(cov, array![[1., 0.8], [0.8, 1.]], epsilon = 0.03);
}

#[test]
fn cdf_of_marginal_matches_univariate()
{
    let g = correlated();
    let b = g.marginalize("a").unwrap();
    let p = b.cdf_probability(&array![[2.], [3.], [4.]]).unwrap();
    assert_abs_diff_eq!(
        p,
        array![[0.15865525393145707], [0.5], [0.8413447460685429]].into_dyn(),
        epsilon = 1e-14
    );
}

#[test]
fn generic_use_through_any_distribution()
{
    let dists = vec![
        AnyDistribution::from(correlated()),
        AnyDistribution::from(Discrete::uniform(vec![vec![0., 1.], vec![0., 1.]], ["a", "b"]).unwrap()),
    ];
    for d in &dists {
        let r = d.reorder(&["b"]).unwrap();
        assert_eq!(r.variable_names(), &["b"]);
        assert_eq!(r.sample_n(3).shape(), &[3, 1]);
    }
    let gaussian = dists[0].cast::<Gaussian>().unwrap();
    assert!(gaussian.likelihood(&array![5., 3.]).is_ok());
    assert_eq!(dists[1].cast::<Gaussian>().unwrap_err().kind(), ErrorKind::Cast);
}
