//! Stochastic error synthesis for the simulated accelerometer.
//!
//! Three independent error components are generated per simulation run, each as one
//! value per epoch per body axis:
//!
//! - **Fixed bias**: a constant offset, drawn once per axis uniformly within the
//!   profile's symmetric bound and held for the whole run.
//! - **White noise**: zero-mean Gaussian noise, independent across epochs and axes.
//! - **Bias instability**: a slowly-varying bias. On axes with a finite correlation
//!   time this is a first-order Gauss-Markov (exponentially correlated) process
//!
//!   $$ x_j = e^{-\beta} x_{j-1} + \sigma \sqrt{1 - e^{-2\beta}}\\, w_j, \qquad
//!      \beta = \Delta t / \tau $$
//!
//!   whose steady-state standard deviation is exactly the profile's drift sigma; on
//!   axes with the "no correlation" sentinel the drift sigma is applied directly as
//!   independent per-sample noise.
//!
//! Every draw comes from the single `StdRng` passed by the caller, so a fixed seed
//! reproduces the entire realization and independent invocations never share state.
//! With one generator the three axes are necessarily filled in a fixed order; the
//! Gauss-Markov recursion itself is a strictly sequential scan per axis, since each
//! value depends on its predecessor.

use nalgebra::Vector3;
use rand::Rng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::profile::{AccelErrorProfile, correlated};

/// Draw the constant turn-on bias for one run.
///
/// One uniform draw in `[-bound, +bound]` per axis; an axis with a zero bound gets a
/// zero bias without consuming a draw. Called once per invocation, never per epoch.
pub fn draw_fixed_bias(bound: &[f64; 3], rng: &mut StdRng) -> Vector3<f64> {
    Vector3::from_fn(|axis, _| {
        let b = bound[axis];
        if b > 0.0 { rng.random_range(-b..=b) } else { 0.0 }
    })
}

/// Generate the white measurement noise sequence.
///
/// Independent `N(0, sigma_axis)` samples for every epoch and axis.
pub fn white_noise_sequence(
    epochs: usize,
    std: &[f64; 3],
    rng: &mut StdRng,
) -> Result<Vec<Vector3<f64>>, Box<dyn std::error::Error>> {
    let normals = [
        Normal::new(0.0, std[0])?,
        Normal::new(0.0, std[1])?,
        Normal::new(0.0, std[2])?,
    ];
    Ok((0..epochs)
        .map(|_| {
            Vector3::new(
                normals[0].sample(rng),
                normals[1].sample(rng),
                normals[2].sample(rng),
            )
        })
        .collect())
}

/// Generate the bias-instability sequence.
///
/// The branch is selected **per axis** from the profile's correlation time: finite and
/// positive runs the Gauss-Markov recursion (zero initial state, so the first epoch
/// carries no instability error); the sentinel produces independent per-sample noise
/// scaled by the drift sigma. Axes are mutually independent but share the run's
/// generator, so they are filled in x, y, z order for reproducibility.
pub fn bias_instability_sequence(
    epochs: usize,
    profile: &AccelErrorProfile,
    rng: &mut StdRng,
) -> Result<Vec<Vector3<f64>>, Box<dyn std::error::Error>> {
    let dt = profile.dt();
    let mut sequence = vec![Vector3::zeros(); epochs];
    for axis in 0..3 {
        let sigma = profile.bias_drift_std[axis];
        let tau = profile.bias_corr_time[axis];
        if correlated(tau) {
            let beta = dt / tau;
            let a1 = (-beta).exp();
            let a2 = sigma * (1.0 - (-2.0 * beta).exp()).sqrt();
            let innovation = Normal::new(0.0, 1.0)?;
            let mut state = 0.0;
            for row in sequence.iter_mut().skip(1) {
                state = a1 * state + a2 * innovation.sample(rng);
                row[axis] = state;
            }
        } else {
            let direct = Normal::new(0.0, sigma)?;
            for row in sequence.iter_mut() {
                row[axis] = direct.sample(rng);
            }
        }
    }
    Ok(sequence)
}
