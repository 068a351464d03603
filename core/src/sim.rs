//! Accelerometer measurement synthesis pipeline.
//!
//! This module chains the four stages of the simulation:
//!
//! 1. Resolve the true body-frame specific force from whichever trajectory fields are
//!    available ([`AccelSource`]).
//! 2. Compute per-epoch gravity and Coriolis vectors in the NED frame and rotate them
//!    into the body frame with the per-epoch attitude.
//! 3. Synthesize the stochastic error components (see [`crate::noise`]).
//! 4. Combine everything into the simulated measurement sequence.
//!
//! Stages 1 and 2 are independent of each other, stage 3 is independent of both, and
//! stage 4 sums their outputs. The per-epoch frame rotations of stage 2 have no
//! cross-epoch coupling and run in parallel; the Gauss-Markov recursion of stage 3 is
//! inherently sequential per axis and is expressed as an explicit scan.
//!
//! The simulated measurement is
//!
//! $$ \tilde{f}^b = f^b_{true} - C^{b}_{n} a^n_{cor} + C^{b}_{n} g^n
//!    + w + b_0 + b_d $$
//!
//! where $C^b_n$ is the transpose of the stored body-to-NED attitude, $a^n_{cor}$ the
//! Coriolis acceleration, $g^n$ the sensed gravity reaction, $w$ the white noise,
//! $b_0$ the fixed bias, and $b_d$ the bias-instability process.

use log::debug;
use nalgebra::{Rotation3, Vector3};
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::earth;
use crate::noise;
use crate::profile::AccelErrorProfile;
use crate::smoothing;
use crate::trajectory::ReferenceTrajectory;

/// Strategy for obtaining the true body-frame specific force.
///
/// Selected once per invocation from the fields the trajectory provides, in priority
/// order: recorded specific force, recorded velocity, position-only. The closed set of
/// variants keeps the dispatch explicit; there is no runtime probing beyond this single
/// selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccelSource {
    /// The trajectory records the true specific force; use it unchanged.
    Direct,
    /// Differentiate the recorded NED velocity, smooth, and rotate into the body frame.
    VelocityDerived,
    /// Derive NED velocity from the geodetic position history first, then proceed as
    /// in the velocity-derived branch.
    PositionDerived,
}

impl AccelSource {
    /// Pick the resolver branch for a trajectory.
    pub fn select(trajectory: &ReferenceTrajectory) -> AccelSource {
        if trajectory.specific_force.is_some() {
            AccelSource::Direct
        } else if trajectory.velocity.is_some() {
            AccelSource::VelocityDerived
        } else {
            AccelSource::PositionDerived
        }
    }
}

/// A simulated accelerometer measurement sequence.
///
/// One body-frame specific-force vector per trajectory epoch, aligned with the input
/// time base. Purely a computed artifact: nothing is persisted unless the caller
/// exports it.
#[derive(Clone, Debug)]
pub struct SimulatedAccel {
    /// Elapsed seconds per epoch, copied from the trajectory.
    pub time: Vec<f64>,
    /// Simulated body-frame specific force in m/s^2, one per epoch.
    pub specific_force: Vec<Vector3<f64>>,
    /// The resolver branch the run used.
    pub source: AccelSource,
}

impl SimulatedAccel {
    /// Number of epochs.
    pub fn len(&self) -> usize {
        self.specific_force.len()
    }

    /// True when the sequence holds no epochs.
    pub fn is_empty(&self) -> bool {
        self.specific_force.is_empty()
    }

    /// Writes the simulated measurements to a CSV file.
    pub fn to_csv<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::io::Write;
        let mut file = std::fs::File::create(path)?;
        writeln!(file, "time_s,accel_x_mps2,accel_y_mps2,accel_z_mps2")?;
        for (t, f) in self.time.iter().zip(self.specific_force.iter()) {
            writeln!(file, "{:.6},{:.9},{:.9},{:.9}", t, f[0], f[1], f[2])?;
        }
        Ok(())
    }
}

/// Rotate a NED vector into the body frame with the stored body-to-NED attitude.
#[inline]
fn body_from_ned(attitude: &Rotation3<f64>, ned: &Vector3<f64>) -> Vector3<f64> {
    attitude.transpose() * ned
}

/// Raw NED acceleration by first-differencing a velocity sequence.
///
/// One difference per axis over the elapsed time between consecutive epochs, with a
/// zero vector prepended so the result has one row per epoch (first-epoch acceleration
/// is defined as zero).
fn finite_difference_acceleration(
    time: &[f64],
    velocity: &[Vector3<f64>],
) -> Result<Vec<Vector3<f64>>, Box<dyn std::error::Error>> {
    if velocity.len() < 2 {
        return Err(format!(
            "deriving acceleration requires at least two epochs, got {}",
            velocity.len()
        )
        .into());
    }
    let mut acceleration = Vec::with_capacity(velocity.len());
    acceleration.push(Vector3::zeros());
    for i in 1..velocity.len() {
        let dt = time[i] - time[i - 1];
        acceleration.push((velocity[i] - velocity[i - 1]) / dt);
    }
    Ok(acceleration)
}

/// Smooth each axis of a vector sequence with the polynomial filter.
fn smooth_axes(raw: &[Vector3<f64>]) -> Result<Vec<Vector3<f64>>, Box<dyn std::error::Error>> {
    let mut smoothed = vec![Vector3::zeros(); raw.len()];
    for axis in 0..3 {
        let samples: Vec<f64> = raw.iter().map(|v| v[axis]).collect();
        let filtered = smoothing::smooth(
            &samples,
            smoothing::DEFAULT_WINDOW,
            smoothing::DEFAULT_DEGREE,
        )?;
        for (row, value) in smoothed.iter_mut().zip(filtered) {
            row[axis] = value;
        }
    }
    Ok(smoothed)
}

/// Differentiate, smooth, and rotate a NED velocity history into body-frame
/// acceleration (the shared tail of the velocity- and position-derived branches).
fn acceleration_from_velocity(
    trajectory: &ReferenceTrajectory,
    velocity: &[Vector3<f64>],
) -> Result<Vec<Vector3<f64>>, Box<dyn std::error::Error>> {
    let raw = finite_difference_acceleration(&trajectory.time, velocity)?;
    let smoothed = smooth_axes(&raw)?;
    Ok(smoothed
        .iter()
        .zip(trajectory.attitude.iter())
        .map(|(a, att)| body_from_ned(att, a))
        .collect())
}

/// Resolve the true body-frame specific force and the NED velocity history the
/// Coriolis model should see.
///
/// The velocity is the recorded one when present, the position-derived one in the
/// position branch, and absent in the direct branch without recorded velocity (in
/// which case the Coriolis contribution is zero).
#[allow(clippy::type_complexity)]
fn resolve_true_acceleration(
    trajectory: &ReferenceTrajectory,
) -> Result<(AccelSource, Vec<Vector3<f64>>, Option<Vec<Vector3<f64>>>), Box<dyn std::error::Error>>
{
    if let Some(truth) = &trajectory.specific_force {
        Ok((
            AccelSource::Direct,
            truth.clone(),
            trajectory.velocity.clone(),
        ))
    } else if let Some(velocity) = &trajectory.velocity {
        let truth = acceleration_from_velocity(trajectory, velocity)?;
        Ok((AccelSource::VelocityDerived, truth, Some(velocity.clone())))
    } else {
        let velocity = earth::ned_velocities(
            &trajectory.time,
            &trajectory.latitude,
            &trajectory.longitude,
            &trajectory.height,
        )?;
        let truth = acceleration_from_velocity(trajectory, &velocity)?;
        Ok((AccelSource::PositionDerived, truth, Some(velocity)))
    }
}

/// Per-epoch gravity and Coriolis vectors rotated into the body frame.
///
/// Pure function of the per-epoch scalars and attitude; epochs are independent, so the
/// map runs in parallel.
fn gravity_coriolis_body(
    trajectory: &ReferenceTrajectory,
    velocity: Option<&[Vector3<f64>]>,
) -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>) {
    (0..trajectory.len())
        .into_par_iter()
        .map(|i| {
            let latitude = trajectory.latitude[i];
            let height = trajectory.height[i];
            let attitude = &trajectory.attitude[i];
            let gravity = body_from_ned(attitude, &earth::gravity_ned(latitude, height));
            let coriolis = match velocity {
                Some(v) => {
                    body_from_ned(attitude, &earth::coriolis_ned(latitude, height, &v[i]))
                }
                None => Vector3::zeros(),
            };
            (gravity, coriolis)
        })
        .unzip()
}

/// Synthesize a simulated accelerometer measurement sequence.
///
/// The public entry point of the crate: validates the inputs, resolves the true
/// specific force, applies the gravity and Coriolis corrections, and adds the
/// stochastic error components. Every random draw comes from the caller's generator,
/// so a fixed seed reproduces the run exactly and concurrent invocations with separate
/// generators do not interfere. Either the full sequence is produced or the call fails
/// before any output exists; there are no partial results.
///
/// # Example
/// ```rust
/// use accelsim::profile::AccelErrorProfile;
/// use accelsim::sim::simulate_accelerometer;
/// use accelsim::trajectory::ReferenceTrajectory;
/// use nalgebra::{Rotation3, Vector3};
/// use rand::SeedableRng;
///
/// let n = 100;
/// let trajectory = ReferenceTrajectory {
///     time: (0..n).map(|i| i as f64 * 0.01).collect(),
///     latitude: vec![0.7; n],
///     longitude: vec![-1.3; n],
///     height: vec![100.0; n],
///     velocity: Some(vec![Vector3::new(5.0, 0.0, 0.0); n]),
///     specific_force: None,
///     attitude: vec![Rotation3::identity(); n],
/// };
/// let profile = AccelErrorProfile { sample_freq: 100.0, ..Default::default() };
/// let mut rng = rand::rngs::StdRng::seed_from_u64(profile.seed);
/// let simulated = simulate_accelerometer(&trajectory, &profile, &mut rng).unwrap();
/// assert_eq!(simulated.len(), n);
/// ```
pub fn simulate_accelerometer(
    trajectory: &ReferenceTrajectory,
    profile: &AccelErrorProfile,
    rng: &mut StdRng,
) -> Result<SimulatedAccel, Box<dyn std::error::Error>> {
    trajectory.validate()?;
    profile.validate()?;
    let n = trajectory.len();
    debug!("simulating {n} accelerometer epochs");

    let (source, true_accel, velocity) = resolve_true_acceleration(trajectory)?;
    let (gravity_body, coriolis_body) = gravity_coriolis_body(trajectory, velocity.as_deref());

    let fixed_bias = noise::draw_fixed_bias(&profile.fixed_bias_bound, rng);
    let white = noise::white_noise_sequence(n, &profile.white_noise_std, rng)?;
    let drift = noise::bias_instability_sequence(n, profile, rng)?;

    let specific_force = (0..n)
        .map(|i| true_accel[i] - coriolis_body[i] + gravity_body[i] + white[i] + fixed_bias + drift[i])
        .collect();

    Ok(SimulatedAccel {
        time: trajectory.time.clone(),
        specific_force,
        source,
    })
}
