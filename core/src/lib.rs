//! Accelerometer measurement synthesis for inertial navigation testing
//!
//! This crate synthesizes plausible accelerometer (specific force) measurements in a
//! sensor's body frame from a reference trajectory describing true motion and attitude,
//! plus an error-model profile describing a specific sensor's imperfections. It exists
//! to produce realistic test inputs for validating inertial navigation filters without
//! needing physical hardware data: the filters under test consume the synthesized
//! measurements exactly as they would consume logged IMU output. This crate does not
//! construct trajectories, does not simulate any sensor besides the accelerometer
//! triad, and performs no filtering or estimation of its own.
//!
//! This crate is primarily built off of three additional dependencies:
//! - [`nav-types`](https://crates.io/crates/nav-types): Provides basic coordinate types and conversions.
//! - [`nalgebra`](https://crates.io/crates/nalgebra): Provides the linear algebra tools.
//! - [`rand`](https://crates.io/crates/rand) and [`rand_distr`](https://crates.io/crates/rand_distr): Provides random number generation for the stochastic error models.
//!
//! All other functionality is built on top of these crates or is auxiliary
//! functionality (e.g. I/O). The primary reference text is _Principles of GNSS,
//! Inertial, and Multisensor Integrated Navigation Systems, 2nd Edition_ by Paul D.
//! Groves. Where applicable, calculations are referenced by the appropriate equation
//! number tied to the book. In general, variables are named according to the quantity
//! they represent and not the symbol used in the book; for example, the Earth's
//! equatorial radius is named `EQUATORIAL_RADIUS` instead of `a`.
//!
//! ## Crate overview
//!
//! This crate is organized into several modules:
//! - [earth]: Earth models (gravity, Earth rate, transport rate, Coriolis) and the
//!   geodetic-to-local-level plumbing used when only a position history is available.
//! - [trajectory]: The reference-trajectory data model and CSV loading.
//! - [smoothing]: The polynomial least-squares filter applied to differentiated
//!   velocity before it is accepted as acceleration truth.
//! - [profile]: The accelerometer error-model profile and its file formats.
//! - [noise]: The stochastic error generators (fixed bias, white noise, bias
//!   instability).
//! - [sim]: The measurement synthesis pipeline and its output container.
//!
//! ## Measurement model
//!
//! An ideal accelerometer senses specific force: the platform's kinematic acceleration
//! minus gravitational acceleration, resolved in the body frame. The synthesized
//! measurement combines the true specific force with the local gravity reaction, the
//! Coriolis correction, and three error terms:
//!
//! $$
//! \tilde{f}^b = f^b - C_n^b\\,a_{cor}^n + C_n^b\\,g^n + w + b_0 + b_d
//! $$
//!
//! where $C_n^b$ is the transpose of the per-epoch body-to-NED attitude, $a_{cor}^n =
//! (2\omega_{ie}^n + \omega_{en}^n) \times v^n$ is the Coriolis acceleration, $g^n$ is
//! the sensed gravity reaction $(0, 0, -g)$, $w$ is white noise, $b_0$ is the constant
//! turn-on bias, and $b_d$ is the slowly-varying bias instability. The true specific
//! force $f^b$ comes from the trajectory directly when recorded, or is derived by
//! differentiating the velocity (or position) history, smoothing, and rotating into
//! the body frame.
//!
//! ## Reproducibility
//!
//! All random draws for one invocation come from a single caller-supplied
//! [`rand::rngs::StdRng`]. Runs with the same trajectory, profile, and seed produce
//! identical measurements; independent invocations share no state.

pub mod earth;
pub mod noise;
pub mod profile;
pub mod sim;
pub mod smoothing;
pub mod trajectory;

pub use profile::AccelErrorProfile;
pub use sim::{AccelSource, SimulatedAccel, simulate_accelerometer};
pub use trajectory::{ReferenceTrajectory, TrajectoryRecord};

/// Enum for characterizing the performance quality of an accelerometer triad as it
/// relates to the INS system it would be implemented on. This enum provides some
/// default error profiles.
///
/// Benchmarks for typical IMU grades are shown below. While these are not strict
/// definitions, the power-law distribution and order of magnitude is typical for the
/// associated application. [1]
///
/// | IMU Grade  | Accel Bias Instability (m/s^2) | Accel VRW (m/s/√h) | Typical Tech    |
/// |------------|--------------------------------|--------------------|-----------------|
/// | Consumer   | >0.1                           | >0.1               | Low-cost MEMS   |
/// | Industrial | 0.01-0.1                       | 0.03-0.1           | High-end MEMS   |
/// | Tactical   | 0.001-0.01                     | 0.01-0.03          | High-MEMS / FOG |
/// | Navigation | 0.0001-0.001                   | 0.005-0.01         | FOG / RLG       |
/// | Strategic  | <0.0001                        | <0.0001            | High-end RLG    |
///
/// # References
/// - [1] https://www.advancednavigation.com/tech-articles/mems-vs-fog-what-inertial-system-should-you-choose/
/// - [2] Principles of GNSS, Inertial, and Multisensor Navigation Systems. Chapter 4.4.1, Paul D. Groves, 2nd Edition. Table 4.1
#[derive(Clone, Copy, Debug, Default)]
pub enum AccelQuality {
    #[default]
    /// Consumer-grade triads are typically low cost MEMS sensors found in consumer electronics (e.g. smartphones), wearables, and basic drones
    Consumer,
    /// Industrial-grade triads are higher-end MEMS sensors found in automotive, robotics, and commercial drones
    Industrial,
    /// Tactical-grade triads are typically paired with Fiber-Optic Gyroscopes (FOGs) in military and high-performance applications
    Tactical,
    /// Extremely accurate and stable for long-term use in aircraft, ships, and submarines
    Navigation,
    /// Strategic or survey grade offer exceptional precision for geodetic and survey applications as well as ballistic missiles or nuclear submarines
    Strategic,
}

impl AccelQuality {
    /// Typical accelerometer bias instability in m/s^2 for the given quality
    pub fn bias_instability_mps2(&self) -> f64 {
        match self {
            AccelQuality::Consumer => 0.1,
            AccelQuality::Industrial => 0.05,
            AccelQuality::Tactical => 0.001,
            AccelQuality::Navigation => 0.0001,
            AccelQuality::Strategic => 0.00001,
        }
    }
    /// Typical accelerometer velocity random walk in m/s/√h for the given quality
    pub fn velocity_random_walk(&self) -> f64 {
        match self {
            AccelQuality::Consumer => 0.1,
            AccelQuality::Industrial => 0.03,
            AccelQuality::Tactical => 0.01,
            AccelQuality::Navigation => 0.005,
            AccelQuality::Strategic => 0.0001,
        }
    }
    /// Typical white noise standard deviation in m/s^2 at the given sampling rate
    ///
    /// The velocity random walk is a rate density; the per-sample standard deviation
    /// scales with the square root of the sampling frequency.
    pub fn white_noise_std(&self, sample_freq: f64) -> f64 {
        self.velocity_random_walk() / 60.0 * sample_freq.sqrt()
    }
    /// A representative error profile for this quality grade at the given sampling rate
    ///
    /// Turn-on bias is bounded at ten times the in-run instability and the bias
    /// instability is modeled as a Gauss-Markov process with a one-hour correlation
    /// time, both representative rather than definitional.
    pub fn error_profile(&self, sample_freq: f64) -> AccelErrorProfile {
        AccelErrorProfile {
            sample_freq,
            white_noise_std: [self.white_noise_std(sample_freq); 3],
            fixed_bias_bound: [10.0 * self.bias_instability_mps2(); 3],
            bias_corr_time: [3600.0; 3],
            bias_drift_std: [self.bias_instability_mps2(); 3],
            ..Default::default()
        }
    }
}
