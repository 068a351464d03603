//! Accelerometer error-model profiles.
//!
//! A profile captures the imperfections of one accelerometer triad: per-axis white
//! noise, the bound of the constant turn-on bias, and the parameters of the
//! slowly-varying bias-instability process. Profiles are plain serde structs so
//! scenarios can be stored beside the data they were run against, with JSON, YAML, and
//! TOML supported and selected by file extension.
//!
//! ## Example
//!
//! ```
//! use accelsim::profile::AccelErrorProfile;
//!
//! // A consumer-grade-ish triad sampled at 100 Hz with a 1-hour correlation time.
//! let profile = AccelErrorProfile {
//!     sample_freq: 100.0,
//!     white_noise_std: [1e-2; 3],
//!     fixed_bias_bound: [5e-2; 3],
//!     bias_corr_time: [3600.0; 3],
//!     bias_drift_std: [1e-3; 3],
//!     seed: 42,
//! };
//! assert!(profile.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Default seed value for reproducible simulations
fn default_seed() -> u64 {
    42
}

/// Error-model profile for a three-axis accelerometer.
///
/// All per-axis arrays are indexed body x, y, z. The correlation time controls the
/// bias-instability branch per axis: a finite positive value selects the first-order
/// Gauss-Markov process with that time constant, while a non-positive (or non-finite)
/// value is the sentinel for "no correlation", in which case `bias_drift_std` is
/// applied directly as an independent per-sample standard deviation. The sentinel is
/// evaluated **per axis**, so profiles may mix correlated and uncorrelated axes.
///
/// ## Fields
///
/// - `sample_freq`: Sampling rate of the simulated sensor (Hz).
/// - `white_noise_std`: Per-axis standard deviation of the white measurement noise
///   (m/s²).
/// - `fixed_bias_bound`: Per-axis symmetric bound of the constant bias; one value is
///   drawn uniformly in `[-bound, +bound]` per axis per simulation run (m/s²).
/// - `bias_corr_time`: Per-axis Gauss-Markov correlation time (s), or the
///   "no correlation" sentinel described above. Infinity cannot be written in JSON or
///   TOML, which is why the sentinel is non-positive rather than non-finite only.
/// - `bias_drift_std`: Steady-state standard deviation of the correlated process, or
///   the direct per-sample standard deviation on uncorrelated axes (m/s²).
/// - `seed`: Seed for the run's random number generator, ensuring repeatable
///   realizations for debugging and A/B comparisons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccelErrorProfile {
    /// Sampling rate in Hz.
    pub sample_freq: f64,
    /// Per-axis white noise standard deviation (m/s²).
    #[serde(default)]
    pub white_noise_std: [f64; 3],
    /// Per-axis symmetric bound for the constant turn-on bias (m/s²).
    #[serde(default)]
    pub fixed_bias_bound: [f64; 3],
    /// Per-axis bias-instability correlation time (s); non-positive means uncorrelated.
    #[serde(default)]
    pub bias_corr_time: [f64; 3],
    /// Per-axis bias-instability standard deviation (m/s²).
    #[serde(default)]
    pub bias_drift_std: [f64; 3],
    /// Random number generator seed for deterministic simulations.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for AccelErrorProfile {
    /// An ideal, noiseless sensor at 100 Hz.
    fn default() -> Self {
        AccelErrorProfile {
            sample_freq: 100.0,
            white_noise_std: [0.0; 3],
            fixed_bias_bound: [0.0; 3],
            bias_corr_time: [0.0; 3],
            bias_drift_std: [0.0; 3],
            seed: default_seed(),
        }
    }
}

/// True when a correlation-time entry selects the Gauss-Markov branch.
pub fn correlated(corr_time: f64) -> bool {
    corr_time.is_finite() && corr_time > 0.0
}

impl AccelErrorProfile {
    /// Sample interval in seconds.
    pub fn dt(&self) -> f64 {
        1.0 / self.sample_freq
    }

    /// Check the profile before a simulation runs.
    ///
    /// The sampling rate must be positive and finite, and every noise magnitude
    /// non-negative and finite. Correlation times are exempt: any value is meaningful
    /// there (the sentinel included).
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if !self.sample_freq.is_finite() || self.sample_freq <= 0.0 {
            return Err(format!(
                "sample_freq must be positive and finite, got {}",
                self.sample_freq
            )
            .into());
        }
        let check = |name: &str, values: &[f64; 3]| -> Result<(), Box<dyn std::error::Error>> {
            for (axis, value) in values.iter().enumerate() {
                if !value.is_finite() || *value < 0.0 {
                    return Err(format!(
                        "{name}[{axis}] must be non-negative and finite, got {value}"
                    )
                    .into());
                }
            }
            Ok(())
        };
        check("white_noise_std", &self.white_noise_std)?;
        check("fixed_bias_bound", &self.fixed_bias_bound)?;
        check("bias_drift_std", &self.bias_drift_std)?;
        Ok(())
    }

    /// Write the profile to a JSON file (pretty-printed).
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(io::Error::other)
    }

    /// Read the profile from a JSON file.
    pub fn from_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(file).map_err(io::Error::other)
    }

    /// Write the profile as YAML.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        let s = serde_yaml::to_string(self).map_err(io::Error::other)?;
        file.write_all(s.as_bytes())
    }

    /// Read the profile from YAML.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        serde_yaml::from_reader(file).map_err(io::Error::other)
    }

    /// Write the profile as TOML.
    pub fn to_toml<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        let s = toml::to_string(self).map_err(io::Error::other)?;
        file.write_all(s.as_bytes())
    }

    /// Read the profile from TOML.
    pub fn from_toml<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut s = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut s)?;
        toml::from_str(&s).map_err(io::Error::other)
    }

    /// Generic write: choose format by file extension (.json/.yaml/.yml/.toml)
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let p = path.as_ref();
        let ext = p
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());
        match ext.as_deref() {
            Some("json") => self.to_json(p),
            Some("yaml") | Some("yml") => self.to_yaml(p),
            Some("toml") => self.to_toml(p),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "unsupported file extension",
            )),
        }
    }

    /// Generic read: choose format by file extension (.json/.yaml/.yml/.toml)
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let p = path.as_ref();
        let ext = p
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());
        match ext.as_deref() {
            Some("json") => Self::from_json(p),
            Some("yaml") | Some("yml") => Self::from_yaml(p),
            Some("toml") => Self::from_toml(p),
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "unsupported file extension",
            )),
        }
    }
}
