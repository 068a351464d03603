//! Reference trajectory data model and CSV loading.
//!
//! This module provides:
//! - `ReferenceTrajectory`: the struct-of-arrays truth record the simulator consumes
//! - `TrajectoryRecord`: a single CSV row of trajectory data, for reading recorded or
//!   generated trajectories from disk
//! - The pinned reshape convention for flattened per-epoch attitude rows
//!
//! Trajectory construction itself (position/velocity/attitude generation) is out of
//! scope; this crate only consumes the result.

use chrono::DateTime;
use nalgebra::{Matrix3, Rotation3, Vector3};
use serde::{Deserialize, Serialize};

/// Truth record describing the motion and attitude of the platform over time.
///
/// Latitude and longitude are stored in radians and heights in meters above the WGS84
/// ellipsoid. Velocities are NED, specific force is body-frame, and `attitude` holds
/// the body-to-NED rotation $C_b^n$ per epoch. `velocity` and `specific_force` are
/// optional; which one is present (if any) determines how the simulator resolves the
/// true acceleration.
#[derive(Clone, Debug)]
pub struct ReferenceTrajectory {
    /// Elapsed seconds per epoch, strictly increasing
    pub time: Vec<f64>,
    /// WGS84 latitude in radians, one per epoch
    pub latitude: Vec<f64>,
    /// WGS84 longitude in radians, one per epoch
    pub longitude: Vec<f64>,
    /// Height above the WGS84 ellipsoid in meters, one per epoch
    pub height: Vec<f64>,
    /// NED velocity in m/s, one per epoch, if recorded
    pub velocity: Option<Vec<Vector3<f64>>>,
    /// True body-frame specific force in m/s^2, one per epoch, if recorded
    pub specific_force: Option<Vec<Vector3<f64>>>,
    /// Body-to-NED rotation per epoch
    pub attitude: Vec<Rotation3<f64>>,
}

/// Reinterpret a flattened 9-element attitude row as the body-to-NED matrix.
///
/// The row is read **row-major**: elements `[0..3]` are the first row of $C_b^n$,
/// `[3..6]` the second, `[6..9]` the third. Multiplying the result by a body-frame
/// vector yields its NED projection; the transpose projects NED vectors into the body
/// frame. This convention is fixed by `tests::dcm_row_convention`.
pub fn dcm_from_row(row: &[f64; 9]) -> Rotation3<f64> {
    Rotation3::from_matrix_unchecked(Matrix3::new(
        row[0], row[1], row[2], row[3], row[4], row[5], row[6], row[7], row[8],
    ))
}

impl ReferenceTrajectory {
    /// Number of epochs.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when the trajectory holds no epochs.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Check the shape invariants before any computation runs.
    ///
    /// Every per-epoch array must have exactly as many rows as `time`, and the time
    /// base must be strictly increasing. Non-finite numeric values are deliberately
    /// not screened here; they propagate through the computation unchanged.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let n = self.time.len();
        if n == 0 {
            return Err("reference trajectory has no epochs".into());
        }
        let check = |name: &str, len: usize| -> Result<(), Box<dyn std::error::Error>> {
            if len != n {
                return Err(format!(
                    "reference trajectory field `{name}` has {len} rows, expected {n}"
                )
                .into());
            }
            Ok(())
        };
        check("latitude", self.latitude.len())?;
        check("longitude", self.longitude.len())?;
        check("height", self.height.len())?;
        check("attitude", self.attitude.len())?;
        if let Some(velocity) = &self.velocity {
            check("velocity", velocity.len())?;
        }
        if let Some(specific_force) = &self.specific_force {
            check("specific_force", specific_force.len())?;
        }
        for i in 1..n {
            if self.time[i] <= self.time[i - 1] {
                return Err(format!(
                    "trajectory time base must be strictly increasing (epoch {} to {}: {} -> {})",
                    i - 1,
                    i,
                    self.time[i - 1],
                    self.time[i]
                )
                .into());
            }
        }
        Ok(())
    }

    /// Build a trajectory from CSV rows.
    ///
    /// Latitudes and longitudes are converted from degrees to radians and attitude is
    /// assembled from the per-row Euler angles. The optional velocity and
    /// specific-force columns must be populated for every row or for none; a partially
    /// filled column is reported as an error rather than guessed at.
    pub fn from_records(
        records: &[TrajectoryRecord],
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if records.is_empty() {
            return Err("trajectory file contains no records".into());
        }
        let time = elapsed_seconds(records)?;
        let latitude = records.iter().map(|r| r.latitude.to_radians()).collect();
        let longitude = records.iter().map(|r| r.longitude.to_radians()).collect();
        let height = records.iter().map(|r| r.altitude).collect();
        let attitude = records
            .iter()
            .map(|r| Rotation3::from_euler_angles(r.roll, r.pitch, r.yaw))
            .collect();

        let velocity = optional_columns(
            records,
            "velocity",
            |r| [r.vel_north, r.vel_east, r.vel_down],
        )?;
        let specific_force =
            optional_columns(records, "specific force", |r| [r.sf_x, r.sf_y, r.sf_z])?;

        let trajectory = ReferenceTrajectory {
            time,
            latitude,
            longitude,
            height,
            velocity,
            specific_force,
            attitude,
        };
        trajectory.validate()?;
        Ok(trajectory)
    }

    /// Read a trajectory from a CSV file.
    pub fn from_csv<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_records(&TrajectoryRecord::from_csv(path)?)
    }
}

/// Gather an optional three-column vector field, enforcing all-or-nothing presence.
fn optional_columns(
    records: &[TrajectoryRecord],
    name: &str,
    extract: impl Fn(&TrajectoryRecord) -> [Option<f64>; 3],
) -> Result<Option<Vec<Vector3<f64>>>, Box<dyn std::error::Error>> {
    let mut vectors = Vec::with_capacity(records.len());
    let mut present = 0usize;
    for record in records {
        match extract(record) {
            [Some(x), Some(y), Some(z)] => {
                present += 1;
                vectors.push(Vector3::new(x, y, z));
            }
            [None, None, None] => {}
            _ => {
                return Err(format!(
                    "{name} columns are only partially populated within a record; \
                     fill all three components or leave all three empty"
                )
                .into());
            }
        }
    }
    if present == 0 {
        Ok(None)
    } else if present == records.len() {
        Ok(Some(vectors))
    } else {
        Err(format!(
            "{name} columns are populated for {present} of {} records; \
             fill them for every record or leave them empty",
            records.len()
        )
        .into())
    }
}

/// Normalize record timestamps to elapsed seconds from the first sample.
///
/// Two timestamp styles are accepted: plain seconds (any float) or date-time strings
/// in the `YYYY-MM-DD hh:mm:ss+offset` form produced by common logging apps. A mix of
/// the two is rejected.
fn elapsed_seconds(records: &[TrajectoryRecord]) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let as_seconds: Option<Vec<f64>> = records
        .iter()
        .map(|r| r.time.trim().parse::<f64>().ok())
        .collect();
    if let Some(seconds) = as_seconds {
        return Ok(seconds);
    }
    let format = "%Y-%m-%d %H:%M:%S%z";
    let mut elapsed = Vec::with_capacity(records.len());
    let start = DateTime::parse_from_str(&records[0].time, format)
        .map_err(|e| format!("cannot parse trajectory timestamp `{}`: {e}", records[0].time))?;
    for record in records {
        let stamp = DateTime::parse_from_str(&record.time, format)
            .map_err(|e| format!("cannot parse trajectory timestamp `{}`: {e}", record.time))?;
        elapsed.push((stamp - start).num_milliseconds() as f64 / 1000.0);
    }
    Ok(elapsed)
}

/// Struct representing a single row of trajectory data from a CSV file.
///
/// Angles follow the conventions of recorded test data: latitude and longitude in
/// degrees, attitude as roll/pitch/yaw Euler angles in radians. Velocity and
/// specific-force columns may be left empty when the trajectory does not carry them.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TrajectoryRecord {
    /// Elapsed seconds, or a date-time string: YYYY-MM-DD hh:mm:ss+UTCTZ
    pub time: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Height above the ellipsoid in meters
    pub altitude: f64,
    /// Roll angle in radians
    pub roll: f64,
    /// Pitch angle in radians
    pub pitch: f64,
    /// Yaw angle in radians
    pub yaw: f64,
    /// Northward velocity in m/s
    #[serde(default)]
    pub vel_north: Option<f64>,
    /// Eastward velocity in m/s
    #[serde(default)]
    pub vel_east: Option<f64>,
    /// Downward velocity in m/s
    #[serde(default)]
    pub vel_down: Option<f64>,
    /// True body-frame specific force, x axis, in m/s^2
    #[serde(default)]
    pub sf_x: Option<f64>,
    /// True body-frame specific force, y axis, in m/s^2
    #[serde(default)]
    pub sf_y: Option<f64>,
    /// True body-frame specific force, z axis, in m/s^2
    #[serde(default)]
    pub sf_z: Option<f64>,
}

impl TrajectoryRecord {
    /// Reads a CSV file and returns a vector of `TrajectoryRecord` structs.
    pub fn from_csv<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Vec<Self>, Box<dyn std::error::Error>> {
        let mut rdr = csv::Reader::from_path(path)?;
        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: Self = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Writes a vector of TrajectoryRecord structs to a CSV file.
    pub fn to_csv<P: AsRef<std::path::Path>>(
        records: &[Self],
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut writer = csv::Writer::from_path(path)?;
        for record in records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn record(time: &str, lat_deg: f64) -> TrajectoryRecord {
        TrajectoryRecord {
            time: time.to_string(),
            latitude: lat_deg,
            longitude: -75.0,
            altitude: 100.0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            vel_north: None,
            vel_east: None,
            vel_down: None,
            sf_x: None,
            sf_y: None,
            sf_z: None,
        }
    }

    /// A +90 degree yaw stored row-major: body x maps to NED east, and the transpose
    /// brings east back onto body x. This fixes the flattened-row orientation.
    #[test]
    fn dcm_row_convention() {
        let row = [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        let c_b_n = dcm_from_row(&row);
        let nav = c_b_n * Vector3::x();
        assert_approx_eq!(nav[0], 0.0, 1e-12);
        assert_approx_eq!(nav[1], 1.0, 1e-12);
        assert_approx_eq!(nav[2], 0.0, 1e-12);
        let body = c_b_n.transpose() * Vector3::new(0.0, 1.0, 0.0);
        assert_approx_eq!(body[0], 1.0, 1e-12);
        assert_approx_eq!(body[1], 0.0, 1e-12);
        // Same convention as the euler construction used for CSV rows.
        let euler = Rotation3::from_euler_angles(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        assert!((euler.matrix() - c_b_n.matrix()).norm() < 1e-12);
    }

    #[test]
    fn from_records_converts_degrees() {
        let records = vec![record("0.0", 40.0), record("1.0", 40.001)];
        let trajectory = ReferenceTrajectory::from_records(&records).expect("build failed");
        assert_eq!(trajectory.len(), 2);
        assert_approx_eq!(trajectory.latitude[0], 40.0_f64.to_radians(), 1e-12);
        assert_approx_eq!(trajectory.longitude[0], (-75.0_f64).to_radians(), 1e-12);
        assert!(trajectory.velocity.is_none());
        assert!(trajectory.specific_force.is_none());
    }

    #[test]
    fn elapsed_seconds_from_datetime_strings() {
        let records = vec![
            record("2023-08-04 21:47:58+00:00", 40.0),
            record("2023-08-04 21:47:59+00:00", 40.0),
            record("2023-08-04 21:48:01+00:00", 40.0),
        ];
        let elapsed = elapsed_seconds(&records).expect("parse failed");
        assert_approx_eq!(elapsed[0], 0.0, 1e-9);
        assert_approx_eq!(elapsed[1], 1.0, 1e-9);
        assert_approx_eq!(elapsed[2], 3.0, 1e-9);
    }

    #[test]
    fn elapsed_seconds_rejects_garbage() {
        let records = vec![record("yesterday-ish", 40.0)];
        assert!(elapsed_seconds(&records).is_err());
    }

    #[test]
    fn partial_velocity_columns_rejected() {
        let mut records = vec![record("0.0", 40.0), record("1.0", 40.0)];
        records[0].vel_north = Some(1.0);
        records[0].vel_east = Some(0.0);
        records[0].vel_down = Some(0.0);
        assert!(ReferenceTrajectory::from_records(&records).is_err());
    }

    #[test]
    fn validate_catches_row_count_mismatch() {
        let records = vec![record("0.0", 40.0), record("1.0", 40.0)];
        let mut trajectory = ReferenceTrajectory::from_records(&records).expect("build failed");
        trajectory.height.pop();
        assert!(trajectory.validate().is_err());
    }

    #[test]
    fn validate_catches_unsorted_time() {
        let records = vec![record("0.0", 40.0), record("1.0", 40.0)];
        let mut trajectory = ReferenceTrajectory::from_records(&records).expect("build failed");
        trajectory.time = vec![1.0, 1.0];
        assert!(trajectory.validate().is_err());
    }
}
