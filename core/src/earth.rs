//! Earth-related constants and functions
//!
//! This module contains the geophysical models the measurement synthesizer needs: the
//! WGS84 ellipsoid constants, the Somigliana gravity model, the Earth-rate and
//! transport-rate vectors, the Coriolis acceleration seen in the local-level frame, and
//! the differentiation chain that recovers local-level (NED) velocities from a geodetic
//! position history. Basic positional conversions lean on the
//! [`nav-types`](https://crates.io/crates/nav-types) crate (`WGS84` and `ECEF` types);
//! the rotations needed to project Cartesian Earth-fixed quantities into the local-level
//! frame are provided here since `nav-types` does not expose them.
//!
//! # Coordinate Systems
//! The WGS84 ellipsoidal model is the primary model used for the Earth's shape. The
//! local-level frame used throughout this crate is North-East-Down (NED): a right-handed
//! Cartesian frame tangent to the ellipsoid at the sensor's position, with the z-axis
//! pointing toward the ellipsoid. The body frame is a right-handed Cartesian frame fixed
//! to the sensor platform. All latitudes and longitudes in this module are **radians**,
//! matching the reference-trajectory data model; heights are meters above the ellipsoid.
//!
//! The primary reference text is _Principles of GNSS, Inertial, and Multisensor
//! Integrated Navigation Systems, 2nd Edition_ by Paul D. Groves; where applicable the
//! relevant equations are noted (e.g. the transport rate is Groves eq. 5.44).

use ::nalgebra::{Matrix3, Vector3};
use ::nav_types::{ECEF, WGS84};

// Earth constants (WGS84)
/// Earth's rotation rate rad/s ($\omega_{ie}$)
pub const RATE: f64 = 7.2921159e-5;
/// Earth's equitorial radius in meters
pub const EQUATORIAL_RADIUS: f64 = 6378137.0; // meters
/// Earth's polar radius in meters
pub const POLAR_RADIUS: f64 = 6356752.31425; // meters
/// Earth's eccentricity ($e$)
pub const ECCENTRICITY: f64 = 0.0818191908425; // unit-less
/// Earth's eccentricity squared ($e^2$)
pub const ECCENTRICITY_SQUARED: f64 = ECCENTRICITY * ECCENTRICITY;
/// Earth's gravitational acceleration at the equator ($g_e$) in $m/s^2$
pub const GE: f64 = 9.7803253359; // m/s^2, equatorial radius
/// Earth's gravitational acceleration at the poles ($g_p$) in $m/s^2$
pub const GP: f64 = 9.8321849378; // $m/s^2$, polar radius
/// Somigliana's constant ($K$)
pub const K: f64 = (POLAR_RADIUS * GP - EQUATORIAL_RADIUS * GE) / (EQUATORIAL_RADIUS * GE);

/// Calculate principal radii of curvature
///
/// The [principal radii of curvature](https://en.wikipedia.org/wiki/Earth_radius) are
/// used to convert between angular rates of the geodetic coordinates and linear
/// velocities in the local-level frame.
///
/// # Parameters
/// - `latitude` - The WGS84 latitude in radians
///
/// # Returns
/// A tuple `(r_n, r_e)` in meters where `r_n` is the meridian radius of curvature
/// (alternatively $R_N$ or _M_) and `r_e` is the radius of curvature in the prime
/// vertical (alternatively $R_E$ or _N_).
///
/// # Example
/// ```rust
/// use accelsim::earth;
/// let latitude: f64 = 45.0_f64.to_radians();
/// let (r_n, r_e) = earth::principal_radii(latitude);
/// assert!(r_n < r_e);
/// ```
pub fn principal_radii(latitude: f64) -> (f64, f64) {
    let sin_lat = latitude.sin();
    let sin_lat_sq = sin_lat * sin_lat;
    let r_n = (EQUATORIAL_RADIUS * (1.0 - ECCENTRICITY_SQUARED))
        / (1.0 - ECCENTRICITY_SQUARED * sin_lat_sq).powf(3.0 / 2.0);
    let r_e = EQUATORIAL_RADIUS / (1.0 - ECCENTRICITY_SQUARED * sin_lat_sq).sqrt();
    (r_n, r_e)
}

/// Calculate the WGS84 gravity scalar
///
/// The gravity magnitude is computed with the [Somigliana
/// method](https://en.wikipedia.org/wiki/Theoretical_gravity#Somigliana_equation) as a
/// function of latitude, with a free-air correction applied for height above the
/// ellipsoid.
///
/// # Parameters
/// - `latitude` - The WGS84 latitude in radians
/// - `height` - Height above the WGS84 ellipsoid in meters
///
/// # Returns
/// The gravitational acceleration magnitude in m/s^2
///
/// # Example
/// ```rust
/// use accelsim::earth;
/// let grav = earth::gravity(45.0_f64.to_radians(), 1000.0);
/// assert!(grav > 9.7 && grav < 9.9);
/// ```
pub fn gravity(latitude: f64, height: f64) -> f64 {
    let sin_lat = latitude.sin();
    let g0 = (GE * (1.0 + K * sin_lat * sin_lat))
        / (1.0 - ECCENTRICITY_SQUARED * sin_lat * sin_lat).sqrt();
    g0 - 3.08e-6 * height
}

/// Calculate the gravity contribution to sensed specific force in the NED frame
///
/// An accelerometer at rest does not sense gravitational acceleration; it senses the
/// support force opposing it. The gravity term that enters a simulated specific-force
/// measurement is therefore the *reaction* $(0, 0, -g)$ in NED: a stationary, level
/// triad reads $-g$ on its down axis. This is the vector the measurement combiner adds
/// to the true kinematic acceleration.
///
/// # Parameters
/// - `latitude` - The WGS84 latitude in radians
/// - `height` - Height above the WGS84 ellipsoid in meters
///
/// # Returns
/// The sensed gravity vector in m/s^2 in the NED frame
pub fn gravity_ned(latitude: f64, height: f64) -> Vector3<f64> {
    Vector3::new(0.0, 0.0, -gravity(latitude, height))
}

/// Calculate the Earth rotation rate vector in the NED frame
///
/// The Earth's rotation rate resolved in the local-level frame, used for the Coriolis
/// correction. Groves eq. 5.41.
///
/// # Parameters
/// - `latitude` - The WGS84 latitude in radians
///
/// # Returns
/// The Earth's rotation rate vector $\omega_{ie}^n$ in rad/s
pub fn earth_rate_ned(latitude: f64) -> Vector3<f64> {
    Vector3::new(RATE * latitude.cos(), 0.0, -RATE * latitude.sin())
}

/// Calculate the transport rate vector in the NED frame
///
/// The transport rate is the rotation of the local-level frame with respect to the
/// Earth-fixed frame caused by the vehicle moving over the curved ellipsoid surface.
/// Groves eq. 5.44.
///
/// # Parameters
/// - `latitude` - The WGS84 latitude in radians
/// - `height` - Height above the WGS84 ellipsoid in meters
/// - `velocity` - NED velocity vector in m/s
///
/// # Returns
/// The transport rate vector $\omega_{en}^n$ in rad/s
pub fn transport_rate(latitude: f64, height: f64, velocity: &Vector3<f64>) -> Vector3<f64> {
    let (r_n, r_e) = principal_radii(latitude);
    Vector3::new(
        velocity[1] / (r_e + height),
        -velocity[0] / (r_n + height),
        -velocity[1] * latitude.tan() / (r_e + height),
    )
}

/// Calculate the Coriolis acceleration in the NED frame
///
/// The apparent acceleration experienced by a platform moving over the rotating Earth,
/// $(2\omega_{ie}^n + \omega_{en}^n) \times v^n$: the Earth-rate term doubled for the
/// classic Coriolis effect plus the transport rate for the motion of the local-level
/// frame itself. This is the velocity-coupled correction term of the local-level
/// navigation velocity equation (Groves eq. 5.53), which the measurement combiner
/// subtracts from the true kinematic acceleration.
///
/// # Parameters
/// - `latitude` - The WGS84 latitude in radians
/// - `height` - Height above the WGS84 ellipsoid in meters
/// - `velocity` - NED velocity vector in m/s
///
/// # Returns
/// The Coriolis acceleration vector in m/s^2 in the NED frame
///
/// # Example
/// ```rust
/// use nalgebra::Vector3;
/// use accelsim::earth;
/// let velocity = Vector3::new(10.0, 0.0, 0.0);
/// let coriolis = earth::coriolis_ned(45.0_f64.to_radians(), 0.0, &velocity);
/// // The combiner subtracts this term, deflecting a northward track eastward.
/// assert!(coriolis[1] < 0.0);
/// ```
pub fn coriolis_ned(latitude: f64, height: f64, velocity: &Vector3<f64>) -> Vector3<f64> {
    let omega_ie = earth_rate_ned(latitude);
    let omega_en = transport_rate(latitude, height, velocity);
    (2.0 * omega_ie + omega_en).cross(velocity)
}

/// Coordinate rotation from the Earth-centered Earth-fixed (ECEF) frame to the NED frame
///
/// The local-level frame is defined by the tangent to the ellipsoidal surface at the
/// given latitude and longitude; this rotation projects Earth-fixed Cartesian vectors
/// (velocity deltas, position deltas) into it.
///
/// # Parameters
/// - `latitude` - The WGS84 latitude in radians
/// - `longitude` - The WGS84 longitude in radians
///
/// # Returns
/// The 3x3 rotation matrix $C_e^n$
pub fn ecef_to_ned(latitude: f64, longitude: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = (latitude.sin(), latitude.cos());
    let (sin_lon, cos_lon) = (longitude.sin(), longitude.cos());
    Matrix3::new(
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        -sin_lon,
        cos_lon,
        0.0,
        -cos_lat * cos_lon,
        -cos_lat * sin_lon,
        -sin_lat,
    )
}

/// Derive NED velocities from a geodetic position history
///
/// Recovers local-level velocities by first-differencing the position track through the
/// Earth-fixed frame: each geodetic sample (latitude, longitude, height) is converted to
/// ECEF Cartesian coordinates, consecutive samples are differenced and divided by the
/// elapsed time, and the Earth-fixed velocity is rotated into the NED frame at the later
/// epoch. The first epoch repeats the first computed difference so the result has one
/// velocity per input sample without introducing a spurious startup transient.
///
/// # Parameters
/// - `time` - Elapsed seconds per epoch, strictly increasing
/// - `latitude` - WGS84 latitudes in radians, one per epoch
/// - `longitude` - WGS84 longitudes in radians, one per epoch
/// - `height` - Heights above the ellipsoid in meters, one per epoch
///
/// # Returns
/// One NED velocity vector (m/s) per epoch, or an error if fewer than two epochs are
/// provided or the time base is not strictly increasing.
pub fn ned_velocities(
    time: &[f64],
    latitude: &[f64],
    longitude: &[f64],
    height: &[f64],
) -> Result<Vec<Vector3<f64>>, Box<dyn std::error::Error>> {
    let n = time.len();
    if n < 2 {
        return Err("deriving velocities from positions requires at least two epochs".into());
    }
    let ecef: Vec<Vector3<f64>> = (0..n)
        .map(|i| {
            let wgs84 = WGS84::from_radians_and_meters(latitude[i], longitude[i], height[i]);
            let p = ECEF::from(wgs84);
            Vector3::new(p.x(), p.y(), p.z())
        })
        .collect();
    let mut velocities = Vec::with_capacity(n);
    for i in 1..n {
        let dt = time[i] - time[i - 1];
        if dt <= 0.0 {
            return Err(format!(
                "trajectory time base must be strictly increasing (epoch {} to {}: dt = {})",
                i - 1,
                i,
                dt
            )
            .into());
        }
        let rot = ecef_to_ned(latitude[i], longitude[i]);
        velocities.push(rot * (ecef[i] - ecef[i - 1]) / dt);
    }
    let first = velocities[0];
    velocities.insert(0, first);
    Ok(velocities)
}

// === Unit tests ===
#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    #[test]
    fn gravity() {
        // test polar gravity
        let grav = super::gravity(90.0_f64.to_radians(), 0.0);
        assert_approx_eq!(grav, GP);
        // test equatorial gravity
        let grav = super::gravity(0.0, 0.0);
        assert_approx_eq!(grav, GE);
        // free-air correction reduces gravity with height
        assert!(super::gravity(0.0, 1000.0) < GE);
    }
    #[test]
    fn gravity_ned_points_up_in_sensed_frame() {
        let g = super::gravity_ned(45.0_f64.to_radians(), 0.0);
        assert_approx_eq!(g[0], 0.0);
        assert_approx_eq!(g[1], 0.0);
        assert!(g[2] < -9.7 && g[2] > -9.9);
    }
    #[test]
    fn earth_rate_ned() {
        let omega = super::earth_rate_ned(0.0);
        assert_approx_eq!(omega[0], RATE, 1e-12);
        assert_approx_eq!(omega[2], 0.0, 1e-12);
        let omega = super::earth_rate_ned(90.0_f64.to_radians());
        assert_approx_eq!(omega[0], 0.0, 1e-12);
        assert_approx_eq!(omega[2], -RATE, 1e-12);
    }
    #[test]
    fn transport_rate_eastward_motion() {
        // Pure eastward motion at the equator rotates the local frame about the
        // north axis only.
        let velocity = Vector3::new(0.0, 100.0, 0.0);
        let omega = super::transport_rate(0.0, 0.0, &velocity);
        assert!(omega[0] > 0.0);
        assert_approx_eq!(omega[1], 0.0, 1e-12);
        assert_approx_eq!(omega[2], 0.0, 1e-12);
    }
    #[test]
    fn coriolis_zero_for_zero_velocity() {
        let coriolis = super::coriolis_ned(45.0_f64.to_radians(), 100.0, &Vector3::zeros());
        assert_approx_eq!(coriolis.norm(), 0.0, 1e-15);
    }
    #[test]
    fn coriolis_magnitude_northward_motion() {
        // East component is -2 Ω sin(lat) v for pure northward motion.
        let lat = 45.0_f64.to_radians();
        let v = 100.0;
        let coriolis = super::coriolis_ned(lat, 0.0, &Vector3::new(v, 0.0, 0.0));
        let expected = -2.0 * RATE * lat.sin() * v;
        assert_approx_eq!(coriolis[1], expected, expected.abs() * 0.01);
    }
    #[test]
    fn ecef_to_ned_north_pole() {
        // At the north pole the NED down axis is the -z ECEF axis.
        let rot = super::ecef_to_ned(90.0_f64.to_radians(), 0.0);
        let down = rot * Vector3::new(0.0, 0.0, -1.0);
        assert_approx_eq!(down[2], 1.0, 1e-12);
    }
    #[test]
    fn ned_velocities_northward_track() {
        // Constant northward motion along a meridian: ~111 km per degree of latitude.
        let dlat = 1.0_f64.to_radians() / 111_000.0; // ~1 m steps
        let n = 10;
        let time: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let latitude: Vec<f64> = (0..n).map(|i| i as f64 * dlat).collect();
        let longitude = vec![0.0; n];
        let height = vec![0.0; n];
        let velocities = super::ned_velocities(&time, &latitude, &longitude, &height)
            .expect("velocity derivation failed");
        assert_eq!(velocities.len(), n);
        for v in &velocities {
            assert_approx_eq!(v[0], 1.0, 0.05);
            assert_approx_eq!(v[1], 0.0, 0.05);
            assert_approx_eq!(v[2], 0.0, 0.05);
        }
        // First epoch repeats the first difference.
        assert_approx_eq!(velocities[0][0], velocities[1][0], 1e-12);
    }
    #[test]
    fn ned_velocities_rejects_short_or_unsorted_input() {
        assert!(super::ned_velocities(&[0.0], &[0.0], &[0.0], &[0.0]).is_err());
        let result = super::ned_velocities(
            &[0.0, 2.0, 1.0],
            &[0.0, 1e-6, 2e-6],
            &[0.0; 3],
            &[0.0; 3],
        );
        assert!(result.is_err());
    }
}
