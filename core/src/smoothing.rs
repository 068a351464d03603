//! Polynomial least-squares (Savitzky-Golay) smoothing.
//!
//! Public API:
//!     pub fn smooth(samples: &[f64], window: usize, degree: usize) -> Result<Vec<f64>, ...>
//!     pub fn effective_window(n: usize, window: usize) -> usize
//!
//! Internal pipeline (each step isolated for testing):
//!     - projection_matrix()
//!
//! Strategy:
//! 1) Build the centered polynomial basis A (window x degree+1), abscissa normalized
//!    to [-1, 1] for conditioning (the projection is invariant to column scaling)
//! 2) B = A * pinv(A) via SVD, the least-squares projection onto the polynomial space
//! 3) Interior samples use the center row of B over a sliding window; the first and
//!    last half-windows use the leading/trailing rows of B over the end windows, so the
//!    output has the same length as the input with no artificial padding
//!
//! Raw finite-difference acceleration is dominated by quantization of the velocity
//! track; fitting a local polynomial recovers the underlying smooth signal while
//! reproducing any polynomial of the filter degree exactly.

use log::warn;
use nalgebra::DMatrix;

/// Smoothing window applied to derived acceleration (samples, odd).
pub const DEFAULT_WINDOW: usize = 45;
/// Polynomial degree of the smoothing fit.
pub const DEFAULT_DEGREE: usize = 10;

/// Largest usable odd window no longer than the record.
///
/// Short records cannot support the full window; the filter degrades to the widest odd
/// window that fits rather than refusing the record (a window of 1 is the identity
/// filter). Callers are expected to warn when the window shrinks; see [`smooth`].
pub fn effective_window(n: usize, window: usize) -> usize {
    let w = window.min(n);
    if w % 2 == 0 { w.saturating_sub(1).max(1) } else { w }
}

/// Least-squares projection matrix B (window x window) for a polynomial of the given
/// degree over a centered window.
///
/// Row `i` of B gives the weights that evaluate the windowed fit at offset `i`; the
/// center row is the steady-state smoothing kernel, the outer rows handle the ends of
/// the record.
fn projection_matrix(window: usize, degree: usize) -> Result<DMatrix<f64>, Box<dyn std::error::Error>> {
    let half = (window / 2) as f64;
    let scale = if half > 0.0 { half } else { 1.0 };
    let basis = DMatrix::from_fn(window, degree + 1, |row, col| {
        ((row as f64 - half) / scale).powi(col as i32)
    });
    let pinv = basis
        .clone()
        .svd(true, true)
        .pseudo_inverse(1e-12)
        .map_err(|e| format!("smoothing basis pseudo-inverse failed: {e}"))?;
    Ok(&basis * &pinv)
}

/// Smooth a scalar sample sequence with a least-squares polynomial filter.
///
/// Equivalent to the classic Savitzky-Golay filter: each output sample is the value at
/// that position of the best-fit polynomial of `degree` over a `window`-sample
/// neighborhood. Interior samples use a centered window; the first and last
/// half-windows are evaluated from the fit over the leading/trailing `window` samples.
///
/// The window must be odd and the degree strictly less than the window. When the record
/// is shorter than the requested window the filter falls back to
/// [`effective_window`] (and caps the degree accordingly), emitting a warning rather
/// than truncating silently or failing.
///
/// # Example
/// ```rust
/// use accelsim::smoothing;
/// let samples: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();
/// let smoothed = smoothing::smooth(&samples, 45, 10).unwrap();
/// // A straight line is reproduced exactly by any polynomial fit of degree >= 1.
/// assert!((smoothed[50] - samples[50]).abs() < 1e-8);
/// ```
pub fn smooth(
    samples: &[f64],
    window: usize,
    degree: usize,
) -> Result<Vec<f64>, Box<dyn std::error::Error>> {
    let n = samples.len();
    if n == 0 {
        return Ok(Vec::new());
    }
    if window == 0 || window % 2 == 0 {
        return Err(format!("smoothing window must be odd and positive, got {window}").into());
    }
    let w = effective_window(n, window);
    let deg = degree.min(w - 1);
    if w < window || deg < degree {
        warn!(
            "smoothing window {window} (degree {degree}) exceeds the {n}-sample record; \
             falling back to window {w} (degree {deg})"
        );
    }
    if w == 1 {
        return Ok(samples.to_vec());
    }
    let b = projection_matrix(w, deg)?;
    let half = w / 2;
    let mut smoothed = Vec::with_capacity(n);
    for i in 0..n {
        let (row, start) = if i < half {
            (i, 0)
        } else if i + half >= n {
            (w - (n - i), n - w)
        } else {
            (half, i - half)
        };
        let value: f64 = (0..w).map(|k| b[(row, k)] * samples[start + k]).sum();
        smoothed.push(value);
    }
    Ok(smoothed)
}
