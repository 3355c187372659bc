//! Scalar helpers shared by every processing stage.
//!
//! All functions are `#[inline]`, allocation-free and total over finite
//! inputs, so they can sit anywhere in the per-sample path.

use libm::tanhf;

/// Magnitude below which feedback state is snapped to exact zero.
pub const DENORMAL_THRESHOLD: f32 = 1e-20;

/// Soft clip using hyperbolic tangent.
///
/// # Arguments
/// * `x` - Input sample (any range)
///
/// # Returns
/// Soft-clipped output in range (-1, 1)
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Hard clip to the ±threshold range.
///
/// # Arguments
/// * `x` - Input sample
/// * `threshold` - Clipping threshold, must be positive
///
/// # Returns
/// Hard-clipped output in range [-threshold, threshold]
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Asymmetric tanh saturation.
///
/// The positive half saturates gently toward +1, the negative half is driven
/// twice as hard and scaled to saturate at -0.5. Both branches pass through
/// the origin with slope 1, so the curve is continuous and smooth at zero and
/// produces even as well as odd harmonics.
///
/// # Returns
/// Output in range (-0.5, 1)
///
/// # Example
/// ```rust
/// use foldbox_core::asymmetric_clip;
///
/// assert!(asymmetric_clip(100.0) <= 1.0);
/// assert!(asymmetric_clip(-100.0) >= -0.5);
/// ```
#[inline]
pub fn asymmetric_clip(x: f32) -> f32 {
    if x >= 0.0 {
        tanhf(x)
    } else {
        tanhf(2.0 * x) * 0.5
    }
}

/// Linear interpolation between two values.
///
/// # Arguments
/// * `a` - Start value (at t=0)
/// * `b` - End value (at t=1)
/// * `t` - Interpolation factor (0.0 to 1.0)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Flush subnormal-range values to zero.
///
/// Feedback loops (filter integrators, comb and allpass lines, one-pole
/// smoothers) decay geometrically toward zero during release tails and would
/// otherwise spend thousands of samples in the subnormal range, where many
/// FPUs fall back to microcode. Anything below [`DENORMAL_THRESHOLD`] becomes
/// exactly `0.0`.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < DENORMAL_THRESHOLD { 0.0 } else { x }
}
