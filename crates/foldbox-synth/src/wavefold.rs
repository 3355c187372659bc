//! Stateless triangle wavefolder.
//!
//! The input is amplified by `1 + 5·amount` and reflected back into [-1, 1]
//! by a closed-form triangle wrap (period 4, amplitude 1). The wrap is O(1)
//! and exact for any magnitude, so there is no iteration to bound and no
//! state to diverge.

use libm::floorf;

/// Gain added at full fold amount (total gain 1 + FOLD_GAIN_RANGE).
pub const FOLD_GAIN_RANGE: f32 = 5.0;

/// Fold `x` back into [-1, 1].
///
/// `amount` is clamped to [0, 1]. The wrap is polarity-inverting: at
/// `amount = 0` an input inside [-1, 1] comes out as `-x`, and larger
/// inputs still fold.
///
/// Non-finite handling: NaN maps to `0.0`, and an input or gained value that
/// is infinite clamps to `±1.0` by sign.
///
/// # Example
///
/// ```rust
/// use foldbox_synth::wavefold;
///
/// assert_eq!(wavefold(0.5, 0.0), -0.5);
/// assert_eq!(wavefold(1.5, 0.0), -0.5);
/// assert!((-1.0..=1.0).contains(&wavefold(1.0e6, 1.0)));
/// ```
#[inline]
pub fn wavefold(x: f32, amount: f32) -> f32 {
    let amount = if amount.is_nan() {
        0.0
    } else {
        amount.clamp(0.0, 1.0)
    };
    let g = x * (1.0 + FOLD_GAIN_RANGE * amount);

    if g.is_nan() {
        return 0.0;
    }
    if g.is_infinite() {
        return if g > 0.0 { 1.0 } else { -1.0 };
    }

    let shifted = g + 1.0;
    let wrapped = shifted - 4.0 * floorf(shifted * 0.25);
    // `wrapped` is in [0, 4]; rounding can land exactly on 4.0, which still
    // maps into range.
    (wrapped - 2.0).abs() - 1.0
}
