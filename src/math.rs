//! Float helpers shared by the layers

/// Clamp a value into the unit interval
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Smootherstep ease curve
///
/// Monotonic on `[0, 1]` with zero first and second derivatives at both
/// ends, so palette entries are entered and left without a visible kink.
#[inline]
pub fn smootherstep(t: f32) -> f32 {
    // Clamped against rounding just above 1.0 near the top end
    clamp01(t * t * t * (t * (t * 6.0 - 15.0) + 10.0))
}

/// Convert a unit float to a byte, clamping out-of-range input
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit_to_u8(value: f32) -> u8 {
    (clamp01(value) * 255.0) as u8
}
