//! Constant-acceleration integration and adaptive sub-step sizing.

use grotto_core::SUB_STEP_DISPLACEMENT;

/// Number of equal sub-steps needed to advance `dt` seconds without any axis
/// travelling further than [`SUB_STEP_DISPLACEMENT`] between collision
/// checks.
///
/// Each axis bounds its worst-case speed over the interval by
/// `|v| + |a| * dt`; the step limit is the displacement budget divided by
/// that bound. Axes at rest impose no limit, so an idle creature advances in
/// a single step.
pub(crate) fn sub_step_count(
    dt: f64,
    horizontal_speed: f64,
    horizontal_acceleration: f64,
    vertical_speed: f64,
    vertical_acceleration: f64,
) -> u32 {
    let mut limit = dt;
    let axes = [
        (horizontal_speed, horizontal_acceleration),
        (vertical_speed, vertical_acceleration),
    ];

    for (speed, acceleration) in axes {
        let bound = speed.abs() + acceleration.abs() * dt;
        if bound > 0.0 {
            limit = limit.min(SUB_STEP_DISPLACEMENT / bound);
        }
    }

    if limit >= dt {
        return 1;
    }

    let steps = (dt / limit).ceil();
    if steps >= 1.0 && steps <= u32::MAX as f64 {
        steps as u32
    } else {
        1
    }
}

/// Displacement covered in `t` seconds from a signed speed and acceleration.
pub(crate) fn displacement(signed_speed: f64, signed_acceleration: f64, t: f64) -> f64 {
    signed_speed * t + 0.5 * signed_acceleration * t * t
}
