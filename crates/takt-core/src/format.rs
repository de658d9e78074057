//! Compact rendering of fractional hours.

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * MINUTES_PER_HOUR;

/// Formats fractional hours as `4h05m`, or `1d02h15m` past a full day.
///
/// Non-positive input renders as `00h00m`. Minutes are rounded half away from
/// zero and carried into hours and days, so no field ever reads `60`. The form
/// is picked from the input: anything up to 24 hours stays in hours, which makes
/// `23.999` read `24h00m`.
#[allow(clippy::cast_possible_truncation)]
pub fn format_hours(hours: f64) -> String {
    if hours.is_nan() || hours <= 0.0 {
        return "00h00m".to_string();
    }

    let whole = hours.trunc();
    let minutes = ((hours - whole) * 60.0).round();
    // Casts saturate, so huge or infinite input pins at i64::MAX minutes.
    let total_minutes = (whole as i64)
        .saturating_mul(MINUTES_PER_HOUR)
        .saturating_add(minutes as i64);

    if hours <= 24.0 {
        let h = total_minutes / MINUTES_PER_HOUR;
        let m = total_minutes % MINUTES_PER_HOUR;
        format!("{h}h{m:02}m")
    } else {
        let d = total_minutes / MINUTES_PER_DAY;
        let h = (total_minutes % MINUTES_PER_DAY) / MINUTES_PER_HOUR;
        let m = total_minutes % MINUTES_PER_HOUR;
        format!("{d}d{h:02}h{m:02}m")
    }
}
