use crate::api::Time;

/// Formats how long ago `created_at` was, the way comment headers show it:
/// `1m` for anything under a minute, then whole minutes, hours and days.
pub fn format_relative(created_at: Time, now: Time) -> String {
    let elapsed = now - created_at;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    if minutes < 1 {
        String::from("1m")
    } else if hours < 1 {
        format!("{minutes}m")
    } else if hours < 24 {
        format!("{hours}h")
    } else {
        format!("{}d", elapsed.num_days())
    }
}
