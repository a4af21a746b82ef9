pub const SECONDS_PER_DAY: u64 = 86_400;

/// Whether the catalog is due for a refresh.
///
/// A missing stamp always refreshes. Otherwise the elapsed whole days
/// since the stamp are compared against the configured interval; the
/// non-strict variant shaves one day off the threshold so a daily
/// scheduled run does not perpetually miss the boundary by timer jitter.
/// This only answers the question; performing the refresh and updating
/// the stamp stay with the caller.
pub fn should_refresh(
    last_refresh_unix: Option<u64>,
    now_unix: u64,
    interval_days: u32,
    strict: bool,
) -> bool {
    let Some(last_refresh_unix) = last_refresh_unix else {
        return true;
    };

    let elapsed_days = now_unix.saturating_sub(last_refresh_unix) / SECONDS_PER_DAY;
    let threshold = if strict {
        u64::from(interval_days)
    } else {
        u64::from(interval_days).saturating_sub(1)
    };
    elapsed_days >= threshold
}
