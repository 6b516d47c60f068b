use std::time::Duration;

pub const DEFAULT_STEP_COUNT: usize = 5;

/// One stage of a ramp: total worker count to reach, and how long to stay there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RampStep {
    pub concurrency: usize,
    pub duration: Duration,
}

/// Splits `ramp_duration` into `step_count` equal steps; step `i` (1-based)
/// targets `floor(i * total_concurrency / step_count)` workers.
///
/// Targets never decrease and the last one is always `total_concurrency`.
/// Sub-nanosecond rounding left over by the split is added to the last step so
/// the durations sum to `ramp_duration` exactly.
#[must_use]
pub fn schedule(total_concurrency: usize, ramp_duration: Duration, step_count: usize) -> Vec<RampStep> {
    let Ok(divisor) = u32::try_from(step_count) else {
        return Vec::new();
    };
    let Some(step_duration) = ramp_duration.checked_div(divisor) else {
        return Vec::new();
    };

    let allotted = step_duration.saturating_mul(divisor);
    let leftover = ramp_duration.saturating_sub(allotted);
    let total = u128::try_from(total_concurrency).unwrap_or(u128::MAX);
    let steps = u128::from(divisor);

    (1..=step_count)
        .map(|index| {
            let index_u128 = u128::try_from(index).unwrap_or(u128::MAX);
            let target = index_u128
                .saturating_mul(total)
                .checked_div(steps)
                .unwrap_or(0);
            let duration = if index == step_count {
                step_duration.saturating_add(leftover)
            } else {
                step_duration
            };
            RampStep {
                concurrency: usize::try_from(target).unwrap_or(total_concurrency),
                duration,
            }
        })
        .collect()
}
