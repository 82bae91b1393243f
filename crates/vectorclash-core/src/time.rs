/// Default simulation rate: one tick per 60 Hz animation frame.
pub const DEFAULT_TICK_RATE_HZ: f32 = 60.0;

/// Convert a millisecond duration to whole simulation ticks, rounding to the
/// nearest tick. Negative durations map to zero.
pub fn ms_to_ticks(ms: f32, tick_rate: f32) -> u64 {
    (ms.max(0.0) * tick_rate / 1000.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_at_sixty_hz() {
        assert_eq!(ms_to_ticks(1000.0, 60.0), 60);
        assert_eq!(ms_to_ticks(600.0, 60.0), 36);
        assert_eq!(ms_to_ticks(50.0, 60.0), 3);
        assert_eq!(ms_to_ticks(0.0, 60.0), 0);
    }

    #[test]
    fn negative_is_zero() {
        assert_eq!(ms_to_ticks(-25.0, 60.0), 0);
    }
}
