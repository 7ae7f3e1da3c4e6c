//! Activity emphasis envelope
//!
//! A player is emphasized while a match they play in is being drawn: the
//! envelope eases in across the interval leading up to the match position and
//! eases out across the interval after it. Overlapping ramps from consecutive
//! matches combine by maximum, so the value never leaves `[0, 1]`.

/// Ease-in kernel on `[0, 1]`
pub fn ease_in(t: f64) -> f64 {
    t * t
}

/// Ease-out kernel on `[0, 1]`
pub fn ease_out(t: f64) -> f64 {
    (1.0 - t) * (1.0 - t)
}

/// Emphasis at continuous time `t` given the sorted positions a player was active at
///
/// For an active position `g`, the ramp-up covers `(g - 1, g]` and the
/// ramp-down covers `(g, g + 1]`. Callers keep `t` inside the player's
/// support; past the last match the ramp-down of the final position would
/// otherwise still show.
pub fn envelope(t: f64, active: &[usize]) -> f64 {
    if !t.is_finite() {
        return 0.0;
    }

    // Only the match ending at ceil(t) and the one just before can reach t
    let upcoming = t.ceil();
    if upcoming < 0.0 {
        return 0.0;
    }
    let upcoming = upcoming as usize;
    let is_active = |position: usize| active.binary_search(&position).is_ok();

    if upcoming == 0 {
        return 0.0;
    }

    // Both ramps run on the same interval (upcoming - 1, upcoming]
    let progress = t - (upcoming as f64 - 1.0);
    let mut value: f64 = 0.0;
    if is_active(upcoming) {
        value = value.max(ease_in(progress));
    }
    if is_active(upcoming - 1) {
        value = value.max(ease_out(progress));
    }

    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_kernels() {
        assert_eq!(ease_in(0.0), 0.0);
        assert_eq!(ease_in(1.0), 1.0);
        assert_eq!(ease_in(0.5), 0.25);
        assert_eq!(ease_out(0.0), 1.0);
        assert_eq!(ease_out(1.0), 0.0);
        assert_eq!(ease_out(0.5), 0.25);
    }

    #[test]
    fn test_ramp_up_and_down_around_single_match() {
        let active = [3];

        assert_eq!(envelope(1.5, &active), 0.0);
        assert_eq!(envelope(2.0, &active), 0.0);
        assert!((envelope(2.5, &active) - 0.25).abs() < EPS);
        assert_eq!(envelope(3.0, &active), 1.0);
        assert!((envelope(3.25, &active) - 0.5625).abs() < EPS);
        assert!((envelope(3.5, &active) - 0.25).abs() < EPS);
        assert_eq!(envelope(4.0, &active), 0.0);
        assert_eq!(envelope(4.5, &active), 0.0);
    }

    #[test]
    fn test_consecutive_matches_combine_by_max() {
        let active = [3, 4];

        // Ramp-down of 3 and ramp-up of 4 overlap on (3, 4]
        for k in 1..10 {
            let t = 3.0 + k as f64 / 10.0;
            let progress = k as f64 / 10.0;
            let expected = ease_in(progress).max(ease_out(progress));
            assert!((envelope(t, &active) - expected).abs() < EPS);
            assert!(envelope(t, &active) <= 1.0);
        }
        assert_eq!(envelope(4.0, &active), 1.0);
    }

    #[test]
    fn test_inactive_and_degenerate_inputs() {
        assert_eq!(envelope(2.5, &[]), 0.0);
        assert_eq!(envelope(-0.5, &[1]), 0.0);
        assert_eq!(envelope(f64::NAN, &[1]), 0.0);
        assert_eq!(envelope(0.0, &[1]), 0.0);
        assert!((envelope(0.5, &[1]) - 0.25).abs() < EPS);
    }
}
