//! The pure duel rules: phrase validation, damage computation, and the
//! end-of-match winner decision.
//!
//! Everything here is synchronous and side-effect free so the scoring
//! branches can be tested exhaustively without a room.

/// The dead band around zero inside which an attack is dodged. The
/// comparison is strict on both sides: a multiplier of exactly ±0.2
/// is a dodge.
pub const DODGE_BAND: f64 = 0.2;

/// Base damage factor for a landed attack.
const ATTACK_FACTOR: f64 = 15.0;

/// Base damage factor for a countered attack.
const COUNTER_FACTOR: f64 = 10.0;

/// The outcome of a single resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The defender reacted too slowly and takes `damage` health.
    Landed { damage: i32 },
    /// The defender was much faster — the phrase was trivial, and the
    /// attacker absorbs `recoil` (a negative delta) instead.
    Countered { recoil: i32 },
    /// Near-equal times: nobody is hurt.
    Dodged,
}

impl TurnOutcome {
    /// A short human-readable category for result summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Landed { .. } => "attack landed",
            Self::Countered { .. } => "attack countered",
            Self::Dodged => "attack dodged",
        }
    }
}

/// Resolves one turn from the two submission times, in seconds.
///
/// The multiplier is the defender's extra time normalized by the
/// attacker's time: `(defender − attacker) / attacker`. A non-positive
/// attacker time (including an absent submission mapped to zero) makes
/// the multiplier zero, i.e. a dodge. Damage applies `floor` to the
/// scaled multiplier, and negative deltas are valid input — clock skew
/// is tolerated, not rejected.
pub fn resolve(attacker_elapsed: f64, defender_elapsed: f64) -> TurnOutcome {
    if attacker_elapsed <= 0.0 {
        return TurnOutcome::Dodged;
    }

    let multiplier = (defender_elapsed - attacker_elapsed) / attacker_elapsed;
    if multiplier > DODGE_BAND {
        TurnOutcome::Landed { damage: (ATTACK_FACTOR * multiplier).floor() as i32 }
    } else if multiplier < -DODGE_BAND {
        TurnOutcome::Countered { recoil: (COUNTER_FACTOR * multiplier).floor() as i32 }
    } else {
        TurnOutcome::Dodged
    }
}

/// The result summary sent to both players after a resolved turn.
pub fn summary(attacker_elapsed: f64, defender_elapsed: f64, outcome: &TurnOutcome) -> String {
    format!(
        "attacker time: {attacker_elapsed:.2}s, defender time: {defender_elapsed:.2}s, {}",
        outcome.label()
    )
}

/// Which side won a finished match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Attacker,
    Defender,
}

/// Decides the winner once at least one health pool is at or below
/// zero. The defender wins ties: if a counter somehow leaves both
/// players defeated, the attacker's own recoil is what finished them.
pub fn winner(attacker_health: i32, defender_health: i32) -> Winner {
    if attacker_health <= 0 {
        Winner::Defender
    } else {
        debug_assert!(defender_health <= 0);
        Winner::Attacker
    }
}

/// An attack phrase must contain at least one non-whitespace character;
/// anything else forfeits the turn.
pub fn phrase_is_valid(phrase: &str) -> bool {
    !phrase.trim().is_empty()
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // =====================================================================
    // resolve() — the three-way damage branch
    // =====================================================================

    #[test]
    fn test_slow_defender_takes_floored_damage() {
        // multiplier = (13 - 10) / 10 = 0.3 → floor(15 × 0.3) = 4
        assert_eq!(resolve(10.0, 13.0), TurnOutcome::Landed { damage: 4 });
    }

    #[test]
    fn test_double_time_defender_takes_full_factor() {
        // multiplier = (10 - 5) / 5 = 1.0 → 15 damage
        assert_eq!(resolve(5.0, 10.0), TurnOutcome::Landed { damage: 15 });
    }

    #[test]
    fn test_fast_defender_counters_with_negative_recoil() {
        // multiplier = (2 - 10) / 10 = -0.8 → floor(10 × -0.8) = -8
        assert_eq!(resolve(10.0, 2.0), TurnOutcome::Countered { recoil: -8 });
    }

    #[test]
    fn test_counter_recoil_floors_toward_negative_infinity() {
        // multiplier = (5 - 20) / 20 = -0.75 → floor(-7.5) = -8
        assert_eq!(resolve(20.0, 5.0), TurnOutcome::Countered { recoil: -8 });
    }

    #[test]
    fn test_equal_times_dodge() {
        assert_eq!(resolve(10.0, 10.0), TurnOutcome::Dodged);
    }

    #[test]
    fn test_band_edges_are_strict() {
        // Exactly +0.2 and exactly -0.2 are both dodges.
        assert_eq!(resolve(10.0, 12.0), TurnOutcome::Dodged);
        assert_eq!(resolve(10.0, 8.0), TurnOutcome::Dodged);
    }

    #[test]
    fn test_just_outside_band_is_not_a_dodge() {
        assert!(matches!(resolve(10.0, 12.1), TurnOutcome::Landed { .. }));
        assert!(matches!(resolve(10.0, 7.9), TurnOutcome::Countered { .. }));
    }

    #[test]
    fn test_zero_attacker_time_is_a_dodge() {
        assert_eq!(resolve(0.0, 10.0), TurnOutcome::Dodged);
    }

    #[test]
    fn test_negative_attacker_time_is_a_dodge() {
        // Skewed clocks can report nonsense; never divide by it.
        assert_eq!(resolve(-1.0, 10.0), TurnOutcome::Dodged);
    }

    #[test]
    fn test_negative_defender_time_is_valid_input() {
        // multiplier = (-2 - 10) / 10 = -1.2 → counter, not an error.
        assert_eq!(resolve(10.0, -2.0), TurnOutcome::Countered { recoil: -12 });
    }

    // =====================================================================
    // winner() — defender wins ties
    // =====================================================================

    #[test]
    fn test_defeated_defender_loses() {
        assert_eq!(winner(40, 0), Winner::Attacker);
        assert_eq!(winner(40, -15), Winner::Attacker);
    }

    #[test]
    fn test_defeated_attacker_loses() {
        assert_eq!(winner(0, 55), Winner::Defender);
        assert_eq!(winner(-3, 55), Winner::Defender);
    }

    #[test]
    fn test_simultaneous_defeat_goes_to_the_defender() {
        assert_eq!(winner(-5, -10), Winner::Defender);
        assert_eq!(winner(0, 0), Winner::Defender);
    }

    // =====================================================================
    // phrase_is_valid()
    // =====================================================================

    #[test]
    fn test_empty_and_whitespace_phrases_are_invalid() {
        assert!(!phrase_is_valid(""));
        assert!(!phrase_is_valid("   "));
        assert!(!phrase_is_valid("\t\n"));
    }

    #[test]
    fn test_nonempty_phrase_is_valid() {
        assert!(phrase_is_valid("the quick brown fox"));
        assert!(phrase_is_valid(" x "));
    }

    // =====================================================================
    // summary()
    // =====================================================================

    #[test]
    fn test_summary_names_both_times_and_the_outcome() {
        let text = summary(5.0, 10.0, &resolve(5.0, 10.0));
        assert!(text.contains("5.00s"));
        assert!(text.contains("10.00s"));
        assert!(text.contains("attack landed"));
    }
}
