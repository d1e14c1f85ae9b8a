use std::collections::BTreeMap;

use rand::Rng;

use crate::stages::Stage;
use crate::util::shuffled;

/// Lifecycle of a reboot code within its wave. Inactive codes are shown
/// but not yet typeable; Cleared is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordState {
    Inactive,
    Active,
    Cleared,
}

/// The live code set for the stage in progress. Sorted key order keeps
/// focus resolution deterministic when several Active codes could match.
pub type Wave = BTreeMap<String, WordState>;

/// Draws up to `stage.target_count` codes from the stage pool such that
/// no two share a first character. A pool that cannot supply that many
/// yields a shorter wave; that is not an error.
pub fn generate_wave<R: Rng>(stage: &Stage, rng: &mut R) -> Vec<String> {
    let mut candidates = shuffled(stage.word_pool.clone(), rng);
    let mut picked: Vec<String> = Vec::with_capacity(stage.target_count);

    while picked.len() < stage.target_count {
        let Some(candidate) = candidates.pop() else {
            break;
        };
        let first = candidate.chars().next();
        let taken = picked
            .iter()
            .any(|word| word.chars().next() == first && first.is_some());
        if !taken {
            picked.push(candidate);
        }
    }

    picked
}

/// Promotes random Inactive codes until `max_active` codes are Active,
/// bounded by how many Inactive codes remain. Safe to call at any settle
/// point; a saturated wave is left untouched.
pub fn activate_words_as_needed<R: Rng>(wave: &mut Wave, max_active: usize, rng: &mut R) {
    let active = count_active(wave);
    if active >= max_active {
        return;
    }

    let inactive: Vec<String> = wave
        .iter()
        .filter(|(_, state)| **state == WordState::Inactive)
        .map(|(word, _)| word.clone())
        .collect();

    let deficit = max_active - active;
    for word in shuffled(inactive, rng).into_iter().take(deficit) {
        wave.insert(word, WordState::Active);
    }
}

pub fn count_active(wave: &Wave) -> usize {
    wave.values()
        .filter(|state| **state == WordState::Active)
        .count()
}

/// True once every code in the wave is Cleared. An empty wave counts as
/// cleared so a starved stage cannot wedge the game.
pub fn wave_cleared(wave: &Wave) -> bool {
    wave.values().all(|state| *state == WordState::Cleared)
}

/// The first Active code starting with `first_char`, in sorted order.
pub fn find_active_match(wave: &Wave, first_char: char) -> Option<&str> {
    wave.iter()
        .find(|(word, state)| **state == WordState::Active && word.starts_with(first_char))
        .map(|(word, _)| word.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn wave_from(words: &[(&str, WordState)]) -> Wave {
        words
            .iter()
            .map(|(w, s)| (w.to_string(), *s))
            .collect()
    }

    #[test]
    fn test_generate_wave_respects_target_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let stage = Stage::new(3, vec!["apple", "bear", "cat", "dog", "eel", "fox"]);
        let wave = generate_wave(&stage, &mut rng);
        assert_eq!(wave.len(), 3);
    }

    #[test]
    fn test_generate_wave_unique_first_chars() {
        // Property: no two codes in a generated wave share a first char,
        // across many seeds and a pool with heavy first-char collisions.
        let stage = Stage::new(
            4,
            vec![
                "bark", "bead", "bell", "book", "clay", "club", "coin", "crab", "fire", "flag",
                "fork", "rain", "rice", "road", "sand", "ship",
            ],
        );
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let wave = generate_wave(&stage, &mut rng);
            let firsts = wave
                .iter()
                .filter_map(|w| w.chars().next())
                .unique()
                .count();
            assert_eq!(firsts, wave.len(), "seed {} produced a collision", seed);
            assert!(wave.len() <= 4);
        }
    }

    #[test]
    fn test_generate_wave_starved_pool_returns_fewer() {
        // Only two distinct first characters available; target is four.
        let stage = Stage::new(4, vec!["sand", "ship", "star", "rain", "rice"]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let wave = generate_wave(&stage, &mut rng);
            assert_eq!(wave.len(), 2);
        }
    }

    #[test]
    fn test_generate_wave_empty_pool() {
        let mut rng = StdRng::seed_from_u64(0);
        let stage = Stage::new(3, Vec::<String>::new());
        assert!(generate_wave(&stage, &mut rng).is_empty());
    }

    #[test]
    fn test_activate_respects_max_active() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut wave = wave_from(&[
            ("alpha", WordState::Inactive),
            ("bravo", WordState::Inactive),
            ("charlie", WordState::Inactive),
            ("delta", WordState::Inactive),
            ("echo", WordState::Inactive),
        ]);

        activate_words_as_needed(&mut wave, 3, &mut rng);
        assert_eq!(count_active(&wave), 3);
    }

    #[test]
    fn test_activate_tops_up_after_clear() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut wave = wave_from(&[
            ("alpha", WordState::Cleared),
            ("bravo", WordState::Active),
            ("charlie", WordState::Active),
            ("delta", WordState::Inactive),
        ]);

        activate_words_as_needed(&mut wave, 3, &mut rng);
        assert_eq!(count_active(&wave), 3);
        assert_eq!(wave["alpha"], WordState::Cleared);
    }

    #[test]
    fn test_activate_idempotent_when_saturated() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut wave = wave_from(&[
            ("alpha", WordState::Active),
            ("bravo", WordState::Active),
            ("charlie", WordState::Active),
            ("delta", WordState::Inactive),
        ]);
        let before = wave.clone();

        activate_words_as_needed(&mut wave, 3, &mut rng);
        assert_eq!(wave, before);
    }

    #[test]
    fn test_activate_idempotent_when_no_inactive_left() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut wave = wave_from(&[
            ("alpha", WordState::Active),
            ("bravo", WordState::Cleared),
        ]);
        let before = wave.clone();

        activate_words_as_needed(&mut wave, 3, &mut rng);
        assert_eq!(wave, before);
    }

    #[test]
    fn test_activate_bound_holds_over_random_histories() {
        // Property: active count never exceeds the cap immediately after
        // any scheduler call, whatever clears happened in between.
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut wave: Wave = (0..10)
                .map(|i| (format!("word{}", i), WordState::Inactive))
                .collect();

            for round in 0..10 {
                activate_words_as_needed(&mut wave, 3, &mut rng);
                assert!(count_active(&wave) <= 3, "seed {} round {}", seed, round);

                // Clear one active word, as the matcher would.
                if let Some(word) = wave
                    .iter()
                    .find(|(_, s)| **s == WordState::Active)
                    .map(|(w, _)| w.clone())
                {
                    wave.insert(word, WordState::Cleared);
                }
            }
        }
    }

    #[test]
    fn test_wave_cleared() {
        let mut wave = wave_from(&[
            ("alpha", WordState::Cleared),
            ("bravo", WordState::Active),
        ]);
        assert!(!wave_cleared(&wave));

        wave.insert("bravo".into(), WordState::Cleared);
        assert!(wave_cleared(&wave));
        assert!(wave_cleared(&Wave::new()));
    }

    #[test]
    fn test_find_active_match_prefers_sorted_order() {
        let wave = wave_from(&[
            ("crow", WordState::Active),
            ("crab", WordState::Active),
            ("coin", WordState::Inactive),
        ]);
        // "coin" is inactive, so the sorted-first active match is "crab".
        assert_eq!(find_active_match(&wave, 'c'), Some("crab"));
        assert_eq!(find_active_match(&wave, 'x'), None);
    }
}
