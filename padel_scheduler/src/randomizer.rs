//! Shuffling and tie-breaking.
//!
//! All randomness in the scheduler goes through an explicit `RngCore` so a
//! seeded generator replays a tournament exactly.

use rand::{Rng, RngCore, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Build the generator for a session, seeded when reproducibility is wanted.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Fisher-Yates shuffle into a new vector.
pub fn shuffled<T: Clone>(items: &[T], rng: &mut dyn RngCore) -> Vec<T> {
    let mut out = items.to_vec();
    out.shuffle(rng);
    out
}

/// Index of the lowest-scoring candidate, drawing uniformly among ties.
///
/// # Returns
///
/// * `Option<usize>` - Index into `candidates`, or None if it is empty
pub fn pick_min_by_key<T, K, F>(candidates: &[T], mut key: F, rng: &mut dyn RngCore) -> Option<usize>
where
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let keys: Vec<K> = candidates.iter().map(&mut key).collect();
    let mut best: Vec<usize> = Vec::new();
    for (idx, k) in keys.iter().enumerate() {
        match best.first() {
            None => best.push(idx),
            Some(&b) => {
                if *k < keys[b] {
                    best.clear();
                    best.push(idx);
                } else if *k == keys[b] {
                    best.push(idx);
                }
            }
        }
    }

    match best.len() {
        0 => None,
        1 => Some(best[0]),
        n => Some(best[rng.random_range(0..n)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_shuffle_keeps_all_items() {
        let mut rng = session_rng(Some(7));
        let items: Vec<u32> = (0..20).collect();
        let out = shuffled(&items, &mut rng);
        assert_eq!(out.len(), 20);
        let set: HashSet<_> = out.iter().collect();
        assert_eq!(set.len(), 20);
    }

    #[test]
    fn test_shuffle_randomizes() {
        let mut rng = session_rng(Some(11));
        let items: Vec<u32> = (0..20).collect();
        let a = shuffled(&items, &mut rng);
        let b = shuffled(&items, &mut rng);
        // Two 20-element shuffles matching is vanishingly unlikely
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let items: Vec<u32> = (0..10).collect();
        let a = shuffled(&items, &mut session_rng(Some(3)));
        let b = shuffled(&items, &mut session_rng(Some(3)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_pick_min_unique() {
        let mut rng = session_rng(Some(1));
        assert_eq!(pick_min_by_key(&[5, 3, 9], |v| *v, &mut rng), Some(1));
    }

    #[test]
    fn test_pick_min_empty() {
        let mut rng = session_rng(Some(1));
        let empty: [u32; 0] = [];
        assert_eq!(pick_min_by_key(&empty, |v| *v, &mut rng), None);
    }

    #[test]
    fn test_pick_min_ties_are_spread() {
        let mut rng = session_rng(Some(5));
        let mut picked = HashSet::new();
        for _ in 0..100 {
            let idx = pick_min_by_key(&[1, 0, 4, 0, 0], |v| *v, &mut rng).unwrap();
            assert!([1, 3, 4].contains(&idx));
            picked.insert(idx);
        }
        assert_eq!(picked.len(), 3, "every tied candidate should come up");
    }
}
