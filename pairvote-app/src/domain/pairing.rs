//! Eligible-pair bookkeeping for the fair pair sampler.
//!
//! For N suggestions there are N(N-1)/2 unordered candidate pairs; that set
//! is never materialised. The universe is built from the sorted id vector
//! (O(N)) and the set of pairs the user already voted on (O(V)). Sampling
//! draws a uniform rank over the eligible count and unranks it by walking
//! the rows of the combinatorial triangle, so every eligible pair has
//! exactly the same probability of being returned.

use rand::Rng;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Unordered pair identity: winner/loser order is irrelevant to eligibility.
pub fn normalize_pair(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct PairUniverse {
    /// Sorted, deduplicated suggestion ids.
    ids: Vec<i64>,
    /// Voted pairs as index pairs, keyed by the smaller index ("row").
    voted_by_row: HashMap<usize, BTreeSet<usize>>,
    voted_count: u64,
}

impl PairUniverse {
    /// `voted` entries whose ids are no longer in `ids` are ignored;
    /// duplicates collapse through the set representation.
    pub fn new(mut ids: Vec<i64>, voted: &HashSet<(i64, i64)>) -> Self {
        ids.sort_unstable();
        ids.dedup();

        let index: HashMap<i64, usize> = ids
            .iter()
            .copied()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();

        let mut voted_by_row: HashMap<usize, BTreeSet<usize>> = HashMap::new();
        let mut voted_count = 0u64;
        for &(a, b) in voted {
            let (lo, hi) = normalize_pair(a, b);
            if lo == hi {
                continue;
            }
            if let (Some(&i), Some(&j)) = (index.get(&lo), index.get(&hi)) {
                if voted_by_row.entry(i).or_default().insert(j) {
                    voted_count += 1;
                }
            }
        }

        Self {
            ids,
            voted_by_row,
            voted_count,
        }
    }

    fn total_pairs(&self) -> u64 {
        let n = self.ids.len() as u64;
        n * n.saturating_sub(1) / 2
    }

    /// Number of unordered pairs the user has not voted on yet.
    pub fn eligible_count(&self) -> u64 {
        self.total_pairs() - self.voted_count
    }

    /// Uniformly pick one eligible pair; `None` when nothing is left.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(i64, i64)> {
        let eligible = self.eligible_count();
        if eligible == 0 {
            return None;
        }

        let mut rank = rng.gen_range(0..eligible);
        let n = self.ids.len();

        for i in 0..n.saturating_sub(1) {
            let voted_in_row = self.voted_by_row.get(&i);
            let row_total = (n - 1 - i) as u64;
            let row_voted = voted_in_row.map_or(0, |s| s.len() as u64);
            let row_eligible = row_total - row_voted;

            if rank >= row_eligible {
                rank -= row_eligible;
                continue;
            }

            // The pair lives in row i: find the rank-th non-voted column.
            for j in (i + 1)..n {
                if voted_in_row.is_some_and(|s| s.contains(&j)) {
                    continue;
                }
                if rank == 0 {
                    return Some((self.ids[i], self.ids[j]));
                }
                rank -= 1;
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn voted(pairs: &[(i64, i64)]) -> HashSet<(i64, i64)> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn normalize_orders_ids() {
        assert_eq!(normalize_pair(7, 3), (3, 7));
        assert_eq!(normalize_pair(3, 7), (3, 7));
    }

    #[test]
    fn fewer_than_two_suggestions_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(PairUniverse::new(vec![], &voted(&[])).pick(&mut rng).is_none());
        assert!(PairUniverse::new(vec![42], &voted(&[])).pick(&mut rng).is_none());
    }

    #[test]
    fn eligible_count_subtracts_voted_pairs() {
        // 4 ids -> 6 pairs, 2 voted -> 4 eligible.
        let u = PairUniverse::new(vec![1, 2, 3, 4], &voted(&[(2, 1), (3, 4)]));
        assert_eq!(u.eligible_count(), 4);
    }

    #[test]
    fn voted_pairs_with_unknown_ids_are_ignored() {
        let u = PairUniverse::new(vec![1, 2, 3], &voted(&[(1, 99), (98, 97)]));
        assert_eq!(u.eligible_count(), 3);
    }

    #[test]
    fn never_returns_a_voted_pair_in_either_order() {
        let history = voted(&[(1, 2), (3, 1), (5, 4), (2, 5)]);
        let u = PairUniverse::new(vec![1, 2, 3, 4, 5], &history);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let (a, b) = u.pick(&mut rng).expect("pairs remain");
            assert!(a < b);
            assert!(!history.contains(&(a, b)) && !history.contains(&(b, a)));
        }
    }

    #[test]
    fn single_remaining_pair_is_always_chosen() {
        // 3 ids -> 3 pairs; two voted, only (2, 3) left.
        let u = PairUniverse::new(vec![1, 2, 3], &voted(&[(1, 2), (1, 3)]));
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            assert_eq!(u.pick(&mut rng), Some((2, 3)));
        }
    }

    #[test]
    fn exhausted_history_yields_nothing() {
        let u = PairUniverse::new(vec![1, 2, 3], &voted(&[(1, 2), (1, 3), (2, 3)]));
        let mut rng = StdRng::seed_from_u64(13);
        assert_eq!(u.eligible_count(), 0);
        assert!(u.pick(&mut rng).is_none());
    }

    #[test]
    fn every_eligible_pair_is_reachable() {
        let history = voted(&[(1, 2)]);
        let u = PairUniverse::new(vec![1, 2, 3, 4], &history);
        let mut rng = StdRng::seed_from_u64(17);

        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.insert(u.pick(&mut rng).unwrap());
        }
        let expected: HashSet<(i64, i64)> =
            voted(&[(1, 3), (1, 4), (2, 3), (2, 4), (3, 4)]);
        assert_eq!(seen, expected);
    }

    #[test]
    fn draws_are_roughly_uniform() {
        // 5 ids, no history: 10 pairs, 10_000 draws, expect ~1000 each.
        let u = PairUniverse::new(vec![1, 2, 3, 4, 5], &voted(&[]));
        let mut rng = StdRng::seed_from_u64(19);

        let mut counts: HashMap<(i64, i64), u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(u.pick(&mut rng).unwrap()).or_default() += 1;
        }
        assert_eq!(counts.len(), 10);
        for (&pair, &count) in &counts {
            assert!(
                (700..1300).contains(&count),
                "pair {:?} drawn {} times",
                pair,
                count
            );
        }
    }
}
