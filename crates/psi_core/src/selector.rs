//! Motivselektor: picks the single strongest motive per tick.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::error::{check_non_negative, ValidationError};
use crate::goal::GoalValue;
use crate::motive::Motive;

/// Strengths closer than this count as tied.
pub const TIE_EPSILON: f64 = 1e-9;

/// Stateless selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotiveSelector {
    min_strength_threshold: f64,
    tie_break_random: bool,
}

impl Default for MotiveSelector {
    fn default() -> Self {
        Self {
            min_strength_threshold: 0.01,
            tie_break_random: false,
        }
    }
}

impl MotiveSelector {
    pub fn new(min_strength_threshold: f64, tie_break_random: bool) -> Result<Self, ValidationError> {
        check_non_negative("min_strength_threshold", min_strength_threshold)?;
        Ok(Self {
            min_strength_threshold,
            tie_break_random,
        })
    }

    pub fn min_strength_threshold(&self) -> f64 {
        self.min_strength_threshold
    }

    pub fn tie_break_random(&self) -> bool {
        self.tie_break_random
    }

    /// Strongest motive at or above the threshold, `None` if there is none.
    ///
    /// Random tie-breaks draw from the thread RNG; use [`Self::select_with_rng`]
    /// for reproducible runs.
    pub fn select<'c, 'm, 'g, G>(&self, candidates: &'c [Motive<'m, 'g, G>]) -> Option<&'c Motive<'m, 'g, G>>
    where
        G: GoalValue + ?Sized,
    {
        self.select_with_rng(candidates, &mut rand::thread_rng())
    }

    /// Like [`Self::select`], drawing random tie-breaks from `rng`.
    ///
    /// Without random tie-breaking the first tied candidate in supplied order
    /// wins and `rng` is never touched.
    pub fn select_with_rng<'c, 'm, 'g, G, R>(
        &self,
        candidates: &'c [Motive<'m, 'g, G>],
        rng: &mut R,
    ) -> Option<&'c Motive<'m, 'g, G>>
    where
        G: GoalValue + ?Sized,
        R: Rng + ?Sized,
    {
        if candidates.is_empty() {
            return None;
        }

        let viable: Vec<(&Motive<'m, 'g, G>, f64)> = candidates
            .iter()
            .map(|motive| (motive, motive.strength()))
            .filter(|&(_, strength)| strength >= self.min_strength_threshold)
            .collect();

        let max_strength = viable
            .iter()
            .map(|&(_, strength)| strength)
            .fold(f64::NEG_INFINITY, f64::max);

        let tied: Vec<&Motive<'m, 'g, G>> = viable
            .iter()
            .filter(|&&(_, strength)| (strength - max_strength).abs() <= TIE_EPSILON)
            .map(|&(motive, _)| motive)
            .collect();

        match tied.as_slice() {
            [] => None,
            [only] => Some(*only),
            [first, ..] if !self.tie_break_random => Some(*first),
            _ => tied.choose(rng).copied(),
        }
    }

    /// Every candidate with its strength, strongest first, unfiltered.
    ///
    /// The sort is stable: equal strengths keep their supplied order.
    pub fn rank<'c, 'm, 'g, G>(&self, candidates: &'c [Motive<'m, 'g, G>]) -> Vec<(&'c Motive<'m, 'g, G>, f64)>
    where
        G: GoalValue + ?Sized,
    {
        let mut ranked: Vec<_> = candidates.iter().map(|m| (m, m.strength())).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }

    /// Candidates at or above the threshold, in supplied order.
    pub fn viable<'c, 'm, 'g, G>(&self, candidates: &'c [Motive<'m, 'g, G>]) -> Vec<&'c Motive<'m, 'g, G>>
    where
        G: GoalValue + ?Sized,
    {
        candidates
            .iter()
            .filter(|m| m.strength() >= self.min_strength_threshold)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motivator::Motivator;
    use crate::need::NeedType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Value 1 for every need, expectation fixed.
    struct Flat(f64);

    impl GoalValue for Flat {
        fn value_for_need(&self, _need: NeedType) -> f64 {
            1.0
        }

        fn expectation(&self) -> f64 {
            self.0
        }
    }

    /// Motivator whose activity is exactly `ln(2) ≈ 0.693`.
    fn unit_drive(need: NeedType) -> Motivator {
        let mut m = Motivator::new(need);
        m.accumulate(1.0);
        m
    }

    #[test]
    fn test_empty_candidates() {
        let selector = MotiveSelector::default();
        let motives: Vec<Motive<'_, '_, Flat>> = Vec::new();
        assert!(selector.select(&motives).is_none());
    }

    #[test]
    fn test_all_below_threshold() {
        let drive = unit_drive(NeedType::Hunger);
        let weak = Flat(0.001);
        let motives = vec![Motive::new(&drive, &weak)];
        let selector = MotiveSelector::default();
        assert!(selector.select(&motives).is_none());
        assert!(selector.viable(&motives).is_empty());
    }

    #[test]
    fn test_picks_strongest() {
        let drive = unit_drive(NeedType::Hunger);
        let low = Flat(0.2);
        let high = Flat(0.9);
        let mid = Flat(0.5);
        let motives = vec![
            Motive::new(&drive, &low),
            Motive::new(&drive, &high),
            Motive::new(&drive, &mid),
        ];
        let chosen = MotiveSelector::default().select(&motives).unwrap();
        assert!(std::ptr::eq(chosen.goal(), &high));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let drive = unit_drive(NeedType::Hunger);
        let goal = Flat(1.0);
        let motives = vec![Motive::new(&drive, &goal)];
        let exact = motives[0].strength();
        let selector = MotiveSelector::new(exact, false).unwrap();
        assert!(selector.select(&motives).is_some());
    }

    #[test]
    fn test_deterministic_tie_returns_first() {
        let hunger = unit_drive(NeedType::Hunger);
        let thirst = unit_drive(NeedType::Thirst);
        let a = Flat(1.0);
        let b = Flat(1.0);
        let motives = vec![Motive::new(&thirst, &b), Motive::new(&hunger, &a)];
        let selector = MotiveSelector::default();
        for _ in 0..20 {
            let chosen = selector.select(&motives).unwrap();
            assert_eq!(chosen.need_type(), NeedType::Thirst);
        }
    }

    #[test]
    fn test_random_tie_is_reproducible_per_seed() {
        let drive = unit_drive(NeedType::Hunger);
        let goals: Vec<Flat> = (0..8).map(|_| Flat(1.0)).collect();
        let motives: Vec<_> = goals.iter().map(|g| Motive::new(&drive, g)).collect();
        let selector = MotiveSelector::new(0.01, true).unwrap();

        let pick = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10)
                .map(|_| {
                    let chosen = selector.select_with_rng(&motives, &mut rng).unwrap();
                    goals.iter().position(|g| std::ptr::eq(g, chosen.goal())).unwrap()
                })
                .collect::<Vec<_>>()
        };

        assert_eq!(pick(7), pick(7));
        let picks = pick(7);
        assert!(picks.iter().all(|&i| i < goals.len()));
    }

    #[test]
    fn test_random_tie_only_among_tied() {
        let drive = unit_drive(NeedType::Hunger);
        let strong_a = Flat(0.9);
        let weak = Flat(0.3);
        let strong_b = Flat(0.9);
        let motives = vec![
            Motive::new(&drive, &strong_a),
            Motive::new(&drive, &weak),
            Motive::new(&drive, &strong_b),
        ];
        let selector = MotiveSelector::new(0.0, true).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            let chosen = selector.select_with_rng(&motives, &mut rng).unwrap();
            assert!(!std::ptr::eq(chosen.goal(), &weak));
        }
    }

    #[test]
    fn test_viable_filters_in_supplied_order() {
        let drive = unit_drive(NeedType::Hunger);
        let goals = [Flat(0.3), Flat(0.001), Flat(0.9), Flat(0.0), Flat(0.5)];
        let motives: Vec<_> = goals.iter().map(|g| Motive::new(&drive, g)).collect();
        let viable = MotiveSelector::default().viable(&motives);
        assert_eq!(viable.len(), 3);
        assert!(std::ptr::eq(viable[0].goal(), &goals[0]));
        assert!(std::ptr::eq(viable[1].goal(), &goals[2]));
        assert!(std::ptr::eq(viable[2].goal(), &goals[4]));
    }

    #[test]
    fn test_tie_within_epsilon() {
        let hunger = unit_drive(NeedType::Hunger);
        let thirst = unit_drive(NeedType::Thirst);
        let first = Flat(0.5);
        let second = Flat(0.5 + 0.5 * TIE_EPSILON / hunger.activity());
        let motives = vec![Motive::new(&hunger, &first), Motive::new(&thirst, &second)];
        assert!(motives[1].strength() > motives[0].strength());
        assert!(motives[1].strength() - motives[0].strength() <= TIE_EPSILON);
        let chosen = MotiveSelector::default().select(&motives).unwrap();
        assert_eq!(chosen.need_type(), NeedType::Hunger);

        let clear = Flat(0.5 + 10.0 * TIE_EPSILON);
        let motives = vec![Motive::new(&hunger, &first), Motive::new(&thirst, &clear)];
        let chosen = MotiveSelector::default().select(&motives).unwrap();
        assert_eq!(chosen.need_type(), NeedType::Thirst);
    }

    #[test]
    fn test_rank_sorts_descending_and_keeps_everything() {
        let drive = unit_drive(NeedType::Hunger);
        let goals = [Flat(0.1), Flat(0.0), Flat(0.6), Flat(0.6)];
        let motives: Vec<_> = goals.iter().map(|g| Motive::new(&drive, g)).collect();
        let ranked = MotiveSelector::default().rank(&motives);
        assert_eq!(ranked.len(), 4);
        assert!(std::ptr::eq(ranked[0].0.goal(), &goals[2]));
        assert!(std::ptr::eq(ranked[1].0.goal(), &goals[3]));
        assert_eq!(ranked[3].1, 0.0);
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let err = MotiveSelector::new(-0.5, false).unwrap_err();
        assert_eq!(err.field, "min_strength_threshold");
    }
}
