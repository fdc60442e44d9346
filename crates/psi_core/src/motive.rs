//! Motives: a drive bound to a goal.
//!
//! Strength follows the Erwartung × Wert principle, scaled by the drive:
//! `expectation × value × activity`. Impossible goals (expectation 0),
//! worthless goals (value 0) and sated drives (activity 0) all score zero.

use crate::goal::GoalValue;
use crate::motivator::{Motivator, MotivatorSet};
use crate::need::NeedType;

/// Non-finite factors score as zero instead of poisoning the product.
fn sanitize_factor(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!("non-finite motive factor {}, treating as 0", v);
        0.0
    }
}

/// Ephemeral per-tick pairing. Borrows its motivator and goal.
#[derive(Debug)]
pub struct Motive<'m, 'g, G: ?Sized> {
    motivator: &'m Motivator,
    goal: &'g G,
    expectation_override: Option<f64>,
}

impl<G: ?Sized> Clone for Motive<'_, '_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G: ?Sized> Copy for Motive<'_, '_, G> {}

impl<'m, 'g, G: GoalValue + ?Sized> Motive<'m, 'g, G> {
    pub fn new(motivator: &'m Motivator, goal: &'g G) -> Self {
        Self {
            motivator,
            goal,
            expectation_override: None,
        }
    }

    /// Replace the goal's own expectation for this motive only.
    pub fn with_expectation(mut self, expectation: f64) -> Self {
        self.expectation_override = Some(expectation);
        self
    }

    pub fn motivator(&self) -> &'m Motivator {
        self.motivator
    }

    pub fn goal(&self) -> &'g G {
        self.goal
    }

    pub fn need_type(&self) -> NeedType {
        self.motivator.need_type()
    }

    pub fn expectation_override(&self) -> Option<f64> {
        self.expectation_override
    }

    /// Override if set, else the goal's expectation; clamped to `[0, 1]`.
    pub fn expectation(&self) -> f64 {
        let raw = self
            .expectation_override
            .unwrap_or_else(|| self.goal.expectation());
        sanitize_factor(raw).clamp(0.0, 1.0)
    }

    /// The goal's value for this motive's need, clamped to `[0, 1]`.
    pub fn value(&self) -> f64 {
        sanitize_factor(self.goal.value_for_need(self.need_type())).clamp(0.0, 1.0)
    }

    /// `expectation × value × activity`
    pub fn strength(&self) -> f64 {
        self.expectation() * self.value() * self.motivator.activity()
    }
}

/// One motive per (goal, need) pair with positive value.
///
/// Goals are visited in the order given, needs in ordinal order, so the
/// result order is deterministic.
pub fn build_motives<'m, 'g, G, I>(goals: I, motivators: &'m MotivatorSet) -> Vec<Motive<'m, 'g, G>>
where
    G: GoalValue + ?Sized + 'g,
    I: IntoIterator<Item = &'g G>,
{
    let mut motives = Vec::new();
    for goal in goals {
        for need in NeedType::ALL {
            if goal.value_for_need(need) > 0.0 {
                motives.push(Motive::new(motivators.get(need), goal));
            }
        }
    }
    motives
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        need: NeedType,
        value: f64,
        expectation: f64,
    }

    impl GoalValue for Fixed {
        fn value_for_need(&self, need: NeedType) -> f64 {
            if need == self.need {
                self.value
            } else {
                0.0
            }
        }

        fn expectation(&self) -> f64 {
            self.expectation
        }
    }

    fn driven(need: NeedType, bedarf: f64) -> Motivator {
        let mut m = Motivator::new(need);
        m.accumulate(bedarf);
        m
    }

    #[test]
    fn test_strength_is_product() {
        let m = driven(NeedType::Hunger, 1.0);
        let goal = Fixed {
            need: NeedType::Hunger,
            value: 0.5,
            expectation: 0.8,
        };
        let motive = Motive::new(&m, &goal);
        let expected = 0.8 * 0.5 * 2f64.ln();
        assert!((motive.strength() - expected).abs() < 1e-12);
        assert_eq!(motive.need_type(), NeedType::Hunger);
    }

    #[test]
    fn test_zero_factor_gives_zero_strength() {
        let active = driven(NeedType::Hunger, 1.0);
        let idle = Motivator::new(NeedType::Hunger);
        let worthless = Fixed {
            need: NeedType::Thirst,
            value: 1.0,
            expectation: 1.0,
        };
        let hopeless = Fixed {
            need: NeedType::Hunger,
            value: 1.0,
            expectation: 0.0,
        };
        let good = Fixed {
            need: NeedType::Hunger,
            value: 1.0,
            expectation: 1.0,
        };
        assert_eq!(Motive::new(&active, &worthless).strength(), 0.0);
        assert_eq!(Motive::new(&active, &hopeless).strength(), 0.0);
        assert_eq!(Motive::new(&idle, &good).strength(), 0.0);
        assert!(Motive::new(&active, &good).strength() > 0.0);
    }

    #[test]
    fn test_expectation_override_and_clamping() {
        let m = driven(NeedType::Hunger, 1.0);
        let goal = Fixed {
            need: NeedType::Hunger,
            value: 3.0,
            expectation: 1.7,
        };
        let motive = Motive::new(&m, &goal);
        assert_eq!(motive.expectation(), 1.0);
        assert_eq!(motive.value(), 1.0);

        let overridden = motive.with_expectation(0.25);
        assert_eq!(overridden.expectation(), 0.25);
        assert_eq!(overridden.expectation_override(), Some(0.25));
        assert_eq!(motive.with_expectation(-2.0).expectation(), 0.0);
    }

    #[test]
    fn test_non_finite_factors_score_zero() {
        let m = driven(NeedType::Hunger, 1.0);
        let goal = Fixed {
            need: NeedType::Hunger,
            value: f64::NAN,
            expectation: 1.0,
        };
        assert_eq!(Motive::new(&m, &goal).strength(), 0.0);
    }

    #[test]
    fn test_build_motives_skips_zero_value_pairs() {
        let set = MotivatorSet::default();
        let eat = Fixed {
            need: NeedType::Hunger,
            value: 1.0,
            expectation: 1.0,
        };
        let walk = Fixed {
            need: NeedType::Hunger,
            value: 0.0,
            expectation: 1.0,
        };
        let drink = Fixed {
            need: NeedType::Thirst,
            value: 0.7,
            expectation: 1.0,
        };
        let goals = [&eat, &walk, &drink];
        let motives = build_motives(goals, &set);
        let needs: Vec<_> = motives.iter().map(Motive::need_type).collect();
        assert_eq!(needs, vec![NeedType::Hunger, NeedType::Thirst]);
        assert!(std::ptr::eq(motives[1].goal(), &drink));
    }
}
