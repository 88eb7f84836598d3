//! Ability score rolling.

use crate::value_objects::AbilityRoll;

pub const ABILITY_ROLL_COUNT: usize = 6;

/// Roll six ability values, each 4d6 keeping the highest three.
///
/// `roll_d6` supplies single die results so callers decide where randomness
/// comes from. Rolls get ids `r1`..`r6`.
pub fn roll_ability_scores(mut roll_d6: impl FnMut() -> i32) -> Vec<AbilityRoll> {
    (1..=ABILITY_ROLL_COUNT)
        .map(|n| {
            let mut dice: Vec<i32> = (0..4).map(|_| roll_d6().clamp(1, 6)).collect();
            dice.sort_unstable();
            let total: i32 = dice.iter().skip(1).sum();
            AbilityRoll::new(format!("r{}", n), total)
        })
        .collect()
}
