//! Hit point formulas.

/// Max hit points for a class hit die, CON modifier, and level.
///
/// First level gets the full die plus CON; every later level adds the die
/// average rounded up plus CON. Never less than 1.
pub fn max_hit_points(hit_die: u8, constitution_modifier: i32, level: u8) -> i32 {
    let hit_die = i32::from(hit_die);
    let first_level = hit_die + constitution_modifier;
    let average = hit_die / 2 + 1;
    let later_levels = (i32::from(level.max(1)) - 1) * (average + constitution_modifier);
    (first_level + later_levels).max(1)
}
