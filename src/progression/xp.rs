//! Experience and leveling
//!
//! XP calculations, leveling formulas, and progression helpers.

/// Calculate XP needed to reach a specific level
pub fn xp_for_level(level: u32) -> u32 {
    if level <= 1 {
        0
    } else {
        // Base 100 XP for level 2, +50 per level after
        100 + (level - 2) * 50
    }
}

/// Calculate total XP needed from level 1 to reach a given level
pub fn total_xp_for_level(level: u32) -> u32 {
    (1..level).map(|l| xp_for_level(l + 1)).sum()
}

/// XP granted for defeating an enemy of the given level
pub fn xp_reward_for(level: u32, boss: bool) -> u32 {
    let base = level.max(1).saturating_mul(5).saturating_add(10);
    if boss {
        base.saturating_mul(5)
    } else {
        base
    }
}

/// Get a title/rank based on level
pub fn level_title(level: u32) -> &'static str {
    match level {
        1..=2 => "Novice",
        3..=4 => "Apprentice",
        5..=7 => "Journeyman",
        8..=10 => "Adept",
        11..=14 => "Expert",
        15..=18 => "Master",
        19..=24 => "Grandmaster",
        _ => "Legend",
    }
}

/// Character level and progress toward the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Experience {
    pub level: u32,
    pub current_xp: u32,
    pub xp_to_next: u32,
}

impl Default for Experience {
    fn default() -> Self {
        Self::new()
    }
}

impl Experience {
    pub fn new() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            xp_to_next: xp_for_level(2),
        }
    }

    /// Add XP and return how many levels were gained
    pub fn add_xp(&mut self, amount: u32) -> u32 {
        self.current_xp = self.current_xp.saturating_add(amount);
        let mut gained = 0;
        while self.current_xp >= self.xp_to_next {
            self.current_xp -= self.xp_to_next;
            self.level += 1;
            self.xp_to_next = xp_for_level(self.level + 1);
            gained += 1;
        }
        gained
    }

    /// Lifetime XP earned
    pub fn total_xp(&self) -> u32 {
        total_xp_for_level(self.level) + self.current_xp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xp_for_level() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 100); // Need 100 to go from 1 -> 2
        assert_eq!(xp_for_level(3), 150); // Need 150 to go from 2 -> 3
        assert_eq!(xp_for_level(4), 200);
    }

    #[test]
    fn test_level_title() {
        assert_eq!(level_title(1), "Novice");
        assert_eq!(level_title(5), "Journeyman");
        assert_eq!(level_title(25), "Legend");
    }

    #[test]
    fn test_add_xp_multiple_levels() {
        let mut xp = Experience::new();
        assert_eq!(xp.add_xp(99), 0);
        assert_eq!(xp.add_xp(1 + 150 + 10), 2);
        assert_eq!(xp.level, 3);
        assert_eq!(xp.current_xp, 10);
        assert_eq!(xp.xp_to_next, 200);
        assert_eq!(xp.total_xp(), 260);
    }

    #[test]
    fn test_boss_reward() {
        assert_eq!(xp_reward_for(4, false), 30);
        assert_eq!(xp_reward_for(4, true), 150);
        assert_eq!(xp_reward_for(0, false), 15);
    }

    #[test]
    fn test_reward_saturates_at_extreme_levels() {
        assert_eq!(xp_reward_for(u32::MAX, false), u32::MAX);
        assert_eq!(xp_reward_for(u32::MAX / 5, true), u32::MAX);
    }
}
