/// Rotating general health tips.
///
/// The rotator owns its own position, so two monitors (or two tests) never
/// share a cursor. It is an endless iterator: `next()` always yields a tip.

pub const HEALTH_TIPS: &[&str] = &[
    "Stay hydrated, drink water regularly.",
    "Wear light clothing in hot conditions.",
    "Take breaks in shaded areas.",
    "Monitor for signs of heat stress.",
    "Ensure proper ventilation in workspace.",
];

#[derive(Debug, Clone)]
pub struct HealthTipRotator {
    tips: &'static [&'static str],
    index: usize,
}

impl Default for HealthTipRotator {
    fn default() -> Self {
        Self::new(HEALTH_TIPS)
    }
}

impl HealthTipRotator {
    /// Creates a rotator over a custom tip list. An empty list falls back to
    /// the built-in tips so the sequence can never run dry.
    pub fn new(tips: &'static [&'static str]) -> Self {
        let tips = if tips.is_empty() { HEALTH_TIPS } else { tips };
        Self { tips, index: 0 }
    }

    /// Index of the tip the next call to `next()` will yield.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.tips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tips.is_empty()
    }

    /// Tip at the current position, without advancing.
    pub fn peek(&self) -> &'static str {
        self.tips[self.index]
    }

    /// Back to the first tip.
    pub fn restart(&mut self) {
        self.index = 0;
    }
}

impl Iterator for HealthTipRotator {
    type Item = &'static str;

    fn next(&mut self) -> Option<Self::Item> {
        let tip = self.tips[self.index];
        self.index = (self.index + 1) % self.tips.len();
        Some(tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list_has_at_least_five_tips() {
        assert!(HEALTH_TIPS.len() >= 5);
    }

    #[test]
    fn test_rotator_advances_by_one_and_wraps() {
        let mut rotator = HealthTipRotator::default();
        for expected in 0..HEALTH_TIPS.len() {
            assert_eq!(rotator.index(), expected);
            assert_eq!(rotator.next(), Some(HEALTH_TIPS[expected]));
        }
        assert_eq!(rotator.index(), 0, "should cycle back after len() calls");
        assert_eq!(rotator.next(), Some(HEALTH_TIPS[0]));
    }

    #[test]
    fn test_rotator_is_endless() {
        let rotator = HealthTipRotator::default();
        let taken: Vec<_> = rotator.take(HEALTH_TIPS.len() * 3 + 2).collect();
        assert_eq!(taken.len(), HEALTH_TIPS.len() * 3 + 2);
        assert_eq!(taken[HEALTH_TIPS.len()], HEALTH_TIPS[0]);
    }

    #[test]
    fn test_restart_returns_to_first_tip() {
        let mut rotator = HealthTipRotator::default();
        rotator.next();
        rotator.next();
        rotator.restart();
        assert_eq!(rotator.peek(), HEALTH_TIPS[0]);
    }

    #[test]
    fn test_empty_custom_list_falls_back_to_builtin() {
        let rotator = HealthTipRotator::new(&[]);
        assert_eq!(rotator.len(), HEALTH_TIPS.len());
    }

    #[test]
    fn test_independent_rotators_do_not_share_position() {
        let mut a = HealthTipRotator::default();
        let b = HealthTipRotator::default();
        a.next();
        assert_eq!(a.index(), 1);
        assert_eq!(b.index(), 0);
    }
}
