//! Bounded strain counters behind the three form fields

use crate::region::Category;

/// Default ceiling of each counter
pub const DEFAULT_MAX: u8 = 10;

/// Neck, back and eye-strain counters, each held in `0..=max`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionCounters {
    values: [u8; 3],
    max: u8,
}

impl Default for RegionCounters {
    fn default() -> Self {
        Self::with_max(DEFAULT_MAX)
    }
}

impl RegionCounters {
    pub fn with_max(max: u8) -> Self {
        Self { values: [0; 3], max }
    }

    pub fn max(&self) -> u8 {
        self.max
    }

    pub fn get(&self, category: Category) -> u8 {
        self.values[category.index()]
    }

    /// Set a counter, clamping to the ceiling
    pub fn set(&mut self, category: Category, value: u8) {
        self.values[category.index()] = value.min(self.max);
    }

    /// Add one unless already at the ceiling. Returns whether the value changed.
    pub fn increment(&mut self, category: Category) -> bool {
        let slot = &mut self.values[category.index()];
        if *slot < self.max {
            *slot += 1;
            true
        } else {
            false
        }
    }

    pub fn is_saturated(&self, category: Category) -> bool {
        self.get(category) >= self.max
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u8)> + '_ {
        Category::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    /// Read a form field value into a counter
    pub fn set_from_field(&mut self, category: Category, text: &str) {
        let value = parse_field_value(text, self.max);
        self.set(category, value);
    }
}

/// Lenient integer parse for form input text.
///
/// Accepts leading whitespace, an optional sign and leading digits, ignoring
/// anything after them ("7 days" reads as 7). Text without leading digits
/// reads as 0. The result is clamped into `0..=max`.
pub fn parse_field_value(text: &str, max: u8) -> u8 {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let digits: &str = {
        let end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        &rest[..end]
    };

    if negative || digits.is_empty() {
        return 0;
    }

    // Anything that overflows u32 is far past the ceiling anyway
    let value = digits.parse::<u32>().unwrap_or(u32::MAX);
    value.min(max as u32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increment_below_ceiling() {
        let mut counters = RegionCounters::default();
        for expected in 1..=10 {
            assert!(counters.increment(Category::Neck));
            assert_eq!(counters.get(Category::Neck), expected);
        }
        // Other counters untouched
        assert_eq!(counters.get(Category::Back), 0);
        assert_eq!(counters.get(Category::EyeStrain), 0);
    }

    #[test]
    fn test_increment_idempotent_at_ceiling() {
        let mut counters = RegionCounters::default();
        counters.set(Category::Back, 10);
        assert!(counters.is_saturated(Category::Back));
        assert!(!counters.increment(Category::Back));
        assert!(!counters.increment(Category::Back));
        assert_eq!(counters.get(Category::Back), 10);
    }

    #[test]
    fn test_set_clamps() {
        let mut counters = RegionCounters::with_max(5);
        counters.set(Category::EyeStrain, 200);
        assert_eq!(counters.get(Category::EyeStrain), 5);
    }

    #[test]
    fn test_parse_field_value() {
        assert_eq!(parse_field_value("7", 10), 7);
        assert_eq!(parse_field_value("  3", 10), 3);
        assert_eq!(parse_field_value("+4", 10), 4);
        assert_eq!(parse_field_value("7 days", 10), 7);
        assert_eq!(parse_field_value("", 10), 0);
        assert_eq!(parse_field_value("abc", 10), 0);
        assert_eq!(parse_field_value("-3", 10), 0);
        assert_eq!(parse_field_value("42", 10), 10);
        assert_eq!(parse_field_value("99999999999999999999", 10), 10);
    }

    #[test]
    fn test_set_from_field() {
        let mut counters = RegionCounters::default();
        counters.set_from_field(Category::Neck, "9");
        assert_eq!(counters.get(Category::Neck), 9);
        counters.set_from_field(Category::Neck, "oops");
        assert_eq!(counters.get(Category::Neck), 0);
    }
}
