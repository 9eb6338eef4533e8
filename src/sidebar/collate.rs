use feruca::Collator;
use std::cmp::Ordering;

/// Locale-aware string ordering for display titles.
///
/// Uses the Unicode Collation Algorithm with CLDR root tailoring, so case
/// and accents are secondary to the base letters ("beta" sorts before
/// "Charlie", "Émile" before "Fox").
pub struct LocaleOrder {
    collator: Collator,
}

impl LocaleOrder {
    pub fn new() -> Self {
        Self {
            collator: Collator::default(),
        }
    }

    pub fn compare(&mut self, a: &str, b: &str) -> Ordering {
        self.collator.collate(a, b)
    }
}

impl Default for LocaleOrder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut values: Vec<&str>) -> Vec<&str> {
        let mut order = LocaleOrder::new();
        values.sort_by(|a, b| order.compare(a, b));
        values
    }

    #[test]
    fn test_case_does_not_dominate() {
        assert_eq!(
            sorted(vec!["Charlie", "beta", "Alpha"]),
            vec!["Alpha", "beta", "Charlie"]
        );
    }

    #[test]
    fn test_accents_sort_with_base_letter() {
        assert_eq!(
            sorted(vec!["Fox", "Émile", "Eagle"]),
            vec!["Eagle", "Émile", "Fox"]
        );
    }

    #[test]
    fn test_equal_strings_compare_equal() {
        let mut order = LocaleOrder::new();
        assert_eq!(order.compare("News", "News"), Ordering::Equal);
    }
}
