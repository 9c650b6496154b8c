//! Locale-aware string ordering for skill names.
//!
//! Uses the CLDR root collation, so accents and case only break ties between
//! names that are otherwise equal (`"apple" < "Banana" < "cherry"`), and
//! letters such as `ß`, `Ł` or `Ø` sort next to their base letters instead
//! of after `z`.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions};

/// Root-locale collator for skill names.
///
/// Build one per sort; construction loads the collation tables.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl NameCollator {
    #[must_use]
    pub fn new() -> Self {
        let collator = match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(c) => Some(c),
            Err(e) => {
                tracing::warn!(error = %e, "root collation unavailable, sorting by code point");
                None
            }
        };
        Self { collator }
    }

    /// Compare two names. Names the collator considers equal (for example
    /// precomposed and decomposed accents) fall back to code point order so
    /// the order is total.
    #[must_use]
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        self.collator
            .as_ref()
            .map_or(Ordering::Equal, |c| c.compare(a, b))
            .then_with(|| a.cmp(b))
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare two strings the way a human-facing sorted list expects.
///
/// Convenience for one-off comparisons; sorting should reuse a
/// [`NameCollator`].
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    NameCollator::new().compare(a, b)
}
