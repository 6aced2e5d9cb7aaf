use super::super::domain::{FlagshipTier, InsuranceLine, InsurerCategory};

/// How a rule tests the trimmed insurer name. Matching is case-sensitive.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Matcher {
    Exact(&'static [&'static str]),
    Contains(&'static [&'static str]),
}

impl Matcher {
    fn matches(&self, insurer: &str) -> bool {
        match self {
            Matcher::Exact(names) => names.contains(&insurer),
            Matcher::Contains(keywords) => keywords.iter().any(|keyword| insurer.contains(keyword)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assignment {
    Flagship(InsuranceLine, FlagshipTier),
    Other(InsuranceLine),
    Line(InsuranceLine),
}

impl Assignment {
    fn category(self, insurer: &str) -> InsurerCategory {
        match self {
            Assignment::Flagship(line, tier) => InsurerCategory::Flagship {
                insurer: insurer.to_string(),
                line,
                tier,
            },
            Assignment::Other(line) => InsurerCategory::Other { line },
            Assignment::Line(line) => InsurerCategory::Line { line },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CategoryRule {
    pub(crate) matcher: Matcher,
    pub(crate) assign: Assignment,
}

/// Ordered rule list: first matching rule wins, `fallback` applies when none do.
/// Exact-name rules are listed before keyword rules by convention.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CategoryRules {
    rules: &'static [CategoryRule],
    fallback: Assignment,
}

impl CategoryRules {
    pub(crate) const fn new(rules: &'static [CategoryRule], fallback: Assignment) -> Self {
        Self { rules, fallback }
    }

    pub(crate) fn resolve(&self, insurer: &str) -> InsurerCategory {
        let insurer = insurer.trim();
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(insurer))
            .map(|rule| rule.assign)
            .unwrap_or(self.fallback)
            .category(insurer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: CategoryRules = CategoryRules::new(
        &[
            CategoryRule {
                matcher: Matcher::Exact(&["한화생명"]),
                assign: Assignment::Flagship(InsuranceLine::Life, FlagshipTier::Life),
            },
            CategoryRule {
                matcher: Matcher::Contains(&["생명"]),
                assign: Assignment::Other(InsuranceLine::Life),
            },
        ],
        Assignment::Other(InsuranceLine::NonLife),
    );

    #[test]
    fn exact_rule_wins_over_keyword_rule() {
        assert_eq!(
            RULES.resolve("한화생명"),
            InsurerCategory::Flagship {
                insurer: "한화생명".to_string(),
                line: InsuranceLine::Life,
                tier: FlagshipTier::Life,
            }
        );
        assert_eq!(
            RULES.resolve("교보생명"),
            InsurerCategory::Other {
                line: InsuranceLine::Life
            }
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(matches!(
            RULES.resolve("  한화생명\t"),
            InsurerCategory::Flagship { ref insurer, .. } if insurer == "한화생명"
        ));
    }

    #[test]
    fn unmatched_names_fall_back() {
        assert_eq!(
            RULES.resolve("ABC신규보험"),
            InsurerCategory::Other {
                line: InsuranceLine::NonLife
            }
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        const LATIN: CategoryRules = CategoryRules::new(
            &[CategoryRule {
                matcher: Matcher::Exact(&["AIG손해보험"]),
                assign: Assignment::Flagship(InsuranceLine::NonLife, FlagshipTier::NonLife200),
            }],
            Assignment::Other(InsuranceLine::NonLife),
        );
        assert!(matches!(
            LATIN.resolve("aig손해보험"),
            InsurerCategory::Other { .. }
        ));
    }
}
