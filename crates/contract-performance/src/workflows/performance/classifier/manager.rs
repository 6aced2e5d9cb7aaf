use super::super::domain::{InsuranceLine, InsurerCategory, RateDimension};
use super::rules::{Assignment, CategoryRule, CategoryRules, Matcher};
use super::{Classification, DimensionRate, PolicyVersion, RatePolicy, TermBucket};

const MANAGER_RULES: CategoryRules = CategoryRules::new(
    &[CategoryRule {
        matcher: Matcher::Contains(&["손해", "손보", "화재", "해상"]),
        assign: Assignment::Line(InsuranceLine::NonLife),
    }],
    Assignment::Line(InsuranceLine::Life),
);

const SHORT_TERM_RATE: u32 = 50;
const LONG_TERM_LIFE_RATE: u32 = 80;
const LONG_TERM_NON_LIFE_RATE: u32 = 150;

/// Two-tier life/non-life manager score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManagerScorePolicy;

impl RatePolicy for ManagerScorePolicy {
    fn version(&self) -> PolicyVersion {
        PolicyVersion::ManagerScore
    }

    fn categorize(&self, insurer: &str) -> InsurerCategory {
        MANAGER_RULES.resolve(insurer)
    }

    fn classify(
        &self,
        insurer: &str,
        payment_term_years: u32,
        _product_name: Option<&str>,
    ) -> Classification {
        let category = self.categorize(insurer);
        let long_term_rate = match category.line() {
            InsuranceLine::Life => LONG_TERM_LIFE_RATE,
            InsuranceLine::NonLife => LONG_TERM_NON_LIFE_RATE,
        };
        let rate = TermBucket::from_years(payment_term_years).pick(SHORT_TERM_RATE, long_term_rate);

        Classification {
            category,
            rates: vec![DimensionRate {
                dimension: RateDimension::Manager,
                rate,
            }],
            table_gap: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(insurer: &str, term: u32) -> Option<u32> {
        ManagerScorePolicy
            .classify(insurer, term, None)
            .rate(RateDimension::Manager)
    }

    #[test]
    fn non_life_keywords_select_non_life() {
        for insurer in ["삼성화재", "현대해상", "KB손보", "DB손해보험"] {
            assert_eq!(
                ManagerScorePolicy.categorize(insurer),
                InsurerCategory::Line {
                    line: InsuranceLine::NonLife
                },
                "{insurer}"
            );
        }
    }

    #[test]
    fn everything_else_is_life() {
        for insurer in ["한화생명", "신한라이프", "ABC신규보험"] {
            assert_eq!(
                ManagerScorePolicy.categorize(insurer).line(),
                InsuranceLine::Life,
                "{insurer}"
            );
        }
    }

    #[test]
    fn short_term_is_fifty_for_both_lines() {
        assert_eq!(rate("한화생명", 9), Some(50));
        assert_eq!(rate("삼성화재", 9), Some(50));
    }

    #[test]
    fn long_term_depends_on_line() {
        assert_eq!(rate("한화생명", 10), Some(80));
        assert_eq!(rate("삼성화재", 10), Some(150));
    }

    #[test]
    fn product_name_does_not_change_the_rate() {
        let outcome = ManagerScorePolicy.classify("한화생명", 20, Some("연금저축"));
        assert_eq!(outcome.rate(RateDimension::Manager), Some(80));
    }
}
