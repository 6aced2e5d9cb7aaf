use super::super::domain::{FlagshipTier, InsuranceLine, InsurerCategory};
use super::rules::{Assignment, CategoryRule, CategoryRules, Matcher};
use super::{Classification, PolicyVersion, RatePolicy, TermBucket};

const INLINE_RULES: CategoryRules = CategoryRules::new(
    &[
        CategoryRule {
            matcher: Matcher::Exact(&["한화생명"]),
            assign: Assignment::Flagship(InsuranceLine::Life, FlagshipTier::Life),
        },
        CategoryRule {
            matcher: Matcher::Exact(&["한화손해보험", "삼성화재", "흥국화재", "KB손해보험"]),
            assign: Assignment::Flagship(InsuranceLine::NonLife, FlagshipTier::NonLife250),
        },
        CategoryRule {
            matcher: Matcher::Contains(&["생명"]),
            assign: Assignment::Other(InsuranceLine::Life),
        },
    ],
    Assignment::Other(InsuranceLine::NonLife),
);

/// Product names that lose the summer rate in the screened variant.
const SAVINGS_PRODUCT_KEYWORDS: &[&str] = &["저축", "연금", "일시납"];

/// (short-term, long-term) rate pairs for one category.
struct Schedule {
    convention: (u32, u32),
    summer: (u32, u32),
}

const FLAGSHIP_LIFE: Schedule = Schedule {
    convention: (150, 150),
    summer: (100, 150),
};
const OTHER_LIFE: Schedule = Schedule {
    convention: (50, 100),
    summer: (30, 100),
};
const FLAGSHIP_NON_LIFE: Schedule = Schedule {
    convention: (250, 250),
    summer: (100, 200),
};
const OTHER_NON_LIFE: Schedule = Schedule {
    convention: (200, 200),
    summer: (50, 100),
};

fn schedule_for(category: &InsurerCategory) -> &'static Schedule {
    match category {
        InsurerCategory::Flagship {
            line: InsuranceLine::Life,
            ..
        } => &FLAGSHIP_LIFE,
        InsurerCategory::Flagship {
            line: InsuranceLine::NonLife,
            ..
        } => &FLAGSHIP_NON_LIFE,
        InsurerCategory::Other { line } | InsurerCategory::Line { line } => match line {
            InsuranceLine::Life => &OTHER_LIFE,
            InsuranceLine::NonLife => &OTHER_NON_LIFE,
        },
    }
}

/// Convention/summer rates hard-coded per category.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineRulePolicy {
    screen_savings_products: bool,
}

impl InlineRulePolicy {
    pub const fn new() -> Self {
        Self {
            screen_savings_products: false,
        }
    }

    /// Variant that zeroes the summer rate for savings/pension/lump-sum products.
    pub const fn screened() -> Self {
        Self {
            screen_savings_products: true,
        }
    }

    fn is_savings_product(product_name: Option<&str>) -> bool {
        product_name.is_some_and(|name| {
            SAVINGS_PRODUCT_KEYWORDS
                .iter()
                .any(|keyword| name.contains(keyword))
        })
    }
}

impl RatePolicy for InlineRulePolicy {
    fn version(&self) -> PolicyVersion {
        if self.screen_savings_products {
            PolicyVersion::InlineRuleScreened
        } else {
            PolicyVersion::InlineRule
        }
    }

    fn categorize(&self, insurer: &str) -> InsurerCategory {
        INLINE_RULES.resolve(insurer)
    }

    fn classify(
        &self,
        insurer: &str,
        payment_term_years: u32,
        product_name: Option<&str>,
    ) -> Classification {
        let category = self.categorize(insurer);
        let bucket = TermBucket::from_years(payment_term_years);
        let schedule = schedule_for(&category);

        let convention = bucket.pick(schedule.convention.0, schedule.convention.1);
        let summer = if self.screen_savings_products && Self::is_savings_product(product_name) {
            0
        } else {
            bucket.pick(schedule.summer.0, schedule.summer.1)
        };

        Classification::dual(category, convention, summer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::performance::domain::RateDimension;

    fn rates(policy: &InlineRulePolicy, insurer: &str, term: u32) -> (u32, u32) {
        let outcome = policy.classify(insurer, term, None);
        (
            outcome.rate(RateDimension::Convention).unwrap_or_default(),
            outcome.rate(RateDimension::Summer).unwrap_or_default(),
        )
    }

    #[test]
    fn rate_schedule_matches_each_category() {
        let policy = InlineRulePolicy::new();

        assert_eq!(rates(&policy, "한화생명", 9), (150, 100));
        assert_eq!(rates(&policy, "한화생명", 10), (150, 150));

        assert_eq!(rates(&policy, "삼성생명", 9), (50, 30));
        assert_eq!(rates(&policy, "삼성생명", 10), (100, 100));

        assert_eq!(rates(&policy, "KB손해보험", 9), (250, 100));
        assert_eq!(rates(&policy, "KB손해보험", 10), (250, 200));

        assert_eq!(rates(&policy, "DB손해보험", 9), (200, 50));
        assert_eq!(rates(&policy, "DB손해보험", 10), (200, 100));
    }

    #[test]
    fn unknown_carrier_defaults_to_other_non_life() {
        let policy = InlineRulePolicy::new();
        let outcome = policy.classify("ABC신규보험", 3, None);
        assert_eq!(
            outcome.category,
            InsurerCategory::Other {
                line: InsuranceLine::NonLife
            }
        );
        assert!(outcome.table_gap.is_none());
    }

    #[test]
    fn screened_variant_zeroes_summer_for_savings_products() {
        let policy = InlineRulePolicy::screened();
        let outcome = policy.classify("한화생명", 12, Some("무배당 연금저축보험"));
        assert_eq!(outcome.rate(RateDimension::Convention), Some(150));
        assert_eq!(outcome.rate(RateDimension::Summer), Some(0));

        let protection = policy.classify("한화생명", 12, Some("종신보험"));
        assert_eq!(protection.rate(RateDimension::Summer), Some(150));
    }

    #[test]
    fn plain_variant_ignores_product_name() {
        let policy = InlineRulePolicy::new();
        let outcome = policy.classify("삼성화재", 5, Some("일시납 저축보험"));
        assert_eq!(outcome.rate(RateDimension::Summer), Some(100));
        assert_eq!(policy.version(), PolicyVersion::InlineRule);
        assert_eq!(
            InlineRulePolicy::screened().version(),
            PolicyVersion::InlineRuleScreened
        );
    }
}
