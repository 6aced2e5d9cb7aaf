use super::super::domain::{FlagshipTier, InsuranceLine, InsurerCategory};
use super::rate_table::{RateKey, RateTable};
use super::rules::{Assignment, CategoryRule, CategoryRules, Matcher};
use super::{Classification, PolicyVersion, RatePolicy, TermBucket};

const FLAGSHIP_LIFE: &[&str] = &["한화생명"];
const FLAGSHIP_NON_LIFE_250: &[&str] = &["한화손해보험", "삼성화재", "흥국화재", "KB손해보험"];
const FLAGSHIP_NON_LIFE_200: &[&str] = &[
    "롯데손해보험",
    "메리츠화재",
    "현대해상",
    "DB손해보험",
    "MG손해보험",
    "하나손해보험",
    "AIG손해보험",
];

const LOOKUP_RULES: CategoryRules = CategoryRules::new(
    &[
        CategoryRule {
            matcher: Matcher::Exact(FLAGSHIP_LIFE),
            assign: Assignment::Flagship(InsuranceLine::Life, FlagshipTier::Life),
        },
        CategoryRule {
            matcher: Matcher::Exact(FLAGSHIP_NON_LIFE_250),
            assign: Assignment::Flagship(InsuranceLine::NonLife, FlagshipTier::NonLife250),
        },
        CategoryRule {
            matcher: Matcher::Exact(FLAGSHIP_NON_LIFE_200),
            assign: Assignment::Flagship(InsuranceLine::NonLife, FlagshipTier::NonLife200),
        },
        CategoryRule {
            matcher: Matcher::Contains(&["생명"]),
            assign: Assignment::Other(InsuranceLine::Life),
        },
    ],
    Assignment::Other(InsuranceLine::NonLife),
);

/// Convention/summer rates resolved through an external [`RateTable`].
#[derive(Debug, Clone, Default)]
pub struct LookupTablePolicy {
    table: RateTable,
}

impl LookupTablePolicy {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RateTable {
        &self.table
    }
}

impl RatePolicy for LookupTablePolicy {
    fn version(&self) -> PolicyVersion {
        PolicyVersion::LookupTable
    }

    fn categorize(&self, insurer: &str) -> InsurerCategory {
        LOOKUP_RULES.resolve(insurer)
    }

    fn classify(
        &self,
        insurer: &str,
        payment_term_years: u32,
        _product_name: Option<&str>,
    ) -> Classification {
        let category = self.categorize(insurer);
        let key = RateKey::for_category(&category, TermBucket::from_years(payment_term_years));

        match self.table.get(&key) {
            Some(pair) => Classification::dual(category, pair.convention, pair.summer),
            None => {
                let mut classification = Classification::dual(category, 0, 0);
                classification.table_gap = Some(key);
                classification
            }
        }
    }
}
