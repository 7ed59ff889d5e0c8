use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gross salaries needed for the three lifestyle tiers in one city or
/// neighborhood, plus the monthly figures they were derived from.
///
/// Gross amounts are annual, whole units of `currency`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryTiers {
    pub currency: String,
    pub gross_get_by: Decimal,
    pub gross_comfortable: Decimal,
    pub gross_live_well: Decimal,
    pub monthly_rent_local: Decimal,
    pub monthly_essentials_local: Decimal,
    /// Tax plus deductions as a percentage of `gross_comfortable`, one decimal.
    pub effective_tax_rate: Decimal,
    pub rent_usd: Decimal,
    pub essentials_usd: Decimal,
    pub has_local_deductions: bool,
}

impl SalaryTiers {
    pub fn monthly_total_local(&self) -> Decimal {
        self.monthly_rent_local + self.monthly_essentials_local
    }
}
