mod city;
mod deduction;
mod exchange_rate;
mod salary_tiers;
mod tax_bracket;

pub use city::{CityRecord, LivingCosts, Neighborhood};
pub use deduction::{
    CountryDeductions, DeductionOverride, DeductionRuleError, OverrideAmount, SocialSecurityRule,
    SolidarityRule,
};
pub use exchange_rate::{ExchangeRateError, ExchangeRates, REFERENCE_CURRENCY};
pub use salary_tiers::SalaryTiers;
pub use tax_bracket::{BracketTable, BracketTableError, TaxBracket};
