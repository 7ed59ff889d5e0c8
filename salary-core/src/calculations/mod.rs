//! Salary calculations: progressive tax, mandatory deductions, the
//! net-to-gross inversion, and the affordability tiers built on top of them.

pub mod common;
pub mod deductions;
pub mod inversion;
pub mod profile;
pub mod tax;
pub mod tiers;

pub use deductions::compute_deductions;
pub use inversion::{InversionConfig, InversionError, gross_from_net};
pub use profile::{MissingTaxDataPolicy, TaxProfile};
pub use tax::compute_tax;
pub use tiers::{MonthlyBudgets, TierCalculator, TierError};
