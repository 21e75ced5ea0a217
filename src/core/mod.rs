mod engine;
mod statement;
mod types;

pub use engine::{allocate_vaults, artha_score, risk_factor, total_monthly_income};
pub use statement::{statement_has_rows, validate_statement_upload};
pub use types::{
    Income, RiskAppetite, SCHEMA_VERSION, SideIncome, UserProfile, UserRecord, VaultAllocation,
    VaultPreferences,
};
