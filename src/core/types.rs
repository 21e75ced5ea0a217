use serde::{Deserialize, Deserializer, Serialize};

/// Current persisted shape of [`UserRecord`]. Version 1 blobs carried flat
/// `monthlyIncome` / `additionalIncome` / `variableIncome` fields; version 2
/// nests them under an `income` record.
pub const SCHEMA_VERSION: u32 = 2;

/// Declared appetite for investment risk. Only affects the grow vault.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAppetite {
    Conservative,
    #[default]
    Balanced,
    Aggressive,
}

/// Stored blobs may carry appetite strings this version has never heard of;
/// they load as `Balanced` instead of failing the whole record.
impl<'de> Deserialize<'de> for RiskAppetite {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(RiskAppetite::parse(&value))
    }
}

impl RiskAppetite {
    /// Parses a stored appetite string. Anything unrecognized falls back to
    /// `Balanced`, the engine's defensive default.
    pub fn parse(value: &str) -> Self {
        match value {
            "conservative" => RiskAppetite::Conservative,
            "aggressive" => RiskAppetite::Aggressive,
            _ => RiskAppetite::Balanced,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskAppetite::Conservative => "conservative",
            RiskAppetite::Balanced => "balanced",
            RiskAppetite::Aggressive => "aggressive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideIncome {
    pub label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub primary_income: f64,
    pub side_incomes: Vec<SideIncome>,
    pub is_variable: bool,
    /// Self-reported monthly average, only meaningful when `is_variable`.
    pub average_monthly: f64,
}

/// User-chosen target split across the four vaults, in percent. The UI keeps
/// these summing to 100 but the engine never assumes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPreferences {
    pub spend: f64,
    pub save: f64,
    pub grow: f64,
    pub protect: f64,
}

/// Monetary split of one month's income across the four vaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAllocation {
    pub spend: f64,
    pub save: f64,
    pub grow: f64,
    pub protect: f64,
}

impl VaultAllocation {
    pub const ZERO: VaultAllocation = VaultAllocation {
        spend: 0.0,
        save: 0.0,
        grow: 0.0,
        protect: 0.0,
    };

    pub fn total(self) -> f64 {
        self.spend + self.save + self.grow + self.protect
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo: String,
    pub artha_score: u32,
}

/// The full persisted user record. One blob per user, replaced wholesale on
/// every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub profile: UserProfile,
    pub income: Income,
    #[serde(default)]
    pub risk_appetite: RiskAppetite,
    pub vault_preferences: VaultPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_allocation: Option<VaultAllocation>,
    #[serde(default)]
    pub csv_uploaded: bool,
    #[serde(default)]
    pub setup_complete: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl UserRecord {
    /// Fresh record created at signup, before the settings wizard runs.
    pub fn new(name: String, email: String, phone: String) -> Self {
        UserRecord {
            schema_version: SCHEMA_VERSION,
            profile: UserProfile {
                name,
                email,
                phone,
                photo: String::new(),
                artha_score: 50,
            },
            income: Income::default(),
            risk_appetite: RiskAppetite::Balanced,
            vault_preferences: VaultPreferences {
                spend: 50.0,
                save: 20.0,
                grow: 20.0,
                protect: 10.0,
            },
            vault_allocation: Some(VaultAllocation::ZERO),
            csv_uploaded: false,
            setup_complete: false,
        }
    }
}
