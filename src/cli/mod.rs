use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};

use crate::core::{
    Income, RiskAppetite, SideIncome, UserRecord, VaultAllocation, VaultPreferences,
    allocate_vaults, artha_score, statement_has_rows, total_monthly_income,
    validate_statement_upload,
};
use crate::store::{DEFAULT_KEY, JsonFileStore, ProfileStore};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliRiskAppetite {
    Conservative,
    Balanced,
    Aggressive,
}

impl From<CliRiskAppetite> for RiskAppetite {
    fn from(value: CliRiskAppetite) -> Self {
        match value {
            CliRiskAppetite::Conservative => RiskAppetite::Conservative,
            CliRiskAppetite::Balanced => RiskAppetite::Balanced,
            CliRiskAppetite::Aggressive => RiskAppetite::Aggressive,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "artham",
    about = "Vault budgeting demo: split monthly income into Spend/Save/Grow/Protect and score it"
)]
struct Cli {
    #[arg(
        long,
        default_value = ".artham",
        help = "Directory holding the persisted user record"
    )]
    data_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_KEY, help = "Storage key for the user record")]
    key: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a fresh profile with default preferences
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Update the income record
    Income {
        #[arg(long, help = "Primary monthly income")]
        primary: Option<f64>,
        #[arg(long, help = "Treat income as variable")]
        variable: bool,
        #[arg(long, conflicts_with = "variable", help = "Treat income as fixed")]
        fixed: bool,
        #[arg(long, help = "Average monthly income, used when variable")]
        average_monthly: Option<f64>,
    },
    /// Add a side income entry
    AddSide {
        #[arg(long)]
        label: String,
        #[arg(long)]
        amount: f64,
    },
    /// Set the declared risk appetite
    Risk {
        #[arg(value_enum)]
        appetite: CliRiskAppetite,
    },
    /// Set the target vault split in percent
    Prefs {
        #[arg(long)]
        spend: f64,
        #[arg(long)]
        save: f64,
        #[arg(long)]
        grow: f64,
        #[arg(long)]
        protect: f64,
    },
    /// Register a bank-statement upload (content is never parsed)
    Upload { path: PathBuf },
    /// Run the allocation engine and store the result
    Generate {
        #[arg(long, help = "Print the updated record as JSON")]
        json: bool,
    },
    /// Print the stored record
    Show {
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let store = JsonFileStore::new(&cli.data_dir);
    dispatch(&store, &cli.key, cli.command)
}

fn dispatch(store: &dyn ProfileStore, key: &str, command: Command) -> Result<()> {
    match command {
        Command::Signup { name, email, phone } => {
            if store.load(key)?.is_some() {
                bail!("a profile already exists under key {key:?}");
            }
            let record = UserRecord::new(name, email, phone);
            store.save(key, &record)?;
            println!("Welcome, {}. Set up your income next.", record.profile.name);
            Ok(())
        }
        Command::Income {
            primary,
            variable,
            fixed,
            average_monthly,
        } => {
            let mut record = load_required(store, key)?;
            apply_income_update(
                &mut record.income,
                primary,
                variable,
                fixed,
                average_monthly,
            );
            store.save(key, &record)?;
            print_income(&record.income);
            Ok(())
        }
        Command::AddSide { label, amount } => {
            let mut record = load_required(store, key)?;
            record.income.side_incomes.push(SideIncome { label, amount });
            store.save(key, &record)?;
            print_income(&record.income);
            Ok(())
        }
        Command::Risk { appetite } => {
            let mut record = load_required(store, key)?;
            record.risk_appetite = appetite.into();
            store.save(key, &record)?;
            println!("Risk appetite set to {}.", record.risk_appetite.as_str());
            Ok(())
        }
        Command::Prefs {
            spend,
            save,
            grow,
            protect,
        } => {
            let mut record = load_required(store, key)?;
            record.vault_preferences = VaultPreferences {
                spend,
                save,
                grow,
                protect,
            };
            store.save(key, &record)?;
            let total = spend + save + grow + protect;
            println!("Preferences set ({total}% allocated).");
            Ok(())
        }
        Command::Upload { path } => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if !statement_has_rows(&content) || !validate_statement_upload() {
                bail!("statement needs a header row and at least one data row");
            }
            let mut record = load_required(store, key)?;
            record.csv_uploaded = true;
            store.save(key, &record)?;
            println!("Statement registered.");
            Ok(())
        }
        Command::Generate { json } => {
            let mut record = load_required(store, key)?;
            generate_vaults(&mut record);
            store.save(key, &record)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else if let Some(allocation) = record.vault_allocation {
                print_allocation(allocation, record.profile.artha_score);
            }
            Ok(())
        }
        Command::Show { json } => {
            let record = load_required(store, key)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print_record(&record);
            }
            Ok(())
        }
    }
}

/// The "Generate My Vaults" action: derive total income, run the engine,
/// and fold the results back into the record.
fn generate_vaults(record: &mut UserRecord) {
    let total_income = total_monthly_income(&record.income);
    let allocation = allocate_vaults(
        total_income,
        record.risk_appetite,
        &record.vault_preferences,
    );
    let score = artha_score(Some(&allocation), total_income, record.csv_uploaded);
    record.vault_allocation = Some(allocation);
    record.profile.artha_score = score;
    record.setup_complete = true;
}

fn apply_income_update(
    income: &mut Income,
    primary: Option<f64>,
    variable: bool,
    fixed: bool,
    average_monthly: Option<f64>,
) {
    if let Some(primary) = primary {
        income.primary_income = primary;
    }
    if variable {
        income.is_variable = true;
    } else if fixed {
        income.is_variable = false;
    }
    if let Some(average) = average_monthly {
        income.average_monthly = average;
    }
}

fn load_required(store: &dyn ProfileStore, key: &str) -> Result<UserRecord> {
    store
        .load(key)?
        .with_context(|| format!("no profile under key {key:?}; run `artham signup` first"))
}

fn print_income(income: &Income) {
    println!("Primary income   {:>12.2}", income.primary_income);
    for side in &income.side_incomes {
        println!("  {:<14} {:>12.2}", side.label, side.amount);
    }
    if income.is_variable {
        println!("Variable, avg    {:>12.2}", income.average_monthly);
    }
    println!("Monthly total    {:>12.2}", total_monthly_income(income));
}

fn print_allocation(allocation: VaultAllocation, score: u32) {
    println!("Spend    {:>12.2}", allocation.spend);
    println!("Save     {:>12.2}", allocation.save);
    println!("Grow     {:>12.2}", allocation.grow);
    println!("Protect  {:>12.2}", allocation.protect);
    println!("Total    {:>12.2}", allocation.total());
    println!("ArthaScore {score}");
}

fn print_record(record: &UserRecord) {
    println!(
        "{} <{}>  score {}",
        record.profile.name, record.profile.email, record.profile.artha_score
    );
    print_income(&record.income);
    println!("Risk appetite    {}", record.risk_appetite.as_str());
    let preferences = record.vault_preferences;
    println!(
        "Preferences      spend {}% / save {}% / grow {}% / protect {}%",
        preferences.spend, preferences.save, preferences.grow, preferences.protect
    );
    if let Some(allocation) = record.vault_allocation {
        print_allocation(allocation, record.profile.artha_score);
    }
    println!(
        "Statement uploaded: {}   Setup complete: {}",
        record.csv_uploaded, record.setup_complete
    );
}
