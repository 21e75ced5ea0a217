use super::types::{Income, RiskAppetite, VaultAllocation, VaultPreferences};

/// Score reported when there is no allocation (or no income) to score.
const DEFAULT_SCORE: u32 = 50;

/// Derives the total monthly income the allocation runs against.
///
/// For variable earners the self-reported monthly average is used verbatim
/// and the itemized figures are ignored, matching the original product
/// behavior even where it surprises (a variable earner's side incomes do not
/// contribute to the total).
pub fn total_monthly_income(income: &Income) -> f64 {
    if income.is_variable {
        return income.average_monthly;
    }
    let side_total: f64 = income.side_incomes.iter().map(|side| side.amount).sum();
    income.primary_income + side_total
}

/// Fixed multiplier applied to the grow vault's raw share.
pub fn risk_factor(appetite: RiskAppetite) -> f64 {
    match appetite {
        RiskAppetite::Conservative => 0.1,
        RiskAppetite::Balanced => 0.2,
        RiskAppetite::Aggressive => 0.4,
    }
}

/// Splits `total_income` across the four vaults.
///
/// Raw shares follow the preference percentages, with the grow share boosted
/// by `1 + risk_factor`. The boost alone would make the shares sum past the
/// income, so every vault is then scaled by `total_income / raw_total`; the
/// result partitions the income exactly while risk-seeking profiles still
/// end up with a relatively larger grow vault.
pub fn allocate_vaults(
    total_income: f64,
    appetite: RiskAppetite,
    preferences: &VaultPreferences,
) -> VaultAllocation {
    let risk = risk_factor(appetite);

    let spend = total_income * preferences.spend / 100.0;
    let save = total_income * preferences.save / 100.0;
    let grow = total_income * preferences.grow / 100.0 * (1.0 + risk);
    let protect = total_income * preferences.protect / 100.0;

    let raw_total = spend + save + grow + protect;
    if raw_total == 0.0 {
        return VaultAllocation::ZERO;
    }

    let normalization = total_income / raw_total;
    VaultAllocation {
        spend: spend * normalization,
        save: save * normalization,
        grow: grow * normalization,
        protect: protect * normalization,
    }
}

/// Computes the ArthaScore, a [0, 100] financial-health score.
///
/// Without an allocation or a positive income there is no basis for the
/// ratios, so the neutral default of 50 is reported instead.
pub fn artha_score(
    allocation: Option<&VaultAllocation>,
    total_income: f64,
    csv_uploaded: bool,
) -> u32 {
    let Some(allocation) = allocation else {
        return DEFAULT_SCORE;
    };
    if total_income == 0.0 {
        return DEFAULT_SCORE;
    }

    let save_ratio = allocation.save / total_income;
    let grow_ratio = allocation.grow / total_income;
    let protect_ratio = allocation.protect / total_income;
    let spend_ratio = allocation.spend / total_income;

    let mut score = 50.0;

    // Richer input data earns a flat bonus regardless of its content.
    if csv_uploaded {
        score += 5.0;
    }

    score += save_ratio * 60.0;
    score += grow_ratio * 50.0;
    score += protect_ratio * 40.0;

    // Spending past 70% of income is penalized on the excess.
    if spend_ratio > 0.7 {
        score -= (spend_ratio - 0.7) * 30.0;
    }

    let is_balanced = save_ratio > 0.15 && grow_ratio > 0.1 && protect_ratio > 0.1;
    if is_balanced {
        score += 5.0;
    }

    score.clamp(0.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SideIncome;
    use proptest::prelude::{prop_assert, prop_assume, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn prefs(spend: f64, save: f64, grow: f64, protect: f64) -> VaultPreferences {
        VaultPreferences {
            spend,
            save,
            grow,
            protect,
        }
    }

    fn fixed_income(primary: f64) -> Income {
        Income {
            primary_income: primary,
            side_incomes: Vec::new(),
            is_variable: false,
            average_monthly: 0.0,
        }
    }

    #[test]
    fn total_income_sums_primary_and_side_incomes() {
        let income = Income {
            primary_income: 3_000.0,
            side_incomes: vec![
                SideIncome {
                    label: "freelance".to_string(),
                    amount: 400.0,
                },
                SideIncome {
                    label: "rent".to_string(),
                    amount: 250.0,
                },
            ],
            is_variable: false,
            average_monthly: 9_999.0,
        };
        assert_approx(total_monthly_income(&income), 3_650.0);
    }

    #[test]
    fn variable_income_returns_average_and_drops_itemized_figures() {
        let income = Income {
            primary_income: 1_000.0,
            side_incomes: vec![SideIncome {
                label: "x".to_string(),
                amount: 500.0,
            }],
            is_variable: true,
            average_monthly: 1_200.0,
        };
        assert_approx(total_monthly_income(&income), 1_200.0);
    }

    #[test]
    fn variable_income_with_zero_average_is_zero() {
        let income = Income {
            primary_income: 5_000.0,
            side_incomes: Vec::new(),
            is_variable: true,
            average_monthly: 0.0,
        };
        assert_approx(total_monthly_income(&income), 0.0);
    }

    #[test]
    fn risk_factor_mapping_is_total() {
        assert_approx(risk_factor(RiskAppetite::Conservative), 0.1);
        assert_approx(risk_factor(RiskAppetite::Balanced), 0.2);
        assert_approx(risk_factor(RiskAppetite::Aggressive), 0.4);
    }

    #[test]
    fn unknown_appetite_string_parses_to_balanced() {
        assert_eq!(RiskAppetite::parse("yolo"), RiskAppetite::Balanced);
        assert_eq!(RiskAppetite::parse(""), RiskAppetite::Balanced);
        let stored: RiskAppetite = serde_json::from_str("\"yolo\"").unwrap();
        assert_eq!(stored, RiskAppetite::Balanced);
        assert_eq!(
            RiskAppetite::parse("conservative"),
            RiskAppetite::Conservative
        );
        assert_eq!(RiskAppetite::parse("aggressive"), RiskAppetite::Aggressive);
    }

    #[test]
    fn allocation_matches_worked_example() {
        let allocation = allocate_vaults(
            50_000.0,
            RiskAppetite::Balanced,
            &prefs(50.0, 20.0, 20.0, 10.0),
        );

        // Raw shares 25000/10000/12000/5000, normalization 50000/52000.
        let factor = 50_000.0 / 52_000.0;
        assert_approx(allocation.spend, 25_000.0 * factor);
        assert_approx(allocation.save, 10_000.0 * factor);
        assert_approx(allocation.grow, 12_000.0 * factor);
        assert_approx(allocation.protect, 5_000.0 * factor);
        assert_approx(allocation.total(), 50_000.0);
    }

    #[test]
    fn zero_income_allocates_nothing() {
        for appetite in [
            RiskAppetite::Conservative,
            RiskAppetite::Balanced,
            RiskAppetite::Aggressive,
        ] {
            let allocation = allocate_vaults(0.0, appetite, &prefs(50.0, 20.0, 20.0, 10.0));
            assert_eq!(allocation, VaultAllocation::ZERO);
        }
    }

    #[test]
    fn all_zero_preferences_allocate_nothing() {
        let allocation = allocate_vaults(
            10_000.0,
            RiskAppetite::Aggressive,
            &prefs(0.0, 0.0, 0.0, 0.0),
        );
        assert_eq!(allocation, VaultAllocation::ZERO);
    }

    #[test]
    fn grow_only_preferences_receive_everything_at_any_appetite() {
        // With no other vault weighted, the risk boost cancels entirely in
        // normalization and grow absorbs the whole income.
        for appetite in [
            RiskAppetite::Conservative,
            RiskAppetite::Balanced,
            RiskAppetite::Aggressive,
        ] {
            let allocation = allocate_vaults(4_200.0, appetite, &prefs(0.0, 0.0, 100.0, 0.0));
            assert_approx(allocation.grow, 4_200.0);
            assert_approx(allocation.spend, 0.0);
        }
    }

    #[test]
    fn score_matches_worked_example() {
        let allocation = allocate_vaults(
            50_000.0,
            RiskAppetite::Balanced,
            &prefs(50.0, 20.0, 20.0, 10.0),
        );
        // save ratio ~0.1923, grow ~0.2308, protect ~0.0962, spend ~0.4808;
        // protect misses the 0.10 balance-bonus threshold, no overspend.
        // 50 + 5 + 11.538 + 11.538 + 3.846 = 81.92 -> 82.
        assert_eq!(artha_score(Some(&allocation), 50_000.0, true), 82);
        assert_eq!(artha_score(Some(&allocation), 50_000.0, false), 77);
    }

    #[test]
    fn score_defaults_without_allocation_or_income() {
        let allocation = VaultAllocation {
            spend: 1.0,
            save: 2.0,
            grow: 3.0,
            protect: 4.0,
        };
        assert_eq!(artha_score(None, 10_000.0, true), 50);
        assert_eq!(artha_score(None, 0.0, false), 50);
        assert_eq!(artha_score(Some(&allocation), 0.0, true), 50);
    }

    #[test]
    fn score_applies_overspend_penalty_on_the_excess() {
        let allocation = VaultAllocation {
            spend: 1_000.0,
            save: 0.0,
            grow: 0.0,
            protect: 0.0,
        };
        // spend ratio 1.0: 50 - (1.0 - 0.7) * 30 = 41.
        assert_eq!(artha_score(Some(&allocation), 1_000.0, false), 41);
    }

    #[test]
    fn score_grants_balance_bonus_when_all_thresholds_clear() {
        let allocation = VaultAllocation {
            spend: 400.0,
            save: 200.0,
            grow: 200.0,
            protect: 200.0,
        };
        // 50 + 0.2*60 + 0.2*50 + 0.2*40 + 5 = 85.
        assert_eq!(artha_score(Some(&allocation), 1_000.0, false), 85);
        assert_eq!(artha_score(Some(&allocation), 1_000.0, true), 90);
    }

    #[test]
    fn score_clamps_to_bounds() {
        let hoarder = VaultAllocation {
            spend: 0.0,
            save: 10_000.0,
            grow: 10_000.0,
            protect: 10_000.0,
        };
        // Ratios of 10 each blow far past 100 before the clamp.
        assert_eq!(artha_score(Some(&hoarder), 1_000.0, true), 100);

        let pathological = VaultAllocation {
            spend: 1_000_000.0,
            save: 0.0,
            grow: 0.0,
            protect: 0.0,
        };
        // Spend ratio 1000 drags the score far below zero before the clamp.
        assert_eq!(artha_score(Some(&pathological), 1_000.0, false), 0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(256))]

        #[test]
        fn allocation_partitions_income(
            income in 0.01f64..1e9,
            spend in 0.0f64..100.0,
            save in 0.0f64..100.0,
            grow in 0.0f64..100.0,
            protect in 0.0f64..100.0,
        ) {
            prop_assume!(spend + save + grow + protect > 0.0);
            for appetite in [
                RiskAppetite::Conservative,
                RiskAppetite::Balanced,
                RiskAppetite::Aggressive,
            ] {
                let allocation =
                    allocate_vaults(income, appetite, &prefs(spend, save, grow, protect));
                prop_assert!(allocation.spend >= 0.0);
                prop_assert!(allocation.save >= 0.0);
                prop_assert!(allocation.grow >= 0.0);
                prop_assert!(allocation.protect >= 0.0);
                let relative_error = (allocation.total() - income).abs() / income;
                prop_assert!(
                    relative_error <= 1e-6,
                    "allocation {:?} does not partition income {income}",
                    allocation
                );
            }
        }

        #[test]
        fn grow_vault_rises_with_risk_appetite(
            income in 1.0f64..1e9,
            grow in 1.0f64..100.0,
            other in 1.0f64..100.0,
        ) {
            // The boost only survives normalization while some other vault
            // carries weight.
            let preferences = prefs(other, 0.0, grow, 0.0);
            let conservative =
                allocate_vaults(income, RiskAppetite::Conservative, &preferences);
            let balanced = allocate_vaults(income, RiskAppetite::Balanced, &preferences);
            let aggressive = allocate_vaults(income, RiskAppetite::Aggressive, &preferences);
            prop_assert!(conservative.grow < balanced.grow);
            prop_assert!(balanced.grow < aggressive.grow);
        }

        #[test]
        fn score_stays_within_bounds_for_adversarial_allocations(
            spend in -1e12f64..1e12,
            save in -1e12f64..1e12,
            grow in -1e12f64..1e12,
            protect in -1e12f64..1e12,
            income in 1e-3f64..1e12,
            csv_uploaded: bool,
        ) {
            let allocation = VaultAllocation { spend, save, grow, protect };
            let score = artha_score(Some(&allocation), income, csv_uploaded);
            prop_assert!(score <= 100);
        }

        #[test]
        fn fixed_income_total_ignores_average(
            primary in 0.0f64..1e9,
            average in 0.0f64..1e9,
        ) {
            let mut income = fixed_income(primary);
            income.average_monthly = average;
            prop_assert!((total_monthly_income(&income) - primary).abs() <= EPS);
        }

        #[test]
        fn variable_income_total_is_average(
            primary in 0.0f64..1e9,
            side in 0.0f64..1e9,
            average in 0.0f64..1e9,
        ) {
            let income = Income {
                primary_income: primary,
                side_incomes: vec![SideIncome {
                    label: "side".to_string(),
                    amount: side,
                }],
                is_variable: true,
                average_monthly: average,
            };
            prop_assert!((total_monthly_income(&income) - average).abs() <= EPS);
        }
    }
}
