//! 集成測試

use fence_cost::fence_calc::profile_metrics::FLANGE_WEIGHT_KG;
use fence_cost::*;
use rstest::rstest;
use rust_decimal::Decimal;
use serde_json::json;

fn general_raw() -> RawBundle {
    json!({
        "paint_price_per_kg": "3,2",
        "electricity_price_per_kwh": "2,5",
        "gas_price_per_m3": "11",
        "fixed_overhead_per_unit": "0,45",
        "average_wage": "28 000",
        "usd_local_rate": "30",
        "eur_usd_rate": "1,08",
    })
    .as_object()
    .map(|m| m.clone().into_iter().collect())
    .unwrap()
}

fn panel_raw() -> RawBundle {
    json!({
        "cutting_workers": 2,
        "welding_workers": 3,
        "painting_workers": 4,
        "cutting_shifts": 1,
        "welding_shifts": 2,
        "painting_shifts": 1,
        "welding_kwh": 85,
        "cutting_kwh": 22,
        "painting_kwh": 140,
        "gas_m3": 18,
        "paint_per_m2_single": "0,12",
        "paint_per_m2_double": "0,18",
        "paint_per_m2_security": "0,22",
        "wire_price_per_ton": 760,
    })
    .as_object()
    .map(|m| m.clone().into_iter().collect())
    .unwrap()
}

fn profile_raw() -> RawBundle {
    json!({
        "galvanized_price_per_kg": "1,15",
        "black_price_per_kg": "0,95",
        "capacity_m2_per_hour": 25,
        "worker_count": 2,
        "shift_count": 1,
        "welding_kwh": 30,
        "cutting_kwh": 10,
        "painting_kwh": 60,
        "gas_m3": 8,
        "paint_per_m2": "0,15",
        "flange_price": "1,4",
        "screw_price": "0,05",
        "clip_price": "0,08",
        "anchor_price": "0,6",
        "cap_price": "0,12",
        "outer_width_mm": 60,
        "outer_height_mm": 40,
        "wall_thickness_mm": 2,
    })
    .as_object()
    .map(|m| m.clone().into_iter().collect())
    .unwrap()
}

fn calculator(config: CalculatorConfig) -> CostCalculator {
    CostCalculator::from_raw(&general_raw(), &panel_raw(), &profile_raw(), config).unwrap()
}

fn assert_close(a: Decimal, b: Decimal) {
    assert!((a - b).abs() < Decimal::new(1, 9), "{a} != {b}");
}

#[test]
fn test_complete_variables_produce_no_warnings() {
    let calc = calculator(CalculatorConfig::new());

    assert!(calc.variable_warnings().is_empty());
    assert_eq!(calc.general_variables().average_wage, Decimal::from(28_000));
    assert_eq!(calc.general_variables().eur_usd_rate, Decimal::new(108, 2));
}

#[test]
fn test_boundary_single_panel() {
    // 單片網 100×250，線徑 4/4，網目 20×5
    let calc = calculator(CalculatorConfig::new());
    let spec = PanelSpec::new(PanelFamily::Single, 100.0, 250.0, 4.0, 4.0).with_mesh(20.0, 5.0);

    let result = calc
        .calculate_panel(&spec, ProfilePriceBasis::Galvanized)
        .unwrap();

    assert_eq!(result.metrics.geometry.bend_count, 2);
    assert_eq!(result.metrics.geometry.vertical_bar_count, 51);
    assert!(result.metrics.base_weight_kg() > 0.0);
    assert_eq!(result.metrics.packing.empty_pallet_weight_kg, 24.0);
    assert!(result.warnings.is_empty());
}

#[rstest]
#[case(PanelSpec::new(PanelFamily::Single, 153.0, 250.0, 4.0, 4.0))]
#[case(PanelSpec::new(PanelFamily::Double, 183.0, 250.0, 6.0, 5.0))]
#[case(PanelSpec::new(PanelFamily::Security, 200.0, 200.0, 4.0, 4.0).with_mesh(7.6, 1.27))]
fn test_painted_equals_bare_plus_paint(#[case] spec: PanelSpec) {
    let calc = calculator(CalculatorConfig::new());
    let cost = calc
        .calculate_panel(&spec, ProfilePriceBasis::Galvanized)
        .unwrap()
        .cost;

    assert_close(
        cost.piece_usd(CostBasis::Painted) - cost.piece_usd(CostBasis::Bare),
        cost.paint_component_usd,
    );
}

#[test]
fn test_currency_conversion_scenario() {
    let calc = calculator(CalculatorConfig::new());
    let rates = calc.general_variables().exchange_rates();

    let amount = PriceCalculator::convert(Decimal::from(10), &rates).unwrap();

    assert_eq!(amount.tl, Decimal::from(300));
    assert_eq!(amount.eur.round_dp(3), Decimal::new(9259, 3));
}

#[test]
fn test_every_matrix_cell_converts_consistently() {
    let calc = calculator(CalculatorConfig::new());
    let spec = PanelSpec::new(PanelFamily::Double, 123.0, 250.0, 6.0, 5.0)
        .with_set_profile(ProfileSpec::new(170.0, true, true).with_unit_count(2));
    let cost = calc
        .calculate_panel(&spec, ProfilePriceBasis::Galvanized)
        .unwrap()
        .cost;

    for (_, _, amount) in cost.matrix.entries() {
        assert!((amount.eur * Decimal::new(108, 2) - amount.usd).abs() < Decimal::new(1, 9));
        assert_eq!(amount.tl, amount.usd * Decimal::from(30));
    }
}

#[test]
fn test_profile_flange_asymmetry() {
    let calc = calculator(CalculatorConfig::new());
    let flanged = ProfileSpec::new(200.0, true, true);
    let plain = ProfileSpec::new(200.0, true, false);

    let flanged = calc
        .calculate_profile(&flanged, ProfilePriceBasis::Galvanized)
        .unwrap();
    let plain = calc
        .calculate_profile(&plain, ProfilePriceBasis::Galvanized)
        .unwrap();

    assert!(flanged.metrics.coating_weight_kg > 0.0);
    assert_eq!(flanged.metrics.costing_weight_kg, plain.metrics.costing_weight_kg);
    assert!(
        (flanged.metrics.shipping_weight_kg - flanged.metrics.costing_weight_kg - FLANGE_WEIGHT_KG)
            .abs()
            < 1e-12
    );
    // 材料成本只依成本重量，法蘭不影響
    assert_eq!(flanged.cost.breakdown.material, plain.cost.breakdown.material);
}

#[test]
fn test_margin_scenario() {
    let calc = calculator(CalculatorConfig::new());
    let report = calc.calculate(
        &BatchRequest::new(ProfilePriceBasis::Galvanized)
            .with_panel(PanelSpec::new(PanelFamily::Single, 103.0, 250.0, 4.0, 4.0)),
    );
    let cost = &report.panels[0].cost;

    let prices = calc
        .sales_prices(&report, CostUnit::Piece, Currency::Usd)
        .unwrap();
    assert_eq!(prices[0].painted_cost, cost.piece_usd(CostBasis::Painted));

    assert_eq!(
        PriceCalculator::apply_margin(Decimal::from(100), Decimal::from(10)).unwrap(),
        Decimal::new(11000, 2)
    );
}

#[test]
fn test_batch_failure_isolation() {
    let calc = calculator(CalculatorConfig::new());
    let request = BatchRequest::new(ProfilePriceBasis::NonGalvanized)
        .with_panel(PanelSpec::new(PanelFamily::Single, 123.0, 250.0, 4.0, 4.0))
        .with_panel(PanelSpec::new(PanelFamily::Double, 163.0, -250.0, 6.0, 5.0))
        .with_profile(ProfileSpec::new(f64::NAN, false, false))
        .with_profile(ProfileSpec::new(150.0, false, true));

    let report = calc.calculate(&request);

    assert_eq!(report.panels.len(), 1);
    assert_eq!(report.profiles.len(), 1);
    assert_eq!(report.failures.len(), 2);
    assert_eq!(report.summary.failure_count, 2);
    assert!(report.has_failures());
    assert!(report
        .failures
        .iter()
        .all(|f| !f.error_message.is_empty()));
}

#[test]
fn test_oversized_panel_does_not_abort_batch() {
    let calc = calculator(CalculatorConfig::new());
    let request = BatchRequest::new(ProfilePriceBasis::Galvanized)
        .with_panel(PanelSpec::new(PanelFamily::Single, 100.0, 250.0, 4.0, 4.0))
        .with_panel(
            PanelSpec::new(PanelFamily::Double, 1e15, 1e16, 6.0, 5.0).with_mesh(1e10, 1e10),
        )
        .with_panel(PanelSpec::new(PanelFamily::Double, 183.0, 250.0, 6.0, 5.0));

    let report = calc.calculate(&request);

    assert_eq!(report.panels.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].index, 1);
    assert!(report.failures[0].error_message.starts_with("計算錯誤"));
    assert!(report.summary.total_painted_usd > Decimal::ZERO);
}

#[test]
fn test_profile_coating_and_price_basis_disagree() {
    let calc = calculator(CalculatorConfig::new());
    let report = calc.calculate(
        &BatchRequest::new(ProfilePriceBasis::NonGalvanized)
            .with_profile(ProfileSpec::new(200.0, true, false))
            .with_profile(ProfileSpec::new(200.0, false, false)),
    );

    assert_eq!(report.profiles.len(), 2);
    assert_eq!(report.profiles[0].warnings.len(), 1);
    assert!(report.profiles[1].warnings.is_empty());
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].severity, WarningSeverity::Warning);
}

#[test]
fn test_idempotent_and_parallel_consistent() {
    let request = BatchRequest::new(ProfilePriceBasis::Galvanized)
        .with_panels([63.0, 103.0, 153.0, 203.0].map(|h| {
            PanelSpec::new(PanelFamily::Single, h, 250.0, 4.0, 4.0)
        }))
        .with_panels([83.0, 143.0, 203.0].map(|h| {
            PanelSpec::new(PanelFamily::Double, h, 250.0, 8.0, 6.0)
        }))
        .with_profile(ProfileSpec::new(220.0, true, true).with_accessories(4, 3, 1, 1));

    let sequential = calculator(CalculatorConfig::new().with_parallel(false));
    let parallel = calculator(CalculatorConfig::new().with_parallel(true));

    let first = sequential.calculate(&request);
    let second = sequential.calculate(&request);
    let fanned = parallel.calculate(&request);

    assert_eq!(first.panels, second.panels);
    assert_eq!(first.profiles, second.profiles);
    assert_eq!(first.panels, fanned.panels);
    assert_eq!(first.summary, fanned.summary);
    assert_ne!(first.run_id, second.run_id);
}

#[test]
fn test_missing_variables_policy() {
    let mut general = general_raw();
    general.insert("gas_price_per_m3".to_string(), json!(""));
    general.remove("average_wage");

    let proceed =
        CostCalculator::from_raw(&general, &panel_raw(), &profile_raw(), CalculatorConfig::new())
            .unwrap();
    assert_eq!(proceed.variable_warnings().len(), 2);
    assert!(proceed
        .variable_warnings()
        .iter()
        .all(|w| w.severity == WarningSeverity::Warning));
    assert_eq!(proceed.general_variables().gas_price_per_m3, Decimal::ZERO);

    let abort = CostCalculator::from_raw(
        &general,
        &panel_raw(),
        &profile_raw(),
        CalculatorConfig::new().with_missing_variable_policy(MissingVariablePolicy::Abort),
    );
    match abort {
        Err(CostError::MissingVariables(fields)) => {
            assert_eq!(fields.len(), 2);
            assert!(fields.contains(&"general.average_wage".to_string()));
        }
        _ => panic!("expected MissingVariables"),
    }
}

#[test]
fn test_report_json_export() {
    let calc = calculator(CalculatorConfig::new());
    let report = calc.calculate(
        &BatchRequest::new(ProfilePriceBasis::Galvanized)
            .with_panel(PanelSpec::new(PanelFamily::Single, 123.0, 250.0, 4.0, 4.0))
            .with_profile(ProfileSpec::new(150.0, true, false)),
    );

    let exported = report.to_json().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&exported).unwrap();

    assert_eq!(parsed["summary"]["panel_count"], 1);
    assert_eq!(parsed["summary"]["profile_count"], 1);
    assert_eq!(parsed["run_id"], json!(report.run_id.to_string()));
}
