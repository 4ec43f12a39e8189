//! 網片與立柱價格表範例
//!
//! 以一組固定變數計算數種規格，輸出推導指標、成本與等級售價。
//! 日誌層級由 `RUST_LOG` 控制，預設 `info`。

use fence_cost::*;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("===== Fence Price Sheet Example =====\n");

    // 步驟 1: 變數組
    println!("[1] Load Variables");
    let calculator = CostCalculator::new(
        general_variables(),
        panel_variables(),
        profile_variables(),
        CalculatorConfig::new().with_tier_margins(TierMargins::new(
            Decimal::from(12),
            Decimal::from(22),
            Decimal::from(35),
        )),
    );
    let rates = calculator.general_variables().exchange_rates();
    println!("    1 USD = {} TRY, 1 EUR = {} USD\n", rates.usd_local, rates.eur_usd);

    // 步驟 2: 規格清單
    println!("[2] Build Request");
    let post = ProfileSpec::new(170.0, true, true).with_accessories(4, 3, 0, 1);
    let request = BatchRequest::new(ProfilePriceBasis::Galvanized)
        .with_panel(PanelSpec::new(PanelFamily::Single, 103.0, 250.0, 4.0, 4.0))
        .with_panel(
            PanelSpec::new(PanelFamily::Single, 153.0, 250.0, 5.0, 5.0)
                .with_set_profile(post.clone().with_unit_count(1)),
        )
        .with_panel(PanelSpec::new(PanelFamily::Double, 183.0, 250.0, 8.0, 6.0))
        .with_panel(
            PanelSpec::new(PanelFamily::Security, 200.0, 200.0, 4.0, 4.0).with_mesh(7.6, 1.27),
        )
        .with_profile(post);
    println!("    Items: {}\n", request.len());

    // 步驟 3: 計算
    println!("[3] Calculate");
    let report = calculator.calculate(&request);
    for failure in &report.failures {
        tracing::error!(
            "第 {} 筆 {:?} {} 計算失敗: {}",
            failure.index,
            failure.kind,
            failure.spec_code,
            failure.error_message
        );
    }

    for panel in &report.panels {
        let m = &panel.metrics;
        println!(
            "    {:<28} {:>6.3} m²  {:>7.3} kg  {:>3} 片/棧板  {:>8.0} 片/月",
            panel.cost.spec_code,
            m.area_m2(),
            m.painted_weight_kg(),
            m.packing.pallet_unit_count,
            m.capacity.monthly_capacity,
        );
    }
    for profile in &report.profiles {
        println!(
            "    {:<28} {:>6.3} m²  {:>7.3} kg (運輸 {:.3} kg)",
            profile.cost.spec_code,
            profile.metrics.surface_area_m2,
            profile.metrics.costing_weight_kg,
            profile.metrics.shipping_weight_kg,
        );
    }
    println!();

    // 步驟 4: 成本與售價
    println!("[4] Costs and Sales Prices (USD / piece)");
    println!(
        "    {:<28} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Spec", "Bare", "Painted", "Bronze", "Silver", "Gold"
    );
    let prices = calculator.sales_prices(&report, CostUnit::Piece, Currency::Usd)?;
    for (cost, price) in report.cost_results().zip(&prices) {
        println!(
            "    {:<28} {:>10} {:>10} {:>10} {:>10} {:>10}",
            cost.spec_code,
            cost.piece_usd(CostBasis::Bare).round_dp(2),
            price.painted_cost.round_dp(2),
            price.price(SalesTier::Bronze).round_dp(2),
            price.price(SalesTier::Silver).round_dp(2),
            price.price(SalesTier::Gold).round_dp(2),
        );
    }
    println!();

    // 步驟 5: 彙總
    println!("[5] Summary");
    let summary = &report.summary;
    println!("    Panels: {}, Profiles: {}", summary.panel_count, summary.profile_count);
    println!("    Total area: {:.2} m²", summary.total_area_m2);
    println!("    Total painted weight: {:.2} kg", summary.total_painted_weight_kg);
    println!(
        "    Total bare / painted: {} / {} USD",
        summary.total_bare_usd.round_dp(2),
        summary.total_painted_usd.round_dp(2)
    );
    for warning in &report.warnings {
        match warning.severity {
            WarningSeverity::Info => tracing::info!("{}: {}", warning.spec_code, warning.message),
            WarningSeverity::Warning => {
                tracing::warn!("{}: {}", warning.spec_code, warning.message)
            }
            WarningSeverity::Error => {
                tracing::error!("{}: {}", warning.spec_code, warning.message)
            }
        }
    }
    if let Some(ms) = report.calculation_time_ms {
        println!("    Elapsed: {} ms", ms);
    }

    Ok(())
}

fn general_variables() -> GeneralVariables {
    GeneralVariables {
        paint_price_per_kg: Decimal::new(32, 1),
        electricity_price_per_kwh: Decimal::new(25, 1),
        gas_price_per_m3: Decimal::from(11),
        fixed_overhead_per_unit: Decimal::new(45, 2),
        average_wage: Decimal::from(28_000),
        usd_local_rate: Decimal::from(30),
        eur_usd_rate: Decimal::new(108, 2),
    }
}

fn panel_variables() -> PanelVariables {
    PanelVariables {
        cutting_workers: Decimal::from(2),
        welding_workers: Decimal::from(3),
        painting_workers: Decimal::from(4),
        cutting_shifts: Decimal::ONE,
        welding_shifts: Decimal::from(2),
        painting_shifts: Decimal::ONE,
        welding_kwh: Decimal::from(85),
        cutting_kwh: Decimal::from(22),
        painting_kwh: Decimal::from(140),
        gas_m3: Decimal::from(18),
        paint_per_m2_single: Decimal::new(12, 2),
        paint_per_m2_double: Decimal::new(18, 2),
        paint_per_m2_security: Decimal::new(22, 2),
        wire_price_per_ton: Decimal::from(760),
    }
}

fn profile_variables() -> ProfileVariables {
    ProfileVariables {
        galvanized_price_per_kg: Decimal::new(115, 2),
        black_price_per_kg: Decimal::new(95, 2),
        capacity_m2_per_hour: Decimal::from(25),
        worker_count: Decimal::from(2),
        shift_count: Decimal::ONE,
        welding_kwh: Decimal::from(30),
        cutting_kwh: Decimal::from(10),
        painting_kwh: Decimal::from(60),
        gas_m3: Decimal::from(8),
        paint_per_m2: Decimal::new(15, 2),
        flange_price: Decimal::new(14, 1),
        screw_price: Decimal::new(5, 2),
        clip_price: Decimal::new(8, 2),
        anchor_price: Decimal::new(6, 1),
        cap_price: Decimal::new(12, 2),
        outer_width_mm: Decimal::from(60),
        outer_height_mm: Decimal::from(40),
        wall_thickness_mm: Decimal::from(2),
    }
}
