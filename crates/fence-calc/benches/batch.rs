use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fence_calc::{BatchRequest, CostCalculator};
use fence_core::{
    CalculatorConfig, GeneralVariables, PanelFamily, PanelSpec, PanelVariables, ProfilePriceBasis,
    ProfileSpec, ProfileVariables,
};
use rust_decimal::Decimal;

fn calculator(parallel: bool) -> CostCalculator {
    let general = GeneralVariables {
        paint_price_per_kg: Decimal::from(3),
        electricity_price_per_kwh: Decimal::from(3),
        gas_price_per_m3: Decimal::from(12),
        fixed_overhead_per_unit: Decimal::new(5, 1),
        average_wage: Decimal::from(30_000),
        usd_local_rate: Decimal::from(30),
        eur_usd_rate: Decimal::new(108, 2),
    };
    let panel = PanelVariables {
        cutting_workers: Decimal::from(2),
        welding_workers: Decimal::from(3),
        painting_workers: Decimal::from(4),
        cutting_shifts: Decimal::ONE,
        welding_shifts: Decimal::from(2),
        painting_shifts: Decimal::ONE,
        wire_price_per_ton: Decimal::from(800),
        ..Default::default()
    };
    let profile = ProfileVariables {
        galvanized_price_per_kg: Decimal::new(12, 1),
        capacity_m2_per_hour: Decimal::from(30),
        worker_count: Decimal::from(2),
        shift_count: Decimal::ONE,
        outer_width_mm: Decimal::from(60),
        outer_height_mm: Decimal::from(40),
        wall_thickness_mm: Decimal::from(2),
        ..Default::default()
    };

    CostCalculator::new(
        general,
        panel,
        profile,
        CalculatorConfig::new().with_parallel(parallel),
    )
}

fn request(size: usize) -> BatchRequest {
    let families = [PanelFamily::Single, PanelFamily::Double, PanelFamily::Security];
    let panels = (0..size).map(|i| {
        let family = families[i % families.len()];
        let height = 63.0 + (i % 10) as f64 * 20.0;
        PanelSpec::new(family, height, 250.0, 5.0, 4.0)
            .with_set_profile(ProfileSpec::new(height + 40.0, true, true).with_unit_count(1))
    });
    let profiles = (0..size / 4).map(|i| ProfileSpec::new(150.0 + i as f64, i % 2 == 0, true));

    BatchRequest::new(ProfilePriceBasis::Galvanized)
        .with_panels(panels)
        .with_profiles(profiles)
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    for size in [100, 1_000] {
        let request = request(size);
        for parallel in [false, true] {
            let calc = calculator(parallel);
            let label = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(label, size), &request, |b, request| {
                b.iter(|| calc.calculate(black_box(request)))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_batch);
criterion_main!(benches);
