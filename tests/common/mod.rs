//! Shared heating-sector scenario.
//!
//! Two technologies (boiler, heatpump), one region, two end-use commodities
//! (heat, cook), two time-slices and two existing assets.

#![allow(dead_code)]

use investlp::prelude::*;

pub const YEAR: i64 = 2020;

/// Route library logs to the test harness; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn ax<L: Into<Label>>(name: &str, labels: impl IntoIterator<Item = L>) -> Axis {
    Axis::from_labels(name, labels).unwrap()
}

pub fn timeslices() -> Timeslices {
    Timeslices::uniform(ax("timeslice", ["day", "night"])).unwrap()
}

fn per_tech(values: [f64; 2]) -> NamedArray {
    NamedArray::from_vec(vec![ax("technology", ["boiler", "heatpump"])], values.to_vec())
        .unwrap()
}

pub fn technologies() -> Technologies {
    let commodity = |id: &str, usage| Commodity {
        id: id.into(),
        usage,
    };
    Technologies::new(
        NamedArray::from_vec(
            vec![
                ax("technology", ["boiler", "heatpump"]),
                ax("commodity", ["heat", "cook", "CO2"]),
            ],
            vec![1.0, 0.5, 0.3, 2.0, 0.0, 0.0],
        )
        .unwrap(),
        per_tech([0.9, 0.8]),
        per_tech([10.0, 10.0]),
        per_tech([0.2, 0.2]),
        per_tech([100.0, 100.0]),
        vec![
            commodity("heat", CommodityUsage::EndUse),
            commodity("cook", CommodityUsage::EndUse),
            commodity("CO2", CommodityUsage::Environmental),
        ],
    )
    .unwrap()
}

pub fn assets() -> Assets {
    // a0 is a boiler retiring 1 unit every 5 years, a1 a heatpump not yet built
    Assets::new(
        NamedArray::from_vec(
            vec![
                ax("asset", ["a0", "a1"]),
                ax("year", [2020, 2025, 2030]),
                ax("region", ["r1"]),
            ],
            vec![5.0, 4.0, 3.0, 0.0, 0.0, 0.0],
        )
        .unwrap(),
        vec!["boiler".into(), "heatpump".into()],
    )
    .unwrap()
}

pub fn search_space() -> SearchSpace {
    SearchSpace::new(
        NamedArray::full(
            vec![ax("asset", ["a0", "a1"]), ax("replacement", ["boiler", "heatpump"])],
            1.0,
        )
        .unwrap(),
    )
    .unwrap()
}

pub fn market() -> Market {
    // heat 1.0 and cook 0.2 in every time-slice, flat over the years
    let consumption = NamedArray::from_fn(
        vec![
            ax("year", [2020, 2025, 2030]),
            ax("commodity", ["heat", "cook"]),
            ax("timeslice", ["day", "night"]),
            ax("region", ["r1"]),
        ],
        |ix| if ix[1] == 0 { 1.0 } else { 0.2 },
    )
    .unwrap();
    Market::new(consumption, timeslices()).unwrap()
}

/// Capacity costs over asset × replacement.
pub fn costs() -> NamedArray {
    NamedArray::from_vec(
        vec![ax("asset", ["a0", "a1"]), ax("replacement", ["boiler", "heatpump"])],
        vec![1.0, 2.0, 3.0, 4.0],
    )
    .unwrap()
}

pub fn constraints(names: &[&str]) -> Vec<Constraint> {
    init_tracing();
    let registry = Registry::with_defaults();
    let entries: Vec<ConstraintEntry> = names.iter().map(|n| ConstraintEntry::new(*n)).collect();
    registry
        .factory(entries)
        .unwrap()
        .build(
            &assets(),
            &search_space(),
            &market(),
            &technologies(),
            YEAR,
            &ConstraintParams::default(),
        )
        .unwrap()
}

pub fn problem(constraints: &[Constraint]) -> LpProblem {
    let techs = technologies().at_year(YEAR, Interpolation::Linear).unwrap();
    lp_problem(&techs, &costs(), &timeslices(), constraints).unwrap()
}
