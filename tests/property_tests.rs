//! Property tests over randomized inputs.

mod common;

use common::*;
use investlp::constraints::max_capacity_expansion;
use investlp::prelude::*;
use proptest::prelude::*;

fn tech_values() -> impl Strategy<Value = [f64; 2]> {
    [0.0f64..200.0, 0.0f64..200.0]
}

fn shuffled(labels: &[&str], seed: usize) -> Vec<String> {
    let mut out: Vec<String> = labels.iter().map(|s| s.to_string()).collect();
    let len = out.len();
    out.rotate_left(seed % len);
    if seed % 2 == 1 {
        out.reverse();
    }
    out
}

proptest! {
    /// The expansion bound is never negative, whatever the capacity trajectory.
    #[test]
    fn capacity_expansion_never_negative(
        capacity in prop::collection::vec(0.0f64..50.0, 6),
        addition in tech_values(),
        growth in [0.0f64..1.0, 0.0f64..1.0],
        limit in tech_values(),
        forecast in 1u32..=10,
    ) {
        let assets = Assets::new(
            NamedArray::from_vec(
                vec![
                    ax("asset", ["a0", "a1"]),
                    ax("year", [2020, 2025, 2030]),
                    ax("region", ["r1"]),
                ],
                capacity,
            )
            .unwrap(),
            vec!["boiler".into(), "heatpump".into()],
        )
        .unwrap();
        let per_tech = |v: [f64; 2]| {
            NamedArray::from_vec(vec![ax("technology", ["boiler", "heatpump"])], v.to_vec())
                .unwrap()
        };
        let mut techs = technologies();
        techs.max_capacity_addition = per_tech(addition);
        techs.max_capacity_growth = per_tech(growth);
        techs.total_capacity_limit = per_tech(limit);

        let params = ConstraintParams::default().with_forecast(forecast).with_year(YEAR);
        let raw = max_capacity_expansion(&assets, &search_space(), &market(), &techs, &params)
            .unwrap();
        let b = raw.b.unwrap();
        prop_assert!(b.values().iter().all(|v| *v >= 0.0), "negative bound: {:?}", b);
        // never above the addition-rate bound
        for (i, tech) in ["boiler", "heatpump"].iter().enumerate() {
            let bound = b
                .get(&[("replacement", (*tech).into()), ("region", "r1".into())])
                .unwrap();
            prop_assert!(bound <= addition[i] * f64::from(forecast) + 1e-9);
        }
    }

    /// Merging reorders labels without changing any value, for any number of
    /// constraints each written in its own label order.
    #[test]
    fn merge_preserves_values(
        rows in prop::collection::vec(
            (prop::collection::vec(-10.0f64..10.0, 4), -5.0f64..5.0, 0usize..8, 0usize..8),
            1..6,
        ),
    ) {
        let labels = ["gas", "hp", "stove", "solar"];
        let costs = LpCosts {
            capacity: NamedArray::zeros(vec![ax("replacement", labels)]).unwrap(),
            production: NamedArray::scalar(0.0),
        };
        let constraints: Vec<Constraint> = rows
            .into_iter()
            .enumerate()
            .map(|(i, (values, coefficient, b_seed, capacity_seed))| {
                let axis = |seed: usize| {
                    ax("replacement", shuffled(&labels, seed).iter().map(String::as_str))
                };
                let b = NamedArray::from_vec(vec![axis(b_seed)], values.clone()).unwrap();
                let capacity = NamedArray::from_vec(
                    vec![axis(capacity_seed)],
                    values.iter().map(|v| v * coefficient).collect(),
                )
                .unwrap();
                Constraint {
                    capacity,
                    production: NamedArray::scalar(coefficient),
                    b,
                    kind: if i % 2 == 0 {
                        ConstraintKind::UpperBound
                    } else {
                        ConstraintKind::Equality
                    },
                }
            })
            .collect();

        let (merged_costs, merged) = merge_lp(&costs, &constraints).unwrap();
        prop_assert_eq!(&merged_costs.capacity, &costs.capacity);
        prop_assert!(merged_costs.production.equals(&costs.production));
        prop_assert_eq!(merged.len(), constraints.len());
        for (before, after) in constraints.iter().zip(&merged) {
            prop_assert!(after.capacity.equals(&before.capacity));
            prop_assert!(after.production.equals(&before.production));
            prop_assert!(after.b.equals(&before.b));
            prop_assert_eq!(after.kind, before.kind);
            // labels follow the first occurrence, the costs
            prop_assert_eq!(after.b.axis("replacement"), costs.capacity.axis("replacement"));
            prop_assert_eq!(
                after.capacity.axis("replacement"),
                costs.capacity.axis("replacement")
            );
        }
    }

    /// A block spans exactly the tagged axes of `b` and the decision costs.
    #[test]
    fn block_spans_row_and_column_axes(
        assets in 1usize..4,
        techs in 1usize..4,
        slices in 1usize..4,
        coefficient in -5.0f64..5.0,
    ) {
        let labels = |prefix: &str, n: usize| -> Vec<String> {
            (0..n).map(|i| format!("{}{}", prefix, i)).collect()
        };
        let decision = NamedArray::zeros(vec![
            ax("asset", labels("a", assets)),
            ax("replacement", labels("t", techs)),
        ])
        .unwrap();
        let b = NamedArray::zeros(vec![
            ax("timeslice", labels("s", slices)),
            ax("replacement", labels("t", techs)),
        ])
        .unwrap();
        let block = lp_constraint_matrix(&b, &NamedArray::scalar(coefficient), &decision).unwrap();

        let mut dims: Vec<&str> = block.dims();
        dims.sort_unstable();
        prop_assert_eq!(dims, vec!["c(replacement)", "c(timeslice)", "d(asset)", "d(replacement)"]);
        prop_assert_eq!(block.size(), slices * techs * assets * techs);
        // replacement is diagonal: each row touches one replacement per asset
        let nonzero = block.values().iter().filter(|v| **v != 0.0).count();
        let expected = if coefficient == 0.0 { 0 } else { slices * techs * assets };
        prop_assert_eq!(nonzero, expected);
    }
}
