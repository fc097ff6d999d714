//! Decision-variable costs.
//!
//! The axes of the two cost tensors define the decision variables of the LP:
//! capacity variables over asset × replacement (× region), production variables
//! additionally over time-slice and commodity.

use crate::error::{LpError, Result};
use crate::inputs::dims::{ASSET, COMMODITY, REPLACEMENT, TECHNOLOGY};
use crate::inputs::Technologies;
use crate::tensor::NamedArray;
use crate::timeslice::Timeslices;

/// Costs of the capacity and production decision variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LpCosts {
    pub capacity: NamedArray,
    pub production: NamedArray,
}

impl LpCosts {
    /// Number of capacity decision variables.
    pub fn capacity_size(&self) -> usize {
        self.capacity.size()
    }

    /// Number of production decision variables.
    pub fn production_size(&self) -> usize {
        self.production.size()
    }
}

/// Expand capacity costs into the full decision-variable cost structure.
///
/// `costs` is indexed by asset × replacement (× region) and is used as-is for the
/// capacity variables. Production costs are zero, spanning the time-slices, the
/// capacity axes and the end-use commodities. `technologies` must already be
/// reduced to a single year.
pub fn lp_costs(
    technologies: &Technologies,
    costs: &NamedArray,
    timeslices: &Timeslices,
) -> Result<LpCosts> {
    technologies.ensure_single_year()?;
    let replacement = costs
        .axis(REPLACEMENT)
        .ok_or_else(|| LpError::MissingAxis(REPLACEMENT.to_string()))?;
    if !costs.has_axis(ASSET) {
        return Err(LpError::MissingAxis(ASSET.to_string()));
    }

    let mut outputs = technologies
        .fixed_outputs
        .select(COMMODITY, &technologies.enduse())?;
    if outputs.has_axis(TECHNOLOGY) {
        outputs = outputs
            .select(TECHNOLOGY, replacement.labels())?
            .rename(TECHNOLOGY, REPLACEMENT)?;
    }

    let production = timeslices
        .convert_extensive(costs)?
        .try_mul(&outputs)?
        .zeros_like();

    Ok(LpCosts {
        capacity: costs.clone(),
        production,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{Commodity, CommodityUsage};
    use crate::tensor::{Axis, Interpolation};
    use crate::timeslice::TIMESLICE;

    fn technologies() -> Technologies {
        let fixed = NamedArray::from_vec(
            vec![
                Axis::from_labels(TECHNOLOGY, ["gasboiler", "heatpump", "estove"]).unwrap(),
                Axis::from_labels(COMMODITY, ["heat", "cook", "CO2"]).unwrap(),
                Axis::from_labels("year", [2020, 2030]).unwrap(),
            ],
            vec![1.0; 18],
        )
        .unwrap();
        Technologies {
            fixed_outputs: fixed,
            utilization_factor: NamedArray::scalar(1.0),
            max_capacity_addition: NamedArray::scalar(1.0),
            max_capacity_growth: NamedArray::scalar(1.0),
            total_capacity_limit: NamedArray::scalar(1.0),
            commodities: vec![
                Commodity {
                    id: "heat".into(),
                    usage: CommodityUsage::EndUse,
                },
                Commodity {
                    id: "cook".into(),
                    usage: CommodityUsage::EndUse,
                },
                Commodity {
                    id: "CO2".into(),
                    usage: CommodityUsage::Environmental,
                },
            ],
        }
    }

    fn costs() -> NamedArray {
        NamedArray::from_fn(
            vec![
                Axis::from_labels(ASSET, ["gasboiler", "estove"]).unwrap(),
                Axis::from_labels(REPLACEMENT, ["heatpump", "gasboiler"]).unwrap(),
            ],
            |ix| (ix[0] * 2 + ix[1]) as f64,
        )
        .unwrap()
    }

    fn timeslices() -> Timeslices {
        Timeslices::uniform(Axis::from_labels(TIMESLICE, ["night", "morning", "evening"]).unwrap())
            .unwrap()
    }

    #[test]
    fn test_costs_layout() {
        let techs = technologies().at_year(2025, Interpolation::Linear).unwrap();
        let lp = lp_costs(&techs, &costs(), &timeslices()).unwrap();

        assert_eq!(lp.capacity, costs());
        assert_eq!(lp.capacity.dims(), vec![ASSET, REPLACEMENT]);
        assert_eq!(lp.production.dims(), vec![TIMESLICE, ASSET, REPLACEMENT, COMMODITY]);
        assert_eq!(lp.production_size(), 3 * 2 * 2 * 2);
        assert!(!lp.production.any_nonzero());
    }

    #[test]
    fn test_year_axis_rejected() {
        let err = lp_costs(&technologies(), &costs(), &timeslices()).unwrap_err();
        assert!(matches!(err, LpError::Precondition(_)));
    }
}
