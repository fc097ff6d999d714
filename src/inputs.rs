//! Input data supplied by the surrounding model.
//!
//! These records hold already-loaded, already-validated named-axis data: the
//! technology characteristics, the market (demand) state, the agent's current
//! asset portfolio and the candidate search space. Loading them is the caller's
//! concern.

use serde::{Deserialize, Serialize};

use crate::error::{LpError, Result};
use crate::tensor::{Axis, Interpolation, Label, NamedArray};
use crate::timeslice::{Timeslices, TIMESLICE};

/// Axis names used across the crate.
pub mod dims {
    pub const ASSET: &str = "asset";
    pub const COMMODITY: &str = "commodity";
    pub const REGION: &str = "region";
    pub const REPLACEMENT: &str = "replacement";
    pub const TECHNOLOGY: &str = "technology";
    pub const YEAR: &str = "year";
}

use dims::*;

/// How a commodity is used by technologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommodityUsage {
    /// Service demand met directly by the sector, e.g. heat.
    EndUse,
    /// Input consumed by technologies, e.g. gas.
    Consumable,
    /// Emissions and other environmental outputs.
    Environmental,
    Other,
}

impl CommodityUsage {
    pub fn is_enduse(&self) -> bool {
        matches!(self, CommodityUsage::EndUse)
    }
}

/// A commodity and its usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commodity {
    pub id: Label,
    pub usage: CommodityUsage,
}

/// Technology characteristics.
///
/// Every field is indexed by `technology` and optionally `year` and `region`;
/// `fixed_outputs` also carries `commodity`.
#[derive(Debug, Clone, PartialEq)]
pub struct Technologies {
    /// Output of each commodity per unit of activity.
    pub fixed_outputs: NamedArray,
    /// Fraction of the year a unit of capacity is available.
    pub utilization_factor: NamedArray,
    /// Maximum capacity addition per year.
    pub max_capacity_addition: NamedArray,
    /// Maximum relative capacity growth per year.
    pub max_capacity_growth: NamedArray,
    /// Absolute cap on installed capacity.
    pub total_capacity_limit: NamedArray,
    /// Usage table for the commodities on `fixed_outputs`.
    pub commodities: Vec<Commodity>,
}

impl Technologies {
    /// Build and validate technology data.
    ///
    /// Every end-use commodity in `commodities` must be a label of the
    /// `commodity` axis of `fixed_outputs`.
    pub fn new(
        fixed_outputs: NamedArray,
        utilization_factor: NamedArray,
        max_capacity_addition: NamedArray,
        max_capacity_growth: NamedArray,
        total_capacity_limit: NamedArray,
        commodities: Vec<Commodity>,
    ) -> Result<Self> {
        let technologies = Technologies {
            fixed_outputs,
            utilization_factor,
            max_capacity_addition,
            max_capacity_growth,
            total_capacity_limit,
            commodities,
        };
        technologies.validate()?;
        Ok(technologies)
    }

    /// Check that the end-use commodities are outputs of `fixed_outputs`.
    pub fn validate(&self) -> Result<()> {
        let outputs = self
            .fixed_outputs
            .axis(COMMODITY)
            .ok_or_else(|| LpError::MissingAxis(COMMODITY.to_string()))?;
        match self.enduse().into_iter().find(|c| outputs.position(c).is_none()) {
            Some(missing) => Err(LpError::MissingLabel {
                axis: COMMODITY.to_string(),
                label: missing.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn fields(&self) -> [&NamedArray; 5] {
        [
            &self.fixed_outputs,
            &self.utilization_factor,
            &self.max_capacity_addition,
            &self.max_capacity_growth,
            &self.total_capacity_limit,
        ]
    }

    /// End-use commodities, in usage-table order.
    pub fn enduse(&self) -> Vec<Label> {
        self.commodities
            .iter()
            .filter(|c| c.usage.is_enduse())
            .map(|c| c.id.clone())
            .collect()
    }

    /// True if any field still varies by year.
    pub fn has_year_axis(&self) -> bool {
        self.fields().iter().any(|f| f.has_axis(YEAR))
    }

    /// Fail unless the data has been reduced to a single year.
    pub fn ensure_single_year(&self) -> Result<()> {
        if self.has_year_axis() {
            return Err(LpError::Precondition(
                "technology data must be selected to a single year".into(),
            ));
        }
        Ok(())
    }

    /// Evaluate every year-dependent field at `year` and drop the year axis.
    pub fn at_year(&self, year: i64, method: Interpolation) -> Result<Technologies> {
        let at = |field: &NamedArray| -> Result<NamedArray> {
            if field.has_axis(YEAR) {
                field.interp(YEAR, year, method)
            } else {
                Ok(field.clone())
            }
        };
        Ok(Technologies {
            fixed_outputs: at(&self.fixed_outputs)?,
            utilization_factor: at(&self.utilization_factor)?,
            max_capacity_addition: at(&self.max_capacity_addition)?,
            max_capacity_growth: at(&self.max_capacity_growth)?,
            total_capacity_limit: at(&self.total_capacity_limit)?,
            commodities: self.commodities.clone(),
        })
    }
}

/// Market state: consumption over year × commodity × timeslice × region.
#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub consumption: NamedArray,
    pub timeslices: Timeslices,
}

impl Market {
    pub fn new(consumption: NamedArray, timeslices: Timeslices) -> Result<Self> {
        for name in [YEAR, COMMODITY, TIMESLICE] {
            if !consumption.has_axis(name) {
                return Err(LpError::MissingAxis(name.to_string()));
            }
        }
        if let Some(axis) = consumption.axis(TIMESLICE) {
            timeslices.axis().ensure_aligned(axis)?;
        }
        Ok(Market {
            consumption,
            timeslices,
        })
    }

    /// Earliest year on the market, taken as the current year.
    pub fn current_year(&self) -> Result<i64> {
        self.consumption
            .axis(YEAR)
            .into_iter()
            .flat_map(|a| a.labels().iter().filter_map(Label::as_int))
            .min()
            .ok_or_else(|| LpError::Precondition("market has no integer years".into()))
    }
}

/// Current asset portfolio of an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct Assets {
    /// Installed capacity over asset × year (× region).
    pub capacity: NamedArray,
    /// Technology of each asset, in `asset` axis order.
    pub technology: Vec<Label>,
}

impl Assets {
    pub fn new(capacity: NamedArray, technology: Vec<Label>) -> Result<Self> {
        let assets = capacity
            .axis(ASSET)
            .ok_or_else(|| LpError::MissingAxis(ASSET.to_string()))?;
        if assets.len() != technology.len() {
            return Err(LpError::ShapeMismatch {
                expected: format!("{} asset technologies", assets.len()),
                got: technology.len().to_string(),
            });
        }
        if !capacity.has_axis(YEAR) {
            return Err(LpError::MissingAxis(YEAR.to_string()));
        }
        Ok(Assets {
            capacity,
            technology,
        })
    }

    /// Capacity summed over assets of the same technology.
    ///
    /// The `asset` axis is replaced by a trailing `technology` axis whose labels
    /// follow first appearance in the portfolio.
    pub fn capacity_by_technology(&self) -> Result<NamedArray> {
        let mut techs: Vec<Label> = Vec::new();
        for t in &self.technology {
            if !techs.contains(t) {
                techs.push(t.clone());
            }
        }
        let asset_axis = self
            .capacity
            .axis(ASSET)
            .cloned()
            .ok_or_else(|| LpError::MissingAxis(ASSET.to_string()))?;
        let technology = &self.technology;
        let grouping = NamedArray::from_fn(
            vec![asset_axis, Axis::new(TECHNOLOGY, techs.clone())?],
            |ix| {
                if technology[ix[0]] == techs[ix[1]] {
                    1.0
                } else {
                    0.0
                }
            },
        )?;
        self.capacity.try_mul(&grouping)?.sum_over(&[ASSET])
    }
}

/// Candidate replacement technologies for each asset.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    /// Non-zero where the replacement is considered, over asset × replacement (× region).
    pub mask: NamedArray,
    asset: Axis,
    replacement: Axis,
}

impl SearchSpace {
    pub fn new(mask: NamedArray) -> Result<Self> {
        let asset = mask
            .axis(ASSET)
            .cloned()
            .ok_or_else(|| LpError::MissingAxis(ASSET.to_string()))?;
        let replacement = mask
            .axis(REPLACEMENT)
            .cloned()
            .ok_or_else(|| LpError::MissingAxis(REPLACEMENT.to_string()))?;
        Ok(SearchSpace {
            mask,
            asset,
            replacement,
        })
    }

    pub fn asset(&self) -> &Axis {
        &self.asset
    }

    pub fn replacement(&self) -> &Axis {
        &self.replacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_by_technology() {
        let capacity = NamedArray::from_vec(
            vec![
                Axis::from_labels(ASSET, ["a0", "a1", "a2"]).unwrap(),
                Axis::from_labels(YEAR, [2020, 2025]).unwrap(),
            ],
            vec![1.0, 0.5, 2.0, 1.0, 4.0, 4.0],
        )
        .unwrap();
        let assets = Assets::new(
            capacity,
            vec!["boiler".into(), "stove".into(), "boiler".into()],
        )
        .unwrap();
        let grouped = assets.capacity_by_technology().unwrap();
        assert_eq!(grouped.dims(), vec![YEAR, TECHNOLOGY]);
        let boiler_2025 = grouped
            .get(&[(YEAR, 2025.into()), (TECHNOLOGY, "boiler".into())])
            .unwrap();
        assert_eq!(boiler_2025, 4.5);
    }

    #[test]
    fn test_asset_technology_length_mismatch() {
        let capacity = NamedArray::zeros(vec![
            Axis::from_labels(ASSET, ["a0", "a1"]).unwrap(),
            Axis::from_labels(YEAR, [2020]).unwrap(),
        ])
        .unwrap();
        assert!(Assets::new(capacity, vec!["x".into()]).is_err());
    }

    #[test]
    fn test_enduse_filter() {
        let techs = Technologies {
            fixed_outputs: NamedArray::scalar(1.0),
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
                    id: "gas".into(),
                    usage: CommodityUsage::Consumable,
                },
            ],
        };
        assert_eq!(techs.enduse(), vec![Label::from("heat")]);
        assert!(!techs.has_year_axis());
    }

    fn usage(id: &str, usage: CommodityUsage) -> Commodity {
        Commodity {
            id: id.into(),
            usage,
        }
    }

    fn outputs() -> NamedArray {
        NamedArray::from_vec(
            vec![
                Axis::from_labels(TECHNOLOGY, ["boiler"]).unwrap(),
                Axis::from_labels(COMMODITY, ["heat", "CO2"]).unwrap(),
            ],
            vec![1.0, 0.3],
        )
        .unwrap()
    }

    fn build(commodities: Vec<Commodity>) -> Result<Technologies> {
        let one = || NamedArray::scalar(1.0);
        Technologies::new(outputs(), one(), one(), one(), one(), commodities)
    }

    #[test]
    fn test_new_accepts_known_enduse() {
        let techs = build(vec![
            usage("heat", CommodityUsage::EndUse),
            usage("CO2", CommodityUsage::Environmental),
        ])
        .unwrap();
        assert_eq!(techs.enduse(), vec![Label::from("heat")]);
    }

    #[test]
    fn test_new_rejects_missing_enduse() {
        let err = build(vec![
            usage("heat", CommodityUsage::EndUse),
            usage("cook", CommodityUsage::EndUse),
        ])
        .unwrap_err();
        assert!(matches!(err, LpError::MissingLabel { ref label, .. } if label == "cook"));
    }

    #[test]
    fn test_new_requires_commodity_axis() {
        let err = Technologies::new(
            NamedArray::scalar(1.0),
            NamedArray::scalar(1.0),
            NamedArray::scalar(1.0),
            NamedArray::scalar(1.0),
            NamedArray::scalar(1.0),
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, LpError::MissingAxis(_)));
    }
}
