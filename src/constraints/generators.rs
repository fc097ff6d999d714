//! Built-in constraint generators.
//!
//! Each generator is a pure function of its inputs and returns an unstandardized
//! [`RawConstraint`]; the registry standardizes it.

use tracing::{trace, warn};

use super::constraint::{ConstraintKind, RawConstraint};
use crate::config::ConstraintParams;
use crate::error::{LpError, Result};
use crate::inputs::dims::{COMMODITY, REPLACEMENT, TECHNOLOGY, YEAR};
use crate::inputs::{Assets, Market, SearchSpace, Technologies};
use crate::tensor::{Axis, Interpolation, Label, NamedArray};

/// Current year: explicit parameter, else the market's earliest year.
fn current_year(market: &Market, params: &ConstraintParams) -> Result<i64> {
    match params.year {
        Some(year) => Ok(year),
        None => market.current_year(),
    }
}

/// Technology field evaluated at `year` for the candidate replacements.
///
/// The `technology` axis is restricted to the replacement labels, in search-space
/// order, and renamed `replacement`.
fn for_replacements(
    field: &NamedArray,
    replacement: &Axis,
    year: i64,
    method: Interpolation,
) -> Result<NamedArray> {
    let mut result = field.clone();
    if result.has_axis(YEAR) {
        result = result.interp(YEAR, year, method)?;
    }
    if result.has_axis(TECHNOLOGY) {
        result = result
            .select(TECHNOLOGY, replacement.labels())?
            .rename(TECHNOLOGY, REPLACEMENT)?;
    }
    Ok(result)
}

/// Max capacity addition, max capacity growth and total capacity limit.
///
/// With `y0` the current year, `y1 = y0 + forecast`, `A(y)` the agent's capacity
/// per technology, `L` the total capacity limit, `G` the maximum growth and `W`
/// the maximum addition, investment in each replacement technology is bounded by
///
/// ```text
/// max(L - A(y1), 0)
/// A(y0) * (G * forecast + 1) - A(y1)      (only where A(y0) > 0)
/// W * forecast
/// ```
///
/// The bound is the minimum of those that apply, and never negative.
pub fn max_capacity_expansion(
    assets: &Assets,
    search_space: &SearchSpace,
    market: &Market,
    technologies: &Technologies,
    params: &ConstraintParams,
) -> Result<RawConstraint> {
    let year = current_year(market, params)?;
    let forecast = params.forecast();
    let forecast_year = year + i64::from(forecast);
    let method = params.interpolation();
    let replacement = search_space.replacement();

    let techs = |field: &NamedArray| for_replacements(field, replacement, year, method);
    let add_cap = techs(&technologies.max_capacity_addition)?.scale(f64::from(forecast));
    let limit = techs(&technologies.total_capacity_limit)?;
    let max_growth = techs(&technologies.max_capacity_growth)?;

    let by_technology = assets.capacity_by_technology()?;
    let capacity_at = |y: i64| -> Result<NamedArray> {
        by_technology
            .interp(YEAR, y, method)?
            .rename(TECHNOLOGY, REPLACEMENT)?
            .reindex(replacement, 0.0)
    };
    let initial = capacity_at(year)?;
    let forecasted = capacity_at(forecast_year)?;

    let total_cap = limit.try_sub(&forecasted)?.map(|v| v.max(0.0));
    let growth_factor = f64::from(forecast);
    let growth_cap = initial.zip3_with(&max_growth, &forecasted, |init, growth, fc| {
        init * (growth * growth_factor + 1.0) - fc
    })?;

    let zero_cap = add_cap.zip_with(&total_cap, f64::min)?;
    let with_growth = zero_cap.zip_with(&growth_cap, f64::min)?;
    let bound = initial.zip3_with(&with_growth, &zero_cap, |init, grown, zero| {
        if init > 0.0 {
            grown
        } else {
            zero
        }
    })?;

    let clipped = bound.values().iter().filter(|v| **v < 0.0).count();
    if clipped > 0 {
        warn!(
            clipped,
            year,
            forecast_year,
            "capacity growth bound below forecast capacity; clipping to zero"
        );
    }
    let b = bound.map(|v| v.max(0.0));
    trace!(dims = ?b.dims(), "max capacity expansion bound");

    Ok(RawConstraint::new()
        .b(b)
        .capacity(1.0)
        .kind(ConstraintKind::UpperBound))
}

/// Production meets the forecast demand for every end-use commodity.
pub fn demand(
    _assets: &Assets,
    _search_space: &SearchSpace,
    market: &Market,
    technologies: &Technologies,
    params: &ConstraintParams,
) -> Result<RawConstraint> {
    let year = current_year(market, params)?;
    let forecast_year = year + i64::from(params.forecast());

    let enduse = technologies.enduse();
    let consumption = &market.consumption;
    let commodities: Vec<Label> = consumption
        .axis(COMMODITY)
        .ok_or_else(|| LpError::MissingAxis(COMMODITY.to_string()))?
        .labels()
        .iter()
        .filter(|c| enduse.contains(c))
        .cloned()
        .collect();

    let b = consumption
        .select(COMMODITY, &commodities)?
        .interp(YEAR, forecast_year, params.interpolation())?;

    Ok(RawConstraint::new()
        .b(b)
        .production(1.0)
        .kind(ConstraintKind::Equality))
}

/// Rated output of the installed capacity against production.
///
/// The capacity operator is the output per unit capacity in each time-slice,
/// `fixed_outputs * utilization_factor` split across time-slices, for every
/// asset, replacement technology and end-use commodity. The row reads
/// `rated * capacity - production <= 0`.
pub fn max_production(
    _assets: &Assets,
    search_space: &SearchSpace,
    market: &Market,
    technologies: &Technologies,
    params: &ConstraintParams,
) -> Result<RawConstraint> {
    let year = current_year(market, params)?;
    let method = params.interpolation();
    let replacement = search_space.replacement();

    let commodities = technologies.enduse();
    let outputs = for_replacements(&technologies.fixed_outputs, replacement, year, method)?
        .select(COMMODITY, &commodities)?;
    let utilization =
        for_replacements(&technologies.utilization_factor, replacement, year, method)?;

    let rated = outputs.try_mul(&utilization)?;
    let capacity = market
        .timeslices
        .convert_extensive(&rated)?
        .expand(search_space.asset().clone())?;
    let production = -capacity.ones_like();
    let b = capacity.zeros_like();

    Ok(RawConstraint::new()
        .capacity(capacity)
        .production(production)
        .b(b)
        .kind(ConstraintKind::UpperBound))
}
