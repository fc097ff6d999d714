//! Constraint registry and factory.
//!
//! The registry maps names to generator functions. It is an ordinary value,
//! populated explicitly; [`Registry::with_defaults`] registers the built-in
//! generators. A [`ConstraintFactory`] binds a configuration to a registry and
//! produces the constraint list for one decision round.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::constraint::{Constraint, RawConstraint};
use super::generators;
use crate::config::{ConstraintParams, ConstraintSpec};
use crate::error::{LpError, Result};
use crate::inputs::{Assets, Market, SearchSpace, Technologies};

/// Signature of a constraint generator.
pub type ConstraintGenerator = fn(
    &Assets,
    &SearchSpace,
    &Market,
    &Technologies,
    &ConstraintParams,
) -> Result<RawConstraint>;

/// Named constraint generators.
#[derive(Clone, Default)]
pub struct Registry {
    generators: HashMap<String, ConstraintGenerator>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("generators", &self.names())
            .finish()
    }
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in generators.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("max_capacity_expansion", generators::max_capacity_expansion);
        registry.register("demand", generators::demand);
        registry.register("max_production", generators::max_production);
        registry
    }

    /// Register a generator. An existing entry under the same name is replaced.
    pub fn register(&mut self, name: impl Into<String>, generator: ConstraintGenerator) {
        let name = name.into();
        if self.generators.insert(name.clone(), generator).is_some() {
            debug!(constraint = %name, "replacing registered constraint generator");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.generators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Look up a generator.
    pub fn get(&self, name: &str) -> Result<ConstraintGenerator> {
        self.generators
            .get(name)
            .copied()
            .ok_or_else(|| LpError::UnregisteredConstraint {
                name: name.to_string(),
            })
    }

    /// Run a generator and standardize its output.
    pub fn generate(
        &self,
        name: &str,
        assets: &Assets,
        search_space: &SearchSpace,
        market: &Market,
        technologies: &Technologies,
        params: &ConstraintParams,
    ) -> Result<Constraint> {
        let generator = self.get(name)?;
        let raw = generator(assets, search_space, market, technologies, params)?;
        Constraint::standardize(raw).map_err(|e| match e {
            LpError::MalformedConstraint(msg) => {
                LpError::MalformedConstraint(format!("{}: {}", name, msg))
            }
            other => other,
        })
    }

    /// Bind a configuration to this registry.
    ///
    /// Every configured name must already be registered.
    pub fn factory(&self, spec: impl Into<ConstraintSpec>) -> Result<ConstraintFactory<'_>> {
        let entries = spec.into().entries();
        for entry in &entries {
            self.get(&entry.name)?;
        }
        Ok(ConstraintFactory {
            registry: self,
            entries: entries.into_iter().map(|e| (e.name, e.params)).collect(),
        })
    }
}

/// Configured list of constraints, ready to be evaluated.
#[derive(Debug, Clone)]
pub struct ConstraintFactory<'a> {
    registry: &'a Registry,
    entries: Vec<(String, ConstraintParams)>,
}

impl ConstraintFactory<'_> {
    /// Configured generator names, in order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Evaluate every configured generator, in configuration order.
    ///
    /// `year` is the current year. Fields set on `shared` override the
    /// parameters stored with each entry; `year` overrides both.
    pub fn build(
        &self,
        assets: &Assets,
        search_space: &SearchSpace,
        market: &Market,
        technologies: &Technologies,
        year: i64,
        shared: &ConstraintParams,
    ) -> Result<Vec<Constraint>> {
        self.entries
            .iter()
            .map(|(name, stored)| {
                let params = stored.overridden_by(shared).with_year(year);
                debug!(
                    constraint = %name,
                    forecast = params.forecast(),
                    year,
                    "generating constraint"
                );
                self.registry
                    .generate(name, assets, search_space, market, technologies, &params)
            })
            .collect()
    }
}
