//! Immutable parameter snapshots

use super::registry::{Param, TileType, PARAM_COUNT};
use crate::error::ParameterResult;
use crate::precision::normalize;
use std::ops::Index;

/// A complete set of parameter values
///
/// Values are indexed by [`Param`] and are always normalized. A set is a
/// plain `Copy` value: validation and generation receive their own snapshot
/// and never observe later edits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    values: [f64; PARAM_COUNT],
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl ParameterSet {
    /// The registry defaults
    pub fn defaults() -> Self {
        let mut values = [0.0; PARAM_COUNT];
        for param in Param::ALL {
            values[param.index()] = param.default_value();
        }
        Self { values }
    }

    /// Build a set from name/value pairs applied over the defaults
    ///
    /// Every value is domain checked; the first rejected pair is returned.
    pub fn from_pairs<'a, I>(pairs: I) -> ParameterResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        pairs
            .into_iter()
            .try_fold(Self::defaults(), |set, (name, value)| {
                set.try_with(name.parse()?, value)
            })
    }

    pub fn get(&self, param: Param) -> f64 {
        self.values[param.index()]
    }

    pub fn get_by_name(&self, name: &str) -> ParameterResult<f64> {
        Ok(self.get(name.parse()?))
    }

    /// Copy of this set with one value replaced
    ///
    /// The value is normalized but not domain checked, so the result may
    /// describe a physically meaningless tile. Use [`ParameterSet::try_with`]
    /// for user input.
    pub fn with(mut self, param: Param, value: f64) -> Self {
        self.values[param.index()] = normalize(value);
        self
    }

    /// Copy of this set with one value replaced after a domain check
    pub fn try_with(mut self, param: Param, value: f64) -> ParameterResult<Self> {
        self.values[param.index()] = param.definition().check_domain(value)?;
        Ok(self)
    }

    pub fn with_tile_type(self, tile_type: TileType) -> Self {
        self.with(Param::TileType, tile_type.as_value())
    }

    /// The tile variant, or `None` when the selector holds an unknown value
    pub fn checked_tile_type(&self) -> Option<TileType> {
        TileType::from_value(self.get(Param::TileType))
    }

    /// The tile variant, falling back to the default for unknown selectors
    pub fn tile_type(&self) -> TileType {
        self.checked_tile_type().unwrap_or_default()
    }

    /// Check every value against its domain
    pub fn check_domains(&self) -> ParameterResult<()> {
        for (param, value) in self.iter() {
            param.definition().check_domain(value)?;
        }
        Ok(())
    }

    /// Copy of this set with every value renormalized
    pub fn normalized(&self) -> Self {
        let mut values = self.values;
        values.iter_mut().for_each(|v| *v = normalize(*v));
        Self { values }
    }

    /// Iterate over `(param, value)` in registry order
    pub fn iter(&self) -> impl Iterator<Item = (Param, f64)> + '_ {
        Param::ALL.iter().map(move |&param| (param, self.get(param)))
    }
}

impl Index<Param> for ParameterSet {
    type Output = f64;

    fn index(&self, param: Param) -> &f64 {
        &self.values[param.index()]
    }
}
