//! The parameter store
//!
//! Owns the current [`ParameterSet`]. Writers are serialized against readers
//! by a `parking_lot::RwLock`; readers only ever receive copies. There is no
//! change notification: callers remember the [`ParameterStore::revision`]
//! they last validated and re-run validation on a fresh snapshot when it
//! moves.

use super::registry::Param;
use super::set::ParameterSet;
use crate::error::ParameterResult;
use parking_lot::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
struct StoreState {
    params: ParameterSet,
    revision: u64,
}

/// Single-writer store for the working parameter set
#[derive(Debug)]
pub struct ParameterStore {
    state: RwLock<StoreState>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ParameterStore {
    /// Create a store holding the registry defaults
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                params: ParameterSet::defaults(),
                revision: 0,
            }),
        }
    }

    /// Create a store from an existing set
    ///
    /// The set is domain checked first.
    pub fn with_params(params: ParameterSet) -> ParameterResult<Self> {
        let params = params.normalized();
        params.check_domains()?;
        Ok(Self {
            state: RwLock::new(StoreState {
                params,
                revision: 0,
            }),
        })
    }

    /// Current value of a parameter by name
    pub fn get(&self, name: &str) -> ParameterResult<f64> {
        let param: Param = name.parse()?;
        Ok(self.value(param))
    }

    /// Current value of a parameter
    pub fn value(&self, param: Param) -> f64 {
        self.state.read().params.get(param)
    }

    /// Set a parameter by name
    ///
    /// Returns the normalized value that was stored. On error the store is
    /// left untouched.
    pub fn set(&self, name: &str, value: f64) -> ParameterResult<f64> {
        let param: Param = match name.parse() {
            Ok(param) => param,
            Err(e) => {
                warn!("Rejected unknown parameter '{}'", name);
                return Err(e);
            }
        };
        self.set_param(param, value)
    }

    /// Set a parameter
    pub fn set_param(&self, param: Param, value: f64) -> ParameterResult<f64> {
        let normalized = param.definition().check_domain(value).map_err(|e| {
            warn!("{}", e);
            e
        })?;

        let mut state = self.state.write();
        state.params = state.params.with(param, normalized);
        state.revision += 1;
        debug!(
            "Set {} = {} (revision {})",
            param, normalized, state.revision
        );
        Ok(normalized)
    }

    /// Apply several changes atomically
    ///
    /// Every change is checked before any is applied; if one is rejected
    /// nothing changes. Returns the resulting snapshot.
    pub fn set_many<'a, I>(&self, changes: I) -> ParameterResult<ParameterSet>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut state = self.state.write();
        let staged = changes
            .into_iter()
            .try_fold(state.params, |set, (name, value)| {
                set.try_with(name.parse()?, value)
            })
            .map_err(|e| {
                warn!("Rejected parameter batch: {}", e);
                e
            })?;

        state.params = staged;
        state.revision += 1;
        debug!("Applied parameter batch (revision {})", state.revision);
        Ok(staged)
    }

    /// Replace the whole set
    pub fn replace(&self, params: ParameterSet) -> ParameterResult<()> {
        let params = params.normalized();
        params.check_domains().map_err(|e| {
            warn!("Rejected parameter set: {}", e);
            e
        })?;

        let mut state = self.state.write();
        state.params = params;
        state.revision += 1;
        debug!("Replaced parameter set (revision {})", state.revision);
        Ok(())
    }

    /// Restore the registry defaults
    pub fn reset_to_defaults(&self) {
        let mut state = self.state.write();
        state.params = ParameterSet::defaults();
        state.revision += 1;
        debug!("Reset parameters to defaults (revision {})", state.revision);
    }

    /// Immutable copy of the current set
    pub fn snapshot(&self) -> ParameterSet {
        self.state.read().params
    }

    /// Snapshot together with the revision it was taken at
    pub fn versioned_snapshot(&self) -> (ParameterSet, u64) {
        let state = self.state.read();
        (state.params, state.revision)
    }

    /// Counter incremented by every successful mutation
    pub fn revision(&self) -> u64 {
        self.state.read().revision
    }
}
