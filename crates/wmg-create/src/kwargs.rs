//! Keyword arguments for connectivity methods selected by name.

use wmg_core::{Real, WmgError, WmgResult};

/// Optional parameters accepted by the named connectivity methods.
///
/// Each method accepts a subset of these; passing one it does not use is a
/// configuration error rather than being silently ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConnectivityKwargs {
    pub max_num_neighbours: Option<usize>,
    pub max_dist: Option<Real>,
    pub rel_max_dist: Option<Real>,
    pub grid_refinement_factor: Option<usize>,
    pub level_refinement_factor: Option<usize>,
    pub max_num_levels: Option<usize>,
}

impl ConnectivityKwargs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_num_neighbours(mut self, k: usize) -> Self {
        self.max_num_neighbours = Some(k);
        self
    }

    pub fn max_dist(mut self, d: Real) -> Self {
        self.max_dist = Some(d);
        self
    }

    pub fn rel_max_dist(mut self, d: Real) -> Self {
        self.rel_max_dist = Some(d);
        self
    }

    pub fn grid_refinement_factor(mut self, f: usize) -> Self {
        self.grid_refinement_factor = Some(f);
        self
    }

    pub fn level_refinement_factor(mut self, f: usize) -> Self {
        self.level_refinement_factor = Some(f);
        self
    }

    pub fn max_num_levels(mut self, n: usize) -> Self {
        self.max_num_levels = Some(n);
        self
    }

    /// Names of the parameters that are set.
    pub fn given(&self) -> Vec<&'static str> {
        [
            ("max_num_neighbours", self.max_num_neighbours.is_some()),
            ("max_dist", self.max_dist.is_some()),
            ("rel_max_dist", self.rel_max_dist.is_some()),
            ("grid_refinement_factor", self.grid_refinement_factor.is_some()),
            ("level_refinement_factor", self.level_refinement_factor.is_some()),
            ("max_num_levels", self.max_num_levels.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Fail if any parameter outside `allowed` is set.
    pub fn expect_only(&self, method: &str, allowed: &[&str]) -> WmgResult<()> {
        let unexpected: Vec<&str> = self
            .given()
            .into_iter()
            .filter(|name| !allowed.contains(name))
            .collect();
        if unexpected.is_empty() {
            Ok(())
        } else {
            Err(WmgError::config(format!(
                "{} does not take {}",
                method,
                unexpected.join(", ")
            )))
        }
    }
}
