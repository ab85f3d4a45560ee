//! Mapper configuration.
//!
//! Configurations can be built in code or loaded from YAML:
//!
//! ```yaml
//! topology: grid
//! num_rows: 2
//! num_columns: 3
//! optimization: swap_count
//! ```
//!
//! Omitted fields take their default values.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{MapperError, MapperResult};
use crate::grid::CostFn;
use crate::mapping::Swap;
use crate::stats::swap_depth;

/// Built-in cost functions for the grid permutation search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    /// Number of parallel swap layers.
    #[default]
    SwapDepth,
    /// Total number of swaps.
    SwapCount,
}

impl CostFunction {
    /// Evaluate the cost of a swap sequence.
    pub fn cost(self, swaps: &[Swap]) -> usize {
        match self {
            CostFunction::SwapDepth => swap_depth(swaps),
            CostFunction::SwapCount => swaps.len(),
        }
    }

    /// Boxed form usable by the grid router.
    pub fn into_fn(self) -> CostFn {
        Arc::new(move |swaps: &[Swap]| self.cost(swaps))
    }
}

/// Configuration of a mapper for a linear chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearMapperConfig {
    /// Number of qubits in the chain.
    pub num_qubits: u32,

    /// Whether the two chain ends are connected.
    #[serde(default)]
    pub cyclic: bool,

    /// Buffer size that triggers a remap round.
    #[serde(default = "default_storage")]
    pub storage: usize,
}

impl LinearMapperConfig {
    /// Open chain of `num_qubits` with default storage.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            num_qubits,
            cyclic: false,
            storage: default_storage(),
        }
    }

    /// Set whether the chain is cyclic.
    pub fn with_cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    /// Set the buffer size that triggers a remap round.
    pub fn with_storage(mut self, storage: usize) -> Self {
        self.storage = storage;
        self
    }

    /// Check the configuration.
    pub fn validate(&self) -> MapperResult<()> {
        if self.num_qubits == 0 {
            return Err(MapperError::InvalidConfiguration(
                "num_qubits must be at least 1".into(),
            ));
        }
        validate_storage(self.storage)
    }
}

/// Configuration of a mapper for a 2-D grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridMapperConfig {
    /// Number of grid rows.
    pub num_rows: u32,

    /// Number of grid columns.
    pub num_columns: u32,

    /// Backend id of every row-major mapped id. Identity when absent.
    #[serde(default)]
    pub mapped_ids_to_backend_ids: Option<BTreeMap<u32, u32>>,

    /// Buffer size that triggers a remap round.
    #[serde(default = "default_storage")]
    pub storage: usize,

    /// Cost minimised by the permutation search.
    #[serde(default)]
    pub optimization: CostFunction,

    /// Budget of row-matching orders to evaluate per remap.
    #[serde(default = "default_num_optimization_steps")]
    pub num_optimization_steps: usize,

    /// Seed of the order sampler.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl GridMapperConfig {
    /// Grid of the given shape with default settings.
    pub fn new(num_rows: u32, num_columns: u32) -> Self {
        Self {
            num_rows,
            num_columns,
            mapped_ids_to_backend_ids: None,
            storage: default_storage(),
            optimization: CostFunction::default(),
            num_optimization_steps: default_num_optimization_steps(),
            seed: default_seed(),
        }
    }

    /// Set the backend id table.
    pub fn with_backend_ids(mut self, table: impl IntoIterator<Item = (u32, u32)>) -> Self {
        self.mapped_ids_to_backend_ids = Some(table.into_iter().collect());
        self
    }

    /// Set the buffer size that triggers a remap round.
    pub fn with_storage(mut self, storage: usize) -> Self {
        self.storage = storage;
        self
    }

    /// Set the cost function.
    pub fn with_optimization(mut self, optimization: CostFunction) -> Self {
        self.optimization = optimization;
        self
    }

    /// Set the permutation search budget.
    pub fn with_num_optimization_steps(mut self, steps: usize) -> Self {
        self.num_optimization_steps = steps;
        self
    }

    /// Set the sampler seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration. The backend id table is checked when the
    /// mapper is built.
    pub fn validate(&self) -> MapperResult<()> {
        if self.num_rows == 0 || self.num_columns == 0 {
            return Err(MapperError::InvalidConfiguration(format!(
                "grid must have at least one row and column, got {}x{}",
                self.num_rows, self.num_columns
            )));
        }
        if self.num_rows.checked_mul(self.num_columns).is_none() {
            return Err(MapperError::InvalidConfiguration(format!(
                "grid {}x{} is too large",
                self.num_rows, self.num_columns
            )));
        }
        if self.num_optimization_steps == 0 {
            return Err(MapperError::InvalidConfiguration(
                "num_optimization_steps must be at least 1".into(),
            ));
        }
        validate_storage(self.storage)
    }
}

/// Any mapper configuration, tagged by topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topology", rename_all = "snake_case")]
pub enum MapperConfig {
    /// A linear chain.
    Linear(LinearMapperConfig),
    /// A 2-D grid.
    Grid(GridMapperConfig),
}

impl MapperConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(contents: &str) -> MapperResult<Self> {
        let config: MapperConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> MapperResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&contents)
    }

    /// Render as YAML.
    pub fn to_yaml(&self) -> MapperResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the configuration.
    pub fn validate(&self) -> MapperResult<()> {
        match self {
            MapperConfig::Linear(config) => config.validate(),
            MapperConfig::Grid(config) => config.validate(),
        }
    }

    /// Buffer size that triggers a remap round.
    pub fn storage(&self) -> usize {
        match self {
            MapperConfig::Linear(config) => config.storage,
            MapperConfig::Grid(config) => config.storage,
        }
    }
}

fn validate_storage(storage: usize) -> MapperResult<()> {
    if storage == 0 {
        return Err(MapperError::InvalidConfiguration(
            "storage must be at least 1".into(),
        ));
    }
    Ok(())
}

fn default_storage() -> usize {
    1000
}

fn default_num_optimization_steps() -> usize {
    50
}

fn default_seed() -> u64 {
    11
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_defaults() {
        let config = MapperConfig::from_yaml_str("topology: linear\nnum_qubits: 5\n").unwrap();
        assert_eq!(config, MapperConfig::Linear(LinearMapperConfig::new(5)));
        assert_eq!(config.storage(), 1000);
    }

    #[test]
    fn test_grid_from_yaml() {
        let yaml = r"
topology: grid
num_rows: 2
num_columns: 2
optimization: swap_count
num_optimization_steps: 7
mapped_ids_to_backend_ids:
  0: 3
  1: 2
  2: 1
  3: 0
";
        let MapperConfig::Grid(config) = MapperConfig::from_yaml_str(yaml).unwrap() else {
            panic!("expected a grid config");
        };
        assert_eq!(config.optimization, CostFunction::SwapCount);
        assert_eq!(config.num_optimization_steps, 7);
        assert_eq!(config.seed, 11);
        assert_eq!(
            config.mapped_ids_to_backend_ids.unwrap().get(&1).copied(),
            Some(2)
        );
    }

    #[test]
    fn test_yaml_round_trip_keeps_topology_tag() {
        let config = MapperConfig::Linear(LinearMapperConfig::new(3).with_cyclic(true));
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("topology: linear"));
        assert_eq!(MapperConfig::from_yaml_str(&yaml).unwrap(), config);
    }

    #[test]
    fn test_invalid_configs() {
        assert!(LinearMapperConfig::new(0).validate().is_err());
        assert!(LinearMapperConfig::new(4).with_storage(0).validate().is_err());
        assert!(GridMapperConfig::new(0, 3).validate().is_err());
        assert!(
            GridMapperConfig::new(2, 2)
                .with_num_optimization_steps(0)
                .validate()
                .is_err()
        );
        assert!(matches!(
            MapperConfig::from_yaml_str("topology: ring\nnum_qubits: 3\n"),
            Err(MapperError::Config(_))
        ));
    }

    #[test]
    fn test_cost_functions() {
        let swaps = [(0, 1), (2, 3), (1, 2)];
        assert_eq!(CostFunction::SwapCount.cost(&swaps), 3);
        assert_eq!(CostFunction::SwapDepth.cost(&swaps), 2);
        assert_eq!((CostFunction::SwapDepth.into_fn())(&swaps), 2);
    }
}
