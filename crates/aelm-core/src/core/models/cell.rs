use serde::Deserialize;
use std::collections::BTreeMap;

/// Simulation cell and type information applied to every frame of a run.
///
/// The `types` mapping translates element labels found in the biased trajectory into the
/// integer atom types expected by LAMMPS (e.g., `{"Si": 1, "Li": 2}`). It may be left
/// empty for backends that consume element labels directly.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellInfo {
    /// Box length in each direction, in Angstroms.
    #[serde(rename = "box")]
    pub box_lengths: [f64; 3],
    /// Element label to integer type code.
    #[serde(default, rename = "type")]
    pub types: BTreeMap<String, u32>,
}

impl CellInfo {
    /// Creates a cubic or orthorhombic cell with an empty type mapping.
    pub fn new(box_lengths: [f64; 3]) -> Self {
        Self {
            box_lengths,
            types: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) the type code of an element label.
    pub fn with_type(mut self, label: &str, code: u32) -> Self {
        self.types.insert(label.to_string(), code);
        self
    }

    pub fn type_code(&self, label: &str) -> Option<u32> {
        self.types.get(label).copied()
    }
}
