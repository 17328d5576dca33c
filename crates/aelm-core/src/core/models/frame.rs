use nalgebra::{Point3, Vector3};
use std::fmt;
use std::str::FromStr;

/// Identifies the kind of an atom.
///
/// Trajectories written by sampling codes usually carry element symbols, while LAMMPS
/// works with integer atom types. A frame may hold either representation; the preparer
/// converts labels into codes when the selected backend needs them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Element symbol or free-form atom label (e.g., "Si", "Li").
    Label(String),
    /// Integer atom type code, starting at 1 in LAMMPS conventions.
    Code(u32),
}

impl Species {
    /// Returns the type code if this species has already been mapped to one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Species::Code(code) => Some(*code),
            Species::Label(_) => None,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Label(label) => f.pad(label),
            Species::Code(code) => write!(f, "{}", code),
        }
    }
}

impl FromStr for Species {
    type Err = ();

    /// Parses a token into a `Species`.
    ///
    /// Tokens made only of digits become type codes, anything else non-empty is kept as a
    /// label.
    ///
    /// # Errors
    ///
    /// Returns `()` for an empty or whitespace-only token.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(());
        }
        match token.parse::<u32>() {
            Ok(code) => Ok(Species::Code(code)),
            Err(_) => Ok(Species::Label(token.to_string())),
        }
    }
}

/// One atomic configuration of a trajectory.
///
/// All per-atom vectors are parallel to `positions`. Optional per-atom data (`indices`,
/// `charges`) is `None` when the source format does not carry it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Cartesian coordinates in Angstroms.
    pub positions: Vec<Point3<f64>>,
    /// Per-atom species, either element labels or type codes.
    pub species: Vec<Species>,
    /// Per-atom identifiers, 1-based once the frame has been prepared.
    pub indices: Option<Vec<usize>>,
    /// Per-atom partial charges.
    pub charges: Option<Vec<f64>>,
    /// Orthorhombic box lengths along x, y and z.
    pub box_lengths: Option<Vector3<f64>>,
    /// Lower corner of the box. Zero unless a dump declared shifted bounds.
    pub box_origin: [f64; 3],
    /// Timestep reported by a LAMMPS dump; zero for formats without one.
    pub timestep: u64,
    /// Free-form comment line of an XYZ frame.
    pub comment: String,
}

impl Frame {
    /// Creates a frame from parallel species and position vectors.
    ///
    /// The optional fields start empty and are filled by readers or by the preparer.
    pub fn new(species: Vec<Species>, positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            species,
            ..Default::default()
        }
    }

    /// Number of atoms in the frame.
    pub fn natoms(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sets the box lengths of a box anchored at the origin.
    pub fn set_box(&mut self, lengths: [f64; 3]) {
        self.box_lengths = Some(Vector3::from(lengths));
        self.box_origin = [0.0; 3];
    }

    /// Assigns the indices `1..=natoms` in the current atom order.
    pub fn assign_sequential_indices(&mut self) {
        self.indices = Some((1..=self.natoms()).collect());
    }

    /// Replaces the charges with a zero for every atom.
    pub fn zero_charges(&mut self) {
        self.charges = Some(vec![0.0; self.natoms()]);
    }

    /// Index of atom `i`, falling back to its 1-based position when the frame has none.
    pub fn index_of(&self, i: usize) -> usize {
        self.indices
            .as_ref()
            .and_then(|indices| indices.get(i).copied())
            .unwrap_or(i + 1)
    }
}
