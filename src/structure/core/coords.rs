use crate::Lattice;
use crate::util::V3;

/// Wrapper type for coordinates used as input to some APIs.
///
/// This allows a function to support either cartesian coordinates,
/// or fractional coordinates with respect to some lattice.
#[derive(Debug, Clone, PartialEq)]
pub enum Coords {
    Carts(Vec<V3>),
    Fracs(Vec<V3>),
}

impl Coords {
    pub fn len(&self) -> usize
    { match *self {
        Coords::Carts(ref c) => c.len(),
        Coords::Fracs(ref c) => c.len(),
    }}

    pub fn is_empty(&self) -> bool
    { self.len() == 0 }
}

// conversions
impl Coords {
    pub fn into_carts(self, lattice: &Lattice) -> Vec<V3>
    { match self {
        Coords::Carts(c) => c,
        Coords::Fracs(c) => lattice.fracs_to_carts(&c),
    }}

    pub fn into_fracs(self, lattice: &Lattice) -> Vec<V3>
    { match self {
        Coords::Carts(c) => lattice.carts_to_fracs(&c),
        Coords::Fracs(c) => c,
    }}

    pub fn to_carts(&self, lattice: &Lattice) -> Vec<V3>
    { self.clone().into_carts(lattice) }

    pub fn to_fracs(&self, lattice: &Lattice) -> Vec<V3>
    { self.clone().into_fracs(lattice) }
}
