//! Molecular graph representation.

use serde::{Deserialize, Serialize};

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric bond order for valence calculations.
    pub fn value(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// An atom in a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub atomic_number: u8,
    pub charge: i8,
    pub isotope: Option<u16>,
    pub aromatic: bool,
    pub implicit_hydrogens: u8,
}

/// A bond between two atoms, identified by index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

/// A molecular graph with adjacency information.
///
/// `adjacency[i]` lists `(neighbor_atom, bond_index)` pairs for atom `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    #[serde(skip)]
    adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Build a molecule, deriving the adjacency list from its bonds.
    pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.a].push((bond.b, bi));
            adjacency[bond.b].push((bond.a, bi));
        }
        Molecule { atoms, bonds, adjacency }
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Graph degree of an atom (explicit bonds only).
    pub fn degree(&self, atom: usize) -> usize {
        self.adjacency[atom].len()
    }

    /// `(neighbor_atom, bond_index)` pairs for an atom.
    pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
        &self.adjacency[atom]
    }

    /// Sum of bond orders at an atom, rounded to an integer. Aromatic
    /// bonds count as 1.5 each.
    pub fn bond_order_sum(&self, atom: usize) -> usize {
        let v: f64 = self.adjacency[atom]
            .iter()
            .map(|&(_, bi)| self.bonds[bi].order.value())
            .sum();
        v.round() as usize
    }

    /// Per-atom ring membership.
    ///
    /// A bond is a ring bond iff its endpoints stay connected after the
    /// bond is removed; an atom is a ring atom iff it touches a ring bond.
    /// Quadratic in the graph size, which is fine for screening-scale
    /// molecules.
    pub fn ring_atoms(&self) -> Vec<bool> {
        let n = self.atom_count();
        let mut in_ring = vec![false; n];
        for (bi, bond) in self.bonds.iter().enumerate() {
            if self.connected_without(bond.a, bond.b, bi) {
                in_ring[bond.a] = true;
                in_ring[bond.b] = true;
            }
        }
        in_ring
    }

    /// BFS from `start` to `goal` skipping bond `skip`.
    fn connected_without(&self, start: usize, goal: usize, skip: usize) -> bool {
        let mut seen = vec![false; self.atom_count()];
        let mut queue = std::collections::VecDeque::new();
        seen[start] = true;
        queue.push_back(start);
        while let Some(cur) = queue.pop_front() {
            if cur == goal {
                return true;
            }
            for &(next, bi) in &self.adjacency[cur] {
                if bi != skip && !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(z: u8) -> Atom {
        Atom {
            atomic_number: z,
            charge: 0,
            isotope: None,
            aromatic: false,
            implicit_hydrogens: 0,
        }
    }

    fn chain(n: usize) -> Molecule {
        let atoms = (0..n).map(|_| atom(6)).collect();
        let bonds = (0..n.saturating_sub(1))
            .map(|i| Bond { a: i, b: i + 1, order: BondOrder::Single })
            .collect();
        Molecule::new(atoms, bonds)
    }

    #[test]
    fn adjacency_is_symmetric() {
        let mol = chain(3);
        assert_eq!(mol.degree(0), 1);
        assert_eq!(mol.degree(1), 2);
        assert_eq!(mol.neighbors(1), &[(0, 0), (2, 1)]);
    }

    #[test]
    fn bond_order_sum_counts_multiplicity() {
        let atoms = vec![atom(6), atom(6)];
        let bonds = vec![Bond { a: 0, b: 1, order: BondOrder::Double }];
        let mol = Molecule::new(atoms, bonds);
        assert_eq!(mol.bond_order_sum(0), 2);
    }

    #[test]
    fn chain_has_no_ring_atoms() {
        let mol = chain(4);
        assert!(mol.ring_atoms().iter().all(|&r| !r));
    }

    #[test]
    fn cycle_atoms_are_ring_atoms() {
        let atoms = (0..3).map(|_| atom(6)).collect();
        let bonds = vec![
            Bond { a: 0, b: 1, order: BondOrder::Single },
            Bond { a: 1, b: 2, order: BondOrder::Single },
            Bond { a: 2, b: 0, order: BondOrder::Single },
        ];
        let mol = Molecule::new(atoms, bonds);
        assert!(mol.ring_atoms().iter().all(|&r| r));
    }
}
