//! Morgan (ECFP-style) fingerprints and the featurizer contract.

use tracing::debug;

use crate::molecule::Molecule;
use crate::smiles::parse_smiles;

/// A fixed-width bit vector backed by packed `u64` words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    words: Vec<u64>,
    width: usize,
}

impl Fingerprint {
    /// Create an all-zero fingerprint of the given width.
    pub fn zeros(width: usize) -> Self {
        Fingerprint {
            words: vec![0u64; width.div_ceil(64)],
            width,
        }
    }

    /// Set the bit at `pos` (taken modulo the width).
    pub fn set(&mut self, pos: usize) {
        let pos = pos % self.width;
        self.words[pos / 64] |= 1u64 << (pos % 64);
    }

    /// Read the bit at `pos` (taken modulo the width).
    pub fn get(&self, pos: usize) -> bool {
        let pos = pos % self.width;
        (self.words[pos / 64] >> (pos % 64)) & 1 == 1
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Fingerprint width in bits.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Expand into a dense 0.0/1.0 feature row for the model layer.
    pub fn to_dense(&self) -> Vec<f64> {
        (0..self.width)
            .map(|i| if self.get(i) { 1.0 } else { 0.0 })
            .collect()
    }
}

/// Compute a Morgan fingerprint for a molecule.
///
/// `radius` controls the neighborhood size (2 behaves like ECFP4), `width`
/// is the bit-vector length. Deterministic: identical molecule and
/// parameters always produce the identical bit pattern.
pub fn morgan_fingerprint(mol: &Molecule, radius: usize, width: usize) -> Fingerprint {
    let n = mol.atom_count();
    let mut fp = Fingerprint::zeros(width);
    if n == 0 || width == 0 {
        return fp;
    }

    let in_ring = mol.ring_atoms();

    // Round-0 atom invariants
    let mut ids: Vec<u64> = (0..n)
        .map(|i| {
            let atom = &mol.atoms[i];
            let mut h = Fnv1a::new();
            h.write(atom.atomic_number as u64);
            h.write(mol.degree(i) as u64);
            h.write(atom.implicit_hydrogens as u64);
            h.write(atom.charge as u64);
            h.write(atom.aromatic as u64);
            h.write(in_ring[i] as u64);
            h.finish()
        })
        .collect();

    for &id in &ids {
        fp.set(id as usize);
    }

    // Expand neighborhoods one bond at a time
    for _ in 0..radius {
        let mut next = Vec::with_capacity(n);
        for i in 0..n {
            let mut env: Vec<(u64, u8)> = mol
                .neighbors(i)
                .iter()
                .map(|&(nb, bi)| (ids[nb], mol.bonds[bi].order as u8))
                .collect();
            env.sort_unstable();

            let mut h = Fnv1a::new();
            h.write(ids[i]);
            for (nid, order) in env {
                h.write(nid);
                h.write(order as u64);
            }
            let id = h.finish();
            fp.set(id as usize);
            next.push(id);
        }
        ids = next;
    }

    fp
}

/// A successfully featurized structure: the feature vector plus the parsed
/// molecule (kept for depiction).
#[derive(Debug, Clone)]
pub struct Featurized {
    pub fingerprint: Fingerprint,
    pub molecule: Molecule,
}

/// The featurizer contract: SMILES in, fixed-width fingerprint out, or
/// `None` when the string is not a valid structure. Never errors outward
/// and has no side effects beyond a debug log.
pub fn featurize(smiles: &str, width: usize) -> Option<Featurized> {
    featurize_with_radius(smiles, 2, width)
}

/// [`featurize`] with an explicit Morgan radius.
pub fn featurize_with_radius(smiles: &str, radius: usize, width: usize) -> Option<Featurized> {
    if width == 0 {
        debug!(smiles, "zero-width fingerprint requested");
        return None;
    }
    match parse_smiles(smiles) {
        Ok(molecule) => {
            let fingerprint = morgan_fingerprint(&molecule, radius, width);
            Some(Featurized { fingerprint, molecule })
        }
        Err(err) => {
            debug!(smiles, %err, "structure rejected by featurizer");
            None
        }
    }
}

/// Incremental FNV-1a over little-endian u64 values.
struct Fnv1a(u64);

impl Fnv1a {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Fnv1a(Self::OFFSET)
    }

    fn write(&mut self, value: u64) {
        for byte in value.to_le_bytes() {
            self.0 ^= byte as u64;
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_set_and_get() {
        let mut fp = Fingerprint::zeros(128);
        assert!(!fp.get(17));
        fp.set(17);
        assert!(fp.get(17));
        fp.set(17 + 128); // wraps
        assert_eq!(fp.count_ones(), 1);
    }

    #[test]
    fn dense_row_is_width_and_binary() {
        let Featurized { fingerprint, .. } = featurize("CCO", 256).unwrap();
        let row = fingerprint.to_dense();
        assert_eq!(row.len(), 256);
        assert!(row.iter().all(|&v| v == 0.0 || v == 1.0));
        assert!(row.iter().any(|&v| v == 1.0));
    }

    #[test]
    fn featurize_is_deterministic() {
        let a = featurize("CC(=O)OC1=CC=CC=C1C(=O)O", 2048).unwrap();
        let b = featurize("CC(=O)OC1=CC=CC=C1C(=O)O", 2048).unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn different_structures_differ() {
        let a = featurize("CCO", 2048).unwrap();
        let b = featurize("c1ccccc1", 2048).unwrap();
        assert_ne!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn garbage_returns_none() {
        assert!(featurize("", 2048).is_none());
        assert!(featurize("not a molecule", 2048).is_none());
        assert!(featurize("C1CC", 2048).is_none());
        assert!(featurize("((((", 2048).is_none());
    }

    #[test]
    fn zero_width_returns_none() {
        assert!(featurize("C", 0).is_none());

        // Direct fingerprint path stays total as well
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(morgan_fingerprint(&mol, 2, 0).count_ones(), 0);
    }

    #[test]
    fn radius_grows_bit_count() {
        let mol = parse_smiles("CCCCCCCC").unwrap();
        let r0 = morgan_fingerprint(&mol, 0, 2048);
        let r2 = morgan_fingerprint(&mol, 2, 2048);
        assert!(r2.count_ones() >= r0.count_ones());
    }

    #[test]
    fn empty_width_rounding() {
        let fp = Fingerprint::zeros(100);
        assert_eq!(fp.width(), 100);
        assert_eq!(fp.to_dense().len(), 100);
    }
}
