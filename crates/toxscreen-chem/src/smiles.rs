//! SMILES string parser.
//!
//! Covers the subset that screening datasets actually use: organic-subset
//! atoms, bracket atoms with isotope/charge/explicit hydrogens, aromatic
//! lowercase forms, branches, ring closures (including `%nn`), explicit
//! bond symbols, and dot-separated fragments. Stereo markers are accepted
//! and ignored. All malformed input is reported as `Error::Parse`; the
//! parser never panics.

use std::collections::BTreeMap;

use toxscreen_core::{Error, Result};

use crate::element;
use crate::molecule::{Atom, Bond, BondOrder, Molecule};

/// Parse a SMILES string into a [`Molecule`].
pub fn parse_smiles(smiles: &str) -> Result<Molecule> {
    if smiles.trim().is_empty() {
        return Err(Error::parse("empty SMILES string"));
    }
    let mut reader = SmilesReader::new(smiles.trim());
    reader.run()?;
    reader.check_balanced()?;
    reader.assign_implicit_hydrogens();
    Ok(Molecule::new(reader.atoms, reader.bonds))
}

struct SmilesReader<'a> {
    input: &'a [u8],
    pos: usize,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    /// Atoms whose hydrogen count was given explicitly in brackets.
    h_fixed: Vec<bool>,
    /// Open ring closures: digit -> (atom index, bond symbol seen at open).
    open_rings: BTreeMap<u16, (usize, Option<BondOrder>)>,
    /// Branch return points.
    branch_stack: Vec<usize>,
    prev: Option<usize>,
    pending_bond: Option<BondOrder>,
}

impl<'a> SmilesReader<'a> {
    fn new(input: &'a str) -> Self {
        SmilesReader {
            input: input.as_bytes(),
            pos: 0,
            atoms: Vec::new(),
            bonds: Vec::new(),
            h_fixed: Vec::new(),
            open_rings: BTreeMap::new(),
            branch_stack: Vec::new(),
            prev: None,
            pending_bond: None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    fn run(&mut self) -> Result<()> {
        while let Some(ch) = self.peek() {
            match ch {
                b'(' => {
                    self.bump();
                    match self.prev {
                        Some(p) => self.branch_stack.push(p),
                        None => return Err(Error::parse("branch with no preceding atom")),
                    }
                }
                b')' => {
                    self.bump();
                    self.prev = Some(
                        self.branch_stack
                            .pop()
                            .ok_or_else(|| Error::parse("unmatched ')'"))?,
                    );
                    self.pending_bond = None;
                }
                b'-' => {
                    self.bump();
                    self.pending_bond = Some(BondOrder::Single);
                }
                b'=' => {
                    self.bump();
                    self.pending_bond = Some(BondOrder::Double);
                }
                b'#' => {
                    self.bump();
                    self.pending_bond = Some(BondOrder::Triple);
                }
                b':' => {
                    self.bump();
                    self.pending_bond = Some(BondOrder::Aromatic);
                }
                // Cis/trans markers carry no connectivity information here
                b'/' | b'\\' => {
                    self.bump();
                }
                b'.' => {
                    self.bump();
                    self.prev = None;
                    self.pending_bond = None;
                }
                b'%' => {
                    self.bump();
                    let num = self.two_digit_ring()?;
                    self.ring_closure(num)?;
                }
                b'0'..=b'9' => {
                    self.bump();
                    self.ring_closure((ch - b'0') as u16)?;
                }
                b'[' => self.bracket_atom()?,
                _ if organic_subset_start(ch) => {
                    self.bump();
                    self.organic_atom(ch)?;
                }
                _ => {
                    return Err(Error::parse(format!(
                        "unexpected character '{}' at position {}",
                        ch as char, self.pos
                    )));
                }
            }
        }
        Ok(())
    }

    fn organic_atom(&mut self, ch: u8) -> Result<()> {
        let aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        // Two-letter organic-subset symbols: Cl and Br only
        let symbol: String = match (upper, self.peek()) {
            (b'C', Some(b'l')) if !aromatic => {
                self.bump();
                "Cl".into()
            }
            (b'B', Some(b'r')) if !aromatic => {
                self.bump();
                "Br".into()
            }
            _ => (upper as char).to_string(),
        };

        if aromatic && !matches!(symbol.as_str(), "B" | "C" | "N" | "O" | "P" | "S") {
            return Err(Error::parse(format!("'{symbol}' cannot be aromatic")));
        }

        let elem = element::by_symbol(&symbol)
            .ok_or_else(|| Error::parse(format!("unknown element '{symbol}'")))?;

        self.push_atom(
            Atom {
                atomic_number: elem.atomic_number,
                charge: 0,
                isotope: None,
                aromatic,
                implicit_hydrogens: 0,
            },
            false,
        )
    }

    fn bracket_atom(&mut self) -> Result<()> {
        self.bump(); // '['

        let isotope = match self.read_number() {
            Some(n) if n > u16::MAX as u32 => {
                return Err(Error::parse(format!("isotope {n} is out of range")));
            }
            other => other.map(|n| n as u16),
        };

        let ch = self
            .bump()
            .ok_or_else(|| Error::parse("truncated bracket atom"))?;
        if !ch.is_ascii_alphabetic() {
            return Err(Error::parse(format!(
                "expected element symbol, found '{}'",
                ch as char
            )));
        }
        let aromatic = ch.is_ascii_lowercase();
        let upper = ch.to_ascii_uppercase();

        // Prefer a two-letter symbol when the table knows it
        let symbol = match self.peek() {
            Some(next) if next.is_ascii_lowercase() => {
                let two = format!("{}{}", upper as char, next as char);
                if element::by_symbol(&two).is_some() {
                    self.bump();
                    two
                } else {
                    (upper as char).to_string()
                }
            }
            _ => (upper as char).to_string(),
        };

        let elem = element::by_symbol(&symbol)
            .ok_or_else(|| Error::parse(format!("unknown element '{symbol}'")))?;

        // Tetrahedral markers are parsed but not modeled
        while self.peek() == Some(b'@') {
            self.bump();
        }

        let mut hydrogens = 0u8;
        if self.peek() == Some(b'H') {
            self.bump();
            hydrogens = match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.bump();
                    d - b'0'
                }
                _ => 1,
            };
        }

        let charge = self.read_charge()?;

        if self.bump() != Some(b']') {
            return Err(Error::parse("expected ']' to close bracket atom"));
        }

        self.push_atom(
            Atom {
                atomic_number: elem.atomic_number,
                charge,
                isotope,
                aromatic,
                implicit_hydrogens: hydrogens,
            },
            true,
        )
    }

    fn push_atom(&mut self, atom: Atom, h_is_fixed: bool) -> Result<()> {
        let idx = self.atoms.len();
        self.atoms.push(atom);
        self.h_fixed.push(h_is_fixed);
        if let Some(prev) = self.prev {
            let both_aromatic = self.atoms[prev].aromatic && self.atoms[idx].aromatic;
            let order = self.pending_bond.take().unwrap_or(if both_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            });
            self.bonds.push(Bond { a: prev, b: idx, order });
        }
        self.pending_bond = None;
        self.prev = Some(idx);
        Ok(())
    }

    fn ring_closure(&mut self, num: u16) -> Result<()> {
        let current = self
            .prev
            .ok_or_else(|| Error::parse("ring closure with no preceding atom"))?;

        match self.open_rings.remove(&num) {
            Some((open_atom, open_bond)) => {
                if open_atom == current {
                    return Err(Error::parse(format!("ring bond {num} closes on itself")));
                }
                let order = self.pending_bond.take().or(open_bond).unwrap_or_else(|| {
                    if self.atoms[open_atom].aromatic && self.atoms[current].aromatic {
                        BondOrder::Aromatic
                    } else {
                        BondOrder::Single
                    }
                });
                self.bonds.push(Bond { a: open_atom, b: current, order });
            }
            None => {
                self.open_rings
                    .insert(num, (current, self.pending_bond.take()));
            }
        }
        Ok(())
    }

    fn read_number(&mut self) -> Option<u32> {
        let mut value = 0u32;
        let mut seen = false;
        while let Some(d) = self.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            self.bump();
            value = value.saturating_mul(10).saturating_add((d - b'0') as u32);
            seen = true;
        }
        seen.then_some(value)
    }

    fn read_charge(&mut self) -> Result<i8> {
        let sign: i8 = match self.peek() {
            Some(b'+') => 1,
            Some(b'-') => -1,
            _ => return Ok(0),
        };
        self.bump();
        match self.peek() {
            Some(d) if d.is_ascii_digit() => {
                self.bump();
                Ok(sign * (d - b'0') as i8)
            }
            // Repeated signs ("++", "--")
            Some(s) if s == if sign > 0 { b'+' } else { b'-' } => {
                let mut magnitude: i32 = 1;
                while self.peek() == Some(s) {
                    self.bump();
                    magnitude = magnitude.saturating_add(1);
                }
                if magnitude > 15 {
                    return Err(Error::parse(format!(
                        "charge magnitude {magnitude} is out of range"
                    )));
                }
                Ok(sign * magnitude as i8)
            }
            _ => Ok(sign),
        }
    }

    fn two_digit_ring(&mut self) -> Result<u16> {
        let d1 = self.bump();
        let d2 = self.bump();
        match (d1, d2) {
            (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => {
                Ok((a - b'0') as u16 * 10 + (b - b'0') as u16)
            }
            _ => Err(Error::parse("'%' must be followed by two digits")),
        }
    }

    fn check_balanced(&self) -> Result<()> {
        if !self.open_rings.is_empty() {
            let open: Vec<_> = self.open_rings.keys().collect();
            return Err(Error::parse(format!("unclosed ring bond(s): {open:?}")));
        }
        if !self.branch_stack.is_empty() {
            return Err(Error::parse(format!(
                "{} unclosed '(' in SMILES",
                self.branch_stack.len()
            )));
        }
        Ok(())
    }

    /// Fill implicit hydrogens on organic-subset atoms from the element's
    /// default valence. Bracket atoms keep their explicit count.
    fn assign_implicit_hydrogens(&mut self) {
        let mol = Molecule::new(self.atoms.clone(), self.bonds.clone());
        for i in 0..self.atoms.len() {
            if self.h_fixed[i] {
                continue;
            }
            let atom = &self.atoms[i];
            let Some(valence) = element::by_number(atom.atomic_number)
                .and_then(|e| e.default_valence)
            else {
                continue;
            };
            // An aromatic atom contributes one electron to the pi system;
            // its aromatic bonds each occupy one sigma slot.
            let (capacity, used) = if atom.aromatic {
                ((valence as usize).saturating_sub(1), mol.degree(i))
            } else {
                (valence as usize, mol.bond_order_sum(i))
            };
            self.atoms[i].implicit_hydrogens = capacity.saturating_sub(used) as u8;
        }
    }
}

fn organic_subset_start(ch: u8) -> bool {
    matches!(
        ch,
        b'B' | b'C' | b'N' | b'O' | b'P' | b'S' | b'F' | b'I'
            | b'b' | b'c' | b'n' | b'o' | b'p' | b's'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methane() {
        let mol = parse_smiles("C").unwrap();
        assert_eq!(mol.atom_count(), 1);
        assert_eq!(mol.atoms[0].atomic_number, 6);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);
    }

    #[test]
    fn ethanol() {
        let mol = parse_smiles("CCO").unwrap();
        assert_eq!(mol.atom_count(), 3);
        assert_eq!(mol.bond_count(), 2);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 3);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 2);
        assert_eq!(mol.atoms[2].implicit_hydrogens, 1);
    }

    #[test]
    fn benzene() {
        let mol = parse_smiles("c1ccccc1").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
        for atom in &mol.atoms {
            assert!(atom.aromatic);
            assert_eq!(atom.implicit_hydrogens, 1);
        }
    }

    #[test]
    fn aspirin_parses() {
        // The front end's default example
        let mol = parse_smiles("CC(=O)OC1=CC=CC=C1C(=O)O").unwrap();
        assert_eq!(mol.atom_count(), 13);
    }

    #[test]
    fn branches() {
        let mol = parse_smiles("CC(C)C").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.degree(1), 3);
    }

    #[test]
    fn explicit_bond_orders() {
        let mol = parse_smiles("C#N").unwrap();
        assert_eq!(mol.bonds[0].order, BondOrder::Triple);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 1);
        assert_eq!(mol.atoms[1].implicit_hydrogens, 0);
    }

    #[test]
    fn bracket_atom_charge_and_hydrogens() {
        let mol = parse_smiles("[NH4+]").unwrap();
        assert_eq!(mol.atoms[0].atomic_number, 7);
        assert_eq!(mol.atoms[0].charge, 1);
        assert_eq!(mol.atoms[0].implicit_hydrogens, 4);

        let mol = parse_smiles("[O-2]").unwrap();
        assert_eq!(mol.atoms[0].charge, -2);
    }

    #[test]
    fn repeated_sign_charges() {
        let mol = parse_smiles("[Fe+++]").unwrap();
        assert_eq!(mol.atoms[0].charge, 3);

        // Absurdly long sign runs are malformed input, not a crash
        assert!(parse_smiles(&format!("[Fe{}]", "+".repeat(150))).is_err());
        assert!(parse_smiles(&format!("[O{}]", "-".repeat(300))).is_err());
    }

    #[test]
    fn isotope_bounds() {
        let mol = parse_smiles("[13C]").unwrap();
        assert_eq!(mol.atoms[0].isotope, Some(13));

        assert!(parse_smiles("[999999C]").is_err());
    }

    #[test]
    fn two_digit_ring_closure() {
        let mol = parse_smiles("C%12CCCCC%12").unwrap();
        assert_eq!(mol.atom_count(), 6);
        assert_eq!(mol.bond_count(), 6);
    }

    #[test]
    fn disconnected_fragments() {
        // Sodium acetate
        let mol = parse_smiles("CC(=O)[O-].[Na+]").unwrap();
        assert_eq!(mol.atom_count(), 5);
        assert_eq!(mol.bond_count(), 3);
    }

    #[test]
    fn malformed_inputs_error() {
        assert!(parse_smiles("").is_err());
        assert!(parse_smiles("   ").is_err());
        assert!(parse_smiles("C(").is_err());
        assert!(parse_smiles("C)").is_err());
        assert!(parse_smiles("C1CC").is_err());
        assert!(parse_smiles("[").is_err());
        assert!(parse_smiles("[Xx]").is_err());
        assert!(parse_smiles("hello world").is_err());
        assert!(parse_smiles("1CC").is_err());
    }

    #[test]
    fn stereo_markers_ignored() {
        let mol = parse_smiles("F/C=C/F").unwrap();
        assert_eq!(mol.atom_count(), 4);
        assert_eq!(mol.bonds[1].order, BondOrder::Double);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn chain_smiles() -> impl Strategy<Value = String> {
        let atoms = prop_oneof![
            Just("C"),
            Just("N"),
            Just("O"),
            Just("S"),
            Just("Cl"),
            Just("c"),
            Just("n"),
        ];
        proptest::collection::vec(atoms, 1..=24).prop_map(|parts| parts.join(""))
    }

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_input(s in "\\PC{0,80}") {
            let _ = parse_smiles(&s);
        }

        #[test]
        fn chains_always_parse(smi in chain_smiles()) {
            let mol = parse_smiles(&smi).unwrap();
            prop_assert!(mol.atom_count() > 0);
            prop_assert_eq!(mol.bond_count(), mol.atom_count() - 1);
        }
    }
}
