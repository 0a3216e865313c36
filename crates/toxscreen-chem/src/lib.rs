//! toxscreen Chemistry
//!
//! The chemistry layer of toxscreen: SMILES parsing into molecular graphs,
//! Morgan (ECFP-style) bit-vector fingerprints, and a lightweight SVG
//! structure depiction.
//!
//! The one contract the rest of the workspace relies on is
//! [`featurize`]: structure string in, fixed-width binary fingerprint out,
//! `None` for anything unparseable - never a panic, never an error value.

pub mod depict;
pub mod element;
pub mod fingerprint;
pub mod molecule;
pub mod smiles;

pub use depict::depict_svg;
pub use fingerprint::{featurize, featurize_with_radius, morgan_fingerprint, Featurized, Fingerprint};
pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use smiles::parse_smiles;
