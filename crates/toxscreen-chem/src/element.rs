//! Periodic table subset used by the SMILES parser and depiction.

/// An element the parser knows about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub atomic_number: u8,
    pub symbol: &'static str,
    /// Default valence for implicit hydrogen assignment. `None` means no
    /// implicit hydrogens are ever added for this element.
    pub default_valence: Option<u8>,
}

/// Elements that appear in small-molecule screening data. Metals and noble
/// gases get no implicit hydrogens.
static ELEMENTS: &[Element] = &[
    Element { atomic_number: 1, symbol: "H", default_valence: Some(1) },
    Element { atomic_number: 3, symbol: "Li", default_valence: None },
    Element { atomic_number: 5, symbol: "B", default_valence: Some(3) },
    Element { atomic_number: 6, symbol: "C", default_valence: Some(4) },
    Element { atomic_number: 7, symbol: "N", default_valence: Some(3) },
    Element { atomic_number: 8, symbol: "O", default_valence: Some(2) },
    Element { atomic_number: 9, symbol: "F", default_valence: Some(1) },
    Element { atomic_number: 11, symbol: "Na", default_valence: None },
    Element { atomic_number: 12, symbol: "Mg", default_valence: None },
    Element { atomic_number: 13, symbol: "Al", default_valence: None },
    Element { atomic_number: 14, symbol: "Si", default_valence: Some(4) },
    Element { atomic_number: 15, symbol: "P", default_valence: Some(3) },
    Element { atomic_number: 16, symbol: "S", default_valence: Some(2) },
    Element { atomic_number: 17, symbol: "Cl", default_valence: Some(1) },
    Element { atomic_number: 19, symbol: "K", default_valence: None },
    Element { atomic_number: 20, symbol: "Ca", default_valence: None },
    Element { atomic_number: 26, symbol: "Fe", default_valence: None },
    Element { atomic_number: 27, symbol: "Co", default_valence: None },
    Element { atomic_number: 28, symbol: "Ni", default_valence: None },
    Element { atomic_number: 29, symbol: "Cu", default_valence: None },
    Element { atomic_number: 30, symbol: "Zn", default_valence: None },
    Element { atomic_number: 33, symbol: "As", default_valence: Some(3) },
    Element { atomic_number: 34, symbol: "Se", default_valence: Some(2) },
    Element { atomic_number: 35, symbol: "Br", default_valence: Some(1) },
    Element { atomic_number: 47, symbol: "Ag", default_valence: None },
    Element { atomic_number: 48, symbol: "Cd", default_valence: None },
    Element { atomic_number: 50, symbol: "Sn", default_valence: Some(4) },
    Element { atomic_number: 53, symbol: "I", default_valence: Some(1) },
    Element { atomic_number: 78, symbol: "Pt", default_valence: None },
    Element { atomic_number: 79, symbol: "Au", default_valence: None },
    Element { atomic_number: 80, symbol: "Hg", default_valence: None },
    Element { atomic_number: 82, symbol: "Pb", default_valence: None },
];

/// Look up an element by its symbol (e.g. "C", "Cl").
pub fn by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by its atomic number.
pub fn by_number(n: u8) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.atomic_number == n)
}

/// Display symbol for an atomic number, falling back to "?" for elements
/// outside the table.
pub fn symbol_of(n: u8) -> &'static str {
    by_number(n).map_or("?", |e| e.symbol)
}
