//! 2D structure depiction as SVG.
//!
//! Deterministic layout: atoms start on a circle in graph order, then a
//! fixed number of spring-relaxation iterations pull bonded atoms to unit
//! distance and push unbonded atoms apart. Good enough for a preview
//! panel; this is not a publication-quality structure drawer.

use crate::element::symbol_of;
use crate::molecule::{BondOrder, Molecule};

const ITERATIONS: usize = 300;
const SPRING: f64 = 0.12;
const REPULSION: f64 = 0.45;
const BOND_PX: f64 = 42.0;
const MARGIN_PX: f64 = 26.0;

/// Render a molecule as an SVG document string.
pub fn depict_svg(mol: &Molecule) -> String {
    let coords = layout(mol);
    render(mol, &coords)
}

/// Compute 2D coordinates in bond-length units.
fn layout(mol: &Molecule) -> Vec<(f64, f64)> {
    let n = mol.atom_count();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(0.0, 0.0)];
    }

    // Initial placement on a circle, deterministic in atom order
    let mut pos: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            let r = (n as f64).sqrt();
            (r * angle.cos(), r * angle.sin())
        })
        .collect();

    for _ in 0..ITERATIONS {
        let mut force = vec![(0.0f64, 0.0f64); n];

        // Pairwise repulsion
        for i in 0..n {
            for j in (i + 1)..n {
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let d2 = (dx * dx + dy * dy).max(1e-4);
                let f = REPULSION / d2;
                let d = d2.sqrt();
                force[i].0 += f * dx / d;
                force[i].1 += f * dy / d;
                force[j].0 -= f * dx / d;
                force[j].1 -= f * dy / d;
            }
        }

        // Springs along bonds toward unit length
        for bond in &mol.bonds {
            let dx = pos[bond.b].0 - pos[bond.a].0;
            let dy = pos[bond.b].1 - pos[bond.a].1;
            let d = (dx * dx + dy * dy).sqrt().max(1e-4);
            let f = SPRING * (d - 1.0);
            force[bond.a].0 += f * dx / d;
            force[bond.a].1 += f * dy / d;
            force[bond.b].0 -= f * dx / d;
            force[bond.b].1 -= f * dy / d;
        }

        for i in 0..n {
            pos[i].0 += force[i].0.clamp(-0.2, 0.2);
            pos[i].1 += force[i].1.clamp(-0.2, 0.2);
        }
    }

    pos
}

fn render(mol: &Molecule, coords: &[(f64, f64)]) -> String {
    if coords.is_empty() {
        return String::from(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"60\" height=\"60\"/>",
        );
    }

    let min_x = coords.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let max_x = coords.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = coords.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_y = coords.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

    let width = (max_x - min_x) * BOND_PX + 2.0 * MARGIN_PX;
    let height = (max_y - min_y) * BOND_PX + 2.0 * MARGIN_PX;
    let px = |c: (f64, f64)| {
        (
            (c.0 - min_x) * BOND_PX + MARGIN_PX,
            (c.1 - min_y) * BOND_PX + MARGIN_PX,
        )
    };

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.0}\" height=\"{height:.0}\" \
         viewBox=\"0 0 {width:.0} {height:.0}\">\n\
         <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n"
    );

    for bond in &mol.bonds {
        let (x1, y1) = px(coords[bond.a]);
        let (x2, y2) = px(coords[bond.b]);
        let strokes = match bond.order {
            BondOrder::Single | BondOrder::Aromatic => 1,
            BondOrder::Double => 2,
            BondOrder::Triple => 3,
        };
        // Offset parallel lines perpendicular to the bond
        let (dx, dy) = (x2 - x1, y2 - y1);
        let len = (dx * dx + dy * dy).sqrt().max(1e-4);
        let (ox, oy) = (-dy / len * 2.4, dx / len * 2.4);
        for k in 0..strokes {
            let shift = k as f64 - (strokes - 1) as f64 / 2.0;
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" \
                 stroke=\"black\" stroke-width=\"1.4\"/>\n",
                x1 + ox * shift,
                y1 + oy * shift,
                x2 + ox * shift,
                y2 + oy * shift,
            ));
        }
    }

    for (i, atom) in mol.atoms.iter().enumerate() {
        // Carbons stay as bare vertices unless charged or isolated
        if atom.atomic_number == 6 && atom.charge == 0 && mol.degree(i) > 0 {
            continue;
        }
        let (x, y) = px(coords[i]);
        let mut label = symbol_of(atom.atomic_number).to_string();
        match atom.charge {
            0 => {}
            1 => label.push('+'),
            -1 => label.push('-'),
            c if c > 0 => label.push_str(&format!("+{c}")),
            c => label.push_str(&format!("{c}")),
        }
        svg.push_str(&format!(
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"8.5\" fill=\"white\"/>\n\
             <text x=\"{x:.1}\" y=\"{y:.1}\" font-size=\"11\" font-family=\"sans-serif\" \
             text-anchor=\"middle\" dominant-baseline=\"central\">{label}</text>\n"
        ));
    }

    svg.push_str("</svg>");
    svg
}
