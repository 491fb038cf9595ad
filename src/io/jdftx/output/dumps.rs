/* ************************************************************************ **
** This file is part of jdftx-plugin, and is licensed under EITHER the MIT  **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of jdftx-plugin is provided under this permissive  **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

//! Files dumped by JDFTx at the end of a run (`dump End ...`).

use crate::OutputParsingError;
use crate::kpoints::KpointSet;
use super::stdout::read_floats;

use jdftx_structure::{Structure, Lattice};

/// Lines after the header, without blanks or comments.
fn body_lines(text: &str) -> impl Iterator<Item=&str> {
    text.trim().lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with('#'))
}

/// Build the final structure from the `.lattice` and `.ionpos` dumps.
///
/// Values are taken as written, without unit conversion.
pub(crate) fn parse_final_structure(
    lattice_text: &str,
    lattice_file: &str,
    ionpos_text: &str,
    ionpos_file: &str,
) -> Result<Structure, OutputParsingError> {
    let rows = body_lines(lattice_text)
        .map(|line| read_floats(line, 0, lattice_file))
        .collect::<Result<Vec<_>, _>>()?;
    if rows.len() != 3 {
        return Err(OutputParsingError::new(lattice_file, format!("expected 3 lattice vectors, found {}", rows.len())));
    }
    let lattice = Lattice::new(&[rows[0], rows[1], rows[2]]);

    let mut structure = Structure::new(lattice);
    for line in body_lines(ionpos_text) {
        let symbol = match line.split_whitespace().nth(1) {
            Some(symbol) => symbol,
            None => return Err(OutputParsingError::new(ionpos_file, format!("no species in {:?}", line))),
        };
        let position = read_floats(line, 2, ionpos_file)?;
        structure.append_atom(position, symbol, None)
            .map_err(|e| OutputParsingError::new(ionpos_file, e.to_string()))?;
    }
    debug!("read final structure with {} sites", structure.num_atoms());
    Ok(structure)
}

/// Read the `.kPts` dump, lines of the form `... [ kx ky kz ] weight ...`.
pub(crate) fn parse_kpoints(text: &str, file: &str, cell: &Lattice) -> Result<KpointSet, OutputParsingError> {
    let mut points = vec![];
    let mut weights = vec![];
    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let bad_line = || OutputParsingError::new(file, format!("malformed k-point line {:?}", line));

        let after_open = line.splitn(2, '[').nth(1).ok_or_else(bad_line)?;
        let mut parts = after_open.splitn(2, ']');
        let inside = parts.next().ok_or_else(bad_line)?;
        let rest = parts.next().ok_or_else(bad_line)?;

        points.push(read_floats(inside, 0, file)?);
        let weight = rest.split_whitespace().next().ok_or_else(bad_line)?;
        weights.push(weight.parse::<f64>().map_err(|_| bad_line())?);
    }
    debug!("read {} k-points from '{}'", points.len(), file);
    Ok(KpointSet { cell: cell.clone(), points, weights })
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn kpoint_line() {
        let kpts = parse_kpoints("[0.1 0.2 0.3] 0.5\n", "aiida.kPts", &Lattice::eye()).unwrap();
        assert_eq!(kpts.points, vec![[0.1, 0.2, 0.3]]);
        assert_eq!(kpts.weights, vec![0.5]);
    }

    #[test]
    fn kpoint_file() {
        let text = "\
kpoint [ +0.000000000000 +0.000000000000 +0.000000000000 ] 0.12500000000000

kpoint [ +0.500000000000 +0.000000000000 +0.000000000000 ] 0.37500000000000
";
        let kpts = parse_kpoints(text, "aiida.kPts", &Lattice::cubic(2.0)).unwrap();
        assert_eq!(kpts.len(), 2);
        assert_eq!(kpts.points[1], [0.5, 0.0, 0.0]);
        assert_close!(kpts.total_weight(), 0.5);
        assert_eq!(kpts.cell, Lattice::cubic(2.0));

        assert!(parse_kpoints("0.1 0.2 0.3 0.5\n", "aiida.kPts", &Lattice::eye()).is_err());
    }

    #[test]
    fn final_structure() {
        let lattice = "\
lattice  \\
       6.00000000000000        0.00000000000000        0.00000000000000  \\
       0.00000000000000        6.00000000000000        0.00000000000000  \\
       0.00000000000000        0.00000000000000        6.00000000000000
";
        let ionpos = "\
# Ionic positions in cartesian coordinates:
ion Si   0.000000000000000   0.000000000000000   0.000000000000000 1
ion O    1.500000000000000   1.500000000000000   1.500000000000000 0
";
        let structure = parse_final_structure(lattice, "aiida.lattice", ionpos, "aiida.ionpos").unwrap();
        assert_eq!(structure.lattice(), &Lattice::cubic(6.0));
        assert_eq!(structure.site_kind_names(), vec!["Si", "O"]);
        assert_eq!(structure.sites()[1].position, [1.5; 3]);
    }

    #[test]
    fn short_lattice() {
        let lattice = "lattice \\\n 1 0 0 \\\n 0 1 0\n";
        assert!(parse_final_structure(lattice, "aiida.lattice", "header\n", "aiida.ionpos").is_err());
    }
}
