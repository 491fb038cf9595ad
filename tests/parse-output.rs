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

#[macro_use] extern crate jdftx_assert_close;

mod shared;

use jdftx_fs_util as fsx;
use jdftx_io::{OutputValue, RetrievedDir};
use jdftx_io::units::{BOHR_TO_ANGSTROM, HARTREE_TO_EV};
use jdftx_structure::{Lattice, Structure};
use jdftx_tasks::{ExitCode, ParseOutcome};
use jdftx_tasks_config::Options;

use tempdir::TempDir;

fn input_structure() -> Structure {
    let mut structure = Structure::new(Lattice::fcc(5.43));
    structure.append_atom([0.0; 3], "Si", None).unwrap();
    structure.append_atom([1.3575; 3], "Si", None).unwrap();
    structure
}

fn parse_resource(name: &str) -> ParseOutcome {
    let retrieved = RetrievedDir::new(shared::resource(name));
    jdftx_tasks::parse(&retrieved, &input_structure(), &Options::default()).unwrap()
}

fn float(value: &OutputValue) -> f64 {
    match *value {
        OutputValue::Float(x) => x,
        ref other => panic!("not a float: {:?}", other),
    }
}

#[test]
fn single_point() {
    let outcome = parse_resource("default");
    assert_eq!(outcome.exit_code, None);

    let outputs = outcome.outputs;
    let params = &outputs.output_parameters;
    assert_eq!(params["number_of_electronic_minimizations"], OutputValue::Int(1));
    assert_close!(float(&params["energy_total"]), -7.8366394384309518 * HARTREE_TO_EV);
    assert_close!(float(&params["energy_xc_core"]), 0.0506036221286826 * HARTREE_TO_EV);
    assert_eq!(params["energy_kinetic_units"], OutputValue::Text("eV".into()));
    // eight components, each with units
    assert_eq!(params.len(), 1 + 2 * 8);

    let kpoints = outputs.output_kpoints.expect("no kpoints");
    assert_eq!(kpoints.points, vec![[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.5, 0.5, 0.0]]);
    assert_close!(kpoints.total_weight(), 1.0);

    // the dumps are read as written
    let structure = outputs.output_structure.expect("no structure");
    assert_close!(structure.cell()[0], [5.130606059, 5.130606059, 0.0]);
    assert_close!(structure.to_carts()[1], [2.565303029525; 3]);
    assert_eq!(structure.site_kind_names(), vec!["Si", "Si"]);
    assert_eq!(kpoints.cell, structure.lattice().clone());

    let traj = outputs.output_trajectory;
    assert_eq!(traj.num_frames(), 1);
    assert_eq!(traj.cells, vec![structure.cell()]);
    assert_eq!(traj.arrays["energy_total"].len(), 1);
}

#[test]
fn lattice_relax() {
    let outcome = parse_resource("relax");
    assert_eq!(outcome.exit_code, None);

    let outputs = outcome.outputs;
    assert_eq!(outputs.output_parameters["number_of_electronic_minimizations"], OutputValue::Int(3));
    assert_close!(
        float(&outputs.output_parameters["energy_total"]),
        -7.8371873022188518 * HARTREE_TO_EV,
    );

    let traj = outputs.output_trajectory;
    assert_eq!(traj.stepids, vec![0, 1, 2]);
    assert_eq!(traj.symbols, vec!["Si", "Si"]);

    let h = |printed: f64| printed * BOHR_TO_ANGSTROM;
    assert_close!(traj.cells[0], [[h(5.13061), h(5.13061), 0.0], [h(5.13061), 0.0, h(5.13061)], [0.0, h(5.13061), h(5.13061)]]);
    assert_close!(traj.cells[2][1], [h(5.09021), 0.0, h(5.09021)]);
    assert_close!(traj.positions[1][0], [0.0; 3]);
    assert_close!(traj.positions[1][1], [h(5.10194) / 2.0; 3]);

    let totals = &traj.arrays["energy_total"];
    assert_eq!(totals.len(), 3);
    assert_close!(totals[0], -7.8366394384309519 * HARTREE_TO_EV);
    assert_close!(totals[2], -7.8371873022188518 * HARTREE_TO_EV);
    assert!(totals[2] < totals[1] && totals[1] < totals[0]);

    let structure = outputs.output_structure.expect("no structure");
    assert_close!(structure.cell()[2], [0.0, 5.090213, 5.090213]);
}

#[test]
fn partial_retrieval() {
    let dir = TempDir::new("jdftx-parse").unwrap();
    for name in &["aiida.out", "aiida.Ecomponents", "aiida.kPts"] {
        fsx::copy(shared::resource("default").join(name), dir.path().join(name)).unwrap();
    }

    let outcome = jdftx_tasks::parse(&RetrievedDir::new(dir.path()), &input_structure(), &Options::default()).unwrap();
    assert_eq!(outcome.exit_code, Some(ExitCode::ERROR_OUTPUT_STDOUT_MISSING));

    // the input structure stands in for the final one
    let outputs = outcome.outputs;
    assert_eq!(outputs.output_structure, None);
    assert_eq!(outputs.output_trajectory.cells, vec![input_structure().cell()]);
    assert_eq!(outputs.output_kpoints.map(|k| k.cell), Some(input_structure().lattice().clone()));
    assert_eq!(outputs.output_parameters["number_of_electronic_minimizations"], OutputValue::Int(1));
}

#[test]
fn cli() {
    let dir = TempDir::new("jdftx-parse-output").unwrap();
    let run = |retrieved: &std::path::Path, out: &str| {
        shared::cargo_binary(env!("CARGO_BIN_EXE_jdftx-parse-output"))
            .arg(retrieved)
            .args(&["-c", "tests/resources/silicon.yaml", "-o"])
            .arg(dir.path().join(out))
            .status()
            .unwrap()
    };

    assert!(run(&shared::resource("relax"), "relax.json").success());
    let json: serde_json::Value = serde_json::from_reader(fsx::open(dir.path().join("relax.json")).unwrap()).unwrap();
    assert_eq!(json["exit_code"], serde_json::Value::Null);
    assert_eq!(json["outputs"]["output_parameters"]["number_of_electronic_minimizations"], 3);
    assert_eq!(json["outputs"]["output_parameters"]["energy_total_units"], "eV");
    assert_eq!(json["outputs"]["output_trajectory"]["stepids"], serde_json::json!([0, 1, 2]));

    let empty = TempDir::new("jdftx-retrieved").unwrap();
    let status = run(empty.path(), "empty.json");
    assert_eq!(status.code(), Some(200));
    let json: serde_json::Value = serde_json::from_reader(fsx::open(dir.path().join("empty.json")).unwrap()).unwrap();
    assert_eq!(json["exit_code"]["label"], "ERROR_OUTPUT_STDOUT_MISSING");
}
