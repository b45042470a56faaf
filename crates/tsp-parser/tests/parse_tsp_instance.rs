use std::io::Write;

use tsp_core::tsp_lib_spec::{EdgeWeightType, ProblemType};

fn write_temp_instance(name: &str, contents: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("tsp-parser-test-{name}.tsp"));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn parses_a_small_euc_2d_instance() {
    let contents = "NAME: square4\n\
TYPE: TSP\n\
DIMENSION: 4\n\
EDGE_WEIGHT_TYPE: EUC_2D\n\
NODE_COORD_SECTION\n\
1 0 0\n\
2 0 10\n\
3 10 10\n\
4 10 0\n\
EOF\n";
    let path = write_temp_instance("square4", contents);

    let instance = tsp_parser::parse_tsp_instance(&path).unwrap();

    assert_eq!(instance.metadata().name, "square4");
    assert_eq!(instance.metadata().problem_type, ProblemType::TSP);
    assert_eq!(instance.metadata().edge_weight_type, EdgeWeightType::EUC_2D);
    assert_eq!(instance.dimension(), 4);
    // opposite corners of the unit square are 10*sqrt(2) apart
    assert_eq!(instance.distances().get_distance(0, 2).0, 14);
    assert_eq!(instance.distances().get_distance(1, 3).0, 14);
    assert_eq!(instance.distances().get_distance(0, 1).0, 10);

    std::fs::remove_file(path).ok();
}

#[test]
fn rejects_missing_dimension() {
    let contents = "NAME: broken\nTYPE: TSP\nEDGE_WEIGHT_TYPE: EUC_2D\nNODE_COORD_SECTION\n1 0 0\nEOF\n";
    let path = write_temp_instance("broken", contents);

    let result = tsp_parser::parse_tsp_instance(&path);
    assert!(result.is_err());

    std::fs::remove_file(path).ok();
}
