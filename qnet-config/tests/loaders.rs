use std::fs;

use qnet_config::{load_network, ConfigError};
use qnet_core::node::Capacity;

const TEXT: &str = "\
q1: 2/3/1.0/4.0/3.0/4.0
q2: 1/inf/0/0/2.0/3.0
d: q1 -> q2/0.8, S/0.2
d: q2 -> S/1.0
s: 7, 8
r: 5000
f: q1/1.0
";

const YAML: &str = r#"
stations:
  - name: q1
    servers: 2
    capacity: 3
    arrival: { min: 1.0, max: 4.0 }
    service: { min: 3.0, max: 4.0 }
    routes:
      - { to: q2, probability: 0.8 }
      - { to: S, probability: 0.2 }
  - name: q2
    servers: 1
    arrival: { min: 0.0, max: 0.0 }
    service: { min: 2.0, max: 3.0 }
    routes:
      - { to: S, probability: 1.0 }
seeds: [7, 8]
random_budget: 5000
first_arrivals:
  - { station: q1, time: 1.0 }
"#;

#[test]
fn text_and_yaml_describe_the_same_network() {
    let dir = tempfile::tempdir().unwrap();
    let text_path = dir.path().join("tandem.queues");
    let yaml_path = dir.path().join("tandem.yaml");
    fs::write(&text_path, TEXT).unwrap();
    fs::write(&yaml_path, YAML).unwrap();

    let from_text = load_network(&text_path).unwrap();
    let from_yaml = load_network(&yaml_path).unwrap();
    assert_eq!(from_text, from_yaml);
    assert_eq!(from_text.stations()[1].capacity, Capacity::Unbounded);
}

#[test]
fn invalid_probabilities_abort_loading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.queues");
    fs::write(&path, TEXT.replace("q2/0.8, S/0.2", "q2/0.3, S/0.3")).unwrap();

    let err = load_network(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Model(_)));
    assert!(err.to_string().contains("sum to"));
}
