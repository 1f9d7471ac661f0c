use bitadd::config::DemoConfig;
use bitadd::harness::{self, DemoRun};
use bitadd::output;

#[test]
fn demo_prints_equations() {
    let config = DemoConfig {
        iterations: 100,
        max_operand: 10,
        seed: Some(2024),
    };
    let run = harness::run_demo(&config).unwrap();
    let text = output::render_demo(&run);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 100);
    for line in lines {
        let (lhs, sum) = line.split_once(" = ").unwrap();
        let (a, b) = lhs.split_once(" + ").unwrap();
        let a: i32 = a.parse().unwrap();
        let b: i32 = b.parse().unwrap();
        assert_eq!(sum.parse::<i32>().unwrap(), a + b);
    }
}

#[test]
fn demo_run_survives_json() {
    let config = DemoConfig {
        iterations: 5,
        max_operand: 50,
        seed: Some(8),
    };
    let run = harness::run_demo(&config).unwrap();
    let json = serde_json::to_string(&run).unwrap();
    let back: DemoRun = serde_json::from_str(&json).unwrap();
    assert_eq!(back.seed, 8);
    assert_eq!(back.samples, run.samples);
}
