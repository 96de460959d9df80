use std::fs;

use sprig::{Value, run};
use walkdir::WalkDir;

#[test]
fn demo_programs_run() {
    let mut count = 0;

    for entry in WalkDir::new("demos")
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "sp"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        if let Err(e) = run(&source) {
            panic!("Demo {path:?} failed:\n{source}\nError: {e:?}");
        }
    }

    assert!(count > 0, "No demo programs found in demos/");
}

fn demo(name: &str) -> sprig::ActivationRecord {
    let source = fs::read_to_string(format!("demos/{name}.sp")).unwrap();
    run(&source).unwrap()
}

#[test]
fn factorial_demo() {
    assert_eq!(demo("factorial").get("result"), Some(Value::Int(3628800)));
}

#[test]
fn average_demo() {
    assert_eq!(demo("average").get("mean"), Some(Value::Float(7.0)));
}

#[test]
fn loops_demo() {
    let record = demo("loops");
    assert_eq!(record.get("a"), Some(Value::Int(55)));
    assert_eq!(record.get("b"), Some(Value::Int(3)));
    assert_eq!(record.get("c"), Some(Value::Int(6765)));
}
