use super::*;

#[test]
fn test_success() {
    let result = TaskResult::success("done");
    assert!(result.success);
    assert_eq!(result.details, "done");
}

#[test]
fn test_failure() {
    let result = TaskResult::failure("boom");
    assert!(!result.success);
    assert_eq!(result.details, "boom");
}

#[test]
fn test_failure_accepts_owned_string() {
    let cause = format!("Could not read file {}", "a.txt");
    let result = TaskResult::failure(cause);
    assert!(result.details.contains("a.txt"));
}

#[test]
fn test_append_details() {
    let result = TaskResult::success("Calculator launched").append_details(" - result of 2+2 = 4");
    assert_eq!(result.details, "Calculator launched - result of 2+2 = 4");
}

#[test]
fn test_serialize() {
    let result = TaskResult::success("ok");
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["details"], "ok");
}

#[test]
fn test_deserialize() {
    let json = r#"{"success": false, "details": "Search field not found"}"#;
    let result: TaskResult = serde_json::from_str(json).unwrap();
    assert!(!result.success);
    assert_eq!(result.details, "Search field not found");
}

#[test]
fn test_equality() {
    assert_eq!(TaskResult::success("a"), TaskResult::success("a"));
    assert_ne!(TaskResult::success("a"), TaskResult::failure("a"));
}
