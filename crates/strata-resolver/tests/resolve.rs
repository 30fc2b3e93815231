use serde_json::{Value, json};
use strata_config::ProcessDef;
use strata_registry::{FsProcessRegistry, MemoryRegistry, RegistryError};
use strata_resolver::{ResolveError, Resolver, StandardResolver};

/// A process that calls each target in sequence.
fn calling(process_id: &str, targets: &[&str], executable: bool) -> ProcessDef {
  let mut elements = vec![json!({ "id": "start", "type": "start" })];
  let mut flows = Vec::new();
  let mut previous = "start".to_string();

  for (i, target) in targets.iter().enumerate() {
    let id = format!("call_{i}");
    elements.push(json!({ "id": id, "type": "call_activity", "called_element": target }));
    flows.push(json!({ "id": format!("f{i}"), "from": previous, "to": id }));
    previous = id;
  }
  elements.push(json!({ "id": "end", "type": "end" }));
  flows.push(json!({ "id": "f_end", "from": previous, "to": "end" }));

  let value: Value = json!({
    "process_id": process_id,
    "executable": executable,
    "elements": elements,
    "flows": flows
  });
  serde_json::from_value(value).unwrap()
}

fn resolver(defs: Vec<ProcessDef>) -> StandardResolver<MemoryRegistry> {
  let registry = MemoryRegistry::new();
  for def in defs {
    registry.register(def).unwrap();
  }
  StandardResolver::new(registry)
}

#[tokio::test]
async fn test_resolve_single_level() {
  let resolver = resolver(vec![calling("root", &[], true)]);
  let set = resolver.resolve("root").await.unwrap();
  assert_eq!(set.len(), 1);
  assert_eq!(set.root_process_id(), "root");
}

#[tokio::test]
async fn test_resolve_three_levels() {
  let resolver = resolver(vec![
    calling("l0", &["l1"], true),
    calling("l1", &["l2"], false),
    calling("l2", &[], false),
  ]);

  let set = resolver.resolve("l0").await.unwrap();
  assert_eq!(set.process_ids().collect::<Vec<_>>(), vec!["l0", "l1", "l2"]);
  assert!(!set.get("l2").unwrap().is_executable());
}

#[tokio::test]
async fn test_missing_deep_target_reports_path() {
  let resolver = resolver(vec![calling("root", &["a"], true), calling("a", &["b"], true)]);

  let err = resolver.resolve("root").await.unwrap_err();
  match err {
    ResolveError::ProcessNotFound { process_id, path } => {
      assert_eq!(process_id, "b");
      assert_eq!(path, "root -> a -> b");
    }
    other => panic!("expected ProcessNotFound, got {other:?}"),
  }
}

#[tokio::test]
async fn test_missing_root() {
  let resolver = resolver(vec![]);
  let err = resolver.resolve("ghost").await.unwrap_err();
  assert!(matches!(err, ResolveError::ProcessNotFound { ref path, .. } if path == "ghost"));
}

#[tokio::test]
async fn test_cycle_detected() {
  let resolver = resolver(vec![
    calling("root", &["a"], true),
    calling("a", &["b"], true),
    calling("b", &["a"], true),
  ]);

  let err = resolver.resolve("root").await.unwrap_err();
  match err {
    ResolveError::CyclicComposition { cycle } => assert_eq!(cycle, vec!["a", "b", "a"]),
    other => panic!("expected CyclicComposition, got {other:?}"),
  }
}

#[tokio::test]
async fn test_self_reference_is_a_cycle() {
  let resolver = resolver(vec![calling("root", &["root"], true)]);
  let err = resolver.resolve("root").await.unwrap_err();
  assert_eq!(err.to_string(), "cyclic composition: root -> root");
}

#[tokio::test]
async fn test_diamond_is_not_a_cycle() {
  let resolver = resolver(vec![
    calling("root", &["left", "right"], true),
    calling("left", &["shared"], true),
    calling("right", &["shared"], true),
    calling("shared", &[], true),
  ]);

  let set = resolver.resolve("root").await.unwrap();
  assert_eq!(
    set.process_ids().collect::<Vec<_>>(),
    vec!["root", "left", "shared", "right"]
  );
}

#[tokio::test]
async fn test_non_executable_root_rejected() {
  let resolver = resolver(vec![calling("map", &["detail"], false), calling("detail", &[], true)]);
  let err = resolver.resolve("map").await.unwrap_err();
  assert!(matches!(err, ResolveError::NonExecutableRoot { ref process_id } if process_id == "map"));
}

#[tokio::test]
async fn test_non_executable_root_rejected_even_if_targets_missing() {
  let resolver = resolver(vec![calling("map", &["missing"], false)]);
  let err = resolver.resolve("map").await.unwrap_err();
  assert!(matches!(err, ResolveError::NonExecutableRoot { .. }));
}

#[tokio::test]
async fn test_malformed_non_executable_root_rejected() {
  let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
  std::fs::write(
    temp_dir.path().join("map.json"),
    r#"{
      "process_id": "map",
      "executable": false,
      "elements": [
        { "id": "start", "type": "start" },
        { "id": "detail", "type": "call_activity", "called_element": "detail" }
      ],
      "flows": [{ "id": "f1", "from": "start", "to": "detail" }]
    }"#,
  )
  .expect("failed to write fixture");

  let resolver = StandardResolver::new(FsProcessRegistry::new(temp_dir.path()));
  let err = resolver.resolve("map").await.unwrap_err();
  assert!(matches!(err, ResolveError::NonExecutableRoot { ref process_id } if process_id == "map"));
}

#[tokio::test]
async fn test_malformed_executable_root_reports_definition_error() {
  let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
  std::fs::write(
    temp_dir.path().join("broken.json"),
    r#"{
      "process_id": "broken",
      "elements": [{ "id": "start", "type": "start" }],
      "flows": []
    }"#,
  )
  .expect("failed to write fixture");

  let resolver = StandardResolver::new(FsProcessRegistry::new(temp_dir.path()));
  let err = resolver.resolve("broken").await.unwrap_err();
  assert!(matches!(
    err,
    ResolveError::Registry(RegistryError::Definition(_))
  ));
}
