//! `#[callback]` registration tests.

use pyscall::{Bootstrap, RuntimeManifest, documents::MemoryDocument};
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;

#[pyscall::callback]
fn update_output(value: String) -> String {
    format!("selected: {value}")
}

#[pyscall::callback(name = "scaled")]
async fn scale(value: i64, factor: Option<i64>) -> i64 {
    value * factor.unwrap_or(1)
}

#[pyscall::callback]
fn strict(count: u32) -> Result<u32, std::fmt::Error> {
    Ok(count + 1)
}

fn runtime() -> pyscall::Runtime {
    let manifest = RuntimeManifest::builder()
        .functions(["update_output", "scaled", "strict"])
        .build()
        .unwrap();
    Bootstrap::new(manifest, MemoryDocument::new()).run().unwrap()
}

#[tokio::test]
async fn test_collected_callbacks_dispatch() {
    let runtime = runtime();
    let pending = runtime
        .namespace()
        .call("update_output", vec![json!("a")])
        .unwrap();

    let installed = runtime.registry().register_collected();
    assert!(installed.contains(&"update_output".into()));
    assert!(installed.contains(&"scaled".into()));

    let out = timeout(Duration::from_millis(200), pending)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(out, Some(json!("selected: a")));

    let scaled = runtime.call("scaled", vec![json!(4), json!(3)]).await.unwrap();
    assert_eq!(scaled, Some(json!(12)));

    // Missing trailing argument decodes as None.
    let unscaled = runtime.call("scaled", vec![json!(4)]).await.unwrap();
    assert_eq!(unscaled, Some(json!(4)));
}

#[tokio::test]
async fn test_bad_argument_is_reported() {
    let runtime = runtime();
    runtime.registry().register_collected();

    let err = runtime
        .call("strict", vec![json!("three")])
        .await
        .unwrap_err();
    let arg = err
        .downcast_ref::<pyscall::ArgumentError>()
        .expect("argument error");
    assert_eq!((arg.name, arg.index), ("count", 0));
}
