#![allow(clippy::unwrap_used, clippy::expect_used)]

use appctx_core::storage::{
    ContextStorage, InMemoryContextStorage, NullContextStorage, TaskLocalContextStorage,
};
use appctx_core::ContextValue;
use proptest::prelude::*;

fn as_text(value: Option<ContextValue>) -> Option<String> {
    value.and_then(|v| v.downcast_ref::<String>().cloned())
}

fn all_backends() -> Vec<Box<dyn ContextStorage>> {
    vec![
        Box::new(NullContextStorage),
        Box::new(InMemoryContextStorage::new()),
        Box::new(TaskLocalContextStorage::new()),
    ]
}

#[test]
fn test_unset_key_is_absent_on_every_backend() {
    for storage in all_backends() {
        assert!(
            storage.get("correlationId").unwrap().is_none(),
            "{} should report an unset key as absent",
            storage.name()
        );

        let mut inside = Some(ContextValue::new(()));
        storage
            .run(&mut || inside = storage.get("correlationId").unwrap())
            .unwrap();
        assert!(inside.is_none(), "{} leaked a value into a fresh scope", storage.name());
    }
}

#[test]
fn test_run_executes_function_exactly_once_on_every_backend() {
    for storage in all_backends() {
        let mut calls = 0;
        storage.run(&mut || calls += 1).unwrap();
        assert_eq!(calls, 1, "{} should call the scoped function once", storage.name());
    }
}

#[test]
fn test_null_backend_ignores_writes_inside_scope() {
    let storage = NullContextStorage;
    let mut seen = Some(String::new());

    storage
        .run(&mut || {
            storage
                .set("sourceIP", Some(ContextValue::new(String::from("10.0.0.1"))))
                .unwrap();
            seen = as_text(storage.get("sourceIP").unwrap());
        })
        .unwrap();

    assert_eq!(seen, None);
}

#[test]
fn test_in_memory_instances_do_not_share_data() {
    let first = InMemoryContextStorage::new();
    let second = InMemoryContextStorage::new();

    first
        .set("correlationId", Some(ContextValue::new(String::from("from-first"))))
        .unwrap();

    assert!(second.get("correlationId").unwrap().is_none());
}

#[test]
fn test_clearing_key_makes_it_absent_on_every_backend() {
    for storage in all_backends() {
        let mut after_clear = Some(ContextValue::new(()));
        storage
            .run(&mut || {
                storage
                    .set("transactionConnection", Some(ContextValue::new(1_u32)))
                    .unwrap();
                storage.set("transactionConnection", None).unwrap();
                after_clear = storage.get("transactionConnection").unwrap();
            })
            .unwrap();
        assert!(after_clear.is_none(), "{} kept a cleared key", storage.name());
    }
}

proptest! {
    #[test]
    fn prop_in_memory_returns_last_written_value(
        key in "[a-zA-Z]{1,16}",
        values in proptest::collection::vec(".*", 1..8),
    ) {
        let storage = InMemoryContextStorage::new();
        for value in &values {
            storage.set(&key, Some(ContextValue::new(value.clone()))).unwrap();
        }

        prop_assert_eq!(as_text(storage.get(&key).unwrap()), values.last().cloned());
    }

    #[test]
    fn prop_in_memory_keys_are_independent(
        key in "[a-z]{1,8}",
        other in "[A-Z]{1,8}",
        value in ".*",
    ) {
        let storage = InMemoryContextStorage::new();
        storage.set(&key, Some(ContextValue::new(value.clone()))).unwrap();

        prop_assert!(storage.get(&other).unwrap().is_none());
        prop_assert_eq!(as_text(storage.get(&key).unwrap()), Some(value));
    }

    #[test]
    fn prop_null_backend_never_returns_a_value(key in ".*", value in ".*") {
        let storage = NullContextStorage;
        storage.set(&key, Some(ContextValue::new(value))).unwrap();
        prop_assert!(storage.get(&key).unwrap().is_none());
    }

    #[test]
    fn prop_task_local_scope_returns_last_written_value(
        key in "[a-zA-Z]{1,16}",
        values in proptest::collection::vec(".*", 1..8),
    ) {
        let storage = TaskLocalContextStorage::new();
        let mut seen = None;
        storage
            .run(&mut || {
                for value in &values {
                    storage.set(&key, Some(ContextValue::new(value.clone()))).unwrap();
                }
                seen = as_text(storage.get(&key).unwrap());
            })
            .unwrap();

        prop_assert_eq!(seen, values.last().cloned());
        prop_assert!(storage.get(&key).unwrap().is_none());
    }
}
