use std::sync::Arc;
use std::thread;

use vault_rail::registry;
use vault_rail::sentinels::{BUILTIN, ENTITY_EXISTS, GENERAL_FAILURE, TIMEOUT};
use vault_rail::{declare_errors, ErrorRegistry};

declare_errors! {
    static TRANSIT_ERRORS = [
        KEY_NOT_FOUND => ("transit_key_not_found", "transit key not found"),
        KEY_DISABLED => ("transit_key_disabled", "transit key is disabled for encryption"),
    ];
}

#[test]
fn every_builtin_resolves_to_itself() {
    registry::init();
    for sentinel in BUILTIN {
        let resolved = registry::from_code(sentinel.code().as_str());
        assert_eq!(&resolved, *sentinel);
        assert_eq!(resolved.message(), sentinel.message());
    }
}

#[test]
fn unknown_code_returns_general_failure() {
    assert_eq!(registry::from_code("never_registered_anywhere"), GENERAL_FAILURE);
    assert_eq!(registry::from_code(""), GENERAL_FAILURE);
}

#[test]
fn global_register_is_visible_to_lookups() {
    let registered = registry::register("kv_version_conflict", "cas mismatch", None);
    assert_eq!(registry::from_code("kv_version_conflict"), registered);
    assert_eq!(registry::from_code("kv_version_conflict").message(), "cas mismatch");
}

#[test]
fn empty_registry_knows_nothing() {
    let registry = ErrorRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.from_code("timeout"), GENERAL_FAILURE);
}

#[test]
fn declared_group_registers_in_one_call() {
    let registry = ErrorRegistry::new();
    registry.register_all(TRANSIT_ERRORS);

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.from_code("transit_key_disabled"), KEY_DISABLED);
    assert_eq!(registry.from_code("transit_key_not_found").message(), KEY_NOT_FOUND.message());
}

#[test]
fn duplicate_registration_keeps_last() {
    let registry = ErrorRegistry::with_builtins();
    let before = registry.len();

    let _ = registry.register("entity_exists", "secret already exists at path", None);

    assert_eq!(registry.len(), before);
    let resolved = registry.from_code("entity_exists");
    assert_eq!(resolved, ENTITY_EXISTS);
    assert_eq!(resolved.message(), "secret already exists at path");
    // the sentinel itself is untouched
    assert_eq!(ENTITY_EXISTS.message(), "entity already exists");
}

#[test]
fn concurrent_lookups_and_registrations() {
    let registry = Arc::new(ErrorRegistry::with_builtins());

    thread::scope(|scope| {
        for writer in 0..4 {
            let registry = &registry;
            scope.spawn(move || {
                for i in 0..50 {
                    let _ = registry.register(format!("plugin_{writer}_{i}"), "plugin error", None);
                }
            });
        }
        for _ in 0..4 {
            let registry = &registry;
            scope.spawn(move || {
                for _ in 0..200 {
                    assert_eq!(registry.from_code("timeout"), TIMEOUT);
                }
            });
        }
    });

    assert_eq!(registry.len(), BUILTIN.len() + 200);
    assert!(registry.contains("plugin_3_49"));
}
