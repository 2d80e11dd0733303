//! Integration tests for periodic rotating file handlers.
//!
//! Every test runs a full server with the logging extension and drives the
//! handler through management operations.

use mgmt_logging::prelude::*;
use mgmt_model::prelude::*;
use mgmt_system::prelude::*;
use serde_json::json;

fn create_server(management: ManagementExtension) -> Server {
    let mut server = Server::new();
    server
        .add_extensions(management)
        .add_extensions(LoggingExtension::default());
    server.finish();
    server
}

fn handler(name: &str) -> PathAddress {
    format!("/subsystem=logging/periodic-rotating-file-handler={name}")
        .parse()
        .unwrap()
}

fn daily_values() -> ModelNode {
    json!({
        "level": "INFO",
        "file": {"relative-to": "jboss.server.log.dir", "path": "server.log"},
        "suffix": ".yyyy-MM-dd",
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// 1. Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn add_installs_handler() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();

    model.add(services, &handler("daily"), &daily_values()).unwrap();

    let registry = server.get_global::<HandlerRegistry>().unwrap();
    let config = registry.get("daily").unwrap();
    assert_eq!(config.level, Level::Info);
    assert_eq!(config.period, RotationPeriod::Day);
    assert_eq!(config.file.relative_to.as_deref(), Some("jboss.server.log.dir"));

    let definition = server.get_global::<PeriodicHandlerDefinition>().unwrap();
    let transformed = model
        .transform(services, &handler("daily"), &definition.transformer())
        .unwrap();
    assert_eq!(transformed, config);
}

#[test]
fn read_resource_reports_stored_and_default_values() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();
    model.add(services, &handler("daily"), &daily_values()).unwrap();

    assert_eq!(
        model.read_attribute(services, &handler("daily"), "level").unwrap(),
        json!("INFO")
    );
    let resource = model.read_resource(services, &handler("daily")).unwrap();
    assert_eq!(resource["suffix"], json!(".yyyy-MM-dd"));
    assert_eq!(resource["file"]["path"], json!("server.log"));
}

#[test]
fn remove_uninstalls_handler() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();
    model.add(services, &handler("daily"), &daily_values()).unwrap();

    model.remove(services, &handler("daily")).unwrap();

    assert!(!model.contains(&handler("daily")));
    assert!(server.get_global::<HandlerRegistry>().unwrap().is_empty());
}

#[test]
fn cleanup_closes_every_handler() {
    let mut server = create_server(ManagementExtension::default());
    {
        let model = server.get_global::<ManagementModel>().unwrap();
        let services = server.global_services();
        model.add(services, &handler("daily"), &daily_values()).unwrap();
        model.add(services, &handler("hourly"), &json!({
            "file": {"path": "hourly.log"},
            "suffix": ".yyyy-MM-dd-HH",
        }))
        .unwrap();
    }

    server.cleanup();

    assert!(server.get_global::<HandlerRegistry>().unwrap().is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// 2. Writes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn runtime_write_keeps_handler() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();
    model.add(services, &handler("daily"), &daily_values()).unwrap();

    model
        .write_attribute(services, &handler("daily"), "suffix", &json!(".yyyy-MM-dd-HH-mm"))
        .unwrap();

    let registry = server.get_global::<HandlerRegistry>().unwrap();
    assert_eq!(registry.get("daily").unwrap().period, RotationPeriod::Minute);
    assert_eq!(registry.generation("daily"), Some(1));
}

#[test]
fn file_write_reconstructs_handler() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();
    model.add(services, &handler("daily"), &daily_values()).unwrap();

    model
        .write_attribute(services, &handler("daily"), "file", &json!({"path": "audit.log"}))
        .unwrap();

    let registry = server.get_global::<HandlerRegistry>().unwrap();
    let config = registry.get("daily").unwrap();
    assert_eq!(config.file.path, "audit.log");
    assert_eq!(config.file.relative_to, None);
    assert_eq!(registry.generation("daily"), Some(2));
}

#[test]
fn invalid_suffix_write_keeps_previous_handler() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();
    model.add(services, &handler("daily"), &daily_values()).unwrap();

    let err = model
        .write_attribute(services, &handler("daily"), "suffix", &json!(".log"))
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::resolution("suffix", "suffix '.log' has no date pattern")
    );

    assert_eq!(
        model.read_attribute(services, &handler("daily"), "suffix").unwrap(),
        json!(".yyyy-MM-dd")
    );
    let registry = server.get_global::<HandlerRegistry>().unwrap();
    assert_eq!(registry.get("daily").unwrap().suffix, ".yyyy-MM-dd");
}

#[test]
fn unknown_attribute_write_is_rejected() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();
    model.add(services, &handler("daily"), &daily_values()).unwrap();

    let err = model
        .write_attribute(services, &handler("daily"), "rotate-size", &json!("10m"))
        .unwrap_err();
    assert_eq!(err, ModelError::UnknownAttribute("rotate-size".to_string()));
}

// ─────────────────────────────────────────────────────────────────────────────
// 3. Failed adds and expressions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn invalid_suffix_add_stores_nothing() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();

    let err = model
        .add(
            services,
            &handler("broken"),
            &json!({"file": {"path": "server.log"}, "suffix": ".yyyy'MM"}),
        )
        .unwrap_err();
    assert_eq!(
        err,
        ModelError::resolution("suffix", "suffix '.yyyy'MM' has an unterminated quote")
    );

    assert!(!model.contains(&handler("broken")));
    assert!(server.get_global::<HandlerRegistry>().unwrap().is_empty());
}

#[test]
fn expressions_resolve_from_server_properties() {
    let server = create_server(
        ManagementExtension::default()
            .with_property("log.level", "WARN")
            .with_property("log.suffix", ".yyyy-ww"),
    );
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();

    model
        .add(
            services,
            &handler("weekly"),
            &json!({
                "level": "${log.level}",
                "autoflush": "${log.autoflush:false}",
                "file": {"path": "weekly.log"},
                "suffix": "${log.suffix}",
            }),
        )
        .unwrap();

    let config = server.get_global::<HandlerRegistry>().unwrap().get("weekly").unwrap();
    assert_eq!(config.level, Level::Warn);
    assert!(!config.autoflush);
    assert_eq!(config.period, RotationPeriod::Week);
}

#[test]
fn unresolvable_expression_fails_add() {
    let server = create_server(ManagementExtension::default());
    let model = server.get_global::<ManagementModel>().unwrap();
    let services = server.global_services();

    let err = model
        .add(
            services,
            &handler("daily"),
            &json!({"file": {"path": "${log.file}"}, "suffix": ".yyyy"}),
        )
        .unwrap_err();
    assert!(matches!(err, ModelError::OperationFailed(_)), "{err}");
    assert!(!model.contains(&handler("daily")));
}
