//! Server Initialization
//!
//! Loads configuration, wires the container, collects handler groups and
//! builds the Rocket application. Any wiring defect (unresolved or cyclic
//! dependency, unknown operation, invalid provider configuration) aborts
//! here, before the server accepts a connection.
//!
//! # Configuration
//!
//! - Config file: `--config <path>`, or `meete.toml` in a default location
//! - Environment variables: `MEETE__SERVER__PORT=9000`

use std::path::Path;
use std::sync::Arc;

use meete_application::AuthenticationService;
use meete_domain::error::Result;
use meete_infrastructure::config::{AppConfig, ConfigLoader};
use meete_infrastructure::di::{CapabilityKey, Registry, build_container, register_infrastructure};
use meete_infrastructure::routing::{GroupCollector, GroupDescriptor, ModuleTree};
use rocket::data::ToByteUnit;
use rocket::{Build, Rocket};
use tracing::info;

use crate::error::catchers;
use crate::materializer::materialize;

/// Run the Meete backend
///
/// Configuration is required: without `config_path`, a `meete.toml` must
/// exist in one of the default locations.
pub async fn run_server(config_path: Option<&Path>) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    meete_infrastructure::logging::init_logging(&config.logging)?;

    info!(
        host = %config.server.host,
        port = config.server.port,
        package = %config.routing.package,
        "Starting Meete server"
    );

    let rocket = build_rocket(&config)?;
    let _ = rocket.launch().await?;

    info!("Meete server stopped");
    Ok(())
}

fn load_config(config_path: Option<&Path>) -> Result<AppConfig> {
    let loader = match config_path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    loader.required(true).load()
}

/// Wire the infrastructure and every handler group under `routing.package`
pub fn build_rocket(config: &AppConfig) -> Result<Rocket<Build>> {
    let registry = Arc::new(Registry::new());
    register_infrastructure(&registry, config);

    let collector = GroupCollector::new(config.routing.ignored_namespaces.iter().cloned());
    let groups = collector.collect(&ModuleTree::from_registry(), &config.routing.package)?;

    assemble(config, registry, &groups)
}

/// Register `groups` into `registry`, build the container and mount routes
///
/// Groups are mounted in the order given; routes within a group in
/// declaration order. Bindings already in `registry` are kept, so callers
/// can pre-register or override capabilities before assembling.
pub fn assemble(
    config: &AppConfig,
    registry: Arc<Registry>,
    groups: &[GroupDescriptor],
) -> Result<Rocket<Build>> {
    let mut eager: Vec<CapabilityKey> = groups.iter().map(|group| group.register(&registry)).collect();
    let auth = CapabilityKey::of::<AuthenticationService>();
    if registry.contains(&auth) {
        eager.push(auth);
    }

    let container = Arc::new(build_container(registry, &eager)?);
    let body_limit = config.server.body_limit_kib.kibibytes();

    let figment = rocket::Config::figment()
        .merge(("address", config.server.host.clone()))
        .merge(("port", config.server.port));
    let mut rocket = rocket::custom(figment).register("/", catchers());

    let mut mounted = 0;
    for group in groups {
        let routes = materialize(&container, group, body_limit)?;
        mounted += routes.len();
        rocket = rocket.mount(group.prefix.as_str(), routes);
    }

    info!(groups = groups.len(), routes = mounted, "Router materialized");
    Ok(rocket)
}
