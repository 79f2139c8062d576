//! Personal library application: wires the document store, the books module
//! and the HTTP server together.

pub mod modules;

use anyhow::Context;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub use modules::register_all;

/// Connect the configured store and register every module against it.
pub async fn build_registry(settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let store = shelf_db::connect(&settings.database)
        .await
        .with_context(|| format!("failed to open {} book store", settings.database.scheme()))?;

    let mut registry = ModuleRegistry::new();
    register_all(&mut registry, store);
    Ok(registry)
}

/// Run the application until a shutdown signal arrives.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings).await?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;

    // Modules are stopped even when the server exits with an error.
    registry.stop_all().await?;
    served
}
