use anyhow::Context;
use async_trait::async_trait;
use shelf_kernel::{InitCtx, Module};

use crate::SharedStore;

/// Core module owning the process-wide store handle.
pub struct StoreModule {
    store: SharedStore,
}

impl StoreModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for StoreModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        self.store
            .ping()
            .await
            .with_context(|| format!("{} store did not answer ping", self.store.backend()))?;

        tracing::info!(
            module = self.name(),
            backend = self.store.backend(),
            database = %ctx.settings.database.database,
            "document store reachable"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            backend = self.store.backend(),
            "document store released"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use shelf_kernel::settings::Settings;
    use std::sync::Arc;

    #[tokio::test]
    async fn init_pings_the_store() {
        let module = StoreModule::new(Arc::new(InMemoryStore::new()));
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        module.init(&ctx).await.unwrap();
        module.stop().await.unwrap();
    }
}
