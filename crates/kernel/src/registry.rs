use anyhow::Context;
use std::sync::Arc;

use crate::module::{InitCtx, Module};

/// Core module initialization order. The HTTP server is started separately,
/// after every module has been initialized.
const CORE_MODULE_ORDER: &[&str] = &[
    "db", // Document store must answer before any route is served
];

/// Module registry for managing module lifecycle with core/custom separation
pub struct ModuleRegistry {
    core_modules: Vec<Arc<dyn Module>>,
    custom_modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            core_modules: Vec::new(),
            custom_modules: Vec::new(),
        }
    }

    /// Register a core module with the registry
    pub fn register_core(&mut self, module: Arc<dyn Module>) {
        self.core_modules.push(module);
    }

    /// Register a custom module with the registry
    pub fn register_custom(&mut self, module: Arc<dyn Module>) {
        self.custom_modules.push(module);
    }

    /// Get all registered modules (core + custom)
    pub fn modules(&self) -> Vec<&Arc<dyn Module>> {
        let mut all_modules = Vec::new();
        all_modules.extend(self.core_modules.iter());
        all_modules.extend(self.custom_modules.iter());
        all_modules
    }

    /// Initialize every module: core modules in `CORE_MODULE_ORDER`, then
    /// custom modules in registration order
    pub async fn init_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            "initializing {} core and {} custom modules",
            self.core_modules.len(),
            self.custom_modules.len()
        );

        for (tier, module) in self.startup_order() {
            tracing::info!(module = module.name(), tier, "initializing module");

            module.init(ctx).await.with_context(|| {
                format!("failed to initialize {} module '{}'", tier, module.name())
            })?;
        }

        Ok(())
    }

    /// Start every module in startup order
    pub async fn start_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        for (tier, module) in self.startup_order() {
            tracing::info!(module = module.name(), tier, "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start {} module '{}'", tier, module.name()))?;
        }

        Ok(())
    }

    /// Stop every module in reverse startup order
    pub async fn stop_all(&self) -> anyhow::Result<()> {
        for (tier, module) in self.startup_order().into_iter().rev() {
            tracing::info!(module = module.name(), tier, "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop {} module '{}'", tier, module.name()))?;
        }

        Ok(())
    }

    /// Core modules sorted by `CORE_MODULE_ORDER` (unknown names are
    /// skipped), followed by custom modules
    fn startup_order(&self) -> Vec<(&'static str, &Arc<dyn Module>)> {
        let core = CORE_MODULE_ORDER.iter().filter_map(|&name| {
            self.core_modules
                .iter()
                .find(|m| m.name() == name)
                .map(|m| ("core", m))
        });
        let custom = self.custom_modules.iter().map(|m| ("custom", m));
        core.chain(custom).collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::sync::Mutex;

    struct RecordingModule {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingModule {
        fn record(&self, event: &str) {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", event, self.name));
        }
    }

    #[async_trait::async_trait]
    impl Module for RecordingModule {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.record("init");
            Ok(())
        }

        async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            self.record("start");
            Ok(())
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.record("stop");
            Ok(())
        }
    }

    struct FailingModule;

    #[async_trait::async_trait]
    impl Module for FailingModule {
        fn name(&self) -> &'static str {
            "db"
        }

        async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
            anyhow::bail!("store unreachable")
        }
    }

    #[test]
    fn test_module_registry_creation() {
        let registry = ModuleRegistry::new();
        assert!(registry.modules().is_empty());
    }

    #[test]
    fn modules_lists_core_before_custom() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        registry.register_custom(Arc::new(RecordingModule {
            name: "books",
            log: log.clone(),
        }));
        registry.register_core(Arc::new(RecordingModule { name: "db", log }));

        let names: Vec<&str> = registry.modules().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["db", "books"]);
    }

    #[tokio::test]
    async fn test_module_lifecycle_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ModuleRegistry::new();
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        registry.register_custom(Arc::new(RecordingModule {
            name: "books",
            log: log.clone(),
        }));
        registry.register_core(Arc::new(RecordingModule {
            name: "db",
            log: log.clone(),
        }));

        registry.init_all(&ctx).await.unwrap();
        registry.start_all(&ctx).await.unwrap();
        registry.stop_all().await.unwrap();

        let events = log.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "init:db",
                "init:books",
                "start:db",
                "start:books",
                "stop:books",
                "stop:db",
            ]
        );
    }

    #[tokio::test]
    async fn init_failure_names_the_module() {
        let mut registry = ModuleRegistry::new();
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };
        registry.register_core(Arc::new(FailingModule));

        let err = registry.init_all(&ctx).await.unwrap_err();
        assert!(format!("{err:#}").contains("failed to initialize core module 'db'"));
    }
}
