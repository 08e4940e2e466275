use std::sync::Arc;

use sammi_config::{BuildMode, ResolvedExtensionConfig};

use crate::ui::Logger;

/// The unit of work handed to every build-time operation.
#[derive(Debug, Clone)]
pub struct BuildSession {
    config: Arc<ResolvedExtensionConfig>,
    logger: Arc<Logger>,
}

impl BuildSession {
    pub fn new(config: ResolvedExtensionConfig, logger: Arc<Logger>) -> Self {
        Self {
            config: Arc::new(config),
            logger,
        }
    }

    pub fn config(&self) -> &ResolvedExtensionConfig {
        &self.config
    }

    pub fn mode(&self) -> BuildMode {
        self.config.mode()
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}
