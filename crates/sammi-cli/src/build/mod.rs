//! One-shot builds and the watch-mode driver.

mod bundler;
mod orchestrator;
mod session;

pub use bundler::{
    BuildDescriptor, BundleOutput, Bundler, BundlerError, CommandBundler, TARGET, VERSION,
};
pub use orchestrator::{BuildOrchestrator, BuildReport};
pub use session::BuildSession;
