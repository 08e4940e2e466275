//! `sammi-next dev`: same pipeline as `build`, defaulting to dev mode.
//!
//! Dev bundles are not minified and keep the `.over` payload pretty-printed.

use sammi_config::BuildMode;

use crate::cli::BuildArgs;
use crate::error::Result;

pub async fn execute(args: BuildArgs, no_color: bool) -> Result<()> {
    super::run_pipeline(&args, BuildMode::Dev, no_color).await?;
    Ok(())
}
