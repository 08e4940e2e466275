//! `sammi-next build`: a production build unless told otherwise.

use sammi_config::BuildMode;
use tracing::debug;

use crate::cli::BuildArgs;
use crate::error::Result;

pub async fn execute(args: BuildArgs, no_color: bool) -> Result<()> {
    let report = super::run_pipeline(&args, BuildMode::Production, no_color).await?;
    debug!(
        bundle = %report.bundle.display(),
        sef = %report.sef.display(),
        elapsed_ms = report.elapsed.as_millis() as u64,
        "build complete"
    );
    Ok(())
}
