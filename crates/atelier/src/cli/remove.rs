//! The `atelier remove` command: delete a stored asset's renditions.

use atelier_core::{Config, Ingestor};
use clap::Args;

/// Arguments for the `remove` command.
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Stored asset identifier (the filename/public id from ingestion)
    #[arg(required = true)]
    pub ids: Vec<String>,
}

/// Execute the remove command.
///
/// Storage-side errors are reported but do not abort the run: an orphaned
/// asset is lower-cost than a blocked catalog deletion, so the caller is
/// expected to proceed with its own cleanup either way.
pub async fn execute(args: RemoveArgs, config: Config) -> anyhow::Result<()> {
    let ingestor = Ingestor::new(&config)?;

    let mut failed = 0usize;
    for id in &args.ids {
        match ingestor.remove(id).await {
            Ok(()) => println!("Removed {}", id),
            Err(e) => {
                tracing::warn!("Failed to remove {}: {}", id, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        tracing::warn!("{} asset(s) could not be removed", failed);
    }
    Ok(())
}
