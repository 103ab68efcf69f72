use anyhow::{Context, Result};
use retic_csv::paths::{PathResolver, Resolution};
use retic_csv::CsvStore;
use std::sync::Arc;
use tokio::task;

/// Store bound to the resolved table file, plus how that file was chosen.
pub struct Session {
    pub store: Arc<CsvStore>,
    pub resolution: Resolution,
}

/// Resolves the table location and makes sure the file exists. Both steps touch
/// the (possibly slow) shared folder, so they run on the blocking pool; the
/// store is then used synchronously from the calling thread.
pub async fn open_session(resolver: PathResolver) -> Result<Session> {
    let (store, resolution) = task::spawn_blocking(move || CsvStore::open_resolved(&resolver))
        .await
        .context("startup task did not complete")?
        .context("could not create the record table")?;
    tracing::info!(
        path = %resolution.path.display(),
        mode = resolution.mode_label(),
        "record table ready"
    );
    Ok(Session {
        store: Arc::new(store),
        resolution,
    })
}
