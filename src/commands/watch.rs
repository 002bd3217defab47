//! Watch the content directory and republish the catalog on change

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::catalog::CatalogHandle;
use crate::Sandpress;

/// Load once, then reload on every relevant file change until the
/// watcher shuts down
pub async fn run(site: &Sandpress) -> Result<()> {
    if !site.content_dir.is_dir() {
        anyhow::bail!(
            "Content directory {} does not exist, nothing to watch",
            site.content_dir.display()
        );
    }

    let handle = CatalogHandle::new(site.load_catalog().await);
    report(&handle);

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    debouncer
        .watcher()
        .watch(&site.content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", site.content_dir);

    println!(
        "Watching {} for changes. Press Ctrl+C to stop.",
        site.config.title
    );

    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                let changed: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                site.reload(&handle).await;
                report(&handle);
            }
            Err(e) => {
                tracing::error!("Watch error: {:?}", e);
            }
        }
    }

    Ok(())
}

fn report(handle: &CatalogHandle) {
    let catalog = handle.snapshot();
    println!(
        "Catalog: {} articles, {} categories, {} tags, {} skipped",
        catalog.len(),
        catalog.list_categories().len(),
        catalog.list_tags().len(),
        catalog.skipped()
    );
}

/// Editor swap files and VCS metadata never trigger a reload
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}
