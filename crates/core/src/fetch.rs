use crate::models::Chunk;
use crate::store::ChunkStore;
use anyhow::{ensure, Context};
use tracing::info;

/// Pulls the whole table in `page_size` windows.
///
/// Stops on the first empty or short page. Rows keep the store's order and
/// any page error aborts the fetch; nothing already fetched is returned.
pub async fn fetch_all_chunks(
    store: &dyn ChunkStore,
    page_size: usize,
) -> anyhow::Result<Vec<Chunk>> {
    ensure!(page_size > 0, "page size must be positive");
    let mut all = Vec::new();
    let mut offset = 0usize;
    loop {
        info!(
            "Fetching chunks {} to {}...",
            offset,
            offset + page_size - 1
        );
        let page = store
            .fetch_page(offset, page_size)
            .await
            .with_context(|| format!("fetch chunks at offset {}", offset))?;
        if page.is_empty() {
            break;
        }
        let short = page.len() < page_size;
        all.extend(page);
        if short {
            break;
        }
        offset += page_size;
    }
    Ok(all)
}
