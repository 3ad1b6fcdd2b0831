use crate::models::{Chunk, GroupedChunk, SourceGroup};
use std::collections::BTreeMap;

/// Groups chunks by source transcript. Within a group chunks are ordered by
/// `chunk_index` (missing counts as 0); ties keep their input order.
pub fn group_by_source(chunks: &[Chunk]) -> BTreeMap<String, SourceGroup> {
    let mut groups: BTreeMap<String, SourceGroup> = BTreeMap::new();
    for chunk in chunks {
        let source = chunk.source();
        let group = groups
            .entry(source.to_string())
            .or_insert_with(|| SourceGroup {
                source: source.to_string(),
                chunks: Vec::new(),
                total_chunks: 0,
            });
        group.chunks.push(GroupedChunk {
            id: chunk.id.clone(),
            content: chunk.content.clone(),
            chunk_index: chunk.chunk_index,
        });
        group.total_chunks += 1;
    }
    for group in groups.values_mut() {
        group.chunks.sort_by_key(|c| c.chunk_index.unwrap_or(0));
    }
    groups
}

/// Largest groups first, ties by name.
pub fn largest_sources(groups: &BTreeMap<String, SourceGroup>, n: usize) -> Vec<(&str, usize)> {
    let mut sizes: Vec<(&str, usize)> = groups
        .iter()
        .map(|(name, g)| (name.as_str(), g.total_chunks))
        .collect();
    sizes.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    sizes.truncate(n);
    sizes
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chunk(id: u32, source: Option<&str>, index: Option<i64>) -> Chunk {
        Chunk {
            id: json!(id),
            content: Some(format!("c{}", id)),
            source_transcript: source.map(str::to_string),
            chunk_index: index,
            similarity: None,
        }
    }

    #[test]
    fn every_chunk_lands_in_exactly_one_sorted_group() {
        let chunks = vec![
            chunk(1, Some("a"), Some(3)),
            chunk(2, Some("b"), Some(1)),
            chunk(3, Some("a"), Some(0)),
            chunk(4, None, Some(2)),
            chunk(5, Some("a"), None),
            chunk(6, Some("a"), Some(1)),
        ];
        let groups = group_by_source(&chunks);
        let total: usize = groups.values().map(|g| g.chunks.len()).sum();
        assert_eq!(total, chunks.len());
        assert_eq!(groups["unknown"].total_chunks, 1);

        let a = &groups["a"];
        assert_eq!(a.total_chunks, 4);
        let ids: Vec<_> = a.chunks.iter().map(|c| c.id.clone()).collect();
        // missing index sorts as 0 and after the explicit 0 seen earlier
        assert_eq!(ids, vec![json!(3), json!(5), json!(6), json!(1)]);
        for group in groups.values() {
            let keys: Vec<i64> = group.chunks.iter().map(|c| c.chunk_index.unwrap_or(0)).collect();
            assert!(keys.windows(2).all(|w| w[0] <= w[1]));
        }
    }

    #[test]
    fn largest_sources_breaks_ties_by_name() {
        let chunks = vec![
            chunk(1, Some("b"), None),
            chunk(2, Some("a"), None),
            chunk(3, Some("c"), None),
            chunk(4, Some("c"), None),
        ];
        let groups = group_by_source(&chunks);
        assert_eq!(largest_sources(&groups, 2), vec![("c", 2), ("a", 1)]);
    }
}
