use crate::models::{Chunk, ConceptStats};
use crate::taxonomy::ConceptKeywords;
use std::collections::{BTreeMap, HashSet};

#[derive(Default)]
struct Tally<'a> {
    mentions: usize,
    seen: HashSet<&'a str>,
    ordered: Vec<&'a str>,
}

/// Counts, per concept, the chunks whose content contains any of the
/// concept's keywords, ignoring case on both sides. A chunk counts at most
/// once per concept.
///
/// `sources` lists distinct contributing sources in first-seen order, capped
/// at `max_sources`; `unique_sources` is the uncapped count.
pub fn scan_concepts(
    chunks: &[Chunk],
    taxonomy: &[ConceptKeywords],
    max_sources: usize,
) -> BTreeMap<String, ConceptStats> {
    let mut tallies: Vec<Tally<'_>> = taxonomy.iter().map(|_| Tally::default()).collect();
    let lowered: Vec<Vec<String>> = taxonomy
        .iter()
        .map(|(_, keywords)| keywords.iter().map(|kw| kw.to_lowercase()).collect())
        .collect();

    for chunk in chunks {
        let content = chunk.text().to_lowercase();
        let source = chunk.source();
        for (keywords, tally) in lowered.iter().zip(tallies.iter_mut()) {
            if keywords.iter().any(|kw| content.contains(kw.as_str())) {
                tally.mentions += 1;
                if tally.seen.insert(source) {
                    tally.ordered.push(source);
                }
            }
        }
    }

    taxonomy
        .iter()
        .zip(tallies)
        .map(|((name, _), tally)| {
            let stats = ConceptStats {
                total_mentions: tally.mentions,
                unique_sources: tally.seen.len(),
                sources: tally
                    .ordered
                    .iter()
                    .take(max_sources)
                    .map(|s| s.to_string())
                    .collect(),
            };
            (name.to_string(), stats)
        })
        .collect()
}

/// Concepts with at least one mention, most mentioned first.
pub fn top_concepts(stats: &BTreeMap<String, ConceptStats>, n: usize) -> Vec<(&str, &ConceptStats)> {
    let mut ranked: Vec<(&str, &ConceptStats)> = stats
        .iter()
        .filter(|(_, s)| s.total_mentions > 0)
        .map(|(name, s)| (name.as_str(), s))
        .collect();
    ranked.sort_by(|a, b| b.1.total_mentions.cmp(&a.1.total_mentions).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(n);
    ranked
}
