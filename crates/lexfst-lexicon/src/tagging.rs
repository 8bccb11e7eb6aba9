// Positional tagging of pronunciations

use lexfst_core::{LexiconEntry, PositionTag};

/// Replace every phone of `pronunciation` with its positional variant.
///
/// `["k", "o", "t", "a"]` becomes `["k_B", "o_I", "t_I", "a_E"]`; a single
/// phone gets `_S`. An empty pronunciation stays empty.
pub fn tag_pronunciation(pronunciation: &[String]) -> Vec<String> {
    let len = pronunciation.len();
    pronunciation
        .iter()
        .enumerate()
        .map(|(i, phone)| PositionTag::for_position(i, len).apply(phone))
        .collect()
}

/// Tag every entry of the lexicon, keeping words, weights and order.
pub fn tag_lexicon(lexicon: &[LexiconEntry]) -> Vec<LexiconEntry> {
    lexicon
        .iter()
        .map(|entry| LexiconEntry {
            word: entry.word.clone(),
            weight: entry.weight,
            pronunciation: tag_pronunciation(&entry.pronunciation),
        })
        .collect()
}
