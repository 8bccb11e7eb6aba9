// Text readers for lexicons and phone lists.
//
// Lexicon lines are tab separated:  word<TAB>weight<TAB>phone phone ...
// A missing or blank third field means an empty pronunciation.

use std::io::BufRead;

use lexfst_core::LexiconEntry;

use crate::{LexiconError, Result};

/// Parse one lexicon line. `line_no` is only used for error messages.
pub fn parse_lexicon_line(line: &str, line_no: usize) -> Result<LexiconEntry> {
    let mut fields = line.split('\t');
    let word = fields.next().unwrap_or_default().trim();
    if word.is_empty() {
        return Err(LexiconError::Parse {
            line: line_no,
            reason: "missing word".to_string(),
        });
    }
    if word.chars().any(char::is_whitespace) {
        return Err(LexiconError::Parse {
            line: line_no,
            reason: format!("word {word:?} contains whitespace"),
        });
    }
    let weight_field = fields.next().ok_or_else(|| LexiconError::Parse {
        line: line_no,
        reason: format!("missing weight for {word:?}"),
    })?;
    let weight = weight_field
        .trim()
        .parse::<f64>()
        .map_err(|e| LexiconError::Parse {
            line: line_no,
            reason: format!("bad weight {weight_field:?}: {e}"),
        })?;
    let pronunciation = fields
        .next()
        .map(|p| p.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    if fields.next().is_some() {
        return Err(LexiconError::Parse {
            line: line_no,
            reason: "too many tab-separated fields".to_string(),
        });
    }
    Ok(LexiconEntry {
        word: word.to_string(),
        weight,
        pronunciation,
    })
}

/// Parse a whole lexicon. Blank lines are skipped; line numbers start at 1.
pub fn parse_lexicon(text: &str) -> Result<Vec<LexiconEntry>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_lexicon_line(line, i + 1))
        .collect()
}

/// Read a lexicon from a buffered reader.
pub fn read_lexicon<R: BufRead>(reader: R) -> Result<Vec<LexiconEntry>> {
    let mut entries = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(parse_lexicon_line(&line, i + 1)?);
    }
    Ok(entries)
}

/// Parse a phone list: whitespace separated, any number of phones per line.
/// Order is kept.
pub fn parse_phone_list(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
