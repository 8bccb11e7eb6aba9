// Compilation options

use lexfst_core::PhoneSet;
use serde::{Deserialize, Serialize};

use crate::{LexiconError, Result};

/// Prefix every user nonterminal must carry, e.g. `#nonterm:contact_list`.
pub const NONTERMINAL_PREFIX: &str = "#nonterm:";

/// Settings for one lexicon compilation.
///
/// Deserializable from JSON; missing fields take their defaults:
///
/// ```json
/// { "silence_prob": 0.5, "silence_phone": "sil" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Probability of optional silence between words, strictly in (0, 1).
    pub silence_prob: f64,
    /// The undecorated silence phone used between words.
    pub silence_phone: String,
    /// Put the dedicated silence disambiguation symbol after the silence phone
    /// in the disambiguated transducer.
    pub silence_disambig: bool,
    /// Grammar nonterminals (`#nonterm:...`); empty disables the extension.
    pub nonterminals: Vec<String>,
    /// Phone symbols allowed as left context of a nonterminal.
    pub left_context_phones: Vec<String>,
    /// Out-of-vocabulary word expected in the lexicon, if any.
    pub oov: Option<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            silence_prob: 0.5,
            silence_phone: "sil".to_string(),
            silence_disambig: false,
            nonterminals: Vec::new(),
            left_context_phones: Vec::new(),
            oov: None,
        }
    }
}

impl CompileOptions {
    /// Parse options from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Whether the nonterminal extension is enabled.
    pub fn has_nonterminals(&self) -> bool {
        !self.nonterminals.is_empty()
    }

    /// Check the options against the phone inventory.
    pub fn validate(&self, phones: &PhoneSet) -> Result<()> {
        if !(self.silence_prob > 0.0 && self.silence_prob < 1.0) {
            return Err(LexiconError::InvalidConfiguration(format!(
                "silence probability must be strictly between 0 and 1, got {}",
                self.silence_prob
            )));
        }
        if !phones.is_silence(&self.silence_phone) {
            return Err(LexiconError::InvalidConfiguration(format!(
                "optional silence phone {:?} is not a declared silence phone",
                self.silence_phone
            )));
        }
        if self.has_nonterminals() {
            if self.left_context_phones.is_empty() {
                return Err(LexiconError::InvalidConfiguration(
                    "nonterminals were given without left-context phones".to_string(),
                ));
            }
            if let Some(bad) = self.nonterminals.iter().find(|n| {
                !n.starts_with(NONTERMINAL_PREFIX)
                    || n.len() == NONTERMINAL_PREFIX.len()
                    || n.chars().any(char::is_whitespace)
            }) {
                return Err(LexiconError::InvalidConfiguration(format!(
                    "nonterminal {bad:?} must look like {NONTERMINAL_PREFIX}name, without whitespace"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phones() -> PhoneSet {
        PhoneSet::new(["sil", "spn"], ["a"]).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let opts = CompileOptions::default();
        assert_eq!(opts.silence_prob, 0.5);
        assert_eq!(opts.silence_phone, "sil");
        opts.validate(&phones()).unwrap();
    }

    #[test]
    fn json_fills_defaults() {
        let opts = CompileOptions::from_json(r#"{"silence_prob": 0.2, "oov": "<unk>"}"#).unwrap();
        assert_eq!(opts.silence_prob, 0.2);
        assert_eq!(opts.silence_phone, "sil");
        assert_eq!(opts.oov.as_deref(), Some("<unk>"));
        assert!(!opts.has_nonterminals());
    }

    #[test]
    fn bad_json() {
        assert!(matches!(
            CompileOptions::from_json("{\"silence_prob\": \"high\"}"),
            Err(LexiconError::Options(_))
        ));
    }

    #[test]
    fn rejects_probability_out_of_range() {
        for prob in [0.0, 1.0, 2.0] {
            let opts = CompileOptions {
                silence_prob: prob,
                ..Default::default()
            };
            assert!(matches!(
                opts.validate(&phones()),
                Err(LexiconError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn rejects_non_silence_optional_phone() {
        let opts = CompileOptions {
            silence_phone: "a".to_string(),
            ..Default::default()
        };
        assert!(opts.validate(&phones()).is_err());
    }

    #[test]
    fn nonterminals_need_left_context() {
        let mut opts = CompileOptions {
            nonterminals: vec!["#nonterm:names".to_string()],
            ..Default::default()
        };
        assert!(opts.validate(&phones()).is_err());
        opts.left_context_phones = vec!["a_E".to_string()];
        opts.validate(&phones()).unwrap();
    }

    #[test]
    fn nonterminal_with_whitespace_rejected() {
        for name in ["#nonterm:new york", "#nonterm:a\tb", "#nonterm:x\n"] {
            let opts = CompileOptions {
                nonterminals: vec![name.to_string()],
                left_context_phones: vec!["a_E".to_string()],
                ..Default::default()
            };
            assert!(matches!(
                opts.validate(&phones()),
                Err(LexiconError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn nonterminal_prefix_required() {
        let opts = CompileOptions {
            nonterminals: vec!["names".to_string()],
            left_context_phones: vec!["a_E".to_string()],
            ..Default::default()
        };
        assert!(opts.validate(&phones()).is_err());
    }
}
