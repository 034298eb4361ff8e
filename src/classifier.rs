//! Name-based relation classifier
//!
//! Learns masculine/feminine first-name associations from the guardian-name
//! columns of the batch itself — no external name list. Paternal names feed
//! the masculine set, maternal names the feminine set. Classification of a
//! student's first name then falls back from exact lookup to a 3-character
//! prefix heuristic, and finally to a configurable default class.

use std::collections::HashSet;

use crate::models::StudentRecord;

/// Value treated as a missing cell by the record source.
pub const MISSING_SENTINEL: &str = "nan";

/// Prefix length used by the similarity fallback.
const PREFIX_LEN: usize = 3;

/// The abstract binary class a first name is sorted into.
///
/// The "son"/"daughter" wording shown to users is a presentation over this,
/// applied by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameClass {
    Masculine,
    Feminine,
}

/// How a classification was reached, surfaced so the report can count how
/// often the default-class bias kicked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Exact,
    Prefix,
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub class: NameClass,
    pub method: Method,
}

/// Per-batch classifier state. Built once by [`learn`](Self::learn) before
/// any classification, read-only afterwards, dropped with the batch.
///
/// Names are kept both in a `HashSet` (exact lookup) and a `Vec` in insertion
/// order (prefix scan), so repeated calls on the same batch are reproducible.
pub struct NameClassifier {
    masculine: Vec<String>,
    feminine: Vec<String>,
    masculine_index: HashSet<String>,
    feminine_index: HashSet<String>,
    default_class: NameClass,
}

impl NameClassifier {
    pub fn new() -> Self {
        Self::with_default(NameClass::Masculine)
    }

    /// Create a classifier with an explicit default class for names that
    /// match neither set nor any prefix.
    pub fn with_default(default_class: NameClass) -> Self {
        Self {
            masculine: Vec::new(),
            feminine: Vec::new(),
            masculine_index: HashSet::new(),
            feminine_index: HashSet::new(),
            default_class,
        }
    }

    /// One pass over the batch: the first whitespace token of every guardian
    /// name, lower-cased, lands in the matching set. Duplicates are ignored.
    pub fn learn<'a, I>(&mut self, records: I)
    where
        I: IntoIterator<Item = &'a StudentRecord>,
    {
        for record in records {
            if let Some(token) = first_token(&record.father_name) {
                if self.masculine_index.insert(token.clone()) {
                    self.masculine.push(token);
                }
            }
            if let Some(token) = first_token(&record.mother_name) {
                if self.feminine_index.insert(token.clone()) {
                    self.feminine.push(token);
                }
            }
        }
    }

    /// Classify a first name.
    ///
    /// Exact case-insensitive membership in exactly one set decides directly.
    /// Ambiguous (both sets) or unknown names fall back to a 3-character
    /// prefix scan over the masculine set first, then the feminine set, in
    /// insertion order. No prefix hit returns the default class.
    pub fn classify(&self, first_name: &str) -> Classification {
        let needle = first_name.trim().to_lowercase();

        let in_masculine = self.masculine_index.contains(&needle);
        let in_feminine = self.feminine_index.contains(&needle);

        match (in_masculine, in_feminine) {
            (true, false) => {
                return Classification { class: NameClass::Masculine, method: Method::Exact }
            }
            (false, true) => {
                return Classification { class: NameClass::Feminine, method: Method::Exact }
            }
            // Both sets (data ambiguity) or neither: fall through to prefixes.
            _ => {}
        }

        if let Some(class) = self.prefix_match(&needle) {
            return Classification { class, method: Method::Prefix };
        }

        Classification { class: self.default_class, method: Method::Default }
    }

    fn prefix_match(&self, needle: &str) -> Option<NameClass> {
        let prefix = char_prefix(needle)?;

        let hit = |names: &[String]| {
            names
                .iter()
                .any(|n| char_prefix(n).as_deref() == Some(prefix.as_str()))
        };

        if hit(&self.masculine) {
            Some(NameClass::Masculine)
        } else if hit(&self.feminine) {
            Some(NameClass::Feminine)
        } else {
            None
        }
    }

    pub fn masculine_count(&self) -> usize {
        self.masculine.len()
    }

    pub fn feminine_count(&self) -> usize {
        self.feminine.len()
    }
}

impl Default for NameClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// First `PREFIX_LEN` characters of a name, or `None` when the name is too
/// short to take part in the similarity fallback.
fn char_prefix(name: &str) -> Option<String> {
    let prefix: String = name.chars().take(PREFIX_LEN).collect();
    (prefix.chars().count() == PREFIX_LEN).then_some(prefix)
}

/// First whitespace-delimited token, lower-cased. Empty strings and the
/// record source's missing sentinel yield `None`.
fn first_token(name: &str) -> Option<String> {
    let token = name.split_whitespace().next()?.to_lowercase();
    if token.is_empty() || token == MISSING_SENTINEL {
        None
    } else {
        Some(token)
    }
}
