// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{AlgebraError, ConfigError};
use crate::fst::{optimize, string_map, Fst, Weight};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct TableEntry {
    pub key: String,
    pub value: String,
    /// Explicit tie-break weight from the third column, if any.
    pub weight: Option<f32>,
}

impl TableEntry {
    fn weight_or_one(&self) -> Result<Weight, AlgebraError> {
        self.weight.map(Weight::new).unwrap_or(Ok(Weight::ONE))
    }
}

/// Immutable string-to-string mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalTable {
    name: String,
    entries: Vec<TableEntry>,
}

impl LexicalTable {
    pub fn parse(name: &str, text: &str) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let malformed = |reason: String| ConfigError::MalformedRow {
                table: name.to_string(),
                line: index + 1,
                reason,
            };
            let columns: Vec<&str> = line.split('\t').collect();
            let (key, value, weight) = match columns.as_slice() {
                [key] => (*key, *key, None),
                [key, value] => (*key, *value, None),
                [key, value, weight] => {
                    let w: f32 = weight
                        .trim()
                        .parse()
                        .map_err(|_| malformed(format!("weight {:?} is not a number", weight)))?;
                    if !w.is_finite() || w < 0.0 {
                        return Err(malformed(format!("weight {} must be finite and non-negative", w)));
                    }
                    (*key, *value, Some(w))
                }
                _ => return Err(malformed(format!("expected 1-3 columns, found {}", columns.len()))),
            };
            if key.is_empty() {
                return Err(malformed("empty key".to_string()));
            }
            if key.contains('\0') || value.contains('\0') {
                return Err(malformed("NUL is not allowed".to_string()));
            }
            entries.push(TableEntry {
                key: key.to_string(),
                value: value.to_string(),
                weight,
            });
        }
        Self::from_entries(name, entries)
    }

    pub fn load<P: AsRef<Path>>(name: &str, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(name, &text)
    }

    /// Validates duplicate keys and drops exact repeats.
    pub fn from_entries(name: &str, entries: Vec<TableEntry>) -> Result<Self, ConfigError> {
        let mut first_by_key: HashMap<&str, usize> = HashMap::new();
        let mut keep = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            match first_by_key.get(entry.key.as_str()) {
                None => {
                    first_by_key.insert(&entry.key, i);
                    keep.push(i);
                }
                Some(&j) => {
                    let first = &entries[j];
                    if first.value == entry.value {
                        continue;
                    }
                    let ranked = entries
                        .iter()
                        .filter(|e| e.key == entry.key)
                        .all(|e| e.weight.is_some());
                    if !ranked {
                        return Err(ConfigError::ConflictingEntry {
                            table: name.to_string(),
                            key: entry.key.clone(),
                            first: first.value.clone(),
                            second: entry.value.clone(),
                        });
                    }
                    keep.push(i);
                }
            }
        }
        let entries = keep.into_iter().map(|i| entries[i].clone()).collect();
        Ok(Self {
            name: name.to_string(),
            entries,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// Best-ranked value for `key`; the earliest row wins ties.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .filter(|e| e.key == key)
            .min_by(|a, b| a.weight.unwrap_or(0.0).total_cmp(&b.weight.unwrap_or(0.0)))
            .map(|e| e.value.as_str())
    }

    /// Value-to-key table. When several keys share a value the first row wins.
    pub fn inverse(&self) -> LexicalTable {
        let mut seen = std::collections::HashSet::new();
        let entries = self
            .entries
            .iter()
            .filter(|e| seen.insert(e.value.clone()))
            .map(|e| TableEntry {
                key: e.value.clone(),
                value: e.key.clone(),
                weight: None,
            })
            .collect();
        LexicalTable {
            name: format!("{}_inverse", self.name),
            entries,
        }
    }

    /// Transducer from each key to its value(s).
    pub fn to_fst(&self) -> Result<Fst, AlgebraError> {
        let weights = self
            .entries
            .iter()
            .map(TableEntry::weight_or_one)
            .collect::<Result<Vec<_>, _>>()?;
        let fst = string_map(
            self.entries
                .iter()
                .zip(weights)
                .map(|(e, w)| (e.key.as_str(), e.value.as_str(), w)),
        )?;
        Ok(optimize(&fst))
    }

    /// Acceptor for the keys.
    pub fn keys_fst(&self) -> Result<Fst, AlgebraError> {
        let fst = string_map(
            self.entries
                .iter()
                .map(|e| (e.key.as_str(), e.key.as_str(), Weight::ONE)),
        )?;
        Ok(optimize(&fst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::search::Lattice;

    #[test]
    fn test_parse_rows() {
        struct TestCase {
            name: &'static str,
            text: &'static str,
            expected_len: usize,
        }

        let test_cases = vec![
            TestCase {
                name: "two columns",
                text: "1\tیک\n2\tدو\n",
                expected_len: 2,
            },
            TestCase {
                name: "comments and blanks",
                text: "# header\n\n1\tیک\n",
                expected_len: 1,
            },
            TestCase {
                name: "single column maps to itself",
                text: "%\n°C\n",
                expected_len: 2,
            },
            TestCase {
                name: "exact duplicates collapse",
                text: "1\tیک\n1\tیک\n",
                expected_len: 1,
            },
            TestCase {
                name: "weighted alternatives",
                text: "1\tیکم\t0\n1\tاول\t0.5\n",
                expected_len: 2,
            },
        ];

        for case in test_cases {
            let table = LexicalTable::parse("t", case.text)
                .unwrap_or_else(|e| panic!("case '{}' failed: {}", case.name, e));
            assert_eq!(table.len(), case.expected_len, "case '{}'", case.name);
        }
    }

    #[test]
    fn test_conflicting_values_without_weights_are_rejected() {
        let result = LexicalTable::parse("digit", "1\tیک\n1\tاول\n");
        assert!(matches!(
            result,
            Err(ConfigError::ConflictingEntry { ref key, .. }) if key == "1"
        ));
        // One weighted row is not enough to rank the pair.
        assert!(LexicalTable::parse("digit", "1\tیک\t0.1\n1\tاول\n").is_err());
    }

    #[test]
    fn test_malformed_rows() {
        for text in ["a\tb\tc\td", "a\tb\tnot-a-number", "a\tb\t-1", "\tb"] {
            assert!(
                matches!(LexicalTable::parse("t", text), Err(ConfigError::MalformedRow { .. })),
                "{:?} should be malformed",
                text
            );
        }
    }

    #[test]
    fn test_get_prefers_lowest_weight() {
        let table = LexicalTable::parse("t", "1\tاول\t0.5\n1\tیکم\t0.1\n").unwrap();
        assert_eq!(table.get("1"), Some("یکم"));
    }

    #[test]
    fn test_inverse_keeps_first_key() {
        let table = LexicalTable::parse("t", "am\tصبح\nAM\tصبح\npm\tعصر\n").unwrap();
        let inverse = table.inverse();
        assert_eq!(inverse.get("صبح"), Some("am"));
        assert_eq!(inverse.len(), 2);
    }

    #[test]
    fn test_to_fst_ranks_weighted_rows() {
        let table = LexicalTable::parse("t", "1\tاول\t0.5\n1\tیکم\t0.1\n").unwrap();
        let fst = table.to_fst().unwrap();
        let lattice = Lattice::build(&fst, "1").unwrap();
        let outputs: Vec<String> = lattice.paths(100).map(|h| h.output).collect();
        assert_eq!(outputs, vec!["یکم".to_string(), "اول".to_string()]);
    }
}
