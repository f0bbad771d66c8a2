// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Lexical tables: the string-to-string data grammars are compiled from.
//!
//! Tables are plain TSV, one `key<TAB>value[<TAB>weight]` row per line. A
//! single-column row maps the key to itself. Blank lines and lines starting
//! with `#` are skipped. A key may appear more than once only if every
//! conflicting row carries an explicit weight to rank the alternatives.

mod persian;
mod table;

pub use table::{LexicalTable, TableEntry};

use crate::errors::ConfigError;
use crate::observability::messages::validation::LexiconOverrideLoaded;
use crate::observability::messages::StructuredLog;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

/// Languages with built-in lexical data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "fa")]
    Persian,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Persian => write!(f, "fa"),
        }
    }
}

/// Named lexical tables for one language.
#[derive(Debug, Clone)]
pub struct Lexicon {
    language: Language,
    tables: BTreeMap<String, LexicalTable>,
}

impl Lexicon {
    /// The embedded tables for `language`.
    pub fn builtin(language: Language) -> Result<Self, ConfigError> {
        let sources = match language {
            Language::Persian => persian::TABLES,
        };
        let tables = sources
            .iter()
            .map(|(name, text)| Ok((name.to_string(), LexicalTable::parse(name, text)?)))
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;
        Ok(Self { language, tables })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn table(&self, name: &str) -> Result<&LexicalTable, ConfigError> {
        self.tables
            .get(name)
            .ok_or_else(|| ConfigError::MissingTable(name.to_string()))
    }

    /// Looks up a spoken marker word such as the negative sign or the
    /// decimal separator.
    pub fn marker(&self, name: &str) -> Result<&str, ConfigError> {
        self.table("markers")?
            .get(name)
            .ok_or_else(|| ConfigError::MissingMarker(name.to_string()))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Replaces a built-in table. Unknown names are rejected so a typo in a
    /// config file cannot silently add an unused table.
    pub fn with_table(mut self, table: LexicalTable) -> Result<Self, ConfigError> {
        if !self.tables.contains_key(table.name()) {
            return Err(ConfigError::UnknownTable(table.name().to_string()));
        }
        self.tables.insert(table.name().to_string(), table);
        Ok(self)
    }

    /// Applies `name -> TSV path` overrides from configuration.
    pub fn with_overrides(self, overrides: &HashMap<String, PathBuf>) -> Result<Self, ConfigError> {
        let mut names: Vec<&String> = overrides.keys().collect();
        names.sort();
        names.into_iter().try_fold(self, |lexicon, name| {
            let path = &overrides[name];
            let table = LexicalTable::load(name, path)?;
            LexiconOverrideLoaded {
                table: name,
                path,
                entries: table.len(),
            }
            .log();
            lexicon.with_table(table)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_persian_tables_load() {
        let lexicon = Lexicon::builtin(Language::Persian).unwrap();
        for name in [
            "zero",
            "digit",
            "teens",
            "tens",
            "hundreds",
            "scale",
            "scale_single",
            "ordinal_exceptions",
            "decimal_places",
            "months_jalali",
            "months_gregorian",
            "time_suffix",
            "minute_specials",
            "currency_symbols",
            "currency_words",
            "measurements",
            "units_unspaced",
            "markers",
        ] {
            assert!(lexicon.table(name).is_ok(), "missing table {}", name);
        }
        assert_eq!(lexicon.table("digit").unwrap().get("3"), Some("سه"));
        assert_eq!(lexicon.marker("negative").unwrap(), "منفی");
    }

    #[test]
    fn test_missing_table_and_marker() {
        let lexicon = Lexicon::builtin(Language::Persian).unwrap();
        assert!(matches!(lexicon.table("nope"), Err(ConfigError::MissingTable(_))));
        assert!(matches!(lexicon.marker("nope"), Err(ConfigError::MissingMarker(_))));
    }

    #[test]
    fn test_override_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "am\tپیش از ظهر").unwrap();
        writeln!(file, "pm\tپس از ظهر").unwrap();

        let overrides = HashMap::from([("time_suffix".to_string(), file.path().to_path_buf())]);
        let lexicon = Lexicon::builtin(Language::Persian)
            .unwrap()
            .with_overrides(&overrides)
            .unwrap();
        let table = lexicon.table("time_suffix").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("pm"), Some("پس از ظهر"));
    }

    #[test]
    fn test_override_of_unknown_table_is_rejected() {
        let table = LexicalTable::parse("colours", "red\tقرمز").unwrap();
        let result = Lexicon::builtin(Language::Persian).unwrap().with_table(table);
        assert!(matches!(result, Err(ConfigError::UnknownTable(name)) if name == "colours"));
    }
}
