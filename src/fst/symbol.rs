// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::AlgebraError;
use serde::Deserialize;

/// Arc label. `0` is reserved for epsilon on both alphabets.
pub type Label = u32;

pub const EPSILON: Label = 0;

/// How strings are split into symbols.
///
/// `Bytes` labels each UTF-8 byte (1..=255) and is what the grammars use:
/// it keeps character classes small enough to enumerate. `CodePoints`
/// labels each `char` and is useful for hand-built automata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alphabet {
    #[default]
    Bytes,
    CodePoints,
}

impl Alphabet {
    pub fn encode(&self, s: &str) -> Result<Vec<Label>, AlgebraError> {
        if s.contains('\0') {
            return Err(AlgebraError::ReservedSymbol(s.to_string()));
        }
        Ok(match self {
            Alphabet::Bytes => s.bytes().map(Label::from).collect(),
            Alphabet::CodePoints => s.chars().map(|c| c as Label).collect(),
        })
    }

    /// Byte offset in `s` at which each symbol starts, plus `s.len()` at the end.
    pub fn offsets(&self, s: &str) -> Vec<usize> {
        match self {
            Alphabet::Bytes => (0..=s.len()).collect(),
            Alphabet::CodePoints => s
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(s.len()))
                .collect(),
        }
    }

    /// Appends the text of one non-epsilon label to `out`.
    pub(crate) fn push_label(&self, label: Label, out: &mut Vec<u8>) {
        match self {
            Alphabet::Bytes => out.push(label as u8),
            Alphabet::CodePoints => {
                let c = char::from_u32(label).unwrap_or(char::REPLACEMENT_CHARACTER);
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    pub fn decode(&self, labels: &[Label]) -> String {
        let mut bytes = Vec::with_capacity(labels.len());
        for &label in labels.iter().filter(|&&l| l != EPSILON) {
            self.push_label(label, &mut bytes);
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_both_alphabets() {
        for alphabet in [Alphabet::Bytes, Alphabet::CodePoints] {
            let labels = alphabet.encode("سه 3").unwrap();
            assert_eq!(alphabet.decode(&labels), "سه 3", "{:?}", alphabet);
        }
        assert_eq!(Alphabet::Bytes.encode("س").unwrap().len(), 2);
        assert_eq!(Alphabet::CodePoints.encode("س").unwrap().len(), 1);
    }

    #[test]
    fn test_nul_is_reserved() {
        assert!(matches!(
            Alphabet::Bytes.encode("a\0b"),
            Err(AlgebraError::ReservedSymbol(_))
        ));
    }

    #[test]
    fn test_offsets_track_byte_positions() {
        assert_eq!(Alphabet::CodePoints.offsets("aس"), vec![0, 1, 3]);
        assert_eq!(Alphabet::Bytes.offsets("ab"), vec![0, 1, 2]);
    }
}
