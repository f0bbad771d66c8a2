// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

macro_rules! table {
    ($name:literal) => {
        ($name, include_str!(concat!("../../data/fa/", $name, ".tsv")))
    };
}

/// Persian tables, keyed by name. Keys are written forms, values spoken.
pub(super) const TABLES: &[(&str, &str)] = &[
    table!("zero"),
    table!("digit"),
    table!("teens"),
    table!("tens"),
    table!("hundreds"),
    table!("scale"),
    table!("scale_single"),
    table!("ordinal_exceptions"),
    table!("decimal_places"),
    table!("months_jalali"),
    table!("months_gregorian"),
    table!("time_suffix"),
    table!("minute_specials"),
    table!("currency_symbols"),
    table!("currency_words"),
    table!("measurements"),
    table!("units_unspaced"),
    table!("markers"),
];
