//! The closed registry of supported dictionaries.
//!
//! Cell-grid sizes 4x4 through 7x7 at catalog sizes 50/100/250/1000, plus
//! the legacy original dictionary. The table is a compile-time constant;
//! nothing mutates it at runtime.

use crate::DictionarySpec;

macro_rules! dict {
    ($name:literal, $size:literal, $len:literal) => {
        DictionarySpec {
            name: $name,
            marker_size: $size,
            catalog_len: $len,
        }
    };
}

pub const BUILTIN_DICTIONARIES: [DictionarySpec; 17] = [
    dict!("DICT_4X4_50", 4, 50),
    dict!("DICT_4X4_100", 4, 100),
    dict!("DICT_4X4_250", 4, 250),
    dict!("DICT_4X4_1000", 4, 1000),
    dict!("DICT_5X5_50", 5, 50),
    dict!("DICT_5X5_100", 5, 100),
    dict!("DICT_5X5_250", 5, 250),
    dict!("DICT_5X5_1000", 5, 1000),
    dict!("DICT_6X6_50", 6, 50),
    dict!("DICT_6X6_100", 6, 100),
    dict!("DICT_6X6_250", 6, 250),
    dict!("DICT_6X6_1000", 6, 1000),
    dict!("DICT_7X7_50", 7, 50),
    dict!("DICT_7X7_100", 7, 100),
    dict!("DICT_7X7_250", 7, 250),
    dict!("DICT_7X7_1000", 7, 1000),
    dict!("DICT_ARUCO_ORIGINAL", 5, 1024),
];

/// Look up a built-in dictionary by its canonical name.
pub fn builtin_dictionary(name: &str) -> Option<&'static DictionarySpec> {
    BUILTIN_DICTIONARIES.iter().find(|d| d.name == name)
}

/// Canonical names of every supported dictionary, in registry order.
pub fn dictionary_names() -> impl Iterator<Item = &'static str> {
    BUILTIN_DICTIONARIES.iter().map(|d| d.name)
}
