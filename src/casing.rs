use std::fmt;

use convert_case::{Boundary, Case, Casing as _};

/// Word boundaries recognized when splitting an identifier.
///
/// Digits only end a word before an uppercase letter (`int8` stays one
/// word, `Int8Value` becomes `Int8` + `Value`).
const WORD_BOUNDARIES: [Boundary; 6] = [
    Boundary::Underscore,
    Boundary::Hyphen,
    Boundary::Space,
    Boundary::LowerUpper,
    Boundary::DigitUpper,
    Boundary::Acronym,
];

/// Identifier casings used by the key formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Casing {
    /// `camelCase`
    Camel,
    /// `PascalCase`
    Pascal,
    /// `UPPER_SNAKE`
    UpperSnake,
    /// `lower_snake`
    LowerSnake,
    /// `UPPER-KEBAB`
    UpperKebab,
    /// `lower-kebab`
    LowerKebab,
}

impl Casing {
    fn case(self) -> Case {
        match self {
            Casing::Camel => Case::Camel,
            Casing::Pascal => Case::Pascal,
            Casing::UpperSnake => Case::UpperSnake,
            Casing::LowerSnake => Case::Snake,
            Casing::UpperKebab => Case::Cobol,
            Casing::LowerKebab => Case::Kebab,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Casing::Camel => "camel_case",
            Casing::Pascal => "pascal_case",
            Casing::UpperSnake => "upper_snake_case",
            Casing::LowerSnake => "lower_snake_case",
            Casing::UpperKebab => "upper_kebab_case",
            Casing::LowerKebab => "lower_kebab_case",
        }
    }

    /// Separator placed between words. Empty for camel and pascal case.
    pub fn separator(self) -> &'static str {
        match self {
            Casing::Camel | Casing::Pascal => "",
            Casing::UpperSnake | Casing::LowerSnake => "_",
            Casing::UpperKebab | Casing::LowerKebab => "-",
        }
    }

    /// Re-case an identifier written in any of the supported casings.
    pub fn convert(self, s: &str) -> String {
        s.with_boundaries(&WORD_BOUNDARIES).to_case(self.case())
    }

    /// Join already-split words.
    pub fn join<S: AsRef<str>>(self, words: &[S]) -> String {
        let spaced = words.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
        spaced.with_boundaries(&[Boundary::Space]).to_case(self.case())
    }
}

impl fmt::Display for Casing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
