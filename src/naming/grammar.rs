//! Town name grammars, one per naming culture.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::region::Regionalism;

/// Names a High Rock grammar must never produce.
const RESERVED_TOWN_NAMES: &[&str] = &["Daggerfall", "Wayrest"];

/// Positional fragment lists for one culture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameGrammar {
    pub prefixes: Vec<String>,
    pub suffix1: Vec<String>,
    pub suffix2: Vec<String>,
    pub extras: Vec<String>,
    /// Infix classes, each introduced by a `*x` marker naming its vowel.
    pub vowels: Vec<String>,
}

/// Uniform pick from a fragment list; empty lists yield an empty fragment.
pub(crate) fn pick<'a, R: Rng>(list: &'a [String], rng: &mut R) -> &'a str {
    if list.is_empty() {
        ""
    } else {
        &list[rng.gen_range(0..list.len())]
    }
}

fn percent<R: Rng>(rng: &mut R, chance: u32) -> bool {
    rng.gen_range(1..=100) <= chance
}

impl NameGrammar {
    /// Infixes for the class of `vowel`.
    pub fn vowel_class(&self, vowel: char) -> &[String] {
        let marker = format!("*{}", vowel);
        let Some(start) = self.vowels.iter().position(|v| *v == marker) else {
            return &[];
        };
        let rest = &self.vowels[start + 1..];
        let end = rest.iter().position(|v| v.starts_with('*')).unwrap_or(rest.len());
        &rest[..end]
    }

    fn base<R: Rng>(&self, rng: &mut R) -> String {
        format!("{}{}", pick(&self.prefixes, rng), pick(&self.suffix1, rng))
    }

    fn high_rock_base<R: Rng>(&self, attempts: u32, rng: &mut R) -> Option<String> {
        for _ in 0..attempts {
            let base = self.base(rng);
            if !RESERVED_TOWN_NAMES.iter().any(|r| r.eq_ignore_ascii_case(&base)) {
                return Some(base);
            }
        }
        None
    }

    /// One town name in this grammar's culture. `None` when the grammar keeps
    /// producing reserved names.
    pub fn town_name<R: Rng>(
        &self,
        culture: Regionalism,
        attempts: u32,
        rng: &mut R,
    ) -> Option<String> {
        let name = match culture {
            Regionalism::HighRockVanilla => {
                let base = self.high_rock_base(attempts, rng)?;
                if percent(rng, 10) {
                    format!("{} {}", base, pick(&self.extras, rng))
                } else {
                    base
                }
            }
            Regionalism::HighRockModern => {
                let base = self.high_rock_base(attempts, rng)?;
                if percent(rng, 10) {
                    format!("{} de {}", pick(&self.extras, rng), base)
                } else {
                    base
                }
            }
            Regionalism::Hammerfell => {
                let prefix = pick(&self.prefixes, rng);
                let infix = prefix
                    .chars()
                    .rev()
                    .find(|c| "aeiouy".contains(c.to_ascii_lowercase()))
                    .map(|v| pick(self.vowel_class(v.to_ascii_lowercase()), rng))
                    .unwrap_or("");
                let ending = if rng.gen_bool(0.5) {
                    pick(&self.suffix2, rng)
                } else {
                    pick(&self.extras, rng)
                };
                format!("{}{}{}", prefix, infix, ending)
            }
            Regionalism::Skyrim => {
                if percent(rng, 30) {
                    let prefix = pick(&self.prefixes, rng);
                    let middle = pick(&self.suffix2, rng);
                    format!("{}{}{}", prefix, middle, pick(&self.suffix1, rng))
                } else {
                    self.base(rng)
                }
            }
            Regionalism::Reachmen => {
                let base = self.base(rng);
                if percent(rng, 60) {
                    format!("{} {}", base, pick(&self.extras, rng))
                } else {
                    base
                }
            }
            Regionalism::Morrowind => {
                if percent(rng, 10) {
                    if rng.gen_bool(0.5) {
                        let prefix = pick(&self.prefixes, rng);
                        let middle = pick(&self.suffix2, rng);
                        format!("{}{}{}", prefix, middle, pick(&self.suffix1, rng))
                    } else {
                        let base = self.base(rng);
                        format!("{} {}", base, pick(&self.extras, rng))
                    }
                } else {
                    self.base(rng)
                }
            }
        };
        Some(capitalize(name.trim()))
    }
}

/// Uppercase the first letter.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_high_rock_rejects_reserved_names() {
        let grammar = NameGrammar {
            prefixes: strings(&["Dagger", "Way", "Ash"]),
            suffix1: strings(&["fall", "rest"]),
            extras: strings(&["Keep"]),
            ..NameGrammar::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..300 {
            if let Some(name) = grammar.town_name(Regionalism::HighRockVanilla, 16, &mut rng) {
                assert_ne!(name, "Daggerfall");
                assert_ne!(name, "Wayrest");
            }
        }
    }

    #[test]
    fn test_reserved_only_grammar_gives_up() {
        let grammar = NameGrammar {
            prefixes: strings(&["Dagger"]),
            suffix1: strings(&["fall"]),
            ..NameGrammar::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(grammar.town_name(Regionalism::HighRockModern, 8, &mut rng), None);
    }

    #[test]
    fn test_vowel_classes() {
        let grammar = NameGrammar {
            vowels: strings(&["*a", "ab", "ar", "*e", "el", "*i", "im", "ir"]),
            ..NameGrammar::default()
        };
        assert_eq!(grammar.vowel_class('a'), &strings(&["ab", "ar"])[..]);
        assert_eq!(grammar.vowel_class('e'), &strings(&["el"])[..]);
        assert!(grammar.vowel_class('o').is_empty());
    }

    #[test]
    fn test_hammerfell_uses_infix_of_last_vowel() {
        let grammar = NameGrammar {
            prefixes: strings(&["Sent"]),
            suffix2: strings(&["ah"]),
            extras: strings(&["ah"]),
            vowels: strings(&["*a", "ar", "*e", "in"]),
            ..NameGrammar::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(grammar.town_name(Regionalism::Hammerfell, 4, &mut rng).unwrap(), "Sentinah");
    }

    #[test]
    fn test_names_are_capitalized() {
        assert_eq!(capitalize("rihad"), "Rihad");
        assert_eq!(capitalize(""), "");
    }
}
