//! Raw color phrase → canonical tri-lingual identity.

use std::collections::HashMap;

use super::cache::ResolutionCache;
use super::dictionary::{self, BaseColor, ALIASES, BASE_COLORS, ENGLISH_SYNONYMS, MODIFIER_TOKENS};
use super::normalize::normalize_phrase;
use crate::domain::value_objects::{ColorInput, ColorLabel, ColorModifier, Language};

pub const DEFAULT_CACHE_CAPACITY: u64 = 512;

/// A base color plus the modifiers found around it, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedColor {
    pub modifiers: Vec<ColorModifier>,
    pub base: &'static BaseColor,
}

impl ResolvedColor {
    pub fn label(&self, lang: Language) -> String {
        self.modifiers
            .iter()
            .map(|m| m.label(lang))
            .chain(std::iter::once(self.base.label(lang)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn labels(&self) -> ColorLabel {
        ColorLabel::new(self.label(Language::En), self.label(Language::Fr), self.label(Language::Ar))
    }
}

/// Resolves free-text colors in English, French or Arabic.
///
/// Lookup order for a normalized phrase:
/// 1. the whole phrase as a label or alias in any language,
/// 2. the whole phrase as an English spelling variant,
/// 3. the phrase minus modifier tokens, through 1 and 2,
/// 4. the last remaining token alone, then the first, when several remain,
/// 5. the remaining tokens joined with `-` as a base color key.
pub struct ColorResolver {
    aliases: HashMap<String, &'static BaseColor>,
    synonyms: HashMap<String, &'static BaseColor>,
    modifiers: HashMap<String, ColorModifier>,
    cache: ResolutionCache,
}

impl ColorResolver {
    pub fn new() -> Self { Self::with_cache(ResolutionCache::new(DEFAULT_CACHE_CAPACITY)) }

    pub fn with_cache(cache: ResolutionCache) -> Self {
        let mut aliases = HashMap::new();
        for color in BASE_COLORS {
            for label in [color.en, color.fr, color.ar] {
                aliases.entry(normalize_phrase(label)).or_insert(color);
            }
        }
        for (phrase, key) in ALIASES {
            if let Some(color) = dictionary::base_by_key(key) {
                aliases.entry(normalize_phrase(phrase)).or_insert(color);
            }
        }
        let synonyms = ENGLISH_SYNONYMS
            .iter()
            .filter_map(|(phrase, key)| Some((normalize_phrase(phrase), dictionary::base_by_key(key)?)))
            .collect();
        let modifiers = MODIFIER_TOKENS
            .iter()
            .map(|(token, modifier)| (normalize_phrase(token), *modifier))
            .collect();
        Self { aliases, synonyms, modifiers, cache }
    }

    /// Resolve free text. `None` when no base color can be identified.
    pub fn resolve(&self, input: &str) -> Option<ResolvedColor> {
        let phrase = normalize_phrase(input);
        if phrase.is_empty() {
            return None;
        }
        if let Some(hit) = self.cache.get(&phrase) {
            return hit;
        }
        let resolved = self.resolve_phrase(&phrase);
        if resolved.is_none() {
            tracing::debug!(input, "color not recognized");
        }
        self.cache.insert(phrase, resolved.clone());
        resolved
    }

    /// Text for `lang`. An already-resolved label is projected as is.
    pub fn resolve_to_language(&self, input: &ColorInput, lang: Language) -> Option<String> {
        match input {
            ColorInput::Resolved(label) => label.project(lang).map(str::to_string),
            ColorInput::Raw(raw) => self.resolve(raw).map(|c| c.label(lang)),
        }
    }

    /// All three projections at once.
    pub fn resolve_all_languages(&self, input: &ColorInput) -> Option<ColorLabel> {
        match input {
            ColorInput::Resolved(label) => {
                let en = label.project(Language::En)?.to_string();
                let pick = |lang| label.project(lang).unwrap_or(en.as_str()).to_string();
                Some(ColorLabel { fr: pick(Language::Fr), ar: pick(Language::Ar), en })
            }
            ColorInput::Raw(raw) => self.resolve(raw).map(|c| c.labels()),
        }
    }

    pub fn cached_entries(&self) -> u64 { self.cache.entry_count() }

    fn lookup_base(&self, phrase: &str) -> Option<&'static BaseColor> {
        self.aliases.get(phrase).or_else(|| self.synonyms.get(phrase)).copied()
    }

    fn resolve_phrase(&self, phrase: &str) -> Option<ResolvedColor> {
        if let Some(base) = self.lookup_base(phrase) {
            return Some(ResolvedColor { modifiers: Vec::new(), base });
        }

        let mut modifiers = Vec::new();
        let mut leftover = Vec::new();
        for token in phrase.split(' ') {
            match self.modifiers.get(token) {
                Some(modifier) => modifiers.push(*modifier),
                None => leftover.push(token),
            }
        }
        if leftover.is_empty() {
            return None;
        }

        let base = self
            .lookup_base(&leftover.join(" "))
            .or_else(|| match leftover.as_slice() {
                [first, .., last] => self.lookup_base(last).or_else(|| self.lookup_base(first)),
                _ => None,
            })
            .or_else(|| dictionary::base_by_key(&leftover.join("-")))?;
        Some(ResolvedColor { modifiers, base })
    }
}

impl Default for ColorResolver {
    fn default() -> Self { Self::new() }
}

impl std::fmt::Debug for ColorResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColorResolver")
            .field("aliases", &self.aliases.len())
            .field("synonyms", &self.synonyms.len())
            .finish()
    }
}
