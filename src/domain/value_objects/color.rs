//! Tri-lingual color identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::ColorResolver;

/// Storefront languages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Fr,
    Ar,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Fr, Language::Ar];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
            Self::Ar => "ar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lang = s.trim().to_ascii_lowercase();
        // Accept region tags such as `fr-FR` or `ar_DZ`.
        match lang.split(['-', '_']).next().unwrap_or_default() {
            "en" => Ok(Self::En),
            "fr" => Ok(Self::Fr),
            "ar" => Ok(Self::Ar),
            _ => Err(LanguageError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unsupported language: {0}")]
pub struct LanguageError(pub String);

/// The same physical color/finish named in all three storefront languages.
///
/// `en` is the identity used for cart merging and order matching; `fr` and
/// `ar` are display projections. Fields missing from stored records
/// deserialize as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorLabel {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub fr: String,
    #[serde(default)]
    pub ar: String,
}

impl ColorLabel {
    pub fn new(en: impl Into<String>, fr: impl Into<String>, ar: impl Into<String>) -> Self {
        Self { en: en.into(), fr: fr.into(), ar: ar.into() }
    }

    /// The same text in every slot.
    pub fn uniform(text: impl Into<String>) -> Self {
        let text = text.into();
        Self { en: text.clone(), fr: text.clone(), ar: text }
    }

    pub fn get(&self, lang: Language) -> &str {
        match lang {
            Language::En => &self.en,
            Language::Fr => &self.fr,
            Language::Ar => &self.ar,
        }
    }

    /// Requested language, else English, else nothing.
    pub fn project(&self, lang: Language) -> Option<&str> {
        [self.get(lang), self.en.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    /// Two labels name the same color when their English forms agree.
    pub fn same_identity(&self, other: &ColorLabel) -> bool {
        self.en.trim().eq_ignore_ascii_case(other.en.trim())
    }
}

/// Finish qualifier composable with any base color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorModifier {
    Light,
    Dark,
    Matte,
    Glossy,
}

impl ColorModifier {
    pub const ALL: [ColorModifier; 4] = [Self::Light, Self::Dark, Self::Matte, Self::Glossy];

    pub fn label(&self, lang: Language) -> &'static str {
        match (self, lang) {
            (Self::Light, Language::En) => "Light",
            (Self::Light, Language::Fr) => "Clair",
            (Self::Light, Language::Ar) => "فاتح",
            (Self::Dark, Language::En) => "Dark",
            (Self::Dark, Language::Fr) => "Foncé",
            (Self::Dark, Language::Ar) => "داكن",
            (Self::Matte, Language::En) => "Matte",
            (Self::Matte, Language::Fr) => "Mat",
            (Self::Matte, Language::Ar) => "مطفي",
            (Self::Glossy, Language::En) => "Glossy",
            (Self::Glossy, Language::Fr) => "Brillant",
            (Self::Glossy, Language::Ar) => "لامع",
        }
    }
}

/// A color as received from a shopper or a stored record: either free text
/// in any language or an already-resolved label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorInput {
    Raw(String),
    Resolved(ColorLabel),
}

impl ColorInput {
    /// Display text for `lang`, falling back to the raw input when the color
    /// cannot be resolved.
    pub fn display_in(&self, resolver: &ColorResolver, lang: Language) -> String {
        match resolver.resolve_to_language(self, lang) {
            Some(text) => text,
            None => match self {
                Self::Raw(raw) => raw.trim().to_string(),
                Self::Resolved(_) => String::new(),
            },
        }
    }

    /// Label to attach to a cart or order line. Unresolvable raw input is
    /// carried verbatim in all three slots.
    pub fn to_label(&self, resolver: &ColorResolver) -> ColorLabel {
        match resolver.resolve_all_languages(self) {
            Some(label) => label,
            None => match self {
                Self::Raw(raw) => ColorLabel::uniform(raw.trim()),
                Self::Resolved(label) => label.clone(),
            },
        }
    }
}

impl From<&str> for ColorInput {
    fn from(s: &str) -> Self { Self::Raw(s.to_string()) }
}

impl From<ColorLabel> for ColorInput {
    fn from(label: ColorLabel) -> Self { Self::Resolved(label) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("fr-FR".parse::<Language>().unwrap(), Language::Fr);
        assert_eq!("AR".parse::<Language>().unwrap(), Language::Ar);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_projection_falls_back_to_english() {
        let label = ColorLabel { en: "Red".into(), ..Default::default() };
        assert_eq!(label.project(Language::Ar), Some("Red"));
        assert_eq!(ColorLabel::default().project(Language::Fr), None);
    }

    #[test]
    fn test_color_input_decodes_string_or_object() {
        let raw: ColorInput = serde_json::from_str(r#""Bleu marine""#).unwrap();
        assert_eq!(raw, ColorInput::Raw("Bleu marine".into()));
        let resolved: ColorInput = serde_json::from_str(r#"{"en":"Red"}"#).unwrap();
        assert_eq!(resolved, ColorInput::Resolved(ColorLabel { en: "Red".into(), ..Default::default() }));
    }

    #[test]
    fn test_same_identity_ignores_case() {
        let a = ColorLabel::new("Navy", "Bleu marine", "كحلي");
        let b = ColorLabel::new("navy ", "", "");
        assert!(a.same_identity(&b));
    }
}
