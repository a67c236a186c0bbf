//! Base color table and the alias tables that point into it.
//!
//! Keys are hyphenated English (`burnt-orange`). Aliases and synonyms are
//! written however shoppers type them; the resolver normalizes both sides
//! before comparing.

use crate::domain::value_objects::{ColorLabel, ColorModifier, Language};

#[derive(Debug, PartialEq, Eq)]
pub struct BaseColor {
    pub key: &'static str,
    pub en: &'static str,
    pub fr: &'static str,
    pub ar: &'static str,
}

impl BaseColor {
    pub fn label(&self, lang: Language) -> &'static str {
        match lang {
            Language::En => self.en,
            Language::Fr => self.fr,
            Language::Ar => self.ar,
        }
    }

    pub fn labels(&self) -> ColorLabel { ColorLabel::new(self.en, self.fr, self.ar) }
}

macro_rules! base {
    ($key:literal, $en:literal, $fr:literal, $ar:literal) => {
        BaseColor { key: $key, en: $en, fr: $fr, ar: $ar }
    };
}

pub static BASE_COLORS: &[BaseColor] = &[
    base!("black", "Black", "Noir", "أسود"),
    base!("white", "White", "Blanc", "أبيض"),
    base!("grey", "Grey", "Gris", "رمادي"),
    base!("red", "Red", "Rouge", "أحمر"),
    base!("blue", "Blue", "Bleu", "أزرق"),
    base!("navy", "Navy", "Bleu marine", "كحلي"),
    base!("royal-blue", "Royal Blue", "Bleu roi", "أزرق ملكي"),
    base!("sky-blue", "Sky Blue", "Bleu ciel", "أزرق سماوي"),
    base!("turquoise", "Turquoise", "Turquoise", "فيروزي"),
    base!("green", "Green", "Vert", "أخضر"),
    base!("olive", "Olive", "Olive", "زيتي"),
    base!("khaki", "Khaki", "Kaki", "كاكي"),
    base!("mint", "Mint", "Menthe", "نعناعي"),
    base!("yellow", "Yellow", "Jaune", "أصفر"),
    base!("mustard", "Mustard", "Moutarde", "خردلي"),
    base!("orange", "Orange", "Orange", "برتقالي"),
    base!("burnt-orange", "Burnt Orange", "Orange brûlé", "برتقالي محروق"),
    base!("brown", "Brown", "Marron", "بني"),
    base!("chocolate", "Chocolate", "Chocolat", "شوكولاتة"),
    base!("camel", "Camel", "Camel", "جملي"),
    base!("beige", "Beige", "Beige", "بيج"),
    base!("cream", "Cream", "Crème", "كريمي"),
    base!("ivory", "Ivory", "Ivoire", "عاجي"),
    base!("pink", "Pink", "Rose", "وردي"),
    base!("fuchsia", "Fuchsia", "Fuchsia", "فوشيا"),
    base!("purple", "Purple", "Violet", "بنفسجي"),
    base!("lilac", "Lilac", "Lilas", "ليلكي"),
    base!("burgundy", "Burgundy", "Bordeaux", "عنابي"),
    base!("gold", "Gold", "Doré", "ذهبي"),
    base!("silver", "Silver", "Argenté", "فضي"),
    base!("bronze", "Bronze", "Bronze", "برونزي"),
    base!("copper", "Copper", "Cuivre", "نحاسي"),
    base!("taupe", "Taupe", "Taupe", "طوبي"),
    base!("coral", "Coral", "Corail", "مرجاني"),
    base!("salmon", "Salmon", "Saumon", "سلموني"),
    base!("nude", "Nude", "Nude", "نود"),
    base!("transparent", "Transparent", "Transparent", "شفاف"),
    base!("multicolor", "Multicolor", "Multicolore", "متعدد الألوان"),
];

/// Extra phrases in any language, mapped to base color keys.
pub static ALIASES: &[(&str, &str)] = &[
    ("navy blue", "navy"),
    ("marine", "navy"),
    ("أزرق كحلي", "navy"),
    ("noire", "black"),
    ("blanche", "white"),
    ("grise", "grey"),
    ("رصاصي", "grey"),
    ("verte", "green"),
    ("vert olive", "olive"),
    ("jaune moutarde", "mustard"),
    ("brun", "brown"),
    ("chocolat noir", "chocolate"),
    ("crème", "cream"),
    ("blanc cassé", "ivory"),
    ("off white", "ivory"),
    ("rose poudré", "pink"),
    ("زهري", "pink"),
    ("violette", "purple"),
    ("mauve", "lilac"),
    ("موف", "lilac"),
    ("rouge bordeaux", "burgundy"),
    ("خمري", "burgundy"),
    ("dorée", "gold"),
    ("argent", "silver"),
    ("argentée", "silver"),
    ("bleu turquoise", "turquoise"),
    ("vert menthe", "mint"),
    ("multi", "multicolor"),
    ("ملون", "multicolor"),
];

/// English spelling variants, mapped to base color keys.
pub static ENGLISH_SYNONYMS: &[(&str, &str)] = &[
    ("gray", "grey"),
    ("fuschia", "fuchsia"),
    ("golden", "gold"),
    ("silvery", "silver"),
    ("maroon", "burgundy"),
    ("wine", "burgundy"),
    ("tan", "camel"),
    ("offwhite", "ivory"),
    ("violet", "purple"),
    ("lavender", "lilac"),
    ("multicolour", "multicolor"),
    ("multi colored", "multicolor"),
    ("skyblue", "sky-blue"),
];

/// Modifier spellings in all three languages.
pub static MODIFIER_TOKENS: &[(&str, ColorModifier)] = &[
    ("light", ColorModifier::Light),
    ("pale", ColorModifier::Light),
    ("clair", ColorModifier::Light),
    ("claire", ColorModifier::Light),
    ("فاتح", ColorModifier::Light),
    ("dark", ColorModifier::Dark),
    ("deep", ColorModifier::Dark),
    ("foncé", ColorModifier::Dark),
    ("foncée", ColorModifier::Dark),
    ("داكن", ColorModifier::Dark),
    ("غامق", ColorModifier::Dark),
    ("matte", ColorModifier::Matte),
    ("matt", ColorModifier::Matte),
    ("mat", ColorModifier::Matte),
    ("mate", ColorModifier::Matte),
    ("مطفي", ColorModifier::Matte),
    ("glossy", ColorModifier::Glossy),
    ("gloss", ColorModifier::Glossy),
    ("shiny", ColorModifier::Glossy),
    ("brillant", ColorModifier::Glossy),
    ("brillante", ColorModifier::Glossy),
    ("لامع", ColorModifier::Glossy),
];

pub fn base_by_key(key: &str) -> Option<&'static BaseColor> {
    BASE_COLORS.iter().find(|c| c.key == key)
}
