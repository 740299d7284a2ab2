//! Default keyword vocabulary for packaging product documents

/// Physical product nouns
const PRODUCT_NOUNS: &[&str] = &[
    "bottle", "jar", "box", "bag", "pouch", "container", "tube", "can", "cup", "lid", "cap",
    "closure", "carton", "tray", "sachet", "label", "film", "wrap", "mailer", "envelope",
    "packaging", "package", "pump", "sprayer", "dropper", "vial", "tin", "crate", "pallet",
    "sleeve", "clamshell", "blister", "bucket", "pail", "drum", "tub",
];

/// Units of measure
const UNITS: &[&str] = &[
    "ml", "ltr", "litre", "liter", "oz", "gsm", "mm", "cm", "inch", "kg", "gram", "micron",
    "mic", "lbs", "pcs", "pieces", "units",
];

/// Material names
const MATERIALS: &[&str] = &[
    "pet", "hdpe", "ldpe", "pp", "pvc", "pla", "glass", "aluminum", "aluminium", "paper",
    "kraft", "cardboard", "corrugated", "plastic", "bamboo", "bagasse", "tinplate", "steel",
    "foam", "biodegradable", "compostable", "recycled", "material",
];

/// Pricing tokens
const PRICING: &[&str] = &[
    "price", "usd", "$", "€", "£", "moq", "minimum order", "per unit", "cost", "fob", "exw",
    "quote", "wholesale",
];

/// Specification and dimension tokens
const SPECIFICATIONS: &[&str] = &[
    "size", "dimension", "capacity", "volume", "weight", "height", "width", "length",
    "diameter", "thickness", "neck", "spec", "model", "sku",
];

/// Certification tokens
const CERTIFICATIONS: &[&str] = &[
    "fda", "iso", "brc", "fsc", "sgs", "bpa", "food grade", "food-grade", "certified", "reach",
    "rohs", "certification",
];

/// Color and finish tokens
const COLORS_AND_FINISHES: &[&str] = &[
    "color", "colour", "clear", "transparent", "amber", "frosted", "matte", "glossy", "printed",
    "embossed", "finish", "white", "black", "custom",
];

/// High-signal subset used to order chunks
const PRIORITY: &[&str] = &[
    "product", "bottle", "jar", "box", "bag", "pouch", "container", "price", "moq", "capacity",
    "material", "ml", "size", "specification",
];

/// Full relevance-filter vocabulary
pub fn default_relevance_keywords() -> Vec<String> {
    [
        PRODUCT_NOUNS,
        UNITS,
        MATERIALS,
        PRICING,
        SPECIFICATIONS,
        CERTIFICATIONS,
        COLORS_AND_FINISHES,
    ]
    .iter()
    .flat_map(|group| group.iter())
    .map(|keyword| keyword.to_string())
    .collect()
}

/// Smaller high-signal vocabulary for chunk prioritization
pub fn default_priority_keywords() -> Vec<String> {
    PRIORITY.iter().map(|keyword| keyword.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercase() {
        for keyword in default_relevance_keywords()
            .iter()
            .chain(default_priority_keywords().iter())
        {
            assert_eq!(keyword, &keyword.to_lowercase());
        }
    }

    #[test]
    fn test_priority_is_smaller_than_relevance() {
        assert!(default_priority_keywords().len() < default_relevance_keywords().len());
    }
}
