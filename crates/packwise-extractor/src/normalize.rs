//! Noise removal for extracted text

use crate::config::NoisePattern;
use crate::error::ExtractorError;
use regex::Regex;

/// Default noise patterns, applied in order
const DEFAULT_NOISE: &[(&str, &str)] = &[
    // Bracketed annotations on a single line: [1], [citation needed]
    (r"\[[^\[\]\n]*\]", ""),
    (r"\(\s*\)", ""),
    (r"\{\s*\}", ""),
    // Page artifacts on their own line
    (r"(?im)^[ \t]*page[ \t]+\d+(?:[ \t]+of[ \t]+\d+)?[ \t]*$", ""),
    (r"-{3,}", "---"),
    (r"={3,}", "==="),
    (r"\.{3,}", "..."),
    (r"\|{2,}", "|"),
    (r"&(?:[a-zA-Z][a-zA-Z0-9]{1,31}|#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6});", ""),
    (r"\n(?:[ \t]*\n)+", "\n"),
];

/// Default noise patterns as configuration values
pub fn default_noise_patterns() -> Vec<NoisePattern> {
    DEFAULT_NOISE
        .iter()
        .map(|(pattern, replacement)| NoisePattern::new(*pattern, *replacement))
        .collect()
}

/// Applies an ordered set of noise patterns until the text stops changing
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    rules: Vec<(Regex, String)>,
}

impl TextNormalizer {
    /// Compile `patterns`; an invalid regex is a configuration error
    pub fn new(patterns: &[NoisePattern]) -> Result<Self, ExtractorError> {
        let rules = patterns
            .iter()
            .map(|noise| {
                Regex::new(&noise.pattern)
                    .map(|regex| (regex, noise.replacement.clone()))
                    .map_err(|e| {
                        ExtractorError::Config(format!(
                            "invalid noise pattern '{}': {}",
                            noise.pattern, e
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Normalizer with the default noise patterns
    pub fn with_defaults() -> Result<Self, ExtractorError> {
        Self::new(&default_noise_patterns())
    }

    /// Remove noise from `text`
    ///
    /// The whole pattern set is re-applied until a pass changes nothing, so
    /// `normalize(normalize(t)) == normalize(t)`. A pass that does not
    /// shrink the text ends the loop as well; caller-supplied patterns
    /// that grow the text cannot loop forever.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = text.to_string();
        loop {
            let next = self.apply_once(&current);
            if next.len() >= current.len() {
                return next;
            }
            current = next;
        }
    }

    fn apply_once(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, (regex, replacement)| {
                regex.replace_all(&acc, replacement.as_str()).into_owned()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::with_defaults().unwrap()
    }

    #[test]
    fn test_removes_bracketed_annotations() {
        assert_eq!(normalizer().normalize("Bottle A [ref 3] HDPE"), "Bottle A  HDPE");
    }

    #[test]
    fn test_nested_brackets_removed_by_iteration() {
        assert_eq!(normalizer().normalize("Jar [outer [inner] tail] 250ml"), "Jar  250ml");
    }

    #[test]
    fn test_removes_empty_groups() {
        assert_eq!(normalizer().normalize("Box ( ) {}\tKraft"), "Box  \tKraft");
    }

    #[test]
    fn test_collapses_runs() {
        let text = "Name------Price\n=======\nSee.......\nA |||| B";
        assert_eq!(normalizer().normalize(text), "Name---Price\n===\nSee...\nA | B");
    }

    #[test]
    fn test_removes_entities() {
        assert_eq!(normalizer().normalize("PET&nbsp;Bottle &#169; &#x2122;"), "PETBottle  ");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(normalizer().normalize("Bottle\n\n   \n\nJar"), "Bottle\nJar");
    }

    #[test]
    fn test_removes_page_artifacts() {
        let text = "Bottle A\nPage 3 of 10\nJar B\n  page 4  \nBox C";
        assert_eq!(normalizer().normalize(text), "Bottle A\nJar B\nBox C");
    }

    #[test]
    fn test_page_inside_sentence_is_kept() {
        let text = "See page 3 for pricing";
        assert_eq!(normalizer().normalize(text), text);
    }

    #[test]
    fn test_idempotent_on_tricky_input() {
        let text = "a [b] (\n) c\n\n\n---- &amp;&amp; d ||| ....";
        let once = normalizer().normalize(text);
        assert_eq!(normalizer().normalize(&once), once);
    }

    #[test]
    fn test_growing_pattern_terminates() {
        let normalizer = TextNormalizer::new(&[NoisePattern::new("a", "aa")]).unwrap();
        assert_eq!(normalizer.normalize("a"), "aa");
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let result = TextNormalizer::new(&[NoisePattern::new("(", "")]);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }
}
