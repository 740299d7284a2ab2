//! Keyword relevance filter with a context window

use tracing::debug;

/// Result of relevance filtering
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceOutcome {
    /// Filtered text (the original text when nothing matched)
    pub text: String,

    /// Lines that contained a keyword
    pub matched_lines: usize,

    /// Lines kept, including context lines
    pub kept_lines: usize,

    /// True when no line matched and the input was passed through unchanged
    pub fell_back: bool,
}

/// Keeps lines mentioning product vocabulary plus their neighbours
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    keywords: Vec<String>,
    window: usize,
}

impl RelevanceFilter {
    /// Create a filter; keywords are matched case-insensitively
    pub fn new(keywords: &[String], window: usize) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords, window }
    }

    /// Whether `line` contains any keyword
    pub fn is_relevant(&self, line: &str) -> bool {
        let line = line.to_lowercase();
        self.keywords.iter().any(|k| line.contains(k.as_str()))
    }

    /// Keep relevant lines and `window` lines on either side of each
    ///
    /// Every source line appears at most once and in its original
    /// position; identical lines at different positions are all kept.
    pub fn filter(&self, text: &str) -> RelevanceOutcome {
        let lines: Vec<&str> = text.lines().collect();
        let mut keep = vec![false; lines.len()];
        let mut matched_lines = 0;

        for (i, line) in lines.iter().enumerate() {
            if self.is_relevant(line) {
                matched_lines += 1;
                let start = i.saturating_sub(self.window);
                let end = (i + self.window).min(lines.len() - 1);
                keep[start..=end].iter_mut().for_each(|k| *k = true);
            }
        }

        if matched_lines == 0 {
            debug!("No relevant lines among {}, keeping full text", lines.len());
            return RelevanceOutcome {
                text: text.to_string(),
                matched_lines: 0,
                kept_lines: lines.len(),
                fell_back: true,
            };
        }

        let kept: Vec<&str> = lines
            .iter()
            .zip(&keep)
            .filter(|(_, &k)| k)
            .map(|(line, _)| *line)
            .collect();
        debug!(
            "Relevance filter kept {} of {} lines ({} matched)",
            kept.len(),
            lines.len(),
            matched_lines
        );

        RelevanceOutcome {
            text: kept.join("\n"),
            matched_lines,
            kept_lines: kept.len(),
            fell_back: false,
        }
    }
}
