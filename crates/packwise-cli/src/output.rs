//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use packwise_extractor::{ExtractionOutcome, ExtractionPlan, ProductCandidate};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format an extraction outcome.
    pub fn format_outcome(&self, outcome: &ExtractionOutcome) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Table => self.format_outcome_table(outcome),
            OutputFormat::Quiet => Ok(outcome
                .products
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_outcome_table(&self, outcome: &ExtractionOutcome) -> Result<String> {
        let mut out = String::new();

        if outcome.products.is_empty() {
            out.push_str(&self.colorize("No products found.", "yellow"));
        } else {
            out.push_str(&self.products_table(&outcome.products));
        }
        out.push('\n');

        let metadata = &outcome.metadata;
        out.push_str(&format!(
            "\n{} product(s) in {} chunk(s), {} failed, {} ms ({})\n",
            outcome.summary.total_products,
            metadata.chunk_count,
            metadata.failed_chunks,
            metadata.processing_time_ms,
            metadata.model_name
        ));

        if !outcome.summary.processing_notes.is_empty() {
            out.push_str("\nNotes:\n");
            for note in outcome.summary.processing_notes.lines() {
                out.push_str(&format!("  {}\n", note));
            }
        }

        Ok(out)
    }

    fn products_table(&self, products: &[ProductCandidate]) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Name", "Category", "Material", "Capacity", "Price", "MOQ", "Eco", "Similar"]);

        for product in products {
            let capacity = product
                .specifications
                .capacity
                .as_ref()
                .map(|c| c.to_string())
                .unwrap_or_default();
            let price = product
                .pricing
                .unit_price
                .map(|p| format!("{:.2} {}", p, product.pricing.currency))
                .unwrap_or_default();
            let moq = product.pricing.moq.map(|m| m.to_string()).unwrap_or_default();
            let similar = product
                .similar_products
                .first()
                .map(|s| format!("{} ({:.2})", s.name, s.score))
                .unwrap_or_default();

            builder.push_record([
                product.name.clone(),
                product.category.clone(),
                product.material().unwrap_or_default().to_string(),
                capacity,
                price,
                moq,
                product.eco_score.overall.to_string(),
                similar,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a chunking plan.
    pub fn format_plan(&self, plan: &ExtractionPlan, show_text: bool) -> Result<String> {
        let prepared = &plan.prepared;
        if let OutputFormat::Json = self.format {
            let chunks: Vec<serde_json::Value> = prepared
                .chunks
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "index": c.index,
                        "lines": c.lines.len(),
                        "estimatedTokens": c.estimated_tokens,
                        "relevance": c.relevance,
                    })
                })
                .collect();
            return Ok(serde_json::to_string_pretty(&serde_json::json!({
                "extractor": plan.extracted.extractor,
                "placeholder": plan.extracted.placeholder,
                "extractedLines": plan.extracted.lines.len(),
                "normalizedChars": prepared.normalized.chars().count(),
                "matchedLines": prepared.relevance.matched_lines,
                "keptLines": prepared.relevance.kept_lines,
                "fellBack": prepared.relevance.fell_back,
                "estimatedTokens": prepared.estimated_tokens(),
                "chunks": chunks,
            }))?);
        }

        let mut out = String::new();
        if plan.extracted.placeholder {
            out.push_str(&self.warning(&plan.extracted.text()));
            out.push('\n');
        }
        out.push_str(&format!(
            "Extractor: {}, {} line(s), {} chars after normalization\n",
            plan.extracted.extractor,
            plan.extracted.lines.len(),
            prepared.normalized.chars().count()
        ));
        out.push_str(&format!(
            "Relevance: {} matched, {} kept{}\n",
            prepared.relevance.matched_lines,
            prepared.relevance.kept_lines,
            if prepared.relevance.fell_back {
                " (no keywords, full text kept)"
            } else {
                ""
            }
        ));
        out.push_str(&format!("Estimated tokens: {}\n\n", prepared.estimated_tokens()));

        let mut builder = Builder::default();
        builder.push_record(["Order", "Chunk", "Lines", "Tokens", "Relevance"]);
        for (order, chunk) in prepared.chunks.iter().enumerate() {
            builder.push_record([
                (order + 1).to_string(),
                (chunk.index + 1).to_string(),
                chunk.lines.len().to_string(),
                chunk.estimated_tokens.to_string(),
                chunk.relevance.to_string(),
            ]);
        }
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        out.push_str(&table.to_string());
        out.push('\n');

        if show_text {
            for chunk in &prepared.chunks {
                out.push_str(&format!(
                    "\n{}\n{}\n",
                    self.colorize(&format!("--- chunk {} ---", chunk.index + 1), "cyan"),
                    chunk.text()
                ));
            }
        }

        Ok(out)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
