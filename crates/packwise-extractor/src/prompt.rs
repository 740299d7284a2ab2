//! Prompt construction for product extraction

/// System prompt: role, output schema and rules
pub const SYSTEM_PROMPT: &str = r#"You are a product data specialist for a B2B packaging marketplace.
You read supplier documents (price lists, spec sheets, catalog decks) and turn
them into structured product listings.

Respond with a single JSON object and nothing else:

{
  "products": [
    {
      "name": "string, required",
      "category": "string, required (e.g. Bottles, Jars, Boxes, Bags, Pouches, Labels)",
      "description": "string",
      "specifications": {
        "material": "string",
        "capacity": "string with unit, e.g. 250ml",
        "dimensions": {"length": 0, "width": 0, "height": 0, "unit": "mm"},
        "weight": "string",
        "color": "string",
        "finish": "string",
        "closureType": "string"
      },
      "pricing": {
        "currency": "USD",
        "unitPrice": 0.0,
        "moq": 0,
        "priceTiers": [{"minQuantity": 0, "unitPrice": 0.0}]
      },
      "sustainability": {
        "recyclable": false,
        "biodegradable": false,
        "compostable": false,
        "recycledContentPercent": 0,
        "locallySourced": false,
        "carbonNeutral": false
      },
      "categoryFilters": {"filterName": ["value"]},
      "commonFilters": {"materials": [], "colors": [], "industries": [], "ecoFeatures": []},
      "customization": {"available": false, "options": [], "minQuantity": 0},
      "features": ["string"],
      "certifications": ["string"],
      "images": ["url"]
    }
  ],
  "summary": {"processingNotes": "string"}
}

Rules:
- Only include products that are explicitly described in the text.
- Every product needs a name and a category; omit any field you cannot find.
- Never invent prices, quantities or certifications.
- Rows that repeat the same product describe one product.
- Use processingNotes for anything the reviewer should know (ambiguous rows,
  missing prices, unreadable sections).
- If the text contains no products, return {"products": [], "summary":
  {"processingNotes": "No products found"}}."#;

/// Builds the user prompt for one chunk of a document
pub struct PromptBuilder {
    text: String,
    filename: String,
    part: Option<(usize, usize)>,
    known_categories: Vec<String>,
}

impl PromptBuilder {
    /// Create a prompt for `text` taken from `filename`
    pub fn new(text: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            filename: filename.into(),
            part: None,
            known_categories: Vec::new(),
        }
    }

    /// Mark the text as part `position` (1-based) of `total`
    pub fn with_part(mut self, position: usize, total: usize) -> Self {
        if total > 1 {
            self.part = Some((position, total));
        }
        self
    }

    /// Categories already used in the catalog, to keep naming consistent
    pub fn with_known_categories(mut self, categories: Vec<String>) -> Self {
        self.known_categories = categories;
        self
    }

    /// Build the user prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(&format!("Document: {}\n", self.filename));
        if let Some((position, total)) = self.part {
            prompt.push_str(&format!(
                "This is part {} of {} of the document. Extract only the products in this part.\n",
                position, total
            ));
        }

        if !self.known_categories.is_empty() {
            prompt.push_str("Existing catalog categories (reuse these names when they fit):\n");
            for category in self.known_categories.iter().take(30) {
                prompt.push_str(&format!("- {}\n", category));
            }
        }

        prompt.push_str("\nText to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(&self.text);
        prompt.push_str("\n---\n\n");
        prompt.push_str("Return the JSON object now.");

        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_text_and_filename() {
        let prompt = PromptBuilder::new("Bottle A | HDPE | 250ml", "catalog.xlsx").build();
        assert!(prompt.contains("Document: catalog.xlsx"));
        assert!(prompt.contains("Bottle A | HDPE | 250ml"));
        assert!(!prompt.contains("This is part"));
    }

    #[test]
    fn test_prompt_part_marker() {
        let prompt = PromptBuilder::new("text", "deck.pptx").with_part(2, 5).build();
        assert!(prompt.contains("part 2 of 5"));

        let single = PromptBuilder::new("text", "deck.pptx").with_part(1, 1).build();
        assert!(!single.contains("part 1 of 1"));
    }

    #[test]
    fn test_prompt_known_categories() {
        let prompt = PromptBuilder::new("text", "a.pdf")
            .with_known_categories(vec!["Bottles".to_string(), "Jars".to_string()])
            .build();
        assert!(prompt.contains("- Bottles\n- Jars\n"));
    }

    #[test]
    fn test_system_prompt_describes_schema() {
        assert!(SYSTEM_PROMPT.contains("\"products\""));
        assert!(SYSTEM_PROMPT.contains("processingNotes"));
    }
}
