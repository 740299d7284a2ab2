//! Integration tests for the ProductExtractor

#[cfg(test)]
mod tests {
    use crate::{
        Capacity, CancelHandle, CatalogProduct, CategoryFilters, DocumentRequest,
        ExtractorConfig, ExtractorError, ProductExtractor, NO_PRODUCTS_NOTE,
    };
    use packwise_domain::{CompletionRequest, DocumentFormat, LlmProvider, RawDocument};
    use packwise_llm::MockProvider;
    use std::io::{Cursor, Write};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use zip::write::SimpleFileOptions;
    use zip::{CompressionMethod, ZipWriter};

    const CATALOG_ROWS: &str = "Product | Material | Capacity | Price\n\
        Boston Round Bottle | PET | 250ml | 0.35\n\
        Boston Round Bottle | PET | 250ml | 0.35\n\
        Kraft Mailer Box | Corrugated | - | 1.20";

    const CATALOG_RESPONSE: &str = r#"{
        "products": [
            {
                "name": "Boston Round Bottle",
                "category": "bottles",
                "specifications": {"material": "PET", "capacity": "250ml"},
                "pricing": {"unitPrice": 0.35, "moq": 1000}
            },
            {
                "name": "boston round bottle ",
                "category": "Bottles",
                "pricing": {"unitPrice": 0.40}
            },
            {
                "name": "Kraft Mailer Box",
                "category": "boxes",
                "specifications": {"material": "Corrugated kraft"}
            }
        ],
        "summary": {"processingNotes": "Found 3 product rows"}
    }"#;

    fn product_json(name: &str, category: &str) -> String {
        format!(
            r#"{{"products": [{{"name": "{}", "category": "{}"}}]}}"#,
            name, category
        )
    }

    /// Small budget and no relevance filter, so each test line becomes a chunk
    fn chunked_config(budget: usize) -> ExtractorConfig {
        let mut config = ExtractorConfig::small_context();
        config.provider.token_budget = budget;
        config.relevance_filter_enabled = false;
        config
    }

    /// Slow provider recording the most calls it ever had in flight
    #[derive(Clone, Default)]
    struct InFlightProvider {
        in_flight: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
        delay: Duration,
    }

    impl LlmProvider for InFlightProvider {
        type Error = String;

        fn complete(&self, _request: &CompletionRequest) -> Result<String, String> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok("[]".to_string())
        }

        fn model_name(&self) -> &str {
            "in-flight"
        }
    }

    fn build_pptx(slides: &[&str]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for (i, text) in slides.iter().enumerate() {
            writer
                .start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            let xml = format!(
                r#"<?xml version="1.0"?><p:sld><p:cSld><p:spTree><p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#,
                text
            );
            writer.write_all(xml.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_full_extraction_flow() {
        let llm = MockProvider::new(CATALOG_RESPONSE);
        let extractor = ProductExtractor::new(llm.clone(), ExtractorConfig::small_context()).unwrap();

        let outcome = extractor
            .extract_from_text("catalog.xlsx", CATALOG_ROWS, &CancelHandle::new())
            .await
            .unwrap();

        assert_eq!(outcome.products.len(), 2);
        assert_eq!(outcome.summary.total_products, 2);
        assert_eq!(outcome.summary.categories, vec!["bottles", "boxes"]);

        let bottle = &outcome.products[0];
        assert_eq!(bottle.name, "Boston Round Bottle");
        assert_eq!(bottle.pricing.unit_price, Some(0.35));
        assert_eq!(bottle.pricing.moq, Some(1000));
        assert_eq!(bottle.specifications.capacity, Some(Capacity::new(250.0, "ml")));
        assert!(matches!(bottle.category_filters, CategoryFilters::Bottles(_)));
        assert!(matches!(
            outcome.products[1].category_filters,
            CategoryFilters::Boxes(_)
        ));

        let notes = &outcome.summary.processing_notes;
        assert!(notes.contains("Found 3 product rows"));
        assert!(notes.contains("Removed 1 duplicate"));
        assert!(notes.contains("Defaulted fields for 'Kraft Mailer Box'"));

        assert_eq!(llm.call_count(), 1);
        let request = &llm.requests()[0];
        assert!(request.user_prompt.contains("Boston Round Bottle | PET | 250ml | 0.35"));
        assert!(request.system_prompt.contains("JSON"));
        assert_eq!(outcome.metadata.failed_chunks, 0);
        assert_eq!(
            outcome.metadata.stages,
            vec![
                "received",
                "normalizing",
                "filtering",
                "chunking",
                "extracting(1/1)",
                "deduplicating",
                "complete"
            ]
        );
    }

    #[tokio::test]
    async fn test_extraction_with_refusal() {
        let llm = MockProvider::new("I'm sorry, but I cannot find any products in this text.");
        let extractor = ProductExtractor::new(llm, ExtractorConfig::default()).unwrap();

        let outcome = extractor
            .extract_from_text("letter.pdf", "Bottle A | HDPE | 100ml", &CancelHandle::new())
            .await
            .unwrap();

        assert!(outcome.products.is_empty());
        assert_eq!(outcome.summary.processing_notes, NO_PRODUCTS_NOTE);
        assert_eq!(outcome.metadata.failed_chunks, 0);
    }

    #[tokio::test]
    async fn test_extraction_with_malformed_json() {
        let llm = MockProvider::new(r#"{"products": [{"name": "Jar", "category": }]}"#);
        let extractor = ProductExtractor::new(llm, ExtractorConfig::default()).unwrap();

        let outcome = extractor
            .extract_from_text("jars.xlsx", "Jar | Glass | 50ml", &CancelHandle::new())
            .await
            .unwrap();

        assert!(outcome.products.is_empty());
        assert_eq!(outcome.metadata.failed_chunks, 1);
        assert!(outcome.summary.processing_notes.starts_with("Extraction failed:"));
    }

    #[tokio::test]
    async fn test_partial_chunk_failure() {
        let mut llm = MockProvider::new("[]");
        llm.add_response("alpha", product_json("Alpha Bottle", "bottles"));
        llm.add_error("gamma");
        llm.add_response("omega", product_json("Omega Jar", "jars"));
        let extractor = ProductExtractor::new(llm.clone(), chunked_config(5)).unwrap();

        let text = "alpha bottle row\ngamma bottle row\nomega bottle row";
        let outcome = extractor
            .extract_from_text("rows.xlsx", text, &CancelHandle::new())
            .await
            .unwrap();

        assert_eq!(llm.call_count(), 3);
        assert_eq!(outcome.metadata.chunk_count, 3);
        assert_eq!(outcome.metadata.failed_chunks, 1);

        let names: Vec<&str> = outcome.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha Bottle", "Omega Jar"]);

        let notes = &outcome.summary.processing_notes;
        assert!(notes.contains("Chunk 1/3: Extracted 1 product(s)."));
        assert!(notes.contains("Chunk 2/3 failed:"));
        assert!(notes.contains("Chunk 3/3: Extracted 1 product(s)."));
        assert!(llm.requests()[1].user_prompt.contains("This is part 2 of 3"));
    }

    #[tokio::test]
    async fn test_all_chunks_fail() {
        let mut llm = MockProvider::new("[]");
        llm.add_error("bottle row");
        let extractor = ProductExtractor::new(llm, chunked_config(5)).unwrap();

        let text = "alpha bottle row\ngamma bottle row\nomega bottle row";
        let outcome = extractor
            .extract_from_text("rows.xlsx", text, &CancelHandle::new())
            .await
            .unwrap();

        assert!(outcome.products.is_empty());
        assert_eq!(outcome.metadata.failed_chunks, 3);
        assert_eq!(outcome.summary.processing_notes.matches("failed:").count(), 3);
    }

    #[tokio::test]
    async fn test_chunks_processed_in_priority_order() {
        let llm = MockProvider::new("[]");
        let extractor = ProductExtractor::new(llm.clone(), chunked_config(10)).unwrap();

        let text = "Welcome to our annual company letter\nBottle 250ml PET bottle price list";
        let outcome = extractor
            .extract_from_text("deck.pdf", text, &CancelHandle::new())
            .await
            .unwrap();

        let requests = llm.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].user_prompt.contains("price list"));
        assert!(requests[0].user_prompt.contains("This is part 1 of 2"));
        assert!(requests[1].user_prompt.contains("Welcome"));

        // Notes follow processing order but keep document positions
        let notes = &outcome.summary.processing_notes;
        let second = notes.find("Chunk 2/2").unwrap();
        let first = notes.find("Chunk 1/2").unwrap();
        assert!(second < first);
    }

    #[tokio::test]
    async fn test_cancellation_between_chunks() {
        let llm = MockProvider::new("[]").with_delay(Duration::from_millis(300));
        let extractor = ProductExtractor::new(llm.clone(), chunked_config(5)).unwrap();
        let cancel = CancelHandle::new();

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let text = "alpha bottle row\ngamma bottle row\nomega bottle row";
        let outcome = extractor
            .extract_from_text("rows.xlsx", text, &cancel)
            .await
            .unwrap();

        assert_eq!(llm.call_count(), 1);
        assert!(outcome
            .summary
            .processing_notes
            .contains("Extraction cancelled: 2 of 3 chunk(s) skipped."));
        assert_eq!(outcome.metadata.stages.last().map(String::as_str), Some("complete"));
    }

    #[tokio::test]
    async fn test_cancelled_job_is_error() {
        let extractor = ProductExtractor::new(MockProvider::new("[]"), ExtractorConfig::default()).unwrap();
        let cancel = CancelHandle::new();
        cancel.cancel();

        let result = extractor.extract_from_text("a.txt", "Bottle", &cancel).await;
        assert!(matches!(result, Err(ExtractorError::Cancelled)));
    }

    #[tokio::test]
    async fn test_extraction_timeout() {
        let llm = MockProvider::new("[]").with_delay(Duration::from_millis(1500));
        let mut config = ExtractorConfig::small_context();
        config.extraction_timeout_secs = 1;
        let extractor = ProductExtractor::new(llm, config).unwrap();

        let outcome = extractor
            .extract_from_text("slow.xlsx", "Bottle A | HDPE", &CancelHandle::new())
            .await
            .unwrap();

        assert!(outcome.products.is_empty());
        assert_eq!(outcome.metadata.failed_chunks, 1);
        assert!(outcome
            .summary
            .processing_notes
            .contains("Extraction timeout after 1s"));
    }

    #[tokio::test]
    async fn test_timed_out_calls_never_overlap() {
        let llm = InFlightProvider {
            delay: Duration::from_millis(1200),
            ..Default::default()
        };
        let mut config = chunked_config(5);
        config.extraction_timeout_secs = 1;
        let extractor = ProductExtractor::new(llm.clone(), config).unwrap();

        let text = "alpha bottle row\ngamma bottle row\nomega bottle row";
        let outcome = extractor
            .extract_from_text("slow.xlsx", text, &CancelHandle::new())
            .await
            .unwrap();

        assert_eq!(outcome.metadata.chunk_count, 3);
        assert_eq!(outcome.metadata.failed_chunks, 3);
        assert_eq!(llm.peak.load(Ordering::SeqCst), 1);
        assert_eq!(llm.in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_defaulted_notes_follow_kept_duplicate() {
        let response = r#"[
            {"name": "Bottle A", "category": "bottles", "description": "HDPE bottle"},
            {"name": "Bottle A", "category": "bottles", "pricing": {"unitPrice": 0.2}},
            {"name": "bottle a ", "category": "Bottles", "features": ["leak proof"]}
        ]"#;
        let extractor =
            ProductExtractor::new(MockProvider::new(response), ExtractorConfig::default()).unwrap();

        let outcome = extractor
            .extract_from_text("bottles.xlsx", "Bottle A | HDPE | 250ml", &CancelHandle::new())
            .await
            .unwrap();

        assert_eq!(outcome.products.len(), 1);
        assert_eq!(outcome.products[0].description, "HDPE bottle");

        let notes = &outcome.summary.processing_notes;
        let defaulted: Vec<&str> = notes
            .lines()
            .filter(|line| line.starts_with("Defaulted fields for"))
            .collect();
        assert_eq!(defaulted.len(), 1);
        assert!(defaulted[0].starts_with("Defaulted fields for 'Bottle A':"));
        assert!(defaulted[0].contains("pricing"));
        assert!(!defaulted[0].contains("description"));
    }

    #[tokio::test]
    async fn test_slide_deck_end_to_end() {
        let mut llm = MockProvider::new("[]");
        llm.add_response("Amber Glass Jar", product_json("Amber Glass Jar", "jars"));
        let extractor = ProductExtractor::new(llm.clone(), ExtractorConfig::default()).unwrap();

        let bytes = build_pptx(&["Amber Glass Jar | 100ml | Glass", "Thank you for your time"]);
        let document = RawDocument::new(bytes, DocumentFormat::Slides, "launch.pptx");
        let outcome = extractor
            .extract_document(DocumentRequest::new(document))
            .await
            .unwrap();

        assert_eq!(outcome.products.len(), 1);
        assert_eq!(outcome.products[0].name, "Amber Glass Jar");
        assert_eq!(outcome.metadata.format, "slides");
        assert_eq!(outcome.metadata.filename, "launch.pptx");
        assert!(llm.requests()[0].user_prompt.contains("Document: launch.pptx"));
    }

    #[tokio::test]
    async fn test_similarity_annotation() {
        let llm = MockProvider::new(CATALOG_RESPONSE);
        let catalog = vec![
            CatalogProduct {
                id: "cat-1".to_string(),
                name: "Boston Round Bottle 250ml".to_string(),
                category: "bottles".to_string(),
                material: Some("PET".to_string()),
                capacity: Some(Capacity::new(250.0, "ml")),
            },
            CatalogProduct {
                id: "cat-2".to_string(),
                name: "Kraft Mailer".to_string(),
                category: "boxes".to_string(),
                material: None,
                capacity: None,
            },
        ];
        let extractor = ProductExtractor::new(llm.clone(), ExtractorConfig::small_context())
            .unwrap()
            .with_catalog(catalog);

        let outcome = extractor
            .extract_from_text("catalog.xlsx", CATALOG_ROWS, &CancelHandle::new())
            .await
            .unwrap();

        let bottle = &outcome.products[0];
        assert_eq!(bottle.similar_products.len(), 1);
        assert_eq!(bottle.similar_products[0].existing_product_id, "cat-1");
        assert!(bottle.similar_products[0].score > 0.8);

        let mailer = &outcome.products[1];
        assert_eq!(mailer.similar_products[0].existing_product_id, "cat-2");

        // Known categories are offered to the model
        assert!(llm.requests()[0].user_prompt.contains("- bottles\n"));
    }

    #[tokio::test]
    async fn test_request_catalog_overrides_extractor_catalog() {
        let llm = MockProvider::new(product_json("Amber Glass Jar", "jars"));
        let extractor = ProductExtractor::new(llm, ExtractorConfig::default()).unwrap();

        let bytes = build_pptx(&["Amber Glass Jar | 100ml | Glass"]);
        let document = RawDocument::new(bytes, DocumentFormat::Slides, "jars.pptx");
        let request = DocumentRequest::new(document).with_catalog(vec![CatalogProduct {
            id: "jar-9".to_string(),
            name: "Amber Glass Jar".to_string(),
            category: "jars".to_string(),
            material: None,
            capacity: None,
        }]);

        let outcome = extractor.extract_document(request).await.unwrap();
        assert_eq!(outcome.products[0].similar_products[0].existing_product_id, "jar-9");
        assert_eq!(outcome.products[0].similar_products[0].score, 1.0);
    }

    #[tokio::test]
    async fn test_extract_products_reports_per_chunk() {
        let mut llm = MockProvider::new("[]");
        llm.add_response("alpha", product_json("Alpha Bottle", "bottles"));
        let extractor = ProductExtractor::new(llm, chunked_config(5)).unwrap();

        let plan = extractor.plan_document(&RawDocument::new(
            build_pptx(&["alpha bottle row", "gamma bottle row"]),
            DocumentFormat::Slides,
            "plan.pptx",
        ));
        assert!(!plan.extracted.placeholder);
        assert!(plan.prepared.chunks.len() >= 2);

        let report = extractor
            .extract_products(&plan.prepared.chunks, "plan.pptx")
            .await;
        assert_eq!(report.attempted_chunks, plan.prepared.chunks.len());
        assert_eq!(report.failed_chunks, 0);
        assert_eq!(report.products.len(), 1);
        assert!(!report.cancelled);
    }
}
