//! Parse LLM output into product candidates
//!
//! Models wrap their JSON in prose, markdown fences or apologies, and fill
//! the schema unevenly. Parsing therefore happens in three steps: locate the
//! first balanced JSON value, check the required fields, then coerce and
//! default everything else.

use crate::eco::{compute_eco_score, StatedEcoScore};
use crate::error::ExtractorError;
use crate::types::{
    Capacity, CategoryFilters, CommonFilters, Customization, Dimensions, PriceTier, Pricing,
    ProductCandidate, Specifications, Sustainability,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Note used when the model declines or finds nothing
pub const NO_PRODUCTS_NOTE: &str = "No product information found in the provided text.";

/// Note used when the response holds no complete JSON value
pub const NO_JSON_NOTE: &str =
    "The model response did not contain a complete JSON object; no products were extracted.";

/// Phrases that mark a refusal or apology
const REFUSAL_PHRASES: &[&str] = &[
    "sorry",
    "i apologize",
    "i cannot",
    "i can't",
    "i can not",
    "i am unable",
    "i'm unable",
    "unable to find",
    "unable to extract",
    "as an ai",
    "no product information",
];

/// Candidate JSON values tried before giving up
const MAX_JSON_CANDIDATES: usize = 64;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"-?\d+(?:\.\d+)?").unwrap());
static DIMENSIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*[x×*]\s*(\d+(?:\.\d+)?)(?:\s*[x×*]\s*(\d+(?:\.\d+)?))?\s*([a-z]+)?")
        .unwrap()
});

/// Products and notes parsed from one model response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedResponse {
    /// Validated, fully defaulted candidates in response order
    pub products: Vec<ProductCandidate>,

    /// The model's processing notes (or an explanatory note)
    pub notes: String,

    /// One entry per product that needed defaults: `(index in products, sections)`
    pub defaulted: Vec<(usize, Vec<&'static str>)>,
}

impl ParsedResponse {
    fn empty(notes: &str) -> Self {
        Self {
            products: Vec::new(),
            notes: notes.to_string(),
            defaulted: Vec::new(),
        }
    }
}

/// Parse a raw model response
///
/// Returns an empty result (not an error) for refusals and for responses
/// without any JSON. A JSON value that is present but malformed, or a
/// product without a usable `name` or `category`, is an error.
pub fn parse_llm_response(raw: &str) -> Result<ParsedResponse, ExtractorError> {
    let located = match locate_json(raw)? {
        Some(located) => located,
        None => {
            if contains_refusal(raw) {
                debug!("Response is a refusal without JSON");
                return Ok(ParsedResponse::empty(NO_PRODUCTS_NOTE));
            }
            warn!("No JSON found in response ({} chars)", raw.len());
            return Ok(ParsedResponse::empty(NO_JSON_NOTE));
        }
    };

    let outside = format!("{} {}", &raw[..located.start], &raw[located.end..]);
    if contains_refusal(&outside) {
        debug!("Response text around the JSON is a refusal");
        return Ok(ParsedResponse::empty(NO_PRODUCTS_NOTE));
    }

    let (entries, notes) = split_envelope(located.value)?;

    let mut products = Vec::with_capacity(entries.len());
    let mut defaulted = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        let (product, sections) = parse_product(index, entry)?;
        if !sections.is_empty() {
            defaulted.push((index, sections));
        }
        products.push(product);
    }

    let notes = match notes {
        Some(notes) if !notes.trim().is_empty() => notes.trim().to_string(),
        _ if products.is_empty() => NO_PRODUCTS_NOTE.to_string(),
        _ => format!("Extracted {} product(s).", products.len()),
    };

    debug!("Parsed {} product candidates", products.len());
    Ok(ParsedResponse {
        products,
        notes,
        defaulted,
    })
}

fn contains_refusal(text: &str) -> bool {
    let lower = text.to_lowercase().replace('’', "'");
    REFUSAL_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// A JSON value found in a larger text
struct LocatedJson {
    start: usize,
    end: usize,
    value: Value,
}

/// Find the first balanced `{..}` or `[..]` span that parses as JSON
///
/// `Ok(None)` when no balanced span exists. When balanced spans exist but
/// none parses, the error for the first object-shaped span is returned.
/// Spans nested inside one that failed to parse are never tried on their own.
fn locate_json(text: &str) -> Result<Option<LocatedJson>, ExtractorError> {
    let mut first_error: Option<String> = None;
    let mut attempts = 0;
    // Brackets inside a span that failed to parse belong to that span
    let mut skip_until = 0;

    for (start, c) in text.char_indices() {
        if start < skip_until || (c != '{' && c != '[') {
            continue;
        }
        let Some(end) = balanced_end(text, start) else {
            continue;
        };

        attempts += 1;
        match serde_json::from_str::<Value>(&text[start..end]) {
            Ok(value) if is_product_shaped(&value) => {
                return Ok(Some(LocatedJson { start, end, value }));
            }
            Ok(_) => {}
            Err(e) => {
                let span = &text[start..end];
                if first_error.is_none() && (c == '{' || span[1..].contains('{')) {
                    first_error = Some(e.to_string());
                }
                skip_until = end;
            }
        }

        if attempts >= MAX_JSON_CANDIDATES {
            break;
        }
    }

    match first_error {
        Some(e) => Err(ExtractorError::InvalidFormat(format!("JSON parse error: {}", e))),
        None => Ok(None),
    }
}

/// Object, or array that is empty or holds objects
fn is_product_shaped(value: &Value) -> bool {
    match value {
        Value::Object(_) => true,
        Value::Array(items) => items.is_empty() || items.iter().any(Value::is_object),
        _ => false,
    }
}

/// Byte offset just past the bracket closing the one at `start`
///
/// Brackets inside string literals (with escapes) are ignored.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' | '[' => depth += 1,
            '}' | ']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(start + offset + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Accept `{products, summary}`, a bare array, or a single product
fn split_envelope(value: Value) -> Result<(Vec<Value>, Option<String>), ExtractorError> {
    match value {
        Value::Array(items) => Ok((items, None)),
        Value::Object(mut map) => {
            let notes = map.get("summary").and_then(summary_notes).or_else(|| {
                field(&map, &["processingNotes", "processing_notes", "notes"]).and_then(as_text)
            });
            if let Some(products) = map.remove("products") {
                match products {
                    Value::Array(items) => Ok((items, notes)),
                    Value::Null => Ok((Vec::new(), notes)),
                    other => Err(ExtractorError::InvalidFormat(format!(
                        "'products' must be an array, found {}",
                        type_name(&other)
                    ))),
                }
            } else if map.contains_key("name") || map.contains_key("category") {
                Ok((vec![Value::Object(map)], notes))
            } else {
                Ok((Vec::new(), notes))
            }
        }
        other => Err(ExtractorError::InvalidFormat(format!(
            "Expected a JSON object or array, found {}",
            type_name(&other)
        ))),
    }
}

fn summary_notes(summary: &Value) -> Option<String> {
    match summary {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => {
            field(map, &["processingNotes", "processing_notes", "notes"]).and_then(as_text)
        }
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// First non-null value among `keys`
fn field<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn required_text(
    map: &Map<String, Value>,
    index: usize,
    name: &str,
) -> Result<String, ExtractorError> {
    match map.get(name) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(ExtractorError::Validation(format!(
            "product {}: '{}' is blank",
            index, name
        ))),
        Some(other) if !other.is_null() => Err(ExtractorError::Validation(format!(
            "product {}: '{}' must be a string, found {}",
            index,
            name,
            type_name(other)
        ))),
        _ => Err(ExtractorError::Validation(format!(
            "product {}: missing '{}'",
            index, name
        ))),
    }
}

/// Validate and default one product entry
fn parse_product(
    index: usize,
    entry: &Value,
) -> Result<(ProductCandidate, Vec<&'static str>), ExtractorError> {
    let map = entry.as_object().ok_or_else(|| {
        ExtractorError::Validation(format!(
            "product {}: expected an object, found {}",
            index,
            type_name(entry)
        ))
    })?;

    let name = required_text(map, index, "name")?;
    let category = required_text(map, index, "category")?;
    let mut product = ProductCandidate::new(name, category);
    let mut defaulted = Vec::new();

    match field(map, &["description"]).and_then(as_text) {
        Some(description) => product.description = description,
        None => defaulted.push("description"),
    }

    match field(map, &["specifications", "specs"]) {
        Some(Value::Object(specs)) => product.specifications = parse_specifications(specs, map),
        _ => {
            defaulted.push("specifications");
            product.specifications = parse_specifications(&Map::new(), map);
        }
    }

    match field(map, &["pricing"]) {
        Some(Value::Object(pricing)) => product.pricing = parse_pricing(pricing),
        _ => match field(map, &["price", "unitPrice", "unit_price"]).and_then(as_f64) {
            Some(price) => product.pricing.unit_price = Some(price),
            None => defaulted.push("pricing"),
        },
    }

    match field(map, &["sustainability"]) {
        Some(Value::Object(flags)) => product.sustainability = parse_sustainability(flags),
        _ => defaulted.push("sustainability"),
    }

    let stated = match field(map, &["ecoScore", "eco_score"]) {
        Some(Value::Object(score)) => parse_stated_eco(score),
        _ => StatedEcoScore::default(),
    };
    if stated.is_empty() {
        defaulted.push("ecoScore");
    }

    let filter_values = field(map, &["categoryFilters", "category_filters"]).and_then(as_filter_map);
    if filter_values.is_none() {
        defaulted.push("categoryFilters");
    }
    product.category_filters =
        CategoryFilters::from_map(&product.category, filter_values.unwrap_or_default());

    match field(map, &["commonFilters", "common_filters"]).and_then(as_filter_map) {
        Some(values) => product.common_filters = CommonFilters::from_map(values),
        None => defaulted.push("commonFilters"),
    }

    match field(map, &["customization", "customisation"]) {
        Some(Value::Object(custom)) => product.customization = parse_customization(custom),
        Some(Value::Bool(available)) => product.customization.available = *available,
        _ => defaulted.push("customization"),
    }

    match field(map, &["features"]) {
        Some(value) => product.features = as_string_list(value),
        None => defaulted.push("features"),
    }
    match field(map, &["certifications"]) {
        Some(value) => product.certifications = as_string_list(value),
        None => defaulted.push("certifications"),
    }
    match field(map, &["images"]) {
        Some(value) => product.images = as_string_list(value),
        None => defaulted.push("images"),
    }

    let computed = compute_eco_score(product.material(), &product.sustainability);
    product.eco_score = stated.resolve(computed);

    Ok((product, defaulted))
}

fn parse_specifications(specs: &Map<String, Value>, product: &Map<String, Value>) -> Specifications {
    const KNOWN: &[&str] = &[
        "material",
        "capacity",
        "volume",
        "dimensions",
        "size",
        "weight",
        "color",
        "colour",
        "finish",
        "closureType",
        "closure_type",
        "closure",
    ];

    let lookup = |keys: &[&str]| field(specs, keys).or_else(|| field(product, keys));

    let mut additional = BTreeMap::new();
    for (key, value) in specs {
        if KNOWN.contains(&key.as_str()) {
            continue;
        }
        if let Some(text) = as_text(value) {
            additional.insert(key.clone(), text);
        }
    }

    Specifications {
        material: lookup(&["material"]).and_then(as_text),
        capacity: lookup(&["capacity", "volume"]).and_then(Capacity::from_json),
        dimensions: lookup(&["dimensions", "size"]).and_then(parse_dimensions),
        weight: lookup(&["weight"]).and_then(as_text),
        color: lookup(&["color", "colour"]).and_then(as_text),
        finish: lookup(&["finish"]).and_then(as_text),
        closure_type: lookup(&["closureType", "closure_type", "closure"]).and_then(as_text),
        additional,
    }
}

fn parse_dimensions(value: &Value) -> Option<Dimensions> {
    match value {
        Value::Object(map) => {
            let dimensions = Dimensions {
                length: field(map, &["length", "depth"]).and_then(as_f64),
                width: field(map, &["width", "diameter"]).and_then(as_f64),
                height: field(map, &["height"]).and_then(as_f64),
                unit: field(map, &["unit"])
                    .and_then(as_text)
                    .unwrap_or_else(|| "mm".to_string()),
            };
            let stated =
                dimensions.length.is_some() || dimensions.width.is_some() || dimensions.height.is_some();
            stated.then_some(dimensions)
        }
        Value::String(s) => {
            let caps = DIMENSIONS.captures(s)?;
            let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse().ok());
            Some(Dimensions {
                length: number(1),
                width: number(2),
                height: number(3),
                unit: caps
                    .get(4)
                    .map(|m| m.as_str().to_lowercase())
                    .unwrap_or_else(|| "mm".to_string()),
            })
        }
        _ => None,
    }
}

fn parse_pricing(map: &Map<String, Value>) -> Pricing {
    let mut pricing = Pricing::default();
    if let Some(currency) = field(map, &["currency"]).and_then(as_text) {
        pricing.currency = currency.to_uppercase();
    }
    pricing.unit_price = field(map, &["unitPrice", "unit_price", "price", "basePrice"]).and_then(as_f64);
    pricing.moq = field(
        map,
        &["moq", "minimumOrderQuantity", "minOrderQuantity", "min_order_quantity", "minimumOrder"],
    )
    .and_then(as_u64);

    if let Some(Value::Array(tiers)) = field(map, &["priceTiers", "price_tiers", "tiers"]) {
        pricing.price_tiers = tiers
            .iter()
            .filter_map(|tier| {
                let tier = tier.as_object()?;
                Some(PriceTier {
                    min_quantity: field(tier, &["minQuantity", "min_quantity", "quantity", "min"])
                        .and_then(as_u64)?,
                    unit_price: field(tier, &["unitPrice", "unit_price", "price"]).and_then(as_f64)?,
                })
            })
            .collect();
        pricing.price_tiers.sort_by_key(|tier| tier.min_quantity);
    }

    pricing
}

fn parse_sustainability(map: &Map<String, Value>) -> Sustainability {
    let flag = |keys: &[&str]| field(map, keys).and_then(as_bool).unwrap_or(false);
    Sustainability {
        recyclable: flag(&["recyclable"]),
        biodegradable: flag(&["biodegradable"]),
        compostable: flag(&["compostable"]),
        recycled_content_percent: field(
            map,
            &["recycledContentPercent", "recycled_content_percent", "recycledContent"],
        )
        .and_then(as_f64)
        .map(|p| p.clamp(0.0, 100.0)),
        locally_sourced: flag(&["locallySourced", "locally_sourced", "localSourcing"]),
        carbon_neutral: flag(&["carbonNeutral", "carbon_neutral"]),
    }
}

fn parse_stated_eco(map: &Map<String, Value>) -> StatedEcoScore {
    let score = |keys: &[&str]| {
        field(map, keys)
            .and_then(as_f64)
            .map(|v| v.round().clamp(0.0, 100.0) as u8)
    };
    StatedEcoScore {
        recyclability: score(&["recyclability"]),
        carbon_footprint: score(&["carbonFootprint", "carbon_footprint"]),
        sustainable_materials: score(&["sustainableMaterials", "sustainable_materials"]),
        local_sourcing: score(&["localSourcing", "local_sourcing"]),
    }
}

fn parse_customization(map: &Map<String, Value>) -> Customization {
    let options = field(map, &["options"]).map(as_string_list).unwrap_or_default();
    Customization {
        available: field(map, &["available"])
            .and_then(as_bool)
            .unwrap_or(!options.is_empty()),
        options,
        min_quantity: field(map, &["minQuantity", "min_quantity", "moq"]).and_then(as_u64),
    }
}

/// Scalars as trimmed text; empty strings count as absent
fn as_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Arrays of scalars, or a comma-separated string
fn as_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(as_text).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        other => as_text(other).into_iter().collect(),
    }
}

/// Numbers, or the first number in a string like `"$0.25 / pc"` or `"1,000"`
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned = s.replace(',', "");
            NUMBER.find(&cleaned)?.as_str().parse().ok()
        }
        _ => None,
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    as_f64(value)
        .filter(|v| *v >= 0.0)
        .map(|v| v.round() as u64)
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Object of list-ish values
fn as_filter_map(value: &Value) -> Option<BTreeMap<String, Vec<String>>> {
    let map = value.as_object()?;
    Some(
        map.iter()
            .map(|(key, value)| (key.clone(), as_string_list(value)))
            .filter(|(_, values)| !values.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_envelope() {
        let response = r#"{
            "products": [
                {
                    "name": "Bottle A",
                    "category": "Bottles",
                    "specifications": {"material": "HDPE", "capacity": "250ml"},
                    "pricing": {"unitPrice": "0.25", "moq": "10,000"}
                }
            ],
            "summary": {"processingNotes": "One product found"}
        }"#;

        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.notes, "One product found");

        let product = &parsed.products[0];
        assert_eq!(product.specifications.material.as_deref(), Some("HDPE"));
        assert_eq!(product.specifications.capacity, Some(Capacity::new(250.0, "ml")));
        assert_eq!(product.pricing.unit_price, Some(0.25));
        assert_eq!(product.pricing.moq, Some(10_000));
        assert_eq!(product.pricing.currency, "USD");
    }

    #[test]
    fn test_parse_markdown_fenced() {
        let response = "Here you go:\n```json\n[{\"name\": \"Jar B\", \"category\": \"Jars\"}]\n```";
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.products[0].name, "Jar B");
        assert_eq!(parsed.notes, "Extracted 1 product(s).");
    }

    #[test]
    fn test_parse_single_product_object() {
        let response = r#"{"name": "Mailer Box", "category": "Boxes"}"#;
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.products.len(), 1);
        assert_eq!(parsed.products[0].category_filters.kind(), "boxes");
    }

    #[test]
    fn test_prose_brackets_before_json_are_skipped() {
        let response = r#"Products [see below]: {"products": [{"name": "Tin", "category": "Tins"}]}"#;
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.products.len(), 1);
    }

    #[test]
    fn test_braces_inside_strings() {
        let response = r#"{"products": [{"name": "Cap {28/410}", "category": "Closures", "description": "fits \"}\" necks"}]}"#;
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.products[0].name, "Cap {28/410}");
        assert_eq!(parsed.products[0].description, "fits \"}\" necks");
    }

    #[test]
    fn test_refusal_without_json() {
        let parsed =
            parse_llm_response("Sorry, I cannot find any product information in this document.")
                .unwrap();
        assert!(parsed.products.is_empty());
        assert_eq!(parsed.notes, NO_PRODUCTS_NOTE);
    }

    #[test]
    fn test_refusal_around_json() {
        let response = r#"I apologize, but I am unable to identify products. {"products": [{"name": "X", "category": "Y"}]}"#;
        let parsed = parse_llm_response(response).unwrap();
        assert!(parsed.products.is_empty());
        assert_eq!(parsed.notes, NO_PRODUCTS_NOTE);
    }

    #[test]
    fn test_refusal_words_inside_json_are_fine() {
        let response = r#"{"products": [{"name": "Sorry-Proof Pouch", "category": "Pouches"}]}"#;
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.products.len(), 1);
    }

    #[test]
    fn test_no_json_is_empty_not_error() {
        let parsed = parse_llm_response("The document lists bottles.").unwrap();
        assert!(parsed.products.is_empty());
        assert_eq!(parsed.notes, NO_JSON_NOTE);
    }

    #[test]
    fn test_truncated_json_is_empty_not_error() {
        let parsed = parse_llm_response(r#"{"products": [{"name": "Bottle"#).unwrap();
        assert!(parsed.products.is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = parse_llm_response(r#"{"products": [{"name": 'Bottle', }]}"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_envelope_does_not_fall_back_to_nested_object() {
        let response = r#"{"products": [{"name": "Bottle A", "category": "Bottles",}], "summary": {"processingNotes": "1 product"}}"#;
        let result = parse_llm_response(response);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_malformed_bare_array_is_error() {
        let result = parse_llm_response(r#"[{"name": "Jar", "category": "Jars",}]"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_json_after_malformed_prose_braces_is_found() {
        let response = r#"Sizes {250ml, 500ml}: {"products": [{"name": "Tin", "category": "Tins"}]}"#;
        let parsed = parse_llm_response(response).unwrap();
        assert_eq!(parsed.products.len(), 1);
    }

    #[test]
    fn test_missing_name_is_validation_error() {
        let response = r#"[{"name": "Ok", "category": "Jars"}, {"category": "Jars"}]"#;
        match parse_llm_response(response) {
            Err(ExtractorError::Validation(message)) => {
                assert!(message.contains("product 1"));
                assert!(message.contains("name"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_category_is_validation_error() {
        let response = r#"[{"name": "Jar", "category": "  "}]"#;
        match parse_llm_response(response) {
            Err(ExtractorError::Validation(message)) => assert!(message.contains("category")),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_string_name_is_validation_error() {
        let response = r#"[{"name": 42, "category": "Jars"}]"#;
        assert!(matches!(
            parse_llm_response(response),
            Err(ExtractorError::Validation(_))
        ));
    }

    #[test]
    fn test_minimal_product_fully_defaulted() {
        let parsed = parse_llm_response(r#"[{"name": "Bag", "category": "Bags"}]"#).unwrap();
        let product = &parsed.products[0];

        assert_eq!(product.description, "");
        assert_eq!(product.pricing.currency, "USD");
        assert!(product.features.is_empty());
        assert!(product.certifications.is_empty());
        assert!(!product.customization.available);
        assert_eq!(product.category_filters.kind(), "bags");
        assert!(product.eco_score.overall > 0);

        let (index, sections) = &parsed.defaulted[0];
        assert_eq!(*index, 0);
        for section in ["description", "specifications", "pricing", "ecoScore", "images"] {
            assert!(sections.contains(&section), "missing {}", section);
        }
    }

    #[test]
    fn test_lenient_coercions() {
        let response = r#"[{
            "name": "Kraft Pouch",
            "category": "Pouches",
            "material": "Kraft paper",
            "price": "$0.18 / pc",
            "features": "zipper, window, tear notch",
            "certifications": ["FSC", 42],
            "sustainability": {"recyclable": "yes", "compostable": 1, "recycledContent": "30%"},
            "customization": {"options": ["print"]},
            "specifications": {"dimensions": "120 x 200 x 60 mm", "gsm": 120}
        }]"#;
        let parsed = parse_llm_response(response).unwrap();
        let product = &parsed.products[0];

        assert_eq!(product.specifications.material.as_deref(), Some("Kraft paper"));
        assert_eq!(product.pricing.unit_price, Some(0.18));
        assert_eq!(product.features, vec!["zipper", "window", "tear notch"]);
        assert_eq!(product.certifications, vec!["FSC", "42"]);
        assert!(product.sustainability.recyclable);
        assert!(product.sustainability.compostable);
        assert_eq!(product.sustainability.recycled_content_percent, Some(30.0));
        assert!(product.customization.available);
        assert_eq!(product.specifications.additional.get("gsm").map(String::as_str), Some("120"));

        let dimensions = product.specifications.dimensions.as_ref().unwrap();
        assert_eq!(dimensions.length, Some(120.0));
        assert_eq!(dimensions.height, Some(60.0));
        assert_eq!(dimensions.unit, "mm");
    }

    #[test]
    fn test_price_tiers_sorted() {
        let response = r#"[{"name": "Cup", "category": "Cups", "pricing": {"priceTiers": [
            {"minQuantity": 5000, "unitPrice": 0.08},
            {"minQuantity": 1000, "unitPrice": "0.10"},
            {"minQuantity": "bad"}
        ]}}]"#;
        let parsed = parse_llm_response(response).unwrap();
        let tiers = &parsed.products[0].pricing.price_tiers;
        assert_eq!(tiers.len(), 2);
        assert_eq!(tiers[0].min_quantity, 1000);
        assert_eq!(tiers[1].unit_price, 0.08);
    }

    #[test]
    fn test_stated_eco_score_overall_recomputed() {
        let response = r#"[{"name": "Glass Jar", "category": "Jars",
            "ecoScore": {"overall": 99, "recyclability": 80, "carbonFootprint": 40,
                         "sustainableMaterials": 40, "localSourcing": 40}}]"#;
        let parsed = parse_llm_response(response).unwrap();
        let score = parsed.products[0].eco_score;
        assert_eq!(score.recyclability, 80);
        assert_eq!(score.overall, 50);
        assert!(!parsed.defaulted[0].1.contains(&"ecoScore"));
    }

    #[test]
    fn test_empty_products_array() {
        let parsed = parse_llm_response(r#"{"products": [], "summary": {"processingNotes": "Nothing"}}"#)
            .unwrap();
        assert!(parsed.products.is_empty());
        assert_eq!(parsed.notes, "Nothing");
    }

    #[test]
    fn test_products_wrong_type() {
        let result = parse_llm_response(r#"{"products": "none"}"#);
        assert!(matches!(result, Err(ExtractorError::InvalidFormat(_))));
    }

    #[test]
    fn test_balanced_end() {
        assert_eq!(balanced_end("{\"a\": [1, 2]} tail", 0), Some(13));
        assert_eq!(balanced_end("{\"a\": \"}\"", 0), None);
        assert_eq!(balanced_end("[]", 0), Some(2));
    }
}
