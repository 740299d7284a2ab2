//! Product, catalog and outcome types for extraction
//!
//! Everything here serializes in camelCase; the HTTP layer in front of the
//! extractor returns these structures verbatim.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Physical dimension a capacity is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityDimension {
    /// Liquid volume (base unit: ml)
    Volume,
    /// Mass (base unit: g)
    Mass,
}

/// Nominal capacity of a container, e.g. `250 ml` or `1.5 kg`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capacity {
    /// Numeric amount
    pub value: f64,

    /// Lower-cased unit (`ml`, `l`, `cl`, `oz`, `g`, `kg`)
    pub unit: String,
}

impl Capacity {
    /// Create a capacity; the unit is lower-cased and trimmed
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into().trim().to_lowercase(),
        }
    }

    /// Parse a capacity from free text such as `"250ml"` or `"1.5 L"`
    ///
    /// A bare number is taken to be millilitres.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase().replace(',', "");
        let split = text
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(text.len());
        let (number, unit) = text.split_at(split);
        let value: f64 = number.parse().ok()?;
        let unit = unit.trim();
        let unit = match unit {
            "" => "ml",
            "ml" | "millilitre" | "milliliter" | "millilitres" | "milliliters" => "ml",
            "l" | "ltr" | "litre" | "liter" | "litres" | "liters" => "l",
            "cl" => "cl",
            "oz" | "fl oz" | "fl. oz" | "floz" => "oz",
            "g" | "gr" | "gram" | "grams" => "g",
            "kg" | "kgs" | "kilogram" | "kilograms" => "kg",
            _ => return None,
        };
        Some(Self::new(value, unit))
    }

    /// Interpret a JSON value: string, number (ml) or `{ value, unit }`
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Self::parse(s),
            serde_json::Value::Number(n) => n.as_f64().map(|v| Self::new(v, "ml")),
            serde_json::Value::Object(map) => {
                let amount = match map.get("value")? {
                    serde_json::Value::Number(n) => n.as_f64()?,
                    serde_json::Value::String(s) => s.trim().parse().ok()?,
                    _ => return None,
                };
                let unit = map.get("unit").and_then(|u| u.as_str()).unwrap_or("ml");
                Self::parse(&format!("{}{}", amount, unit))
            }
            _ => None,
        }
    }

    /// Dimension of this capacity, `None` for unknown units
    pub fn dimension(&self) -> Option<CapacityDimension> {
        match self.unit.as_str() {
            "ml" | "l" | "cl" | "oz" => Some(CapacityDimension::Volume),
            "g" | "kg" => Some(CapacityDimension::Mass),
            _ => None,
        }
    }

    /// Value converted to the base unit of its dimension (ml or g)
    pub fn base_value(&self) -> Option<f64> {
        let factor = match self.unit.as_str() {
            "ml" | "g" => 1.0,
            "cl" => 10.0,
            "l" | "kg" => 1000.0,
            "oz" => 29.5735,
            _ => return None,
        };
        Some(self.value * factor)
    }

    /// Base values of two capacities, when they share a dimension
    pub fn comparable(&self, other: &Capacity) -> Option<(f64, f64)> {
        if self.dimension()? != other.dimension()? {
            return None;
        }
        Some((self.base_value()?, other.base_value()?))
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.unit)
    }
}

impl<'de> Deserialize<'de> for Capacity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Capacity::from_json(&value)
            .ok_or_else(|| D::Error::custom(format!("unrecognized capacity: {}", value)))
    }
}

/// Outer dimensions of a product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    /// Length (or depth)
    pub length: Option<f64>,
    /// Width (or diameter)
    pub width: Option<f64>,
    /// Height
    pub height: Option<f64>,
    /// Length unit, `mm` when unspecified
    pub unit: String,
}

/// Technical specifications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Specifications {
    /// Primary material (e.g. `HDPE`, `Kraft paper`)
    pub material: Option<String>,
    /// Nominal capacity
    pub capacity: Option<Capacity>,
    /// Outer dimensions
    pub dimensions: Option<Dimensions>,
    /// Weight as stated by the supplier
    pub weight: Option<String>,
    /// Color
    pub color: Option<String>,
    /// Surface finish
    pub finish: Option<String>,
    /// Closure type (screw cap, zipper, tuck flap)
    pub closure_type: Option<String>,
    /// Any other stated specification
    pub additional: BTreeMap<String, String>,
}

/// Volume price break
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTier {
    /// Quantity from which this price applies
    pub min_quantity: u64,
    /// Price per unit at this tier
    pub unit_price: f64,
}

/// Pricing information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pricing {
    /// ISO currency code
    pub currency: String,
    /// Base unit price
    pub unit_price: Option<f64>,
    /// Minimum order quantity
    pub moq: Option<u64>,
    /// Volume price breaks, ascending by quantity
    pub price_tiers: Vec<PriceTier>,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            unit_price: None,
            moq: None,
            price_tiers: Vec::new(),
        }
    }
}

/// Sustainability flags
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sustainability {
    /// Recyclable in common streams
    pub recyclable: bool,
    /// Biodegradable
    pub biodegradable: bool,
    /// Compostable
    pub compostable: bool,
    /// Share of recycled content, 0-100
    pub recycled_content_percent: Option<f64>,
    /// Produced from locally sourced materials
    pub locally_sourced: bool,
    /// Certified carbon neutral
    pub carbon_neutral: bool,
}

/// Eco score, every component an integer in [0, 100]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoScore {
    /// Rounded mean of the four components
    pub overall: u8,
    /// End-of-life recyclability
    pub recyclability: u8,
    /// Higher means a smaller footprint
    pub carbon_footprint: u8,
    /// Use of renewable, recycled or compostable material
    pub sustainable_materials: u8,
    /// Local sourcing
    pub local_sourcing: u8,
}

impl EcoScore {
    /// Build a score from its four components, computing `overall`
    pub fn from_components(
        recyclability: u8,
        carbon_footprint: u8,
        sustainable_materials: u8,
        local_sourcing: u8,
    ) -> Self {
        let parts = [recyclability, carbon_footprint, sustainable_materials, local_sourcing]
            .map(|p| p.min(100));
        let sum: u32 = parts.iter().map(|&p| p as u32).sum();
        Self {
            overall: (sum as f64 / 4.0).round() as u8,
            recyclability: parts[0],
            carbon_footprint: parts[1],
            sustainable_materials: parts[2],
            local_sourcing: parts[3],
        }
    }
}

/// Filter values for bottle categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BottleFilters {
    /// Neck finishes (e.g. `28/410`)
    pub neck_sizes: Vec<String>,
    /// Shapes (boston round, cylinder)
    pub shapes: Vec<String>,
    /// Compatible closures
    pub closure_types: Vec<String>,
    /// Unrecognized keys
    pub other: BTreeMap<String, Vec<String>>,
}

/// Filter values for jar categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JarFilters {
    /// Lid types
    pub lid_types: Vec<String>,
    /// Shapes
    pub shapes: Vec<String>,
    /// Wall style (single, double)
    pub wall_types: Vec<String>,
    /// Unrecognized keys
    pub other: BTreeMap<String, Vec<String>>,
}

/// Filter values for box and carton categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoxFilters {
    /// Box styles (mailer, tuck end, rigid)
    pub box_styles: Vec<String>,
    /// Board grades (E-flute, SBS)
    pub board_grades: Vec<String>,
    /// Print options
    pub print_options: Vec<String>,
    /// Unrecognized keys
    pub other: BTreeMap<String, Vec<String>>,
}

/// Filter values for bag and pouch categories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BagFilters {
    /// Bag styles (stand-up, flat, gusseted)
    pub bag_styles: Vec<String>,
    /// Closures (zipper, heat seal)
    pub closure_types: Vec<String>,
    /// Barrier properties
    pub barrier_properties: Vec<String>,
    /// Unrecognized keys
    pub other: BTreeMap<String, Vec<String>>,
}

/// Category-specific filter values
///
/// Categories with a known schema get typed fields; anything else lands in
/// the generic bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CategoryFilters {
    /// Bottles
    Bottles(BottleFilters),
    /// Jars
    Jars(JarFilters),
    /// Boxes, cartons, mailers
    Boxes(BoxFilters),
    /// Bags, pouches, sachets
    Bags(BagFilters),
    /// Any category without a schema
    Generic {
        /// Filter name to values
        values: BTreeMap<String, Vec<String>>,
    },
}

impl Default for CategoryFilters {
    fn default() -> Self {
        CategoryFilters::Generic {
            values: BTreeMap::new(),
        }
    }
}

/// Lower-case a filter key and drop separators, so that `neckSize`,
/// `neck_size` and `Neck Size` compare equal
fn filter_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Remove every entry whose key matches one of `aliases`, concatenating values
fn take_values(map: &mut BTreeMap<String, Vec<String>>, aliases: &[&str]) -> Vec<String> {
    let keys: Vec<String> = map
        .keys()
        .filter(|k| aliases.contains(&filter_key(k).as_str()))
        .cloned()
        .collect();
    keys.into_iter()
        .filter_map(|k| map.remove(&k))
        .flatten()
        .collect()
}

impl CategoryFilters {
    /// Pick the schema for `category` and distribute `values` into it
    pub fn from_map(category: &str, mut values: BTreeMap<String, Vec<String>>) -> Self {
        let category = category.to_lowercase();
        if category.contains("bottle") {
            CategoryFilters::Bottles(BottleFilters {
                neck_sizes: take_values(&mut values, &["necksize", "necksizes", "neckfinish", "neck"]),
                shapes: take_values(&mut values, &["shape", "shapes"]),
                closure_types: take_values(&mut values, &["closure", "closures", "closuretype", "closuretypes"]),
                other: values,
            })
        } else if category.contains("jar") {
            CategoryFilters::Jars(JarFilters {
                lid_types: take_values(&mut values, &["lid", "lids", "lidtype", "lidtypes"]),
                shapes: take_values(&mut values, &["shape", "shapes"]),
                wall_types: take_values(&mut values, &["wall", "walltype", "walltypes"]),
                other: values,
            })
        } else if ["box", "carton", "mailer"].iter().any(|k| category.contains(k)) {
            CategoryFilters::Boxes(BoxFilters {
                box_styles: take_values(&mut values, &["style", "styles", "boxstyle", "boxstyles"]),
                board_grades: take_values(&mut values, &["board", "boardgrade", "boardgrades", "flute"]),
                print_options: take_values(&mut values, &["print", "printing", "printoptions"]),
                other: values,
            })
        } else if ["bag", "pouch", "sachet"].iter().any(|k| category.contains(k)) {
            CategoryFilters::Bags(BagFilters {
                bag_styles: take_values(&mut values, &["style", "styles", "bagstyle", "bagstyles"]),
                closure_types: take_values(&mut values, &["closure", "closures", "closuretype", "closuretypes"]),
                barrier_properties: take_values(&mut values, &["barrier", "barriers", "barrierproperties"]),
                other: values,
            })
        } else {
            CategoryFilters::Generic { values }
        }
    }

    /// Schema name
    pub fn kind(&self) -> &'static str {
        match self {
            CategoryFilters::Bottles(_) => "bottles",
            CategoryFilters::Jars(_) => "jars",
            CategoryFilters::Boxes(_) => "boxes",
            CategoryFilters::Bags(_) => "bags",
            CategoryFilters::Generic { .. } => "generic",
        }
    }
}

/// Filters shared by every category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommonFilters {
    /// Materials
    pub materials: Vec<String>,
    /// Colors
    pub colors: Vec<String>,
    /// Target industries
    pub industries: Vec<String>,
    /// Eco features
    pub eco_features: Vec<String>,
    /// Unrecognized keys
    pub other: BTreeMap<String, Vec<String>>,
}

impl CommonFilters {
    /// Distribute a filter map into the well-known keys
    pub fn from_map(mut values: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            materials: take_values(&mut values, &["material", "materials"]),
            colors: take_values(&mut values, &["color", "colors", "colour", "colours"]),
            industries: take_values(&mut values, &["industry", "industries", "sector", "sectors"]),
            eco_features: take_values(&mut values, &["ecofeature", "ecofeatures", "sustainability"]),
            other: values,
        }
    }
}

/// Customization offering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    /// Whether any customization is offered
    pub available: bool,
    /// Offered options (printing, embossing, custom color)
    pub options: Vec<String>,
    /// Minimum quantity for customized orders
    pub min_quantity: Option<u64>,
}

/// Existing catalog product resembling a candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarProduct {
    /// Catalog id
    pub existing_product_id: String,
    /// Catalog name
    pub name: String,
    /// Similarity in [0, 1]
    pub score: f64,
}

/// A product proposed by the model, pending review by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCandidate {
    /// Product name (never empty)
    pub name: String,
    /// Product category (never empty)
    pub category: String,
    /// Marketing description
    #[serde(default)]
    pub description: String,
    /// Technical specifications
    #[serde(default)]
    pub specifications: Specifications,
    /// Pricing
    #[serde(default)]
    pub pricing: Pricing,
    /// Sustainability flags
    #[serde(default)]
    pub sustainability: Sustainability,
    /// Eco score
    #[serde(default)]
    pub eco_score: EcoScore,
    /// Category-specific filters
    #[serde(default)]
    pub category_filters: CategoryFilters,
    /// Cross-category filters
    #[serde(default)]
    pub common_filters: CommonFilters,
    /// Customization offering
    #[serde(default)]
    pub customization: Customization,
    /// Feature bullet points
    #[serde(default)]
    pub features: Vec<String>,
    /// Certifications (FDA, BRC, FSC)
    #[serde(default)]
    pub certifications: Vec<String>,
    /// Image URLs
    #[serde(default)]
    pub images: Vec<String>,
    /// Resembling catalog products, best first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub similar_products: Vec<SimilarProduct>,
}

impl ProductCandidate {
    /// Candidate with every optional field defaulted
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            description: String::new(),
            specifications: Specifications::default(),
            pricing: Pricing::default(),
            sustainability: Sustainability::default(),
            eco_score: EcoScore::default(),
            category_filters: CategoryFilters::default(),
            common_filters: CommonFilters::default(),
            customization: Customization::default(),
            features: Vec::new(),
            certifications: Vec::new(),
            images: Vec::new(),
            similar_products: Vec::new(),
        }
    }

    /// Primary material: the specification, else the first material filter
    pub fn material(&self) -> Option<&str> {
        self.specifications
            .material
            .as_deref()
            .or_else(|| self.common_filters.materials.first().map(String::as_str))
    }
}

/// An existing catalog entry used for similarity annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    /// Catalog id
    pub id: String,
    /// Name
    pub name: String,
    /// Category
    pub category: String,
    /// Primary material
    #[serde(default)]
    pub material: Option<String>,
    /// Nominal capacity
    #[serde(default)]
    pub capacity: Option<Capacity>,
}

/// Summary block of an extraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionSummary {
    /// Number of products returned
    pub total_products: usize,
    /// Distinct categories in first-occurrence order
    pub categories: Vec<String>,
    /// Newline-separated processing notes
    pub processing_notes: String,
}

impl ExtractionSummary {
    /// Summarize `products` with the given notes
    pub fn from_products(products: &[ProductCandidate], processing_notes: String) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for product in products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        Self {
            total_products: products.len(),
            categories,
            processing_notes,
        }
    }
}

/// Metadata about an extraction job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    /// Job id (UUIDv7)
    pub job_id: String,
    /// Original filename
    pub filename: String,
    /// Document format
    pub format: String,
    /// Model that answered
    pub model_name: String,
    /// Chunks submitted (or planned, when cancelled)
    pub chunk_count: usize,
    /// Chunks whose call or parse failed
    pub failed_chunks: usize,
    /// Stages traversed, in order
    pub stages: Vec<String>,
    /// Estimated tokens of the text sent for extraction
    pub estimated_tokens: usize,
    /// Wall-clock processing time
    pub processing_time_ms: u64,
}

/// Result of an extraction job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    /// Deduplicated candidates in first-seen order
    pub products: Vec<ProductCandidate>,
    /// Totals, categories and notes
    pub summary: ExtractionSummary,
    /// Job metadata
    pub metadata: ExtractionMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_parse() {
        assert_eq!(Capacity::parse("250ml"), Some(Capacity::new(250.0, "ml")));
        assert_eq!(Capacity::parse("1.5 L"), Some(Capacity::new(1.5, "l")));
        assert_eq!(Capacity::parse("500"), Some(Capacity::new(500.0, "ml")));
        assert_eq!(Capacity::parse("2 kg"), Some(Capacity::new(2.0, "kg")));
        assert_eq!(Capacity::parse("big"), None);
        assert_eq!(Capacity::parse("10 furlongs"), None);
    }

    #[test]
    fn test_capacity_from_json_object() {
        let value = serde_json::json!({"value": 16, "unit": "OZ"});
        let capacity = Capacity::from_json(&value).unwrap();
        assert_eq!(capacity.unit, "oz");
        assert_eq!(capacity.value, 16.0);
    }

    #[test]
    fn test_capacity_comparable() {
        let litre = Capacity::new(1.0, "l");
        let ml = Capacity::new(500.0, "ml");
        let grams = Capacity::new(500.0, "g");

        assert_eq!(litre.comparable(&ml), Some((1000.0, 500.0)));
        assert_eq!(ml.comparable(&grams), None);
    }

    #[test]
    fn test_capacity_deserializes_leniently() {
        let catalog: CatalogProduct = serde_json::from_str(
            r#"{"id": "p1", "name": "Bottle", "category": "Bottles", "capacity": "250 ml"}"#,
        )
        .unwrap();
        assert_eq!(catalog.capacity, Some(Capacity::new(250.0, "ml")));
        assert_eq!(catalog.material, None);
    }

    #[test]
    fn test_eco_score_overall_is_mean() {
        let score = EcoScore::from_components(80, 60, 41, 30);
        assert_eq!(score.overall, 53);

        let capped = EcoScore::from_components(200, 100, 100, 100);
        assert_eq!(capped.recyclability, 100);
        assert_eq!(capped.overall, 100);
    }

    #[test]
    fn test_category_filters_schema_selection() {
        let mut values = BTreeMap::new();
        values.insert("neck_size".to_string(), vec!["28/410".to_string()]);
        values.insert("Shape".to_string(), vec!["Boston round".to_string()]);
        values.insert("tint".to_string(), vec!["amber".to_string()]);

        match CategoryFilters::from_map("Plastic Bottles", values) {
            CategoryFilters::Bottles(filters) => {
                assert_eq!(filters.neck_sizes, vec!["28/410"]);
                assert_eq!(filters.shapes, vec!["Boston round"]);
                assert_eq!(filters.other.get("tint").unwrap(), &vec!["amber".to_string()]);
            }
            other => panic!("Expected bottle filters, got {:?}", other),
        }

        let generic = CategoryFilters::from_map("Labels", BTreeMap::new());
        assert_eq!(generic.kind(), "generic");
        assert_eq!(CategoryFilters::from_map("Stand-up Pouches", BTreeMap::new()).kind(), "bags");
        assert_eq!(CategoryFilters::from_map("Mailer Boxes", BTreeMap::new()).kind(), "boxes");
    }

    #[test]
    fn test_common_filters_from_map() {
        let mut values = BTreeMap::new();
        values.insert("materials".to_string(), vec!["HDPE".to_string()]);
        values.insert("Colours".to_string(), vec!["white".to_string()]);
        let filters = CommonFilters::from_map(values);
        assert_eq!(filters.materials, vec!["HDPE"]);
        assert_eq!(filters.colors, vec!["white"]);
        assert!(filters.other.is_empty());
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let mut product = ProductCandidate::new("Bottle A", "Bottles");
        product.pricing.unit_price = Some(0.25);
        let json = serde_json::to_value(&product).unwrap();

        assert_eq!(json["pricing"]["unitPrice"], 0.25);
        assert_eq!(json["pricing"]["currency"], "USD");
        assert_eq!(json["ecoScore"]["overall"], 0);
        assert_eq!(json["categoryFilters"]["kind"], "generic");
        assert!(json.get("similarProducts").is_none());
    }

    #[test]
    fn test_product_material_falls_back_to_filters() {
        let mut product = ProductCandidate::new("Jar", "Jars");
        assert_eq!(product.material(), None);
        product.common_filters.materials.push("Glass".to_string());
        assert_eq!(product.material(), Some("Glass"));
        product.specifications.material = Some("PET".to_string());
        assert_eq!(product.material(), Some("PET"));
    }

    #[test]
    fn test_summary_categories_first_occurrence() {
        let products = vec![
            ProductCandidate::new("A", "Bottles"),
            ProductCandidate::new("B", "Jars"),
            ProductCandidate::new("C", "Bottles"),
        ];
        let summary = ExtractionSummary::from_products(&products, "ok".to_string());
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.categories, vec!["Bottles", "Jars"]);
    }
}
