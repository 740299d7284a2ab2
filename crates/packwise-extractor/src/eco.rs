//! Heuristic eco scoring from material keywords and sustainability flags

use crate::types::{EcoScore, Sustainability};

/// Broad material family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MaterialClass {
    Glass,
    Metal,
    Paper,
    Bioplastic,
    RigidPlastic,
    FlexiblePlastic,
    ProblemPlastic,
}

impl MaterialClass {
    fn from_token(token: &str) -> Option<Self> {
        let class = match token {
            "glass" => MaterialClass::Glass,
            "aluminum" | "aluminium" | "tin" | "tinplate" | "steel" | "metal" => {
                MaterialClass::Metal
            }
            "paper" | "kraft" | "cardboard" | "corrugated" | "carton" | "paperboard" | "board"
            | "bagasse" | "bamboo" | "pulp" => MaterialClass::Paper,
            "pla" | "pha" | "bioplastic" | "cornstarch" | "sugarcane" => MaterialClass::Bioplastic,
            "pet" | "rpet" | "petg" | "hdpe" | "pp" | "polypropylene" => {
                MaterialClass::RigidPlastic
            }
            "ldpe" | "lldpe" | "pe" | "polyethylene" => MaterialClass::FlexiblePlastic,
            "pvc" | "ps" | "polystyrene" | "eps" | "styrofoam" | "laminate" | "multilayer" => {
                MaterialClass::ProblemPlastic
            }
            _ => return None,
        };
        Some(class)
    }

    /// (recyclability, carbon footprint, sustainable materials) base scores
    fn base_scores(self) -> (f64, f64, f64) {
        match self {
            MaterialClass::Glass => (90.0, 40.0, 40.0),
            MaterialClass::Metal => (90.0, 35.0, 40.0),
            MaterialClass::Paper => (85.0, 75.0, 60.0),
            MaterialClass::Bioplastic => (45.0, 70.0, 70.0),
            MaterialClass::RigidPlastic => (70.0, 50.0, 30.0),
            MaterialClass::FlexiblePlastic => (50.0, 50.0, 20.0),
            MaterialClass::ProblemPlastic => (20.0, 25.0, 10.0),
        }
    }
}

/// Scores used when no material family is recognized
const UNKNOWN_SCORES: (f64, f64, f64) = (40.0, 45.0, 20.0);

const RECYCLED_TOKENS: &[&str] = &["recycled", "rpet", "pcr", "postconsumer"];

fn tokens(material: &str) -> Vec<String> {
    material
        .to_lowercase()
        .replace("post-consumer", "postconsumer")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Compute an eco score for a product
///
/// Composite materials ("kraft paper with PE lining") average the base
/// scores of every recognized family.
pub fn compute_eco_score(material: Option<&str>, sustainability: &Sustainability) -> EcoScore {
    let tokens = material.map(tokens).unwrap_or_default();
    let classes: Vec<MaterialClass> = tokens
        .iter()
        .filter_map(|t| MaterialClass::from_token(t))
        .collect();

    let (mut recyclability, mut carbon, mut materials) = if classes.is_empty() {
        UNKNOWN_SCORES
    } else {
        let n = classes.len() as f64;
        classes.iter().fold((0.0, 0.0, 0.0), |acc, class| {
            let (r, c, m) = class.base_scores();
            (acc.0 + r / n, acc.1 + c / n, acc.2 + m / n)
        })
    };

    let recycled_share = sustainability
        .recycled_content_percent
        .unwrap_or(0.0)
        .clamp(0.0, 100.0);

    if sustainability.recyclable {
        recyclability += 10.0;
    }

    carbon += recycled_share * 0.2;
    if sustainability.carbon_neutral {
        carbon += 25.0;
    }

    if tokens.iter().any(|t| RECYCLED_TOKENS.contains(&t.as_str())) {
        materials += 20.0;
    }
    if sustainability.biodegradable {
        materials += 10.0;
    }
    if sustainability.compostable {
        materials += 10.0;
    }
    materials += recycled_share * 0.2;

    let local = if sustainability.locally_sourced { 90.0 } else { 40.0 };

    EcoScore::from_components(
        clamp_score(recyclability),
        clamp_score(carbon),
        clamp_score(materials),
        clamp_score(local),
    )
}

/// Components stated by the model; missing ones fall back to heuristics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatedEcoScore {
    /// Stated recyclability
    pub recyclability: Option<u8>,
    /// Stated carbon footprint score
    pub carbon_footprint: Option<u8>,
    /// Stated sustainable materials score
    pub sustainable_materials: Option<u8>,
    /// Stated local sourcing score
    pub local_sourcing: Option<u8>,
}

impl StatedEcoScore {
    /// True when no component was stated
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill gaps from `computed`; `overall` is always the mean of the result
    pub fn resolve(&self, computed: EcoScore) -> EcoScore {
        EcoScore::from_components(
            self.recyclability.unwrap_or(computed.recyclability),
            self.carbon_footprint.unwrap_or(computed.carbon_footprint),
            self.sustainable_materials.unwrap_or(computed.sustainable_materials),
            self.local_sourcing.unwrap_or(computed.local_sourcing),
        )
    }
}
