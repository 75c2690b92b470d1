use serde::{Deserialize, Serialize};

pub const SUPERHEROES_PATH: &str = "/superheroes";

/// Body of `POST /superheroes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHeroRequest {
    pub name: String,
    pub superpower: String,
    pub humility_score: f64,
}
