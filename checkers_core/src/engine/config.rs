use crate::logic::eval_constants::{
    DEFAULT_SEARCH_DEPTH, VAL_KING, VAL_MAN, W_CENTER_CONTROL, W_CLUSTERING, W_EDGE_SAFETY,
    W_KING_SAFETY, W_MATERIAL, W_MOBILITY, W_MULTI_JUMP, W_PROMOTION_POTENTIAL, W_TEMPO,
    W_THREATS, W_VULNERABILITY,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Piece Values
    pub val_man: i32,
    pub val_king: i32,

    // Evaluation Weights
    pub w_material: f64,
    pub w_mobility: f64,
    pub w_center_control: f64,
    pub w_promotion_potential: f64,
    pub w_king_safety: f64,
    pub w_threats: f64,
    pub w_multi_jump: f64,
    pub w_vulnerability: f64,
    pub w_clustering: f64,
    pub w_edge_safety: f64,
    pub w_tempo: f64,

    // Search Parameters
    pub search_depth: u8,
    /// Restrict every searched move list to captures while one exists.
    pub forced_capture_in_search: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            val_man: VAL_MAN,
            val_king: VAL_KING,

            w_material: W_MATERIAL,
            w_mobility: W_MOBILITY,
            w_center_control: W_CENTER_CONTROL,
            w_promotion_potential: W_PROMOTION_POTENTIAL,
            w_king_safety: W_KING_SAFETY,
            w_threats: W_THREATS,
            w_multi_jump: W_MULTI_JUMP,
            w_vulnerability: W_VULNERABILITY,
            w_clustering: W_CLUSTERING,
            w_edge_safety: W_EDGE_SAFETY,
            w_tempo: W_TEMPO,

            search_depth: DEFAULT_SEARCH_DEPTH,
            forced_capture_in_search: false,
        }
    }
}

/// Tuning file: values and weights are multipliers over the defaults.
#[derive(Deserialize)]
struct EngineConfigJson {
    val_man: Option<f32>,
    val_king: Option<f32>,

    w_material: Option<f64>,
    w_mobility: Option<f64>,
    w_center_control: Option<f64>,
    w_promotion_potential: Option<f64>,
    w_king_safety: Option<f64>,
    w_threats: Option<f64>,
    w_multi_jump: Option<f64>,
    w_vulnerability: Option<f64>,
    w_clustering: Option<f64>,
    w_edge_safety: Option<f64>,
    w_tempo: Option<f64>,

    search_depth: Option<u8>,
    forced_capture_in_search: Option<bool>,
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        Ok(Self {
            val_man: apply_scale(default.val_man, json_config.val_man),
            val_king: apply_scale(default.val_king, json_config.val_king),

            w_material: scale_weight(default.w_material, json_config.w_material),
            w_mobility: scale_weight(default.w_mobility, json_config.w_mobility),
            w_center_control: scale_weight(default.w_center_control, json_config.w_center_control),
            w_promotion_potential: scale_weight(
                default.w_promotion_potential,
                json_config.w_promotion_potential,
            ),
            w_king_safety: scale_weight(default.w_king_safety, json_config.w_king_safety),
            w_threats: scale_weight(default.w_threats, json_config.w_threats),
            w_multi_jump: scale_weight(default.w_multi_jump, json_config.w_multi_jump),
            w_vulnerability: scale_weight(default.w_vulnerability, json_config.w_vulnerability),
            w_clustering: scale_weight(default.w_clustering, json_config.w_clustering),
            w_edge_safety: scale_weight(default.w_edge_safety, json_config.w_edge_safety),
            w_tempo: scale_weight(default.w_tempo, json_config.w_tempo),

            search_depth: json_config.search_depth.unwrap_or(default.search_depth),
            forced_capture_in_search: json_config
                .forced_capture_in_search
                .unwrap_or(default.forced_capture_in_search),
        })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn apply_scale(default_val: i32, scale: Option<f32>) -> i32 {
    scale.map_or(default_val, |s| (default_val as f32 * s) as i32)
}

fn scale_weight(default_val: f64, scale: Option<f64>) -> f64 {
    scale.map_or(default_val, |s| default_val * s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_default() {
        let config = EngineConfig::load_from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.val_man, VAL_MAN);
        assert_eq!(config.search_depth, 3);
        assert!(!config.forced_capture_in_search);
    }

    #[test]
    fn test_load_config_scaled() {
        let json = r#"{
            "val_king": 1.5,
            "w_mobility": 0.5,
            "w_tempo": 2.0
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.val_king, 240);
        assert_eq!(config.val_man, VAL_MAN);
        assert!((config.w_mobility - 0.2).abs() < 1e-9);
        assert!((config.w_tempo - 0.5).abs() < 1e-9);
        assert!((config.w_threats - W_THREATS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_config_absolute_search_fields() {
        let json = r#"{
            "search_depth": 5,
            "forced_capture_in_search": true
        }"#;
        let config = EngineConfig::load_from_json(json).unwrap();
        assert_eq!(config.search_depth, 5);
        assert!(config.forced_capture_in_search);
    }

    #[test]
    fn test_load_config_invalid_json() {
        assert!(EngineConfig::load_from_json("{ invalid json }").is_err());
        assert!(EngineConfig::load_from_json(r#"{ "search_depth": -1 }"#).is_err());
    }

    #[test]
    fn test_deserialize_absolute_config() {
        let json = r#"{
            "val_man": 120,
            "w_material": 2.0
        }"#;

        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.val_man, 120);
        assert!((config.w_material - 2.0).abs() < f64::EPSILON);
        assert_eq!(config.val_king, VAL_KING);
        assert_eq!(config.search_depth, DEFAULT_SEARCH_DEPTH);
    }
}
