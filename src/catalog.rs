use serde::{Deserialize, Serialize};

/// A target-object catalog entry: model name, uniform scale factor, and the
/// geometry sub-part names visual materials are applied to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetModelDef {
    pub name: String,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub parts: Vec<String>,
}

fn default_scale() -> f32 {
    1.0
}

/// Everything the population engine can randomize over: target-object
/// models, container models, and visual materials. The entries are opaque
/// names resolved by the host.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub target_objects: Vec<TargetModelDef>,
    pub containers: Vec<String>,
    pub visual_materials: Vec<String>,
}

impl ModelCatalog {
    pub fn from_json(text: &str) -> Result<Self, String> {
        let catalog: ModelCatalog =
            serde_json::from_str(text).map_err(|e| format!("invalid model catalog: {e}"))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.target_objects.is_empty() {
            return Err("catalog has no target object models".to_string());
        }
        if self.containers.is_empty() {
            return Err("catalog has no container models".to_string());
        }
        if self.visual_materials.is_empty() {
            return Err("catalog has no visual materials".to_string());
        }
        for def in &self.target_objects {
            if def.scale <= 0.0 {
                return Err(format!(
                    "target object '{}' has non-positive scale {}",
                    def.name, def.scale
                ));
            }
        }
        Ok(())
    }

    pub fn target(&self, name: &str) -> Option<&TargetModelDef> {
        self.target_objects.iter().find(|d| d.name == name)
    }

    pub fn has_container(&self, name: &str) -> bool {
        self.containers.iter().any(|c| c == name)
    }
}
