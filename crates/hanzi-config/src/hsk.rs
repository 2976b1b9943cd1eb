use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "resources/hsk_vocabulary.json".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct HskConfig {
    /// complete-hsk-vocabulary JSON, or a `phrase<TAB>label` TSV
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for HskConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
