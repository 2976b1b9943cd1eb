use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "resources/cedict_ts.u8".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct DictionaryConfig {
    /// CC-CEDICT source file
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
