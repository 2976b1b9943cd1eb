use serde::{Deserialize, Serialize};

fn default_cedict_url() -> String {
    "https://www.mdbg.net/chinese/export/cedict/cedict_1_0_ts_utf-8_mdbg.zip".to_string()
}

fn default_hsk_url() -> String {
    "https://raw.githubusercontent.com/drkameleon/complete-hsk-vocabulary/refs/heads/main/complete.json"
        .to_string()
}

/// Fetching of missing dictionary and HSK files at startup
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Off unless asked for; files that already exist are never replaced
    #[serde(default)]
    pub auto_download: bool,
    /// Zip archive holding the CC-CEDICT `.u8` file
    #[serde(default = "default_cedict_url")]
    pub cedict_url: String,
    #[serde(default = "default_hsk_url")]
    pub hsk_url: String,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            auto_download: false,
            cedict_url: default_cedict_url(),
            hsk_url: default_hsk_url(),
        }
    }
}
