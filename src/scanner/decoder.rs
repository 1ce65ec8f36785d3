//! Decoding of `<module>.info.yml` metadata files

use serde::Deserialize;

/// Fields of a module's info file that the builder reads
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ModuleInfo {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,
}

/// Turns the raw contents of an info file into [`ModuleInfo`]
pub trait MetadataDecoder {
    fn decode(&self, contents: &str) -> Result<ModuleInfo, String>;
}

/// Decoder for the YAML info files Drupal ships
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlDecoder;

impl MetadataDecoder for YamlDecoder {
    fn decode(&self, contents: &str) -> Result<ModuleInfo, String> {
        serde_yaml::from_str(contents).map_err(|e| e.to_string())
    }
}
