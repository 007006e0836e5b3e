//! Reading and writing block documents.
//!
//! The document syntax is picked from the file extension: `block.toml` is
//! TOML, `block.poly` / `.yml` / `.yaml` are YAML and `.json` is JSON. All
//! three map onto the same [`Block`] field set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use blockyard_util::errors::BlockyardError;

use crate::block::Block;

/// Concrete syntax of a block document or rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Json,
    Toml,
    #[default]
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "poly" | "yml" | "yaml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = BlockyardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(BlockyardError::Generic {
                message: format!("Unknown output format '{other}' (expected json, toml or yaml)"),
            }),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Toml => write!(f, "toml"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Parse a single block definition.
pub fn parse_block(content: &str, format: DocumentFormat) -> miette::Result<Block> {
    deserialize(content, format).map_err(|message| {
        BlockyardError::Document {
            message: format!("Failed to parse {format} block definition: {message}"),
        }
        .into()
    })
}

/// Load and parse a block definition file, choosing the syntax by extension.
pub fn load_block(path: &Path) -> miette::Result<Block> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| BlockyardError::Document {
        message: format!("Unrecognised block file extension: {}", path.display()),
    })?;
    let content = blockyard_util::fs::read_document(path)?;
    deserialize(&content, format).map_err(|message| {
        BlockyardError::Document {
            message: format!("Failed to parse {}: {message}", path.display()),
        }
        .into()
    })
}

fn deserialize(content: &str, format: DocumentFormat) -> Result<Block, String> {
    match format {
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
    }
}

/// Serialize any document (a block, a list of blocks, an action plan) in `format`.
///
/// TOML has no null, so null entries are left out of TOML output.
pub fn render<T: Serialize + ?Sized>(value: &T, format: DocumentFormat) -> miette::Result<String> {
    let rendered = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
        DocumentFormat::Toml => serde_json::to_value(value)
            .map_err(|e| e.to_string())
            .and_then(|mut tree| {
                drop_nulls(&mut tree);
                toml::to_string_pretty(&tree).map_err(|e| e.to_string())
            }),
        DocumentFormat::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
    };
    rendered.map_err(|message| {
        BlockyardError::Document {
            message: format!("Failed to render {format}: {message}"),
        }
        .into()
    })
}

fn drop_nulls(tree: &mut serde_json::Value) {
    match tree {
        serde_json::Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(drop_nulls);
        }
        serde_json::Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(drop_nulls);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("blocks/a/block.toml")),
            Some(DocumentFormat::Toml)
        );
        assert_eq!(
            DocumentFormat::from_path(&PathBuf::from("block.poly")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(DocumentFormat::from_path(&PathBuf::from("README.md")), None);
    }

    #[test]
    fn toml_output_skips_null_config() {
        let block = parse_block(
            "name: web\nconfig:\n  a: ~\n  b: 1\n  nested:\n    c: ~\n    d: [1, ~]\n",
            DocumentFormat::Yaml,
        )
        .unwrap();

        let toml = render(&block, DocumentFormat::Toml).unwrap();
        let back: toml::Table = toml::from_str(&toml).unwrap();
        let config = back["config"].as_table().unwrap();
        assert_eq!(config["b"].as_integer(), Some(1));
        assert!(!config.contains_key("a"));
        let nested = config["nested"].as_table().unwrap();
        assert!(!nested.contains_key("c"));
        assert_eq!(nested["d"].as_array().map(Vec::len), Some(1));

        let json = render(&block, DocumentFormat::Json).unwrap();
        assert!(json.contains("\"a\": null"), "got: {json}");
    }

    #[test]
    fn format_from_str() {
        assert_eq!("JSON".parse::<DocumentFormat>().unwrap(), DocumentFormat::Json);
        assert_eq!("yml".parse::<DocumentFormat>().unwrap(), DocumentFormat::Yaml);
        assert!("xml".parse::<DocumentFormat>().is_err());
    }
}
