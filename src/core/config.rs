use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::compression::compress::CompressionType;
use crate::core::error::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalyzerConfig,
    pub weights: FieldWeights,
    pub query: QueryConfig,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

/// Normalization policy shared by indexing and querying.
/// Stored inside every snapshot so queries analyze text exactly as the build did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub stemming: bool,
    pub stop_words: bool,
    pub max_token_length: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            stemming: true,
            stop_words: true,
            max_token_length: 255,
        }
    }
}

/// Posting weight emitted per occurrence of a term in each field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldWeights {
    pub title: f32,
    pub section: f32,
    pub body: f32,
    pub object_name: f32,
    pub object_description: f32,
}

impl Default for FieldWeights {
    fn default() -> Self {
        FieldWeights {
            title: 15.0,
            section: 7.0,
            body: 5.0,
            object_name: 11.0,
            object_description: 2.0,
        }
    }
}

/// What to do when every token resolves but no document contains all of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Recombine the token postings with OR
    OrOnEmpty,
    Never,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub default_limit: usize,
    pub fallback: FallbackPolicy,

    pub prefix_expansion: bool,
    pub min_prefix_len: usize,
    pub partial_match_factor: f32,

    pub max_suggestions: usize,
    pub suggestion_distance: u8,

    /// Result cache entries per engine, 0 disables caching
    pub cache_capacity: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            default_limit: 10,
            fallback: FallbackPolicy::OrOnEmpty,
            prefix_expansion: false,
            min_prefix_len: 3,
            partial_match_factor: 0.5,
            max_suggestions: 3,
            suggestion_distance: 2,
            cache_capacity: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub compression: CompressionType,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            compression: CompressionType::Lz4,
        }
    }
}
