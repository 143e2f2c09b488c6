use serde::{Deserialize, Deserializer, Serialize};

/// Flat topology record stored as `meta.json` inside a model archive.
///
/// Field names match the archive format: `I`, `O`, `H`, `Learn`, `WPaths`, `BPaths`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkOptions {
    #[serde(rename = "I")]
    pub input_size: usize,
    #[serde(rename = "O")]
    pub output_size: usize,
    /// Older archives may store `null` for a network without hidden layers.
    #[serde(rename = "H", default, deserialize_with = "null_as_empty")]
    pub hidden_sizes: Vec<usize>,
    #[serde(rename = "Learn")]
    pub learning_rate: f64,
    #[serde(rename = "WPaths")]
    pub weight_paths: Vec<String>,
    #[serde(rename = "BPaths")]
    pub bias_paths: Vec<String>,
}

impl NetworkOptions {
    /// Entry name of layer `index`'s weight blob.
    pub fn weight_path(index: usize) -> String {
        format!("{index}w.bin")
    }

    /// Entry name of layer `index`'s bias blob.
    pub fn bias_path(index: usize) -> String {
        format!("{index}b.bin")
    }

    pub fn layer_count(&self) -> usize {
        self.hidden_sizes.len() + 1
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<usize>>::deserialize(deserializer)?.unwrap_or_default())
}
