//! `.env` style variable groups.

use rand::Rng;
use serde::{Deserialize, Serialize};

const KEY_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&&*()-_";

/// Generate a random string of `length` characters.
///
/// Not suitable for cryptographic use.
pub fn generate_key(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..KEY_CHARSET.len());
            KEY_CHARSET[idx] as char
        })
        .collect()
}

/// A single variable line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariable {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    /// When set, `value` is replaced by a fresh key of this length.
    #[serde(default)]
    pub generate: Option<usize>,
}

impl EnvVariable {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            generate: None,
        }
    }

    pub fn generated(key: impl Into<String>, length: usize) -> Self {
        Self {
            key: key.into(),
            value: None,
            generate: Some(length),
        }
    }

    fn resolve(&self) -> String {
        match self.generate {
            Some(length) => generate_key(length),
            None => self.value.clone().unwrap_or_default(),
        }
    }
}

/// A block of variables, optionally introduced by a comment line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariableGroup {
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub variables: Vec<EnvVariable>,
}

impl EnvVariableGroup {
    /// Number of lines a rendered block adds to a file.
    pub fn line_count(&self) -> usize {
        self.variables.len() + usize::from(self.comment.is_some())
    }

    /// Render the block to append after `existing`.
    ///
    /// Generated values are resolved on every call, so each target file
    /// gets its own secret.
    pub fn render_block(&self, existing: &str) -> String {
        let mut block = String::new();
        if !existing.is_empty() && !existing.ends_with('\n') {
            block.push('\n');
        }
        if let Some(comment) = &self.comment {
            block.push_str("# ");
            block.push_str(comment);
            block.push('\n');
        }
        for variable in &self.variables {
            block.push_str(&variable.key);
            block.push('=');
            block.push_str(&variable.resolve());
            block.push('\n');
        }
        block
    }
}
