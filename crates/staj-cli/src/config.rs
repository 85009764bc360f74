//! Assistant settings read from the environment

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use staj_core::{Error, Result};

pub const DEFAULT_DOCS_DIR: &str = "../data";
pub const DEFAULT_DB_DIR: &str = "./staj_internship_db";

/// Which embedding model indexes the documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbedderKind {
    /// Local feature hashing, no network
    #[default]
    Hash,
    /// Gemini embedding endpoint
    Gemini,
}

impl FromStr for EmbedderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "hash" => Ok(EmbedderKind::Hash),
            "gemini" => Ok(EmbedderKind::Gemini),
            other => Err(Error::Configuration(format!(
                "STAJ_EMBEDDER must be 'hash' or 'gemini', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedderKind::Hash => write!(f, "hash"),
            EmbedderKind::Gemini => write!(f, "gemini"),
        }
    }
}

/// Where documents are read from and the index is kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    pub docs_dir: PathBuf,
    pub db_dir: PathBuf,
    pub embedder: EmbedderKind,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            db_dir: PathBuf::from(DEFAULT_DB_DIR),
            embedder: EmbedderKind::default(),
        }
    }
}

impl AssistantConfig {
    /// Load from `.env` and the process environment
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unset or blank values use defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Ok(Self {
            docs_dir: value("STAJ_DOCS_DIR").map(PathBuf::from).unwrap_or(defaults.docs_dir),
            db_dir: value("STAJ_DB_DIR").map(PathBuf::from).unwrap_or(defaults.db_dir),
            embedder: value("STAJ_EMBEDDER")
                .map(|v| v.parse::<EmbedderKind>())
                .transpose()?
                .unwrap_or(defaults.embedder),
        })
    }
}
