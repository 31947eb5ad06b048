use crate::catalog::ColumnMap;
use crate::search::{MatchConfig, DEFAULT_FUZZY_THRESHOLD, DEFAULT_MAX_RESULTS};
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_CATALOG_PATH: &str = "shl_assessments.csv";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub matching: MatchConfig,
    pub columns: ColumnMap,
}

impl Config {
    /// Build from `RECOMMENDER_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let catalog_path = lookup("RECOMMENDER_CATALOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CATALOG_PATH));

        let bind_addr = lookup("RECOMMENDER_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .with_context(|| format!("invalid RECOMMENDER_BIND_ADDR: {bind_addr}"))?;

        let fuzzy_threshold = parse_var(&lookup, "RECOMMENDER_FUZZY_THRESHOLD", DEFAULT_FUZZY_THRESHOLD)?;
        let max_results = parse_var(&lookup, "RECOMMENDER_MAX_RESULTS", DEFAULT_MAX_RESULTS)?;

        let config = Self {
            catalog_path,
            bind_addr,
            matching: MatchConfig {
                fuzzy_threshold,
                max_results,
            },
            columns: ColumnMap::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.fuzzy_threshold > 100 {
            bail!(
                "fuzzy threshold must be between 0 and 100, got {}",
                self.matching.fuzzy_threshold
            );
        }
        if self.matching.max_results == 0 {
            bail!("max results must be at least 1");
        }
        Ok(())
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key}: {raw}")),
        None => Ok(default),
    }
}
