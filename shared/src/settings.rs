//! Layered settings loading
//!
//! Defaults come from the target type's `serde` defaults, then an optional
//! TOML file, then environment variables. Environment keys use the prefix and
//! `__` as the nesting separator, e.g. `FBA__POLICY__GATE_FULFILLMENT_FEES=true`.

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::de::DeserializeOwned;
use std::path::Path;

pub fn load_settings<T: DeserializeOwned>(path: Option<&Path>, env_prefix: &str) -> anyhow::Result<T> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        let name = path
            .to_str()
            .with_context(|| format!("settings path is not valid UTF-8: {}", path.display()))?;
        builder = builder.add_source(File::new(name, FileFormat::Toml).required(true));
    }

    let settings = builder
        .add_source(Environment::with_prefix(env_prefix).separator("__"))
        .build()
        .context("failed to assemble settings")?;

    settings
        .try_deserialize::<T>()
        .context("failed to deserialize settings")
}
