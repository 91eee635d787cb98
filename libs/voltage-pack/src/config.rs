//! Codec configuration and the [`Codec`] facade

use std::path::Path;

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::diagnostics::{DiagnosticLevel, DiagnosticSink, TracingSink};
use crate::error::{PackError, Result};
use crate::format::{parse_format, parse_groups, DEFAULT_NAME_LIMIT};
use crate::pack::pack_program;
use crate::scalar::Scalar;
use crate::unpack::unpack_groups;
use crate::value::Unpacked;

/// Environment variable prefix, e.g. `VOLTAGE_PACK_NAME_LIMIT=64`
pub const ENV_PREFIX: &str = "VOLTAGE_PACK_";

/// Codec settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum length of an unpack group name, in bytes
    pub name_limit: usize,
    /// Level at which diagnostics are logged by the default sink
    pub diagnostic_level: DiagnosticLevel,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            name_limit: DEFAULT_NAME_LIMIT,
            diagnostic_level: DiagnosticLevel::default(),
        }
    }
}

impl CodecConfig {
    /// Layered sources
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`VOLTAGE_PACK_*`)
    /// 2. `config/pack.yaml`
    /// 3. `config/pack.toml`
    /// 4. Default values
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(CodecConfig::default()))
            .merge(Toml::file("config/pack.toml"))
            .merge(Yaml::file("config/pack.yaml"))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load from the default sources
    pub fn load() -> Result<Self> {
        Self::extract(Self::figment())
    }

    /// Load from a single file, picking the format by extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| PackError::config("Config file must have an extension"))?;

        let defaults = Figment::from(Serialized::defaults(CodecConfig::default()));
        let figment = match extension {
            "toml" => defaults.merge(Toml::file(path)),
            "yaml" | "yml" => defaults.merge(Yaml::file(path)),
            "json" => defaults.merge(Json::file(path)),
            _ => {
                return Err(PackError::config(format!(
                    "Unsupported config file format: {}",
                    extension
                )))
            },
        };

        Self::extract(figment)
    }

    /// Extract and validate
    pub fn extract(figment: Figment) -> Result<Self> {
        let config: CodecConfig = figment.extract()?;
        config.validate()?;
        debug!(
            name_limit = config.name_limit,
            level = ?config.diagnostic_level,
            "codec config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name_limit == 0 {
            return Err(PackError::config("name_limit must be greater than 0"));
        }
        Ok(())
    }
}

/// Pack/unpack entry point bound to a [`CodecConfig`]
///
/// Calls share no state; one codec can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn sink(&self) -> TracingSink {
        TracingSink::new(self.config.diagnostic_level)
    }

    /// Pack `args` according to `format`, logging diagnostics
    pub fn pack(&self, format: &str, args: &[Scalar]) -> Result<Vec<u8>> {
        self.pack_with(format, args, &mut self.sink())
    }

    /// Pack `args`, reporting diagnostics to `sink`
    pub fn pack_with(
        &self,
        format: &str,
        args: &[Scalar],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<u8>> {
        let program = parse_format(format)?;
        pack_program(&program, args, sink)
    }

    /// Unpack `input[offset..]` according to `format`, logging diagnostics
    pub fn unpack(&self, format: &str, input: &[u8], offset: usize) -> Result<Unpacked> {
        self.unpack_with(format, input, offset, &mut self.sink())
    }

    /// Unpack `input[offset..]`, reporting diagnostics to `sink`
    pub fn unpack_with(
        &self,
        format: &str,
        input: &[u8],
        offset: usize,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Unpacked> {
        let groups = parse_groups(format, self.config.name_limit)?;
        unpack_groups(&groups, input, offset, sink)
    }
}
