//! Runner configuration: a TOML file with CLI overrides applied on top.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("page size {0:#X} must be a power of two between 0x100 and 0x10000")]
    PageSize(usize),

    #[error("clock_hz and frame_hz must be non-zero")]
    ZeroRate,

    #[error("dump range {address:#06X}+{length:#X} runs past the address space")]
    DumpRange { address: u16, length: usize },
}

/// Memory region written to a file when the run ends.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DumpConfig {
    #[serde(default)]
    pub address: u16,
    #[serde(default = "DumpConfig::full_length")]
    pub length: usize,
    pub path: PathBuf,
}

impl DumpConfig {
    fn full_length() -> usize {
        0x10000
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    /// Registered machine name.
    pub machine: String,
    /// Program image to boot.
    pub program: Option<PathBuf>,
    /// Expected CRC-32 of the program image.
    pub program_crc32: Option<u32>,
    pub page_size: usize,
    pub clock_hz: u64,
    pub frame_hz: u64,
    /// Stop after this many frames (0 runs until the CPU halts for good).
    pub max_frames: u64,
    pub dump: Option<DumpConfig>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            machine: "simplez80".to_string(),
            program: None,
            program_crc32: None,
            page_size: zinc_core::core::memory::DEFAULT_PAGE_SIZE,
            clock_hz: 4_000_000,
            frame_hz: 50,
            max_frames: 500,
            dump: None,
        }
    }
}

impl RunnerConfig {
    /// `<config dir>/zinc/runner.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zinc").join("runner.toml"))
    }

    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or from the default location when `path` is None.
    /// A missing default file yields the built-in defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => Self::from_toml(&text, &path),
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.page_size.is_power_of_two() || !(0x100..=0x10000).contains(&self.page_size) {
            return Err(ConfigError::PageSize(self.page_size));
        }
        if self.clock_hz == 0 || self.frame_hz == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if let Some(dump) = &self.dump
            && dump.address as usize + dump.length > 0x10000
        {
            return Err(ConfigError::DumpRange {
                address: dump.address,
                length: dump.length,
            });
        }
        Ok(())
    }

    pub fn frame_cycles(&self) -> i64 {
        zinc_machines::registry::MachineConfig::frame_cycles_for(self.clock_hz, self.frame_hz)
    }
}
