//! Configuration types and TOML loading

pub mod kit_toml;

pub use kit_toml::{ChainOptions, ConfigOptions, GroupFallback, KitConfig, RegistrySettings};
