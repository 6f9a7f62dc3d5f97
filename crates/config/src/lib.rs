//! Configuration schema and loading for the magpie dispatcher stack.
//!
//! Config files are discovered as `magpie.{toml,yaml,yml,json}` in the
//! working directory, then under `~/.config/magpie/`. String values may
//! reference environment variables as `${VAR}`.

pub mod env_subst;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    loader::{discover_and_load, load_config},
    schema::{
        ChatConfig, FilterConfig, MagpieConfig, PersistConfig, ProviderConfig, ResolverConfig,
        TeachStore, TierLabels,
    },
    validate::validate,
};
