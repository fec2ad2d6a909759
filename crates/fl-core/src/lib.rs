// ABOUTME: Shared types and configuration for folder-layout.
// ABOUTME: Defines key bindings, settings, vault paths, and host storage interfaces.

pub mod config;
pub mod host;
pub mod in_flight;
pub mod path;

pub use config::{Bindings, ConfigError, Modifier, Settings, Trigger};
pub use host::{
    EntryKind, HostError, OpenOptions, Orientation, PaneId, Side, Vault, VaultEntry, VaultError,
};
pub use in_flight::{InFlight, InFlightGuard};
