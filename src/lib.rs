/// Layered run configuration (defaults, TOML file, command line, environment)
pub mod config;

/// GitHub GraphQL client, queries and payload types
pub mod github;

/// The snapshot pipeline: rate probing, pagination, normalization and output
pub mod services;

/// Core type definitions and domain models written to the snapshot
pub mod types;
