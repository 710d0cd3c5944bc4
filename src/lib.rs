//! Workspace tooling package.
//!
//! Exists so workspace-level development hooks (see `rusty-hook` metadata in
//! the root `Cargo.toml`) have a package to attach to. Library code lives in
//! `crates/osmgraph-lib`; the command-line front end in `crates/osmgraph-cli`.
