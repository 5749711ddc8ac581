//! Main crate for the `clouddns_updater` application.
//!
//! The updater keeps a fixed list of A records in a Cloudflare zone pointed at the
//! public IPv4 address of the machine it runs on.
//!
//! For more information, choose one of the modules below.
//! The following modules might be of interest if you want to add new functionality:
//! - [`ipv4source`]s are used to retrieve our public Ipv4 address
//! - [`provider`]s are DNS providers such as Cloudflare that ultimately serve DNS records to clients
//! - [`reconcile`] holds the logic deciding whether a record needs to be created or updated
//! - [`updater`] and [`schedule`] tie everything together into repeated update cycles
//! - [`app`] decides how the application exits

#![allow(clippy::uninlined_format_args)]

pub mod app;
pub mod config;
pub mod ipv4source;
pub mod provider;
pub mod reconcile;
pub mod schedule;
pub mod updater;
