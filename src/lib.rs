//! Pizza ordering platform service.
//!
//! Diners register and order from a shared menu at franchise stores;
//! franchise admins manage stores; platform admins manage franchises and
//! the menu. Orders are verified by an external factory after they commit.

use shadow_rs::shadow;
shadow!(build);

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod external;
pub mod logger;
pub mod metrics;
pub mod models;
pub mod policy;
pub mod repositories;
pub mod schema;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

pub use state::AppState;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
