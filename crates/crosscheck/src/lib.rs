// Copyright 2026 Crosscheck Contributors
// SPDX-License-Identifier: Apache-2.0

//! Crosscheck: does a rendered page section say the same thing as the API?
//!
//! Renders an article in a browser and reads one section by DOM lookup,
//! fetches the same article from the plain-text extract API and cuts the
//! same section out of the raw body, normalizes both texts identically,
//! and compares how many distinct words each side has.

pub mod acquisition;
pub mod config;
pub mod error;
pub mod extract;
pub mod renderer;
pub mod report;
pub mod scenario;
pub mod text;

pub use config::CheckConfig;
pub use error::{CheckError, CheckResult};
pub use scenario::{run_check, Comparison, Scenario, Stage};
