//! Shared test harness modules for the skatepark CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;

mod command_steps;
mod helpers;
