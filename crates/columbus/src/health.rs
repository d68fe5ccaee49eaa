// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `columbus health` command implementation.

use colored::Colorize;
use columbus_core::{ChatTransport, ColumbusError};

/// Probes the server and prints its status.
///
/// Returns `Ok(false)` when the server answered but did not report itself healthy.
pub async fn run_health(transport: &dyn ChatTransport) -> Result<bool, ColumbusError> {
    let report = transport.health_check().await?;
    let healthy = report.is_healthy();
    let status = if healthy {
        report.status.green()
    } else {
        report.status.yellow()
    };
    println!("server: {status} {}", report.timestamp.dimmed());
    Ok(healthy)
}
