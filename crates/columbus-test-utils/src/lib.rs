// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Columbus.
//!
//! Provides a scripted [`MockTransport`] and small fixtures so the session
//! orchestrator can be exercised without a server.

pub mod fixtures;
pub mod mock_transport;

pub use fixtures::{png_attachment_bytes, reply, reply_with_session};
pub use mock_transport::{MockTransport, TransportGate};
