// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the session core and its external collaborators.

pub mod transport;

pub use transport::ChatTransport;
