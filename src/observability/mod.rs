// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging for entity runs and engine invocations.
//!
//! Message types are plain structs implementing `Display`, so log text lives
//! in one place instead of being scattered across call sites. Each one also
//! implements [`messages::StructuredLog`], which emits the message with its
//! fields attached and can open a matching span.
//!
//! * `messages::entity` - run lifecycle, property inheritance, result publishing
//! * `messages::backend` - stimulus authoring, handshake conditions, engine processes
//!
//! ```rust
//! use inverter::observability::messages::{entity::EntityRunStarted, StructuredLog};
//!
//! let msg = EntityRunStarted {
//!     entity: "inverter",
//!     model: "sv",
//!     parallel: false,
//! };
//! msg.log();
//! assert!(msg.to_string().contains("sv"));
//! ```

pub mod messages;
