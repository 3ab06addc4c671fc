// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Commex - Member Communication Tracking Service
//!
//! This crate tracks member communications (EOB documents, ID cards, ...)
//! through a catalog of lifecycle statuses, exposed as a REST API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `services` - Validation and orchestration over repositories
//! - `storage` - Embedded redb database and repositories
//! - `models` - Request and response DTOs

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod telemetry;
