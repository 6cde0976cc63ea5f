// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Storefront Identity - identity and query-shaping layer for the storefront API
//!
//! Entity-agnostic building blocks shared by the storefront resolvers:
//! signed bearer tokens, per-request authentication, an authorization gate,
//! generic pagination and a free-text search compiler.
//!
//! ## Modules
//!
//! - `auth` - Token codec, request authenticator, context and gate
//! - `query` - Pagination engine and search query compiler
//! - `api` - HTTP API handlers (Axum) exercising the layer end to end
//! - `store` - In-memory principal directory and catalogue

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod state;
pub mod store;
