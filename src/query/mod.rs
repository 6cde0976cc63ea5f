// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Query shaping for listing endpoints: free-text search and pagination.

pub mod pagination;
pub mod search;

pub use pagination::{paginate, Page, PageQuery, Paginate, PaginationError, Paginator};
pub use search::{CompiledFilter, SearchCompiler, SearchError, SearchQuery, SearchTerm};
