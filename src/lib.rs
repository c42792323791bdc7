// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Runkeeper client: scrape-based access to a Runkeeper account.
//!
//! This crate logs in through the website's forms, lists activities by
//! month and year, fetches per-activity details and exports, and uploads
//! GPX tracks with start time, duration and distance computed locally.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::RunkeeperService;
