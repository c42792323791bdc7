// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - site access and track processing.

pub mod activity;
pub mod gpx;
pub mod runkeeper;
pub mod scrape;

pub use runkeeper::{RunkeeperClient, RunkeeperService, UploadReceipt};
