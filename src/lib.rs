// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregator;
pub mod alerts;
pub mod analysis;
pub mod charts;
pub mod cli;
pub mod commands;
pub mod db;
pub mod error;
pub mod models;
pub mod recurring;
pub mod utils;
pub mod validation;
