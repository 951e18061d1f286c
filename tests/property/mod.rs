// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of the address arithmetic underlying subnet parsing.

mod address_ranges;
