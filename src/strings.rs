// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static COLON: &str = ":";
pub(crate) static DOUBLE_COLON: &str = "::";

// lib.rs
pub(crate) static ERR_PARSE: &str = "invalid IP address";
pub(crate) static ERR_INCOMPATIBLE: &str = "IPv6 address is incompatible with IPv4";
pub(crate) static ERR_CLASS: &str = "not a valid IP class, must be A, B, C, D or E";
pub(crate) static ERR_MISMATCH: &str = "cannot mix IPv4 and IPv6 in range";
