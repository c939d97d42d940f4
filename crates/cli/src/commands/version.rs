// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow version` - print version information

pub fn handle() {
    println!("vibeflow {}", env!("CARGO_PKG_VERSION"));
    println!("  commit: {}", option_env!("VIBEFLOW_COMMIT").unwrap_or("unknown"));
    println!("  built:  {}", option_env!("VIBEFLOW_BUILD_DATE").unwrap_or("unknown"));
}
