// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `vibeflow agent-doc` - print an embedded agent instruction template

use anyhow::{bail, Result};
use vf_engine::agentdocs;

pub fn handle(provider: &str) -> Result<()> {
    match agentdocs::doc_template(provider) {
        Some(template) => {
            print!("{}", template);
            Ok(())
        }
        None => bail!("no agent doc for provider {:?}", provider),
    }
}
