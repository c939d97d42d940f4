// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Agent instruction files and prompt injection.
//!
//! Each agent kind reads a well-known markdown file on startup (CLAUDE.md,
//! AGENTS.md, GEMINI.md). The bundled templates carry a vibeflow rules
//! section; `ensure_doc` installs the template or appends just the section,
//! always preserving user content. Per-launch prompts are injected between
//! marker comments so a relaunch replaces the old prompt instead of
//! stacking a new copy.

use std::path::Path;

/// Heading identifying the vibeflow rules section in every template.
const SECTION_MARKER: &str = "## vibeflow Agent Session Rules";

/// Marker comment delimiting an injected prompt block.
const PROMPT_MARKER: &str = "<!-- vibeflow-agent-prompt -->";

/// Prompt file written for agents that don't read an instruction doc.
pub const PROMPT_FILE_NAME: &str = ".vibeflow-prompt";

/// The instruction file an agent kind reads on startup, with its bundled
/// template.
fn doc_for_kind(kind: &str) -> Option<(&'static str, &'static str)> {
    match kind {
        "claude" => Some(("CLAUDE.md", include_str!("agentdocs/CLAUDE.md"))),
        "codex" => Some(("AGENTS.md", include_str!("agentdocs/AGENTS.md"))),
        "gemini" => Some(("GEMINI.md", include_str!("agentdocs/GEMINI.md"))),
        _ => None,
    }
}

/// The embedded instruction template for an agent kind.
pub fn doc_template(kind: &str) -> Option<&'static str> {
    doc_for_kind(kind).map(|(_, template)| template)
}

/// Ensure the agent doc for `kind` in `work_dir` carries the vibeflow rules
/// section.
///
/// Missing file: the full template is written. Existing file without the
/// section: the section alone is appended, preserving user content.
/// Section already present: no change. Returns the filename written, or
/// `None` when nothing changed.
pub fn ensure_doc(work_dir: &Path, kind: &str) -> Option<String> {
    let (file_name, template) = doc_for_kind(kind)?;
    let dest = work_dir.join(file_name);

    let existing = match std::fs::read_to_string(&dest) {
        Ok(content) => content,
        Err(_) => {
            std::fs::write(&dest, template).ok()?;
            return Some(file_name.to_string());
        }
    };

    if existing.contains(SECTION_MARKER) {
        return None;
    }

    let section = extract_section(template)?;
    let content = format!("{}\n\n{}\n", existing.trim_end_matches('\n'), section);
    std::fs::write(&dest, content).ok()?;
    Some(file_name.to_string())
}

/// Ensure instruction docs for every known agent kind exist in `work_dir`.
pub fn ensure_all(work_dir: &Path) {
    for kind in ["claude", "codex", "gemini"] {
        let _ = ensure_doc(work_dir, kind);
    }
}

/// The vibeflow rules section of a template, from the marker heading to
/// the end.
fn extract_section(template: &str) -> Option<&str> {
    let idx = template.find(SECTION_MARKER)?;
    Some(template[idx..].trim_end_matches('\n'))
}

/// Inject the per-launch agent prompt into the instruction doc for `kind`.
///
/// The prompt lands between [`PROMPT_MARKER`] comments; an existing block
/// is replaced and user content outside the markers is preserved.
pub fn inject_prompt(
    work_dir: &Path,
    kind: &str,
    prompt: &str,
    project: &str,
    persona: &str,
    session_id: &str,
) -> std::io::Result<()> {
    let Some((file_name, _)) = doc_for_kind(kind) else {
        return Ok(());
    };
    let dest = work_dir.join(file_name);

    let section = format!(
        "{marker}\n# VibeFlow Agent Session\n\n- **Project**: {project}\n- **Persona**: {persona}\n- **Session ID**: {session_id}\n\n{prompt}\n{marker}\n",
        marker = PROMPT_MARKER,
    );

    let content = match std::fs::read_to_string(&dest) {
        Ok(existing) => {
            let cleaned = strip_prompt_block(&existing);
            format!("{}\n\n{}", cleaned.trim_end_matches('\n'), section)
        }
        Err(_) => section,
    };
    std::fs::write(&dest, content)
}

/// Write the sibling prompt file for agents without an integrated doc,
/// mode 0600.
pub fn write_prompt_file(work_dir: &Path, prompt: &str) -> std::io::Result<()> {
    let path = work_dir.join(PROMPT_FILE_NAME);
    std::fs::write(&path, prompt)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Remove a previously injected prompt block (both markers inclusive).
fn strip_prompt_block(content: &str) -> String {
    let Some(start) = content.find(PROMPT_MARKER) else {
        return content.to_string();
    };
    let after_start = start + PROMPT_MARKER.len();
    let Some(end_rel) = content[after_start..].find(PROMPT_MARKER) else {
        return content.to_string();
    };
    let end = after_start + end_rel + PROMPT_MARKER.len();
    let mut out = String::with_capacity(content.len());
    out.push_str(&content[..start]);
    out.push_str(&content[end..]);
    out
}

#[cfg(test)]
#[path = "agentdocs_tests.rs"]
mod tests;
