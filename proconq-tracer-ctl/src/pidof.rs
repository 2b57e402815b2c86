//! Resolve a process name to the set of pids that are currently attachable.
//!
//! Candidates are narrowed with a plain retaining filter, never by mutating
//! a list while iterating it — no candidate is ever silently skipped.

use std::process::Command;

/// List the pids of every running process named `process_name` that passes
/// the attachability check, in the order `pidof` reported them.
pub fn pids_by_name(process_name: &str) -> std::io::Result<Vec<u32>> {
    let output = Command::new("pidof").arg(process_name).output()?;
    if !output.status.success() {
        return Ok(Vec::new());
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let candidates: Vec<u32> = stdout
        .split_whitespace()
        .filter_map(|s| s.parse::<u32>().ok())
        .collect();

    Ok(candidates.into_iter().filter(|&pid| is_pid_attachable(pid)).collect())
}

/// Shells out to the `check_ptrace_attachability` helper; exit code 0 means attachable.
fn is_pid_attachable(pid: u32) -> bool {
    Command::new("check_ptrace_attachability")
        .arg(pid.to_string())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_process_name_yields_empty_list() {
        // "pidof" exits non-zero for a name with no matches; we must not error.
        let result = pids_by_name("definitely-not-a-real-process-name-xyz");
        assert!(result.map(|v| v.is_empty()).unwrap_or(true));
    }
}
