use anyhow::{Context, Result};
use log::warn;
use std::fs;

/// One entry from `/proc/<pid>/fdinfo`: the descriptor name and the kernel's
/// textual info block for it.
#[derive(Debug, Clone)]
pub struct FdEntry {
    pub name: String,
    pub content: String,
}

/// List the open descriptors of a process with their fdinfo contents.
///
/// An unreadable directory is an error; an unreadable individual entry is
/// logged and skipped (descriptors come and go while we read).
pub fn list_fd_info(pid: u32) -> Result<Vec<FdEntry>> {
    let dir = format!("/proc/{pid}/fdinfo");
    let entries = fs::read_dir(&dir).with_context(|| format!("failed to read {dir}"))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("{dir}: unreadable entry: {e}");
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        match fs::read_to_string(entry.path()) {
            Ok(content) => out.push(FdEntry { name, content }),
            Err(e) => warn!("{dir}/{name}: {e}"),
        }
    }
    Ok(out)
}
