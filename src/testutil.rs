//! Shared test helpers.
//!
//! Tests run in parallel, so anything that touches the process-wide working
//! directory goes through [`with_temp_cwd`], which serializes on a mutex.

#[cfg(test)]
use std::sync::Mutex;

#[cfg(test)]
use tempfile::TempDir;

/// Held while a test has the working directory changed.
#[cfg(test)]
pub static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Run `f` with a fresh temporary directory as the working directory,
/// restoring the previous one afterward.
///
/// Used for config loading, which looks for `sprint-import.toml` relative to
/// the working directory.
#[cfg(test)]
pub fn with_temp_cwd<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = CWD_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let original = std::env::current_dir().expect("failed to get current directory");
    let temp = TempDir::new().expect("failed to create temp directory");
    std::env::set_current_dir(temp.path()).expect("failed to change to temp directory");
    let result = f();
    std::env::set_current_dir(original).expect("failed to restore original directory");
    result
}

/// Create a temporary sprint directory holding `files` as `(name, content)`.
#[cfg(test)]
pub fn sprint_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp directory");
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).expect("failed to write sprint file");
    }
    dir
}
