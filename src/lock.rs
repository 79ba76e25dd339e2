use anyhow::{Context, Result};
use fs2::FileExt;
use std::env;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = "brief.lock";

/// Advisory exclusive lock that keeps two instances from working the same
/// host at once. Held for the lifetime of the value; the lock file itself is
/// never deleted, only unlocked.
#[derive(Debug)]
pub struct InstanceLock {
    file: File,
    path: PathBuf,
}

impl InstanceLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

pub fn lock_file_path() -> PathBuf {
    match env::var("BRIEF_LOCK_PATH") {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => env::temp_dir().join(LOCK_FILE_NAME),
    }
}

pub fn acquire() -> Result<InstanceLock> {
    acquire_at(lock_file_path())
}

pub fn acquire_at(path: PathBuf) -> Result<InstanceLock> {
    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .with_context(|| format!("failed to create lock file {}", path.display()))?;

    if file.try_lock_exclusive().is_err() {
        let mut raw = String::new();
        let _ = file.read_to_string(&mut raw);
        if let Ok(pid) = raw.trim().parse::<u32>() {
            anyhow::bail!("another instance is already running (pid {pid})");
        }
        anyhow::bail!("another instance is already running");
    }

    file.set_len(0)
        .with_context(|| format!("failed to truncate lock file {}", path.display()))?;
    file.seek(SeekFrom::Start(0))?;
    writeln!(file, "{}", std::process::id())?;
    file.flush()?;

    Ok(InstanceLock { file, path })
}

#[cfg(test)]
mod tests {
    use super::acquire_at;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn second_acquisition_fails_while_the_first_is_held() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("brief.lock");

        let held = acquire_at(path.clone()).expect("first lock");
        let contended = acquire_at(path.clone());
        assert!(contended.is_err());
        let message = format!("{:#}", contended.expect_err("contended"));
        assert!(message.contains("another instance is already running"));

        drop(held);
        let reacquired = acquire_at(path);
        assert!(reacquired.is_ok());
    }

    #[test]
    fn lock_file_records_the_holder_pid() {
        let tmp = tempdir().expect("tempdir");
        let path = tmp.path().join("brief.lock");

        let held = acquire_at(path.clone()).expect("lock");
        let recorded = fs::read_to_string(held.path()).expect("read lock file");
        assert_eq!(
            recorded.trim().parse::<u32>().expect("pid"),
            std::process::id()
        );
    }
}
