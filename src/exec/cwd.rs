// src/exec/cwd.rs

use std::env;
use std::path::{Path, PathBuf};

use tracing::{debug, error};

use crate::errors::Result;

/// Scoped change of the process working directory.
///
/// `enter` records the current directory and switches to the target. On the
/// normal path call [`restore`](Self::restore) so a failure to switch back is
/// reported; otherwise dropping the guard switches back, on every exit path
/// including `?` and panics unwinding through the owner. Only one guard should
/// be alive at a time, as the working directory is process-global.
#[derive(Debug)]
pub struct WorkingDirGuard {
    previous: PathBuf,
    restored: bool,
}

impl WorkingDirGuard {
    pub fn enter(target: &Path) -> Result<Self> {
        let previous = env::current_dir()?;
        env::set_current_dir(target)?;
        debug!(from = %previous.display(), to = %target.display(), "changed working directory");
        Ok(Self {
            previous,
            restored: false,
        })
    }

    /// The directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Switch back now. On error the drop still retries once.
    pub fn restore(mut self) -> Result<()> {
        env::set_current_dir(&self.previous)?;
        self.restored = true;
        debug!(to = %self.previous.display(), "restored working directory");
        Ok(())
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        match env::set_current_dir(&self.previous) {
            Ok(()) => debug!(to = %self.previous.display(), "restored working directory"),
            Err(e) => error!(
                to = %self.previous.display(),
                error = %e,
                "failed to restore working directory"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(cwd)]
    fn restores_on_drop() {
        let before = env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        {
            let guard = WorkingDirGuard::enter(dir.path()).unwrap();
            assert_eq!(guard.previous(), before.as_path());
            assert_eq!(
                env::current_dir().unwrap(),
                std::fs::canonicalize(dir.path()).unwrap()
            );
        }
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial(cwd)]
    fn restores_when_an_error_propagates() {
        fn fails_inside(dir: &Path) -> Result<()> {
            let _guard = WorkingDirGuard::enter(dir)?;
            Err(crate::errors::TaskwireError::PublishFailed { code: 1 })
        }

        let before = env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        assert!(fails_inside(dir.path()).is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial(cwd)]
    fn explicit_restore_switches_back() {
        let before = env::current_dir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let guard = WorkingDirGuard::enter(dir.path()).unwrap();
        guard.restore().unwrap();
        assert_eq!(env::current_dir().unwrap(), before);
    }

    #[test]
    #[serial(cwd)]
    fn restore_reports_a_vanished_origin() {
        let before = env::current_dir().unwrap();
        let origin = tempfile::tempdir().unwrap();
        let target = tempfile::tempdir().unwrap();
        env::set_current_dir(origin.path()).unwrap();

        let guard = WorkingDirGuard::enter(target.path()).unwrap();
        let origin_path = origin.path().to_path_buf();
        origin.close().unwrap();
        assert!(!origin_path.exists());

        let result = guard.restore();
        env::set_current_dir(&before).unwrap();
        assert!(matches!(
            result,
            Err(crate::errors::TaskwireError::IoError(_))
        ));
    }

    #[test]
    #[serial(cwd)]
    fn missing_target_leaves_cwd_untouched() {
        let before = env::current_dir().unwrap();
        assert!(WorkingDirGuard::enter(Path::new("/definitely/not/a/dir")).is_err());
        assert_eq!(env::current_dir().unwrap(), before);
    }
}
