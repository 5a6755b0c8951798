use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

#[derive(Debug, Default)]
struct RegistryState {
    // number of sessions constructed per sequence directory, minus one
    sequence_ids: HashMap<PathBuf, usize>,
    // sequence directories already cleared (or found absent) in this process
    cleaned: HashSet<PathBuf>,
}

/// The scene addressing table shared by every session of a process.
///
/// The first session constructed for a sequence directory clears any stale
/// output left by a previous run. Later sessions for the same directory
/// append to it, each landing in the next scene when `auto_increase` is set.
///
/// The table is guarded by a mutex which is held while a directory is
/// removed, so concurrent constructions are serialized.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    state: Mutex<RegistryState>,
}

impl SceneRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry behind an [`Arc`], ready to be shared by sessions.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// The process-wide registry used by [`crate::Wis3d::new`].
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<SceneRegistry>> = OnceLock::new();
        GLOBAL.get_or_init(SceneRegistry::shared).clone()
    }

    /// Register a new session and return its initial scene id.
    ///
    /// # Arguments
    ///
    /// * `out_folder` - The output root. Relative paths are resolved against
    ///   the current working directory.
    /// * `sequence_name` - The sequence directory under the output root.
    /// * `auto_increase` - Start at the number of earlier sessions for the same
    ///   directory instead of scene 0.
    /// * `auto_remove` - Remove the directory if it exists and has not been
    ///   cleared yet in this process.
    ///
    /// # Errors
    ///
    /// Propagates failures to resolve the working directory or remove the
    /// stale output. The table is left untouched in that case.
    pub fn resolve_session(
        &self,
        out_folder: &Path,
        sequence_name: &str,
        auto_increase: bool,
        auto_remove: bool,
    ) -> std::io::Result<usize> {
        let key = sequence_key(out_folder, sequence_name)?;
        let mut state = self.lock();

        if auto_remove && !state.cleaned.contains(&key) {
            if key.exists() {
                log::info!("removing stale output {}", key.display());
                std::fs::remove_dir_all(&key)?;
            }
            state.cleaned.insert(key.clone());
        }

        let sequence_id = match state.sequence_ids.get_mut(&key) {
            Some(id) => {
                *id += 1;
                *id
            }
            None => {
                state.sequence_ids.insert(key, 0);
                0
            }
        };

        Ok(if auto_increase { sequence_id } else { 0 })
    }

    /// Whether the sequence directory has been cleared in this process.
    pub fn is_cleaned(&self, out_folder: &Path, sequence_name: &str) -> std::io::Result<bool> {
        let key = sequence_key(out_folder, sequence_name)?;
        Ok(self.lock().cleaned.contains(&key))
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// `<out_folder>/<sequence_name>`, anchored at the working directory when relative.
pub(crate) fn sequence_key(out_folder: &Path, sequence_name: &str) -> std::io::Result<PathBuf> {
    Ok(absolute_root(out_folder)?.join(sequence_name))
}

pub(crate) fn absolute_root(out_folder: &Path) -> std::io::Result<PathBuf> {
    if out_folder.is_absolute() {
        Ok(out_folder.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(out_folder))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_session_clears_once() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let stale = tmp_dir.path().join("seq").join("00000");
        std::fs::create_dir_all(&stale)?;

        let registry = SceneRegistry::new();
        assert_eq!(registry.resolve_session(tmp_dir.path(), "seq", true, true)?, 0);
        assert!(!stale.exists());
        assert!(registry.is_cleaned(tmp_dir.path(), "seq")?);

        std::fs::create_dir_all(&stale)?;
        assert_eq!(registry.resolve_session(tmp_dir.path(), "seq", true, true)?, 1);
        assert!(stale.exists());
        Ok(())
    }

    #[test]
    fn test_missing_directory_is_marked_cleaned() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let registry = SceneRegistry::new();
        registry.resolve_session(tmp_dir.path(), "fresh", true, true)?;
        assert!(registry.is_cleaned(tmp_dir.path(), "fresh")?);

        // output written after the first session must survive the second
        let written = tmp_dir.path().join("fresh/00000/boxes");
        std::fs::create_dir_all(&written)?;
        registry.resolve_session(tmp_dir.path(), "fresh", true, true)?;
        assert!(written.exists());
        Ok(())
    }

    #[test]
    fn test_auto_remove_disabled() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let kept = tmp_dir.path().join("seq/00000");
        std::fs::create_dir_all(&kept)?;

        let registry = SceneRegistry::new();
        registry.resolve_session(tmp_dir.path(), "seq", true, false)?;
        assert!(kept.exists());
        assert!(!registry.is_cleaned(tmp_dir.path(), "seq")?);
        Ok(())
    }

    #[test]
    fn test_auto_increase() -> Result<(), Box<dyn std::error::Error>> {
        let tmp_dir = tempfile::tempdir()?;
        let registry = SceneRegistry::new();
        let ids = (0..3)
            .map(|_| registry.resolve_session(tmp_dir.path(), "a", true, true))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(ids, vec![0, 1, 2]);

        // fixed at zero, but the table still counts the session
        assert_eq!(registry.resolve_session(tmp_dir.path(), "a", false, true)?, 0);
        assert_eq!(registry.resolve_session(tmp_dir.path(), "a", true, true)?, 4);

        // other sequences are independent
        assert_eq!(registry.resolve_session(tmp_dir.path(), "b", true, true)?, 0);
        Ok(())
    }

    #[test]
    fn test_relative_key() -> Result<(), Box<dyn std::error::Error>> {
        let key = sequence_key(Path::new("out"), "seq")?;
        assert_eq!(key, std::env::current_dir()?.join("out").join("seq"));
        Ok(())
    }
}
