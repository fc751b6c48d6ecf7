//! @ai:module:intent Remove stale persistent-memory scratch files between runs
//! @ai:module:layer infrastructure
//! @ai:module:public_api ScratchCleaner
//! @ai:module:depends_on config
//! @ai:module:stateless true

use crate::config::ScratchPattern;
use globset::{Glob, GlobMatcher};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::WalkDir;

static ENV_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("Invalid env reference pattern")
});

/// @ai:intent A scratch directory and the compiled matcher for entry names
#[derive(Debug, Clone)]
struct CompiledPattern {
    dir: PathBuf,
    source: String,
    matcher: GlobMatcher,
}

/// @ai:intent Deletes directory entries matching configured wildcard patterns
#[derive(Debug, Clone, Default)]
pub struct ScratchCleaner {
    patterns: Vec<CompiledPattern>,
}

impl ScratchCleaner {
    /// @ai:intent Compile patterns, expanding `$VAR` from the process environment
    /// @ai:effects env
    pub fn new(patterns: &[ScratchPattern]) -> Self {
        Self::with_env(patterns, |name| std::env::var(name).ok())
    }

    /// @ai:intent Compile patterns with a custom variable lookup
    /// @ai:post patterns made only of wildcards are dropped with a warning
    /// @ai:effects pure
    pub fn with_env<F>(patterns: &[ScratchPattern], lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut compiled = Vec::with_capacity(patterns.len());

        for pattern in patterns {
            let expanded = expand_env(&pattern.pattern, &lookup);

            if expanded.chars().all(|c| c == '*' || c == '?') {
                tracing::warn!(
                    "Ignoring scratch pattern {:?} in {}: it would match every entry",
                    pattern.pattern,
                    pattern.dir.display()
                );
                continue;
            }

            match Glob::new(&expanded) {
                Ok(glob) => compiled.push(CompiledPattern {
                    dir: pattern.dir.clone(),
                    source: expanded,
                    matcher: glob.compile_matcher(),
                }),
                Err(e) => {
                    tracing::warn!("Ignoring scratch pattern {:?}: {}", pattern.pattern, e);
                }
            }
        }

        Self { patterns: compiled }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// @ai:intent Remove every matching entry; failures are logged, never fatal
    /// @ai:post returns the number of entries removed
    /// @ai:effects fs:read, fs:write
    pub fn purge(&self) -> usize {
        let mut removed = 0;

        for pattern in &self.patterns {
            if !pattern.dir.is_dir() {
                tracing::debug!(
                    "Scratch directory {} not present, nothing to purge",
                    pattern.dir.display()
                );
                continue;
            }

            for path in matching_entries(pattern) {
                match remove_entry(&path) {
                    Ok(()) => {
                        tracing::debug!("Removed scratch entry {}", path.display());
                        removed += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to remove scratch entry {}: {}", path.display(), e);
                    }
                }
            }
        }

        removed
    }

    /// @ai:intent Human-readable list of the active patterns
    /// @ai:effects pure
    pub fn describe(&self) -> Vec<String> {
        self.patterns
            .iter()
            .map(|p| p.dir.join(&p.source).display().to_string())
            .collect()
    }
}

/// @ai:intent Direct children of the scratch directory whose names match
/// @ai:effects fs:read
fn matching_entries(pattern: &CompiledPattern) -> Vec<PathBuf> {
    WalkDir::new(&pattern.dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!("Failed to list {}: {}", pattern.dir.display(), err);
                None
            }
        })
        .filter(|e| pattern.matcher.is_match(e.file_name()))
        .map(|e| e.path().to_path_buf())
        .collect()
}

fn remove_entry(path: &Path) -> std::io::Result<()> {
    let metadata = std::fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// @ai:intent Substitute `$VAR` and `${VAR}`; unset variables become empty
/// @ai:example ("${USER}*", USER=ann) -> "ann*"
/// @ai:effects pure
fn expand_env<F>(pattern: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_REFERENCE
        .replace_all(pattern, |caps: &regex::Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user_env(name: &str) -> Option<String> {
        (name == "USER").then(|| "ann".to_string())
    }

    #[test]
    fn test_expand_env_both_forms() {
        assert_eq!(expand_env("${USER}*", &user_env), "ann*");
        assert_eq!(expand_env("$USER-heap", &user_env), "ann-heap");
        assert_eq!(expand_env("x${MISSING}y", &user_env), "xy");
    }

    fn cleaner_for(dir: &Path, pattern: &str) -> ScratchCleaner {
        ScratchCleaner::with_env(
            &[ScratchPattern {
                dir: dir.to_path_buf(),
                pattern: pattern.to_string(),
            }],
            user_env,
        )
    }

    #[test]
    fn test_pattern_dot_is_literal() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("ann.1_heap"), "x").unwrap();
        std::fs::write(temp.path().join("annX1_heap"), "x").unwrap();

        assert_eq!(cleaner_for(temp.path(), "${USER}.?*").purge(), 1);
        assert!(!temp.path().join("ann.1_heap").exists());
        assert!(temp.path().join("annX1_heap").exists());
    }

    #[test]
    fn test_pattern_matches_whole_name() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("pool_ann"), "x").unwrap();

        assert_eq!(cleaner_for(temp.path(), "ann*").purge(), 0);
        assert!(temp.path().join("pool_ann").exists());
    }

    #[test]
    fn test_malformed_pattern_is_dropped() {
        let cleaner = cleaner_for(Path::new("/mnt/pmem"), "ann[");
        assert!(cleaner.is_empty());
    }

    #[test]
    fn test_purge_removes_only_matching_entries() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("ann_pool"), "x").unwrap();
        std::fs::create_dir(temp.path().join("ann_dir")).unwrap();
        std::fs::write(temp.path().join("ann_dir").join("inner"), "x").unwrap();
        std::fs::write(temp.path().join("bob_pool"), "x").unwrap();

        let cleaner = ScratchCleaner::with_env(
            &[ScratchPattern {
                dir: temp.path().to_path_buf(),
                pattern: "${USER}*".to_string(),
            }],
            user_env,
        );

        assert_eq!(cleaner.purge(), 2);
        assert!(!temp.path().join("ann_pool").exists());
        assert!(!temp.path().join("ann_dir").exists());
        assert!(temp.path().join("bob_pool").exists());
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let temp = TempDir::new().unwrap();
        let cleaner = ScratchCleaner::with_env(
            &[ScratchPattern {
                dir: temp.path().join("absent"),
                pattern: "ann*".to_string(),
            }],
            user_env,
        );
        assert_eq!(cleaner.purge(), 0);
    }

    #[test]
    fn test_wildcard_only_pattern_is_refused() {
        let cleaner = ScratchCleaner::with_env(
            &[ScratchPattern {
                dir: PathBuf::from("/mnt/pmem"),
                pattern: "${UNSET}*".to_string(),
            }],
            |_| None,
        );
        assert!(cleaner.is_empty());
    }
}
