//! Ignore pattern management
//!
//! Supports multiple sources of ignore patterns:
//! 1. Built-in patterns (`.cedge/`, `.git/` - always active)
//! 2. `.cedgeignore` at the root (enabled by default)
//! 3. `.gitignore` at the root (optional, disabled by default)
//! 4. Config-based patterns (gitignore syntax)

use ::ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Name of the CEDGE-specific ignore file
pub const IGNORE_FILE: &str = ".cedgeignore";

/// Path components that are never tracked
const BUILTIN_IGNORED: &[&str] = &[".cedge", ".git"];

/// Ignore rule manager
pub struct IgnoreRules {
    /// Root directory every path is relative to
    root: PathBuf,

    /// `.cedgeignore` patterns
    cedgeignore: Option<Gitignore>,

    /// `.gitignore` patterns
    gitignore: Option<Gitignore>,

    /// Config patterns
    additional: Option<Gitignore>,

    config: IgnoreConfig,
}

impl IgnoreRules {
    /// Load ignore rules for a root
    pub fn load(root: &Path, config: IgnoreConfig) -> Result<Self, ::ignore::Error> {
        let mut rules = Self {
            root: root.to_path_buf(),
            cedgeignore: None,
            gitignore: None,
            additional: None,
            config,
        };

        rules.reload()?;
        Ok(rules)
    }

    /// Rebuild every matcher from disk and config
    fn reload(&mut self) -> Result<(), ::ignore::Error> {
        self.cedgeignore = if self.config.use_ignore_file {
            self.file_matcher(IGNORE_FILE)?
        } else {
            None
        };

        self.gitignore = if self.config.use_gitignore {
            self.file_matcher(".gitignore")?
        } else {
            None
        };

        self.additional = if self.config.additional_patterns.is_empty() {
            None
        } else {
            let mut builder = GitignoreBuilder::new(&self.root);
            for pattern in &self.config.additional_patterns {
                builder.add_line(None, pattern)?;
            }
            Some(builder.build()?)
        };

        Ok(())
    }

    fn file_matcher(&self, name: &str) -> Result<Option<Gitignore>, ::ignore::Error> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Ok(None);
        }

        let mut builder = GitignoreBuilder::new(&self.root);
        if let Some(err) = builder.add(&path) {
            return Err(err);
        }
        Ok(Some(builder.build()?))
    }

    /// Check if a root-relative path should be skipped
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        if is_builtin_ignored(path) {
            return true;
        }

        [&self.cedgeignore, &self.gitignore, &self.additional]
            .into_iter()
            .flatten()
            .any(|matcher| matcher.matched_path_or_any_parents(path, is_dir).is_ignore())
    }

    /// Get number of active ignore sources
    pub fn active_sources(&self) -> usize {
        1 + [&self.cedgeignore, &self.gitignore, &self.additional]
            .into_iter()
            .filter(|m| m.is_some())
            .count()
    }
}

fn is_builtin_ignored(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => BUILTIN_IGNORED.iter().any(|b| name == *b),
        _ => false,
    })
}

/// Ignore configuration (`[ignore]` table of `.cedge/config.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    /// Use `.cedgeignore` patterns (default: true)
    #[serde(default = "default_true")]
    pub use_ignore_file: bool,

    /// Use `.gitignore` patterns (default: false)
    #[serde(default)]
    pub use_gitignore: bool,

    /// Additional gitignore-style patterns
    #[serde(default)]
    pub additional_patterns: Vec<String>,
}

impl Default for IgnoreConfig {
    fn default() -> Self {
        Self {
            use_ignore_file: true,
            use_gitignore: false,
            additional_patterns: vec![],
        }
    }
}

fn default_true() -> bool {
    true
}
