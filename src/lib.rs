#![doc = include_str!("../README.md")]

pub mod path;
pub mod pattern;

pub use pattern::{PatternError, PatternResult};

use pattern::{CommandNode, ParserOptions, match_pattern, parse_pattern};

bitflags::bitflags! {
    /// Matching behavior toggles.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MatchFlags: u32 {
        /// Negate the final result of every `test()`.
        const INVERSE = 1 << 0;
        /// Compare case-sensitively; the default folds case.
        const MATCH_CASE = 1 << 1;
        /// Match the whole candidate path. Without this flag only the final
        /// path component is matched; the directory portion is stripped.
        const FULL_PATH = 1 << 2;
    }
}

/// A compiled path pattern.
///
/// `set()` compiles a pattern atomically: on a parse error the previously
/// compiled pattern (if any) stays active. `test()` takes `&self` and builds
/// its own transient matcher state, so a compiled pattern can be shared
/// across threads.
///
/// ```
/// use pathglob_rs::{GlobPattern, MatchFlags};
///
/// let glob = GlobPattern::compile("*.rs&!(mod.rs)", MatchFlags::empty()).unwrap();
/// assert!(glob.test("src/main.rs"));
/// assert!(!glob.test("src/mod.rs"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct GlobPattern {
    source: Option<String>,
    root: Option<CommandNode>,
    flags: MatchFlags,
}

impl GlobPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compile(pattern: &str, flags: MatchFlags) -> PatternResult<Self> {
        let mut glob = Self::new();
        glob.set(pattern, flags)?;
        Ok(glob)
    }

    /// Compiles `pattern` and replaces the current one. All-or-nothing: on
    /// error `self` is left untouched.
    #[tracing::instrument(level = "trace", skip(self), fields(pattern = %pattern))]
    pub fn set(&mut self, pattern: &str, flags: MatchFlags) -> PatternResult<()> {
        let options = ParserOptions {
            case_sensitive: flags.contains(MatchFlags::MATCH_CASE),
        };
        let root = parse_pattern(pattern, &options)?;
        self.source = Some(pattern.to_string());
        self.root = Some(root);
        self.flags = flags;
        Ok(())
    }

    /// Tests a candidate path. Never errors: with no compiled pattern the
    /// answer is `false`.
    #[tracing::instrument(level = "trace", skip(self, candidate), fields(len = candidate.len() as u64))]
    pub fn test(&self, candidate: &str) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        let candidate = if self.flags.contains(MatchFlags::FULL_PATH) {
            candidate
        } else {
            path::file_name(candidate)
        };
        let folded = path::fold_path(candidate, self.flags.contains(MatchFlags::MATCH_CASE));
        let hit = match_pattern(root, &folded);
        hit != self.flags.contains(MatchFlags::INVERSE)
    }

    pub fn pattern(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }

    pub fn is_set(&self) -> bool {
        self.root.is_some()
    }
}
