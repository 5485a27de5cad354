//! The command policy: blocked programs and blocked patterns.

use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use crate::error::{PolicyError, PolicyResult};

/// Both collections live behind one lock: every dispatch reads them, and the
/// two checks are independent and monotonic, so snapshot consistency between
/// them is not required.
#[derive(Debug, Default)]
struct PolicyInner {
    /// Blocked bare program names, stored lowercased.
    blocked_programs: HashSet<String>,
    /// Blocked patterns, compiled case-insensitive, in registration order.
    blocked_patterns: Vec<Regex>,
}

/// A mutable set of blocked program names and blocked command patterns.
///
/// Pure evaluation: [`CommandPolicy::check_violation`] has no side effects
/// and returns the violation message, if any. Enforcement is the caller's
/// job — see [`crate::PolicyCheckedShell`] and the dispatcher.
///
/// # Example
///
/// ```
/// use warden_policy::CommandPolicy;
///
/// let policy = CommandPolicy::new();
/// policy.block_program("shutdown");
/// policy.block_pattern(r"rm\s+-[a-z]*r[a-z]*f").unwrap();
///
/// assert!(policy.check_violation("shutdown", "/s /t 0").is_some());
/// assert!(policy.check_violation("bash", "-c 'rm -rf /'").is_some());
/// assert!(policy.check_violation("echo", "hello").is_none());
/// ```
#[derive(Debug, Default)]
pub struct CommandPolicy {
    inner: Mutex<PolicyInner>,
}

impl CommandPolicy {
    /// Create an empty policy (everything allowed).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the default policy seeded with the standard
    /// destructive-operation blocklist.
    ///
    /// Blocks disk/partition formatting tools, shutdown/reboot commands,
    /// recursive force-delete idioms, registry deletion, the fork-bomb shell
    /// idiom, and raw-device writes.
    #[must_use]
    pub fn default_policy() -> Self {
        let policy = Self::new();
        for program in [
            "format", "diskpart", "fdisk", "mkfs", "shutdown", "reboot", "halt", "poweroff",
        ] {
            policy.block_program(program);
        }
        for pattern in [
            r"rm\s+-[a-z]*r[a-z]*f",
            r"rm\s+-[a-z]*f[a-z]*r",
            r"del\s+/s",
            r"rd\s+/s\s+/q",
            r"format\s+[a-z]:",
            r"reg\s+delete",
            r":\(\)\s*\{\s*:\s*\|\s*:\s*&\s*\}\s*;\s*:",
            r"dd\s+.*\bof=/dev/",
            r">\s*/dev/sd",
        ] {
            // Seed patterns are compile-tested; registration fails loudly.
            policy
                .block_pattern(pattern)
                .expect("default policy pattern must compile");
        }
        policy
    }

    /// Block a program by bare name (case-insensitive exact match).
    ///
    /// Chainable: `policy.block_program("shutdown").block_program("reboot")`.
    pub fn block_program(&self, name: &str) -> &Self {
        self.lock().blocked_programs.insert(name.to_lowercase());
        self
    }

    /// Block every command line matching `pattern` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidPattern`] when the regex does not
    /// compile — registration fails loudly, call-time evaluation never does.
    pub fn block_pattern(&self, pattern: &str) -> PolicyResult<&Self> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| PolicyError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;
        self.lock().blocked_patterns.push(compiled);
        Ok(self)
    }

    /// Evaluate `program` + `arguments` against the policy.
    ///
    /// Returns `None` when allowed, or a human-readable violation message:
    ///
    /// 1. `program` is normalized to its bare name (path and extension
    ///    stripped) and tested against the blocked-program set;
    /// 2. `"{program} {arguments}"` is tested against every blocked pattern
    ///    in registration order; the first match wins.
    #[must_use]
    pub fn check_violation(&self, program: &str, arguments: &str) -> Option<String> {
        let inner = self.lock();

        let bare = bare_program_name(program);
        if inner.blocked_programs.contains(&bare) {
            return Some(format!("program '{bare}' is blocked"));
        }

        let command_line = format!("{program} {arguments}");
        for pattern in &inner.blocked_patterns {
            if pattern.is_match(&command_line) {
                return Some(format!("command matches blocked pattern '{}'", pattern.as_str()));
            }
        }

        None
    }

    /// Number of blocked programs (introspection).
    #[must_use]
    pub fn blocked_program_count(&self) -> usize {
        self.lock().blocked_programs.len()
    }

    /// Number of blocked patterns (introspection).
    #[must_use]
    pub fn blocked_pattern_count(&self) -> usize {
        self.lock().blocked_patterns.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PolicyInner> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Strip directory components and a trailing extension, then lowercase.
///
/// `C:\Windows\System32\shutdown.exe` and `/sbin/shutdown` both normalize
/// to `shutdown`; `mkfs.ext4` normalizes to `mkfs`.
fn bare_program_name(program: &str) -> String {
    let after_path = program
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(program);
    Path::new(after_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(after_path)
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Normalization
    // -----------------------------------------------------------------------

    #[test]
    fn test_bare_program_name() {
        assert_eq!(bare_program_name("shutdown"), "shutdown");
        assert_eq!(bare_program_name("SHUTDOWN.EXE"), "shutdown");
        assert_eq!(bare_program_name(r"C:\Windows\System32\shutdown.exe"), "shutdown");
        assert_eq!(bare_program_name("/sbin/shutdown"), "shutdown");
        assert_eq!(bare_program_name("mkfs.ext4"), "mkfs");
    }

    // -----------------------------------------------------------------------
    // Program blocking
    // -----------------------------------------------------------------------

    #[test]
    fn test_blocked_program_any_path_or_case() {
        let policy = CommandPolicy::new();
        policy.block_program("Format");

        assert!(policy.check_violation("format", "c: /q").is_some());
        assert!(policy.check_violation("FORMAT.COM", "d:").is_some());
        assert!(policy.check_violation(r"C:\Windows\format.exe", "e:").is_some());
        assert!(policy.check_violation("echo", "format").is_none());
    }

    #[test]
    fn test_chainable_builders() {
        let policy = CommandPolicy::new();
        policy.block_program("a").block_program("b");
        assert_eq!(policy.blocked_program_count(), 2);
    }

    // -----------------------------------------------------------------------
    // Pattern blocking
    // -----------------------------------------------------------------------

    #[test]
    fn test_pattern_matches_program_and_arguments_together() {
        let policy = CommandPolicy::new();
        policy.block_pattern(r"reg\s+delete").unwrap();

        // The pattern sees "{program} {arguments}"
        assert!(policy.check_violation("reg", r"delete HKCU\Test /f").is_some());
        assert!(policy.check_violation("reg", "query HKCU").is_none());
    }

    #[test]
    fn test_pattern_case_insensitive_registration_order() {
        let policy = CommandPolicy::new();
        policy.block_pattern(r"del\s+/s").unwrap();
        policy.block_pattern(r"del").unwrap();

        let message = policy.check_violation("cmd", "DEL /S C:\\data").unwrap();
        // First registered pattern wins
        assert!(message.contains(r"del\s+/s"));
    }

    #[test]
    fn test_invalid_pattern_rejected_at_registration() {
        let policy = CommandPolicy::new();
        let err = policy.block_pattern("[unclosed").unwrap_err();
        assert!(matches!(err, PolicyError::InvalidPattern { .. }));
        assert_eq!(policy.blocked_pattern_count(), 0);
    }

    // -----------------------------------------------------------------------
    // Default policy
    // -----------------------------------------------------------------------

    #[test]
    fn test_default_blocks_destructive_programs() {
        let policy = CommandPolicy::default_policy();
        for program in ["format", "shutdown", "reboot", "diskpart", "fdisk", "mkfs"] {
            assert!(
                policy.check_violation(program, "").is_some(),
                "{program} should be blocked"
            );
        }
    }

    #[test]
    fn test_default_blocks_destructive_patterns() {
        let policy = CommandPolicy::default_policy();

        assert!(policy.check_violation("rm", "-rf /").is_some());
        assert!(policy.check_violation("rm", "-fR ~/projects").is_some());
        assert!(policy.check_violation("cmd", "del /s /q C:\\Users").is_some());
        assert!(policy.check_violation("cmd", "rd /s /q C:\\data").is_some());
        assert!(policy.check_violation("reg", r"delete HKLM\Software /f").is_some());
        assert!(policy.check_violation("bash", "-c ':(){ :|:& };:'").is_some());
        assert!(policy.check_violation("dd", "if=/dev/zero of=/dev/sda").is_some());
        assert!(policy.check_violation("sh", "-c 'cat image.img > /dev/sdb'").is_some());
    }

    #[test]
    fn test_default_allows_ordinary_commands() {
        let policy = CommandPolicy::default_policy();

        assert!(policy.check_violation("echo", "hello world").is_none());
        assert!(policy.check_violation("dir", "/b").is_none());
        assert!(policy.check_violation("git", "status").is_none());
        // "rm" without the force-recursive idiom is allowed
        assert!(policy.check_violation("rm", "notes.txt").is_none());
        // reading a raw device is not a raw-device write
        assert!(policy.check_violation("dd", "if=/dev/sda of=backup.img").is_none());
    }
}
