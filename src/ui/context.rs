//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// Environment variables set by common CI providers
const CI_VARS: [&str; 9] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// UI context that determines status output behavior
///
/// Tool results go to stdout; everything this context governs goes to
/// stderr so piping `daggers svu` into a file stays clean.
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    quiet: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
            quiet: false,
        }
    }

    /// Create a non-interactive context (for testing or explicit CI mode)
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            quiet: false,
        }
    }

    /// Suppress spinners (verbose runs log engine output instead)
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Check if we should draw spinners
    pub fn use_fancy_output(&self) -> bool {
        self.interactive && !self.quiet
    }

    fn detect_interactive() -> bool {
        if !std::io::stderr().is_terminal() {
            return false;
        }
        !CI_VARS.iter().any(|var| std::env::var_os(var).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_context() {
        let ctx = UiContext::non_interactive();
        assert!(!ctx.is_interactive());
        assert!(!ctx.use_fancy_output());
    }

    #[test]
    fn quiet_disables_fancy_output() {
        let ctx = UiContext {
            interactive: true,
            quiet: false,
        };
        assert!(ctx.use_fancy_output());
        assert!(!ctx.with_quiet(true).use_fancy_output());
    }
}
