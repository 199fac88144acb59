//! Colored terminal output utilities.

use console::{Style, Term};
use mantree_manpages::StageReport;
use mantree_publish::PublishReport;

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print the staging summary.
    pub(crate) fn stage_report(&self, report: &StageReport) {
        self.info(&stage_summary(report));
        for name in &report.malformed {
            self.warning(&format!("Left in place (malformed name): {name}"));
        }
    }

    /// Print the publishing summary.
    pub(crate) fn publish_report(&self, report: &PublishReport) {
        for path in &report.copied {
            self.info(&format!("  updated {}", path.display()));
        }
        for path in &report.stale {
            let verb = if report.pruned { "removed" } else { "stale" };
            self.warning(&format!("  {verb} {}", path.display()));
        }
        self.success(&publish_summary(report));
    }
}

/// One-line staging summary.
pub(crate) fn stage_summary(report: &StageReport) -> String {
    format!(
        "Staged {} pages ({} relocated, {} in place), {} navigation blocks",
        report.relocated + report.in_place + report.malformed.len(),
        report.relocated,
        report.in_place,
        report.navigation_blocks
    )
}

/// One-line publishing summary.
pub(crate) fn publish_summary(report: &PublishReport) -> String {
    let mut summary = format!(
        "Published {} changed files, {} unchanged",
        report.copied.len(),
        report.unchanged
    );
    if !report.stale.is_empty() {
        let verb = if report.pruned { "pruned" } else { "stale" };
        summary.push_str(&format!(", {} {verb}", report.stale.len()));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn test_stage_summary() {
        let report = StageReport {
            relocated: 3,
            in_place: 1,
            malformed: vec!["a__b.md".to_owned()],
            navigation_blocks: 2,
        };
        assert_eq!(
            stage_summary(&report),
            "Staged 5 pages (3 relocated, 1 in place), 2 navigation blocks"
        );
    }

    #[test]
    fn test_publish_summary_without_stale() {
        let report = PublishReport {
            copied: vec![PathBuf::from("a.md")],
            unchanged: 4,
            ..PublishReport::default()
        };
        assert_eq!(
            publish_summary(&report),
            "Published 1 changed files, 4 unchanged"
        );
    }

    #[test]
    fn test_publish_summary_with_stale() {
        let report = PublishReport {
            stale: vec![PathBuf::from("old.md"), PathBuf::from("old/x.md")],
            pruned: true,
            ..PublishReport::default()
        };
        assert_eq!(
            publish_summary(&report),
            "Published 0 changed files, 0 unchanged, 2 pruned"
        );
    }
}
