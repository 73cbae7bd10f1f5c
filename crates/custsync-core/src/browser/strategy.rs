//! Download target enumeration.
//!
//! The dashboard exposes more than one CSV export on the customers page.
//! A strategy decides which download controls a run triggers; the CSV
//! classifier, not the target, decides which dataset the file feeds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a run enumerates the download controls on the dashboard page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum DownloadStrategy {
    /// Trigger the first `count` download controls in page order.
    Positional { count: usize },
    /// Trigger the download control inside each labelled page section.
    SectionLabels { labels: Vec<String> },
}

impl Default for DownloadStrategy {
    fn default() -> Self {
        DownloadStrategy::Positional { count: 2 }
    }
}

impl DownloadStrategy {
    /// Returns the targets to attempt, in order.
    pub fn targets(&self) -> Vec<DownloadTarget> {
        match self {
            DownloadStrategy::Positional { count } => {
                (0..*count).map(DownloadTarget::Index).collect()
            }
            DownloadStrategy::SectionLabels { labels } => labels
                .iter()
                .map(|label| DownloadTarget::SectionLabel(label.clone()))
                .collect(),
        }
    }
}

/// One download control to trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadTarget {
    /// Zero-based position among the page's download controls.
    Index(usize),
    /// The control inside the section with this heading.
    SectionLabel(String),
}

impl DownloadTarget {
    /// A short label usable in file names.
    pub fn slug(&self) -> String {
        match self {
            DownloadTarget::Index(i) => format!("download{}", i + 1),
            DownloadTarget::SectionLabel(label) => label
                .chars()
                .map(|c| if c.is_alphanumeric() { c } else { '-' })
                .collect(),
        }
    }
}

impl fmt::Display for DownloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadTarget::Index(i) => write!(f, "download #{}", i + 1),
            DownloadTarget::SectionLabel(label) => write!(f, "section '{}'", label),
        }
    }
}

/// A file produced by a download control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// The result of attempting one download target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    File(DownloadedFile),
    /// The page has no control matching the target.
    NoTarget,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_targets() {
        let targets = DownloadStrategy::Positional { count: 2 }.targets();
        assert_eq!(
            targets,
            vec![DownloadTarget::Index(0), DownloadTarget::Index(1)]
        );
    }

    #[test]
    fn test_section_label_targets_keep_order() {
        let strategy = DownloadStrategy::SectionLabels {
            labels: vec!["注文者の所在地".to_string(), "Customer trends".to_string()],
        };
        let targets = strategy.targets();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[1].to_string(), "section 'Customer trends'");
        assert_eq!(targets[1].slug(), "Customer-trends");
    }

    #[test]
    fn test_strategy_from_toml() {
        let positional: DownloadStrategy =
            toml::from_str("strategy = \"positional\"\ncount = 3").unwrap();
        assert_eq!(positional, DownloadStrategy::Positional { count: 3 });

        let labelled: DownloadStrategy =
            toml::from_str("strategy = \"section_labels\"\nlabels = [\"A\"]").unwrap();
        assert_eq!(
            labelled,
            DownloadStrategy::SectionLabels {
                labels: vec!["A".to_string()]
            }
        );
    }
}
