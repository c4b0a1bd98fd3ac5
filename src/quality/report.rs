use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of one quality check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Analysis is kept but suspect
    Warning(String),
    /// Analysis carries no usable result
    Failed(String),
}

impl CheckStatus {
    fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }
}

/// Quality check of one analysis
#[derive(Debug, Clone, PartialEq)]
pub struct QualityCheck {
    /// Analysis identifier
    pub name: String,
    /// Result of the check
    pub status: CheckStatus,
}

impl QualityCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Ok,
        }
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Warning(message.into()),
        }
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CheckStatus::Failed(message.into()),
        }
    }
}

/// Per-analysis data-quality report
#[derive(Debug, Clone)]
pub struct QualityReport {
    /// One check per analysis, in row order
    pub checks: Vec<QualityCheck>,
    /// What was screened (mineral or input name)
    pub subject: String,
}

impl QualityReport {
    /// Create an empty report
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            subject: subject.into(),
        }
    }

    /// Add a check
    pub fn add_check(&mut self, check: QualityCheck) {
        self.checks.push(check);
    }

    /// Whether any analysis failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Whether any analysis was flagged
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Number of clean analyses
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Number of flagged analyses
    pub fn warning_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_warning()).count()
    }

    /// Number of failed analyses
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Format the report with colors (requires the `colorized_output` feature).
    ///
    /// Clean analyses are summarized, not listed.
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");
            static FAIL: Emoji<'_, '_> = Emoji("✗", "[FAIL]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Quality Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("==============").cyan()));
            output.push_str(&format!("{}: {}\n\n", style("Subject").bold(), self.subject));

            for check in &self.checks {
                match &check.status {
                    CheckStatus::Ok => {}
                    CheckStatus::Warning(msg) => output.push_str(&format!(
                        "[{}] {} - {}: {}\n",
                        WARN,
                        style(&check.name).yellow(),
                        style("WARNING").yellow().bold(),
                        msg
                    )),
                    CheckStatus::Failed(msg) => output.push_str(&format!(
                        "[{}] {} - {}: {}\n",
                        FAIL,
                        style(&check.name).red(),
                        style("FAILED").red().bold(),
                        msg
                    )),
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} passed, {} warnings, {} failed\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Quality Report")?;
        writeln!(f, "==============")?;
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f)?;

        for check in &self.checks {
            match &check.status {
                CheckStatus::Ok => {}
                CheckStatus::Warning(msg) => writeln!(f, "[⚠] {} - WARNING: {}", check.name, msg)?,
                CheckStatus::Failed(msg) => writeln!(f, "[✗] {} - FAILED: {}", check.name, msg)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )
    }
}
