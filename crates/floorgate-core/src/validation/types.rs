use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a finding, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational, never affects the disposition
    Info,
    /// Worth a reviewer's attention
    Warning,
    /// Out of policy but buildable
    Error,
    /// Physically impossible
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// A coded finding emitted by a validator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Stable machine-readable code, e.g. `GEOM_DOOR_WIDTH`
    pub code: String,
    /// Human-readable message
    pub message: String,
    /// Offending property path, e.g. `doors[0].width`
    pub path: String,
    /// Severity
    pub severity: Severity,
    /// Suggested fixes
    #[serde(default)]
    pub suggested_fixes: Vec<String>,
    /// Validator that produced the finding
    pub validator: String,
}

impl ValidationError {
    /// Create a finding; the validator name is filled in by the pipeline
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        severity: Severity,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            path: path.into(),
            severity,
            suggested_fixes: Vec::new(),
            validator: String::new(),
        }
    }

    /// Add a suggested fix
    #[must_use]
    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.suggested_fixes.push(fix.into());
        self
    }

    /// Render as a correction hint for providers
    #[must_use]
    pub fn as_hint(&self) -> String {
        match self.suggested_fixes.first() {
            Some(fix) => format!("{} at {}: {} ({})", self.code, self.path, self.message, fix),
            None => format!("{} at {}: {}", self.code, self.path, self.message),
        }
    }
}

/// Disposition of one validation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// No errors and high confidence
    Valid,
    /// Errors a correction pass could fix
    InvalidButCorrectable,
    /// A human must look at it
    RequiresManualReview,
    /// Too broken to build
    Rejected,
}

impl ValidationStatus {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::InvalidButCorrectable => "invalid_but_correctable",
            Self::RequiresManualReview => "requires_manual_review",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one validation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Correlation id
    pub correlation_id: String,
    /// Attempt number (1 = first, 2 = correction pass or reviewer edit)
    pub attempt: u32,
    /// Disposition
    pub status: ValidationStatus,
    /// Findings of severity error or critical
    pub errors: Vec<ValidationError>,
    /// Findings of severity warning or info
    pub warnings: Vec<ValidationError>,
    /// Aggregate confidence in [0, 1]
    pub confidence: f64,
    /// Whether a human must review before anything is built
    pub requires_human_review: bool,
    /// The proposal came from the fallback generator
    pub used_fallback: bool,
    /// When the decision was made
    pub timestamp: DateTime<Utc>,
}

impl ValidationResult {
    /// All findings, errors first
    pub fn findings(&self) -> impl Iterator<Item = &ValidationError> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Number of critical findings
    #[must_use]
    pub fn critical_count(&self) -> usize {
        self.errors
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count()
    }

    /// Correction hints for a provider, one per error
    #[must_use]
    pub fn correction_hints(&self) -> Vec<String> {
        self.errors.iter().map(ValidationError::as_hint).collect()
    }
}

/// What the pipeline hands to the decision engine
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutcome {
    /// Every finding, merged in validator order without deduplication
    pub findings: Vec<ValidationError>,
    /// Aggregate confidence
    pub confidence: f64,
    /// The proposal came from the fallback generator
    pub used_fallback: bool,
}

impl PipelineOutcome {
    /// Count findings of a given severity
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.findings.iter().filter(|f| f.severity == severity).count()
    }
}
