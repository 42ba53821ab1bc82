//! Preset editor validator
//!
//! Every rule inspects the preset on its own and may report issues. An issue
//! that can be repaired mechanically carries the id of a [`Fix`]; applying the
//! fix removes the condition, so applying it twice is harmless.

mod fixes;
mod rules;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::model::{FFmpegPreset, RateControlMode};

pub use fixes::{apply_all_fixes, apply_fix};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueLevel {
    Error,
    Warning,
}

/// Editor section an issue belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueGroup {
    General,
    Input,
    Mapping,
    Video,
    Audio,
    Filters,
}

/// Optional preset field a fix can clear
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldTag {
    SeekPosition,
    Duration,
    InputTimeOffset,
    StreamLoop,
    MapMetadataIndex,
    MapChaptersIndex,
    AudioBitrate,
    AudioSampleRate,
    AudioChannels,
}

impl FieldTag {
    /// JSON path of the field
    pub fn path(&self) -> &'static str {
        match self {
            FieldTag::SeekPosition => "input.seekPosition",
            FieldTag::Duration => "input.duration",
            FieldTag::InputTimeOffset => "input.inputTimeOffset",
            FieldTag::StreamLoop => "input.streamLoop",
            FieldTag::MapMetadataIndex => "mapping.mapMetadataFromInputFileIndex",
            FieldTag::MapChaptersIndex => "mapping.mapChaptersFromInputFileIndex",
            FieldTag::AudioBitrate => "audio.bitrate",
            FieldTag::AudioSampleRate => "audio.sampleRateHz",
            FieldTag::AudioChannels => "audio.channels",
        }
    }
}

/// Mechanical repair, applied by exhaustive match in [`FixKind::apply`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FixKind {
    DisableAdvanced,
    ClearField { field: FieldTag },
    TruncateStreamLoop,
    AppendMetadataSeparator { index: usize },
    AppendDispositionDefault { index: usize },
    RaiseMaxrate { target_kbps: i32 },
    SetBufsize { kbits: i32 },
    SetRateControl { mode: RateControlMode },
    ClampQuality { value: i32 },
    SetPreset { preset: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub level: IssueLevel,
    pub group: IssueGroup,
    pub field: Option<String>,
    pub message_key: String,
    pub params: BTreeMap<String, String>,
    pub fix_id: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fix {
    pub id: usize,
    pub group: IssueGroup,
    pub field: Option<String>,
    pub label_key: String,
    pub kind: FixKind,
}

/// Per-group badge counts and the fixes offered in that group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub errors: usize,
    pub warnings: usize,
    /// Ids into [`ValidationReport::fixes`]
    pub fixes: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
    pub fixes: Vec<Fix>,
    pub by_group: BTreeMap<IssueGroup, GroupSummary>,
}

impl ValidationReport {
    pub fn fix(&self, id: usize) -> Option<&Fix> {
        self.fixes.iter().find(|f| f.id == id)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.level == IssueLevel::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(|i| i.level == IssueLevel::Warning)
    }

    /// Issues reported against one field
    pub fn issues_for(&self, field: &str) -> impl Iterator<Item = &Issue> + '_ {
        let field = field.to_string();
        self.issues
            .iter()
            .filter(move |i| i.field.as_deref() == Some(field.as_str()))
    }
}

/// Issue under construction
pub(crate) struct Finding {
    level: IssueLevel,
    group: IssueGroup,
    field: Option<String>,
    message_key: &'static str,
    params: BTreeMap<String, String>,
    fix: Option<(&'static str, FixKind)>,
}

impl Finding {
    pub(crate) fn error(group: IssueGroup, field: &str, message_key: &'static str) -> Self {
        Self::new(IssueLevel::Error, group, field, message_key)
    }

    pub(crate) fn warning(group: IssueGroup, field: &str, message_key: &'static str) -> Self {
        Self::new(IssueLevel::Warning, group, field, message_key)
    }

    fn new(level: IssueLevel, group: IssueGroup, field: &str, message_key: &'static str) -> Self {
        Self {
            level,
            group,
            field: (!field.is_empty()).then(|| field.to_string()),
            message_key,
            params: BTreeMap::new(),
            fix: None,
        }
    }

    pub(crate) fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn with_fix(mut self, label_key: &'static str, kind: FixKind) -> Self {
        self.fix = Some((label_key, kind));
        self
    }
}

/// Accumulates findings into a report, numbering fixes as they arrive
#[derive(Default)]
pub(crate) struct ReportBuilder {
    report: ValidationReport,
}

impl ReportBuilder {
    pub(crate) fn push(&mut self, finding: Finding) {
        let fix_id = finding.fix.map(|(label_key, kind)| {
            let id = self.report.fixes.len();
            self.report.fixes.push(Fix {
                id,
                group: finding.group,
                field: finding.field.clone(),
                label_key: label_key.to_string(),
                kind,
            });
            id
        });

        let summary = self.report.by_group.entry(finding.group).or_default();
        match finding.level {
            IssueLevel::Error => summary.errors += 1,
            IssueLevel::Warning => summary.warnings += 1,
        }
        summary.fixes.extend(fix_id);

        self.report.issues.push(Issue {
            level: finding.level,
            group: finding.group,
            field: finding.field,
            message_key: finding.message_key.to_string(),
            params: finding.params,
            fix_id,
        });
    }

    fn finish(self) -> ValidationReport {
        self.report
    }
}

/// Run every rule against a preset
pub fn validate_preset(preset: &FFmpegPreset) -> ValidationReport {
    let mut builder = ReportBuilder::default();
    for rule in rules::RULES {
        rule(preset, &mut builder);
    }
    let report = builder.finish();
    tracing::debug!(
        id = %preset.id,
        issues = report.issues.len(),
        fixes = report.fixes.len(),
        "preset validated"
    );
    report
}

/// True when the report holds at least one error
pub fn has_blocking_errors(report: &ValidationReport) -> bool {
    report.errors().next().is_some()
}

#[cfg(test)]
mod tests;
