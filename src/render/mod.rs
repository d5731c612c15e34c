//! 结果渲染 - 展示层
//!
//! 根据会话状态生成纯文本视图。只读状态，不参与流程。

use std::fmt::Write;

use crate::config::Config;
use crate::services::{SummaryField, SummaryRecord};
use crate::utils::truncate_text;
use crate::workflow::{Phase, SessionState, StatusKind};

const TEXT_FIELDS_BEFORE_GRADING: &[SummaryField] = &[
    SummaryField::Course,
    SummaryField::Term,
    SummaryField::MeetingTime,
    SummaryField::Room,
    SummaryField::Instructor,
    SummaryField::Email,
    SummaryField::Office,
    SummaryField::OfficeHours,
];

/// 渲染参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// 原始文本预览的最大字符数
    pub preview_chars: usize,
    /// 重要日期最多展示条数
    pub max_important_dates: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            preview_chars: 1000,
            max_important_dates: 10,
        }
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            preview_chars: config.preview_chars,
            max_important_dates: config.max_important_dates,
        }
    }
}

/// 各个动作当前是否可用
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub upload: bool,
    pub summarize: bool,
    pub reset: bool,
}

pub fn controls(state: &SessionState) -> Controls {
    Controls {
        upload: !state.busy(),
        summarize: !state.busy() && state.has_text(),
        reset: true,
    }
}

/// 渲染整个会话
pub fn render(state: &SessionState, options: &RenderOptions) -> String {
    let mut out = String::new();

    let file_name = if state.file_name().is_empty() {
        "No file selected"
    } else {
        state.file_name()
    };
    let _ = writeln!(out, "File: {}", file_name);

    match state.phase() {
        Phase::Uploading => {
            let _ = writeln!(out, "⏳ Extracting text...");
        }
        Phase::Summarizing => {
            let _ = writeln!(out, "⏳ Analyzing...");
        }
        Phase::Idle => {}
    }

    if let Some(status) = state.status() {
        let marker = match status.kind {
            StatusKind::Success if status.text.starts_with('✓') => "",
            StatusKind::Success => "✓ ",
            StatusKind::Error => "✗ ",
        };
        let _ = writeln!(out, "{}{}", marker, status.text);
    }

    if let Some(summary) = state.summary() {
        out.push_str(&render_summary(summary, options));
    } else if state.has_text() {
        let _ = writeln!(out, "\nRaw Extracted Text (Preview)");
        let preview: String = state.raw_text().chars().take(options.preview_chars).collect();
        let _ = writeln!(out, "{}...", preview);
    }

    out
}

/// 渲染摘要部分
pub fn render_summary(summary: &SummaryRecord, options: &RenderOptions) -> String {
    let mut out = String::from("\nSummary\n");

    for field in TEXT_FIELDS_BEFORE_GRADING {
        if let Some(value) = summary.field(*field) {
            section(&mut out, field.label(), value);
        }
    }

    let rows = grading_rows(summary);
    if !rows.is_empty() {
        let _ = writeln!(out, "\n## Grading Breakdown");
        for row in rows {
            let _ = writeln!(out, "{}", row);
        }
    }

    if let Some(value) = summary.field(SummaryField::AttendancePolicy) {
        section(&mut out, SummaryField::AttendancePolicy.label(), value);
    }

    let dates = important_dates(summary, options.max_important_dates);
    if !dates.is_empty() {
        let _ = writeln!(out, "\n## Important Dates");
        for date in dates {
            let _ = writeln!(out, "| {}", date);
        }
    }

    if let Some(text) = summary.free_text() {
        section(&mut out, "Notes", text);
    }

    out
}

/// 成绩构成行，保持服务返回的顺序；非数字权重按原文显示
pub fn grading_rows(summary: &SummaryRecord) -> Vec<String> {
    summary
        .grading_weights
        .iter()
        .map(|item| format!("{:<40} {}%", truncate_text(&item.component, 40), item.weight_percent))
        .collect()
}

/// 最多 `limit` 条重要日期
pub fn important_dates(summary: &SummaryRecord, limit: usize) -> Vec<&str> {
    summary
        .important_dates
        .iter()
        .map(String::as_str)
        .take(limit)
        .collect()
}

fn section(out: &mut String, title: &str, content: &str) {
    let _ = writeln!(out, "\n## {}", title);
    let _ = writeln!(out, "{}", content);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GradingWeight, WeightValue};
    use crate::workflow::StatusMessage;

    fn summary_with_weights() -> SummaryRecord {
        SummaryRecord {
            course: Some("CS 101".to_string()),
            room: Some("  ".to_string()),
            grading_weights: vec![
                GradingWeight {
                    component: "Midterm".to_string(),
                    weight_percent: WeightValue::Number(30.0),
                },
                GradingWeight {
                    component: "Final".to_string(),
                    weight_percent: WeightValue::Number(70.0),
                },
            ],
            ..SummaryRecord::default()
        }
    }

    #[test]
    fn test_grading_rows_keep_order() {
        let rows = grading_rows(&summary_with_weights());
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("Midterm"));
        assert!(rows[0].ends_with("30%"));
        assert!(rows[1].starts_with("Final"));
        assert!(rows[1].ends_with("70%"));
    }

    #[test]
    fn test_non_numeric_weight_is_shown_verbatim() {
        let mut summary = summary_with_weights();
        summary.grading_weights.insert(
            1,
            GradingWeight {
                component: "Participation".to_string(),
                weight_percent: WeightValue::Text("TBD".to_string()),
            },
        );

        let rows = grading_rows(&summary);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].starts_with("Participation"));
        assert!(rows[1].ends_with(" TBD%"));
        assert!(rows[2].ends_with(" 70%"));
    }

    #[test]
    fn test_only_first_ten_dates_shown() {
        let summary = SummaryRecord {
            important_dates: (1..=15).map(|i| format!("Date {}", i)).collect(),
            ..SummaryRecord::default()
        };
        let dates = important_dates(&summary, 10);
        assert_eq!(dates.len(), 10);
        assert_eq!(dates[0], "Date 1");
        assert_eq!(dates[9], "Date 10");

        let text = render_summary(&summary, &RenderOptions::default());
        assert!(text.contains("| Date 10\n"));
        assert!(!text.contains("Date 11"));
    }

    #[test]
    fn test_absent_fields_are_not_rendered() {
        let text = render_summary(&summary_with_weights(), &RenderOptions::default());
        assert!(text.contains("## Course Information\nCS 101"));
        assert!(!text.contains("## Room"));
        assert!(!text.contains("## Important Dates"));
        assert!(text.contains("## Grading Breakdown"));
    }

    #[test]
    fn test_empty_session() {
        let text = render(&SessionState::default(), &RenderOptions::default());
        assert_eq!(text, "File: No file selected\n");
    }

    #[test]
    fn test_raw_text_preview_is_truncated() {
        let state = SessionState {
            file_name: "long.pdf".to_string(),
            raw_text: "a".repeat(1500),
            status: Some(StatusMessage::success("✓ Extracted 1500 characters.")),
            ..SessionState::default()
        };
        let text = render(&state, &RenderOptions::default());
        assert!(text.contains("File: long.pdf"));
        assert!(text.contains("✓ Extracted 1500 characters."));
        assert!(text.contains(&format!("{}...", "a".repeat(1000))));
        assert!(!text.contains(&"a".repeat(1001)));
    }

    #[test]
    fn test_error_status_is_marked() {
        let state = SessionState {
            status: Some(StatusMessage::error("bad file")),
            ..SessionState::default()
        };
        assert!(render(&state, &RenderOptions::default()).contains("✗ bad file"));
    }

    #[test]
    fn test_controls_follow_state() {
        let idle = SessionState::default();
        assert_eq!(
            controls(&idle),
            Controls {
                upload: true,
                summarize: false,
                reset: true
            }
        );

        let busy = SessionState {
            raw_text: "text".to_string(),
            phase: Phase::Summarizing,
            ..SessionState::default()
        };
        let c = controls(&busy);
        assert!(!c.upload);
        assert!(!c.summarize);
        assert!(c.reset);

        let ready = SessionState {
            raw_text: "text".to_string(),
            ..SessionState::default()
        };
        assert!(controls(&ready).summarize);
    }
}
