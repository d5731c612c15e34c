//! 摘要记录模型
//!
//! 摘要服务返回的结构化结果。服务端是模型生成的内容，字段类型并不可靠，
//! 所以这里的解码是宽松的：能读的都读出来，读不了的原样放进 `extra`。

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// `grading_weights` 里不是对象的条目放在这个键下
pub const UNPARSED_WEIGHTS_KEY: &str = "unparsed_grading_weights";

/// 成绩构成中的一项
///
/// 缺少 `component` 时为空字符串，整行仍然保留。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradingWeight {
    pub component: String,
    pub weight_percent: WeightValue,
}

/// 权重值：能读成数字就是数字，否则保留原文（例如 "TBD"）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WeightValue {
    Number(f64),
    Text(String),
    Missing,
}

impl WeightValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            WeightValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<f64> for WeightValue {
    fn from(n: f64) -> Self {
        WeightValue::Number(n)
    }
}

impl Display for WeightValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightValue::Number(n) => write!(f, "{}", n),
            WeightValue::Text(s) => write!(f, "{}", s),
            WeightValue::Missing => write!(f, "?"),
        }
    }
}

/// 摘要记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub meeting_time: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub office_hours: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub attendance_policy: Option<String>,
    #[serde(default, deserialize_with = "lenient_weights")]
    pub grading_weights: Vec<GradingWeight>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub important_dates: Vec<String>,
    /// 未识别的字段，原样保留
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 摘要中的单值文本字段，按展示顺序排列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Course,
    Term,
    MeetingTime,
    Room,
    Instructor,
    Email,
    Office,
    OfficeHours,
    AttendancePolicy,
}

impl SummaryField {
    pub fn label(self) -> &'static str {
        match self {
            SummaryField::Course => "Course Information",
            SummaryField::Term => "Term",
            SummaryField::MeetingTime => "Meeting Time",
            SummaryField::Room => "Room",
            SummaryField::Instructor => "Instructor",
            SummaryField::Email => "Email",
            SummaryField::Office => "Office",
            SummaryField::OfficeHours => "Office Hours",
            SummaryField::AttendancePolicy => "Attendance Policy",
        }
    }
}

impl SummaryRecord {
    /// 从响应中的 `summary` 值构建记录
    ///
    /// 接受对象，也接受模型直接吐出的字符串（可能包在 ```json 代码块里）。
    /// `null` 或空白字符串返回 `None`。
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Object(map) => Some(Self::from_object(map)),
            Value::String(text) => Self::from_text(&text),
            other => {
                debug!("摘要不是对象也不是字符串，原样保留");
                let mut extra = Map::new();
                extra.insert("value".to_string(), other);
                Some(Self {
                    extra,
                    ..Self::default()
                })
            }
        }
    }

    fn from_object(map: Map<String, Value>) -> Self {
        match serde_json::from_value::<Self>(Value::Object(map.clone())) {
            Ok(mut record) => {
                if let Some(stray) = unparsed_weights(map.get("grading_weights")) {
                    debug!("成绩构成中有无法识别的条目，放入 extra.{}", UNPARSED_WEIGHTS_KEY);
                    record.extra.insert(UNPARSED_WEIGHTS_KEY.to_string(), stray);
                }
                record
            }
            Err(e) => {
                warn!("摘要对象解码失败，整体放入 extra: {}", e);
                Self {
                    extra: map,
                    ..Self::default()
                }
            }
        }
    }

    fn from_text(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(Value::Object(map)) = embedded_json_object(trimmed) {
            return Some(Self::from_object(map));
        }

        debug!("摘要是纯文本，放入 extra.text");
        let mut extra = Map::new();
        extra.insert("text".to_string(), Value::String(trimmed.to_string()));
        Some(Self {
            extra,
            ..Self::default()
        })
    }

    /// 读取单值字段；空白字符串视为缺失
    pub fn field(&self, field: SummaryField) -> Option<&str> {
        let value = match field {
            SummaryField::Course => &self.course,
            SummaryField::Term => &self.term,
            SummaryField::MeetingTime => &self.meeting_time,
            SummaryField::Room => &self.room,
            SummaryField::Instructor => &self.instructor,
            SummaryField::Email => &self.email,
            SummaryField::Office => &self.office,
            SummaryField::OfficeHours => &self.office_hours,
            SummaryField::AttendancePolicy => &self.attendance_policy,
        };
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// 无法结构化时保留下来的纯文本摘要
    pub fn free_text(&self) -> Option<&str> {
        self.extra
            .get("text")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// 在文本中找出第一个 `{` 到最后一个 `}` 之间的 JSON
fn embedded_json_object(text: &str) -> Option<Value> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}

// ========== 宽松解码 ==========

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items.into_iter().filter_map(value_to_text).collect(),
        Some(single) => value_to_text(single).into_iter().collect(),
        None => Vec::new(),
    })
}

fn lenient_weights<'de, D>(deserializer: D) -> Result<Vec<GradingWeight>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        Some(Value::Array(items)) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items.iter().filter_map(parse_weight).collect())
}

/// 只有对象才算一行；对象里的字段再怎么奇怪也保留
fn parse_weight(item: &Value) -> Option<GradingWeight> {
    let row = item.as_object()?;
    let component = row
        .get("component")
        .cloned()
        .and_then(value_to_text)
        .unwrap_or_default();
    let weight_percent = match row.get("weight_percent") {
        None | Some(Value::Null) => WeightValue::Missing,
        Some(Value::Number(n)) => n
            .as_f64()
            .map(WeightValue::Number)
            .unwrap_or_else(|| WeightValue::Text(n.to_string())),
        Some(Value::String(s)) => match s.trim().trim_end_matches('%').trim().parse() {
            Ok(n) => WeightValue::Number(n),
            Err(_) => WeightValue::Text(s.clone()),
        },
        Some(other) => WeightValue::Text(other.to_string()),
    };
    Some(GradingWeight {
        component,
        weight_percent,
    })
}

/// `grading_weights` 中没能成为行的部分：数组里的非对象条目，或者整个值不是数组
fn unparsed_weights(value: Option<&Value>) -> Option<Value> {
    match value? {
        Value::Null => None,
        Value::Array(items) => {
            let stray: Vec<Value> = items.iter().filter(|v| !v.is_object()).cloned().collect();
            if stray.is_empty() {
                None
            } else {
                Some(Value::Array(stray))
            }
        }
        other => Some(other.clone()),
    }
}
