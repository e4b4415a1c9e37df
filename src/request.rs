// src/request.rs

//! JSON request types.
//!
//! Payloads arrive from loosely-typed frontends, so the artifact fields
//! tolerate both list and comma-separated-string encodings, and numeric
//! series accept strings that merely look like numbers.

use crate::chart::ChartParams;
use crate::codeblock::CodeBlockSpec;
use crate::table::TableSpec;
use serde::Deserialize;
use serde_json::Value;
use slug::slugify;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UserData {
    #[serde(default)]
    pub student_name: String,
    #[serde(default, rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub roll_number: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub subject_teacher: String,
    #[serde(default)]
    pub assignment_topic: String,
    #[serde(default)]
    pub college_name: String,
    #[serde(default)]
    pub project_date: Option<String>,
    #[serde(default)]
    pub submission_date: Option<String>,
}

/// A value that may arrive as a JSON list or as one comma-separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    List(Vec<Value>),
    Text(String),
}

impl StringOrList {
    /// Stringify every element, trimming but keeping empty entries so label
    /// and value sequences stay aligned.
    pub fn into_strings(self) -> Vec<String> {
        match self {
            StringOrList::List(values) => values.iter().map(value_to_string).collect(),
            StringOrList::Text(text) => {
                text.split(',').map(|s| s.trim().to_string()).collect()
            }
        }
    }

    /// Like [`into_strings`](Self::into_strings) but dropping empty entries.
    pub fn into_clean_strings(self) -> Vec<String> {
        self.into_strings()
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Coerce every element to a number; anything unparseable becomes zero.
    pub fn into_numbers(self) -> Vec<f64> {
        match self {
            StringOrList::List(values) => values.iter().map(value_to_number).collect(),
            StringOrList::Text(text) => text
                .split(',')
                .map(|s| s.trim().parse::<f64>().unwrap_or(0.0))
                .collect(),
        }
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn value_to_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        Value::Bool(b) => f64::from(*b),
        _ => 0.0,
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest {
    #[serde(rename = "type", default = "default_chart_type")]
    pub chart_type: String,
    #[serde(default)]
    pub labels: Option<StringOrList>,
    #[serde(default)]
    pub values: Option<StringOrList>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub xlabel: Option<String>,
    #[serde(default)]
    pub ylabel: Option<String>,
}

fn default_chart_type() -> String {
    "bar".to_string()
}

impl ChartRequest {
    pub fn to_params(&self) -> ChartParams {
        ChartParams {
            labels: self
                .labels
                .clone()
                .map(StringOrList::into_strings)
                .unwrap_or_default(),
            values: self
                .values
                .clone()
                .map(StringOrList::into_numbers)
                .unwrap_or_default(),
            title: self.title.clone(),
            x_label: self.xlabel.clone(),
            y_label: self.ylabel.clone(),
        }
    }
}

/// Table rows: a list of rows, or one CSV blob with a row per line.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableData {
    Rows(Vec<RowData>),
    Text(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RowData {
    Cells(Vec<Value>),
    Line(String),
    Scalar(Value),
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub headers: Option<StringOrList>,
    #[serde(default)]
    pub data: Option<TableData>,
    #[serde(default)]
    pub financial: bool,
}

impl TableRequest {
    pub fn to_spec(&self) -> TableSpec {
        let mut rows: Vec<Vec<String>> = Vec::new();
        if let Some(headers) = self.headers.clone() {
            let cells = headers.into_clean_strings();
            if !cells.is_empty() {
                rows.push(cells);
            }
        }
        match &self.data {
            Some(TableData::Rows(list)) => {
                for row in list {
                    match row {
                        RowData::Cells(cells) => {
                            rows.push(cells.iter().map(value_to_cell).collect());
                        }
                        RowData::Line(line) => {
                            let cells = split_csv_row(line);
                            if !cells.is_empty() {
                                rows.push(cells);
                            }
                        }
                        RowData::Scalar(value) => rows.push(vec![value_to_cell(value)]),
                    }
                }
            }
            Some(TableData::Text(text)) => {
                for line in text.lines() {
                    let cells = split_csv_row(line);
                    if !cells.is_empty() {
                        rows.push(cells);
                    }
                }
            }
            None => {}
        }
        TableSpec::new(
            self.title.clone().unwrap_or_else(|| "Table".to_string()),
            rows,
            self.financial,
        )
    }
}

fn split_csv_row(line: &str) -> Vec<String> {
    line.split(',')
        .map(|cell| cell.trim().to_string())
        .filter(|cell| !cell.is_empty())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodeBlockRequest {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub code: String,
}

fn default_language() -> String {
    "text".to_string()
}

impl CodeBlockRequest {
    pub fn to_spec(&self) -> CodeBlockSpec {
        CodeBlockSpec::new(self.language.clone(), self.code.clone())
    }
}

/// One complete generation request. Student details may sit in a nested
/// `user_data` object or inline at the top level.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    #[serde(default)]
    pub user_data: Option<UserData>,
    #[serde(flatten)]
    pub inline_user: UserData,
    pub template: String,
    pub color_scheme: String,
    #[serde(default)]
    pub content: BTreeMap<String, String>,
    #[serde(default)]
    pub charts: BTreeMap<String, Vec<ChartRequest>>,
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<TableRequest>>,
    #[serde(default)]
    pub code_blocks: BTreeMap<String, Vec<CodeBlockRequest>>,
}

impl DocumentRequest {
    pub fn effective_user(&self) -> UserData {
        match &self.user_data {
            Some(user) => user.clone(),
            None => self.inline_user.clone(),
        }
    }

    /// Download-style filename derived from the student and subject.
    pub fn suggested_filename(&self) -> String {
        let user = self.effective_user();
        let student = non_empty_slug(&user.student_name, "student");
        let subject = non_empty_slug(&user.subject, "document");
        format!("DazzloDocs_{student}_{subject}.pdf")
    }
}

fn non_empty_slug(text: &str, fallback: &str) -> String {
    let s = slugify(text);
    if s.is_empty() { fallback.to_string() } else { s }
}
