//! Presentation-ready view model.
//!
//! The dashboard render produces a [`ViewModel`]: an ordered list of
//! sections, each either usable content or an inline error placeholder.
//! Rendering never fails as a whole; the worst case is a view model made
//! entirely of error sections.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::{NewsItem, UtcDateTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Candlestick,
}

/// One plotted point; `x` is a preformatted axis label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub x: String,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlePoint {
    pub x: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    pub name: String,
    pub points: Vec<CandlePoint>,
}

/// Chart payload: candles, overlay lines, or both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub kind: ChartKind,
    pub candles: Option<CandleSeries>,
    pub lines: Vec<LineSeries>,
}

/// A metric cell value. `Missing` renders as "N/A", never as a default
/// number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricValue {
    Number(f64),
    Count(u64),
    Text(String),
    Missing,
}

impl MetricValue {
    pub fn from_number(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => Self::Number(v),
            _ => Self::Missing,
        }
    }

    pub fn from_count(value: Option<u64>) -> Self {
        value.map_or(Self::Missing, Self::Count)
    }

    pub fn from_text(value: Option<String>) -> Self {
        match value {
            Some(text) if !text.is_empty() => Self::Text(text),
            _ => Self::Missing,
        }
    }
}

impl Display for MetricValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v:.2}"),
            Self::Count(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
            Self::Missing => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: MetricValue,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: MetricValue) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Plain table with preformatted string cells.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSpec {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// What one dashboard section carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum SectionBody {
    Metrics { metrics: Vec<Metric> },
    Table { table: TableSpec },
    Chart { chart: ChartSpec },
    Headlines { items: Vec<NewsItem> },
    Error { message: String },
    Unavailable { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub heading: String,
    pub body: SectionBody,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: SectionBody) -> Self {
        Self {
            heading: heading.into(),
            body,
        }
    }
}

/// Complete render output of one dashboard request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub title: String,
    pub generated_at: UtcDateTime,
    pub sections: Vec<Section>,
}

impl ViewModel {
    pub fn new(title: impl Into<String>, generated_at: UtcDateTime) -> Self {
        Self {
            title: title.into(),
            generated_at,
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn push_error(&mut self, heading: impl Into<String>, message: impl Into<String>) {
        self.sections.push(Section::new(
            heading,
            SectionBody::Error {
                message: message.into(),
            },
        ));
    }

    pub fn push_unavailable(&mut self, heading: impl Into<String>, reason: impl Into<String>) {
        self.sections.push(Section::new(
            heading,
            SectionBody::Unavailable {
                reason: reason.into(),
            },
        ));
    }

    pub fn has_errors(&self) -> bool {
        self.sections
            .iter()
            .any(|section| matches!(section.body, SectionBody::Error { .. }))
    }
}
