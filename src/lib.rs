// src/lib.rs

//! DazzloDocs: branded academic PDF generation.
//!
//! Structured input (student details, a template name, a color scheme,
//! per-section text and artifacts) goes in; a paginated, college-branded PDF
//! comes out. Charts, tables, flowcharts and code blocks are rendered per
//! section; the page chrome (header, footer, watermark, border) is stamped
//! on every page.

pub mod canvas;
pub mod chart;
pub mod codeblock;
pub mod color;
pub mod compose;
pub mod error;
pub mod flowchart;
pub mod generator;
pub mod layout;
pub mod request;
pub mod scheme;
pub mod table;
pub mod template;

pub use chart::{ChartKind, ChartParams, ChartSpec, chart_types};
pub use codeblock::{CodeBlockSpec, code_languages};
pub use color::Color;
pub use compose::WATERMARK;
pub use error::{ArtifactError, GeneratorError};
pub use flowchart::FlowchartSpec;
pub use generator::{DocumentGenerator, OrphanPolicy, generate};
pub use request::{ChartRequest, CodeBlockRequest, DocumentRequest, TableRequest, UserData};
pub use scheme::{ColorPalette, resolve_scheme, scheme_names, scheme_summaries};
pub use table::TableSpec;
pub use template::{TemplateDefinition, resolve_template, template_names, template_summaries};
