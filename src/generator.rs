// src/generator.rs

//! Document assembly.
//!
//! [`DocumentGenerator`] walks the lifecycle `new -> configure -> add_* ->
//! render`: configuration resolves the template and palette (hard errors),
//! additions are accepted in any order, and `render` consumes the generator
//! to produce the final byte stream. Artifact failures never abort a render;
//! they degrade to visible placeholder blocks inside the document.

use crate::chart::{CHART_HEIGHT_PT, CHART_WIDTH_PT, ChartKind, ChartParams, ChartSpec, render_chart};
use crate::codeblock::{CodeBlockSpec, style_code_block};
use crate::color::Color;
use crate::compose::{Decor, compose_pdf};
use crate::error::GeneratorError;
use crate::flowchart::{FLOWCHART_HEIGHT_PT, FLOWCHART_WIDTH_PT, FlowchartSpec, render_flowchart};
use crate::layout::{Align, Block, CodeTheme, Font, TableTheme, TextStyle, paginate};
use crate::request::{DocumentRequest, UserData};
use crate::scheme::{ColorPalette, resolve_scheme};
use crate::table::{TableSpec, build_table};
use crate::template::{TemplateDefinition, resolve_template};
use log::{debug, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Metrics {
    stage_timings: Vec<(&'static str, Duration)>,
}

impl Metrics {
    fn time_scope<F, R>(&mut self, name: &'static str, func: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = func();
        self.stage_timings.push((name, start.elapsed()));
        result
    }

    fn report(&self) {
        let total: Duration = self.stage_timings.iter().map(|(_, d)| *d).sum();
        for (name, duration) in &self.stage_timings {
            debug!("{}: {:.2}ms", name, duration.as_secs_f64() * 1000.0);
        }
        info!("document rendered in {:.2}ms", total.as_secs_f64() * 1000.0);
    }
}

/// What to do with artifacts keyed by a section the template does not list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Emit them after the template's sections, in section-name order.
    #[default]
    Append,
    /// Discard them with a warning.
    Drop,
}

#[derive(Debug, Clone)]
enum ChartSlot {
    Spec(ChartSpec),
    Unsupported { requested: String },
}

/// Per-document text styling derived from the palette. Built fresh for every
/// render so palettes never leak between documents.
struct StyleSet {
    heading: TextStyle,
    body: TextStyle,
    caption: TextStyle,
    table: TableTheme,
    code: CodeTheme,
}

impl StyleSet {
    fn new(palette: &ColorPalette) -> Self {
        Self {
            heading: TextStyle {
                font: Font::HelveticaBold,
                size: 16.0,
                leading: 24.0,
                color: palette.primary,
                align: Align::Left,
            },
            body: TextStyle {
                font: Font::Helvetica,
                size: 11.0,
                leading: 14.0,
                color: palette.text,
                align: Align::Left,
            },
            caption: TextStyle {
                font: Font::HelveticaBold,
                size: 12.0,
                leading: 16.0,
                color: palette.text,
                align: Align::Left,
            },
            table: TableTheme {
                header_bg: palette.primary,
                header_text: Color::WHITE,
                body_text: palette.text,
                zebra: [palette.background, palette.highlight],
                grid: palette.secondary,
            },
            code: CodeTheme {
                background: palette.background,
                border: palette.border,
                text: palette.text,
            },
        }
    }
}

pub struct DocumentGenerator {
    user: UserData,
    template: Option<&'static TemplateDefinition>,
    palette: Option<&'static ColorPalette>,
    content: BTreeMap<String, String>,
    charts: BTreeMap<String, Vec<ChartSlot>>,
    tables: BTreeMap<String, Vec<TableSpec>>,
    flowcharts: BTreeMap<String, Vec<FlowchartSpec>>,
    code_blocks: BTreeMap<String, Vec<CodeBlockSpec>>,
    orphan_policy: OrphanPolicy,
}

impl DocumentGenerator {
    pub fn new(user: UserData) -> Self {
        Self {
            user,
            template: None,
            palette: None,
            content: BTreeMap::new(),
            charts: BTreeMap::new(),
            tables: BTreeMap::new(),
            flowcharts: BTreeMap::new(),
            code_blocks: BTreeMap::new(),
            orphan_policy: OrphanPolicy::default(),
        }
    }

    pub fn configured(
        user: UserData,
        template: &str,
        scheme: &str,
    ) -> Result<Self, GeneratorError> {
        let mut generator = Self::new(user);
        generator.configure(template, scheme)?;
        Ok(generator)
    }

    /// Resolve and pin the template and color scheme. Unknown names are hard
    /// errors; nothing can be added until this succeeds.
    pub fn configure(&mut self, template: &str, scheme: &str) -> Result<(), GeneratorError> {
        self.template = Some(resolve_template(template)?);
        self.palette = Some(resolve_scheme(scheme)?);
        Ok(())
    }

    pub fn set_orphan_policy(&mut self, policy: OrphanPolicy) {
        self.orphan_policy = policy;
    }

    fn ensure_configured(&self) -> Result<(), GeneratorError> {
        if self.template.is_none() || self.palette.is_none() {
            return Err(GeneratorError::NotConfigured);
        }
        Ok(())
    }

    pub fn add_content(&mut self, section: &str, text: &str) -> Result<(), GeneratorError> {
        self.ensure_configured()?;
        self.content.insert(section.to_string(), text.to_string());
        Ok(())
    }

    /// Queue a chart. An unrecognized kind is not an error here: it is kept
    /// as a slot that renders as a visible error marker.
    pub fn add_chart(
        &mut self,
        section: &str,
        requested: &str,
        params: ChartParams,
    ) -> Result<(), GeneratorError> {
        self.ensure_configured()?;
        let slot = match ChartKind::parse(requested) {
            Some(kind) => ChartSlot::Spec(ChartSpec::from_params(kind, params)),
            None => {
                warn!("unknown chart type '{requested}' in section '{section}'");
                ChartSlot::Unsupported {
                    requested: requested.trim().to_string(),
                }
            }
        };
        self.charts.entry(section.to_string()).or_default().push(slot);
        Ok(())
    }

    pub fn add_table(&mut self, section: &str, spec: TableSpec) -> Result<(), GeneratorError> {
        self.ensure_configured()?;
        self.tables.entry(section.to_string()).or_default().push(spec);
        Ok(())
    }

    pub fn add_flowchart(
        &mut self,
        section: &str,
        spec: FlowchartSpec,
    ) -> Result<(), GeneratorError> {
        self.ensure_configured()?;
        self.flowcharts
            .entry(section.to_string())
            .or_default()
            .push(spec);
        Ok(())
    }

    pub fn add_code_block(
        &mut self,
        section: &str,
        spec: CodeBlockSpec,
    ) -> Result<(), GeneratorError> {
        self.ensure_configured()?;
        self.code_blocks
            .entry(section.to_string())
            .or_default()
            .push(spec);
        Ok(())
    }

    /// Render the whole document. Consumes the generator: a document is
    /// rendered exactly once.
    pub fn render(mut self) -> Result<Vec<u8>, GeneratorError> {
        let template = self.template.ok_or(GeneratorError::NotConfigured)?;
        let palette = self.palette.ok_or(GeneratorError::NotConfigured)?;

        let mut metrics = Metrics::default();
        let styles = StyleSet::new(palette);

        let blocks = metrics.time_scope("section assembly", || {
            self.build_blocks(template, palette, &styles)
        });
        let pages = metrics.time_scope("pagination", || paginate(blocks));
        debug!("laid out {} pages", pages.len());

        let decor = self.decor(palette);
        let bytes = metrics.time_scope("pdf assembly", || compose_pdf(pages, &decor))?;

        metrics.report();
        Ok(bytes)
    }

    fn build_blocks(
        &mut self,
        template: &TemplateDefinition,
        palette: &ColorPalette,
        styles: &StyleSet,
    ) -> Vec<Block> {
        let mut blocks = Vec::new();
        self.title_page(&mut blocks, palette);
        for section in template.sections {
            self.emit_section(&mut blocks, section, palette, styles, true);
        }
        self.emit_orphans(&mut blocks, palette, styles);
        blocks
    }

    fn college_display(&self) -> String {
        let name = self.user.college_name.trim();
        if name.is_empty() {
            "COLLEGE NAME".to_string()
        } else {
            name.to_uppercase()
        }
    }

    fn decor(&self, palette: &ColorPalette) -> Decor {
        Decor {
            college: self.college_display(),
            doc_line: format!("{} | {}", self.user.subject, self.user.student_name),
            primary: palette.primary,
            secondary: palette.secondary,
            border: palette.border,
        }
    }

    fn title_page(&self, blocks: &mut Vec<Block>, palette: &ColorPalette) {
        let user = &self.user;
        blocks.push(Block::Spacer { height: 144.0 });
        blocks.push(Block::Heading {
            text: self.college_display(),
            style: TextStyle {
                font: Font::HelveticaBold,
                size: 24.0,
                leading: 30.0,
                color: palette.primary,
                align: Align::Center,
            },
        });
        blocks.push(Block::Spacer { height: 30.0 });
        blocks.push(Block::Heading {
            text: user.subject.to_uppercase(),
            style: TextStyle {
                font: Font::HelveticaBold,
                size: 20.0,
                leading: 26.0,
                color: palette.secondary,
                align: Align::Center,
            },
        });
        blocks.push(Block::Spacer { height: 20.0 });
        if !user.assignment_topic.trim().is_empty() {
            blocks.push(Block::Heading {
                text: format!("Topic: {}", user.assignment_topic),
                style: TextStyle {
                    font: Font::Helvetica,
                    size: 14.0,
                    leading: 18.0,
                    color: palette.text,
                    align: Align::Center,
                },
            });
            blocks.push(Block::Spacer { height: 40.0 });
        }

        let mut rows = vec![
            ("Student Name:".to_string(), user.student_name.clone()),
            ("Class:".to_string(), user.class_name.clone()),
            ("Roll Number:".to_string(), user.roll_number.clone()),
            ("Subject Teacher:".to_string(), user.subject_teacher.clone()),
        ];
        for (label, value) in [
            ("Project Date:", &user.project_date),
            ("Submission Date:", &user.submission_date),
        ] {
            if let Some(date) = value {
                if !date.trim().is_empty() {
                    rows.push((label.to_string(), date.clone()));
                }
            }
        }
        blocks.push(Block::InfoTable {
            rows,
            color: palette.text,
            grid: palette.border,
        });
        blocks.push(Block::PageBreak);
    }

    fn emit_section(
        &mut self,
        blocks: &mut Vec<Block>,
        section: &str,
        palette: &ColorPalette,
        styles: &StyleSet,
        with_text: bool,
    ) {
        let text = if with_text {
            self.content
                .get(section)
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        } else {
            String::new()
        };
        let charts = self.charts.remove(section).unwrap_or_default();
        let tables = self.tables.remove(section).unwrap_or_default();
        let flowcharts = self.flowcharts.remove(section).unwrap_or_default();
        let code_blocks = self.code_blocks.remove(section).unwrap_or_default();

        if text.is_empty()
            && charts.is_empty()
            && tables.is_empty()
            && flowcharts.is_empty()
            && code_blocks.is_empty()
        {
            return;
        }

        blocks.push(Block::Spacer { height: 20.0 });
        blocks.push(Block::Heading {
            text: title_case(section),
            style: styles.heading,
        });
        blocks.push(Block::Spacer { height: 2.0 });
        blocks.push(Block::Rule {
            color: palette.border,
            thickness: 1.0,
        });
        blocks.push(Block::Spacer { height: 24.0 });

        for paragraph in text.split('\n').map(str::trim).filter(|p| !p.is_empty()) {
            blocks.push(Block::Paragraph {
                text: paragraph.to_string(),
                style: styles.body,
            });
            blocks.push(Block::Spacer { height: 6.0 });
        }
        if !text.is_empty() {
            blocks.push(Block::Spacer { height: 14.0 });
        }

        for slot in charts {
            match slot {
                ChartSlot::Spec(spec) => match render_chart(&spec, palette) {
                    Ok(image) => {
                        blocks.push(Block::Spacer { height: 12.0 });
                        blocks.push(Block::Image {
                            image,
                            width: CHART_WIDTH_PT,
                            height: CHART_HEIGHT_PT,
                        });
                        blocks.push(Block::Spacer { height: 12.0 });
                    }
                    Err(err) => {
                        warn!("chart '{}' in section '{section}' failed: {err}", spec.title);
                        blocks.push(placeholder(format!("Error creating chart: {err}"), palette));
                    }
                },
                ChartSlot::Unsupported { requested } => {
                    blocks.push(placeholder(
                        format!("Error creating {requested} chart"),
                        palette,
                    ));
                }
            }
        }

        for spec in tables {
            if !spec.title.trim().is_empty() {
                blocks.push(Block::Paragraph {
                    text: spec.title.clone(),
                    style: styles.caption,
                });
                blocks.push(Block::Spacer { height: 6.0 });
            }
            blocks.push(Block::Table {
                layout: build_table(&spec),
                theme: styles.table,
            });
            blocks.push(Block::Spacer { height: 12.0 });
        }

        for spec in flowcharts {
            match render_flowchart(&spec, palette) {
                Ok(image) => {
                    blocks.push(Block::Spacer { height: 12.0 });
                    blocks.push(Block::Image {
                        image,
                        width: FLOWCHART_WIDTH_PT,
                        height: FLOWCHART_HEIGHT_PT,
                    });
                    blocks.push(Block::Spacer { height: 12.0 });
                }
                Err(err) => {
                    warn!(
                        "flowchart '{}' in section '{section}' failed: {err}",
                        spec.title
                    );
                    blocks.push(placeholder(
                        format!("Error creating flowchart: {err}"),
                        palette,
                    ));
                }
            }
        }

        for spec in code_blocks {
            blocks.push(Block::Spacer { height: 8.0 });
            blocks.push(Block::Code {
                block: style_code_block(&spec),
                theme: styles.code,
            });
            blocks.push(Block::Spacer { height: 8.0 });
        }
    }

    /// Sections that hold artifacts but are absent from the template.
    fn emit_orphans(&mut self, blocks: &mut Vec<Block>, palette: &ColorPalette, styles: &StyleSet) {
        let mut orphans: BTreeSet<String> = BTreeSet::new();
        orphans.extend(self.charts.keys().cloned());
        orphans.extend(self.tables.keys().cloned());
        orphans.extend(self.flowcharts.keys().cloned());
        orphans.extend(self.code_blocks.keys().cloned());

        for section in orphans {
            match self.orphan_policy {
                OrphanPolicy::Append => {
                    debug!("appending orphan section '{section}'");
                    self.emit_section(blocks, &section, palette, styles, false);
                }
                OrphanPolicy::Drop => {
                    warn!("dropping artifacts for section '{section}' not in template");
                }
            }
        }
    }
}

fn placeholder(text: String, palette: &ColorPalette) -> Block {
    Block::Placeholder {
        text,
        color: palette.text,
        border: palette.border,
    }
}

/// `snake_case` section identifier to a display heading.
fn title_case(section: &str) -> String {
    section
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One-shot bridge from a decoded request to PDF bytes.
pub fn generate(request: &DocumentRequest) -> Result<Vec<u8>, GeneratorError> {
    let mut generator = DocumentGenerator::configured(
        request.effective_user(),
        &request.template,
        &request.color_scheme,
    )?;
    for (section, text) in &request.content {
        generator.add_content(section, text)?;
    }
    for (section, charts) in &request.charts {
        for chart in charts {
            generator.add_chart(section, &chart.chart_type, chart.to_params())?;
        }
    }
    for (section, tables) in &request.tables {
        for table in tables {
            generator.add_table(section, table.to_spec())?;
        }
    }
    for (section, blocks) in &request.code_blocks {
        for block in blocks {
            generator.add_code_block(section, block.to_spec())?;
        }
    }
    generator.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::Document;

    fn user() -> UserData {
        UserData {
            student_name: "A".into(),
            class_name: "B".into(),
            roll_number: "1".into(),
            subject: "Math".into(),
            subject_teacher: "T".into(),
            assignment_topic: "Algebra".into(),
            college_name: "XYZ College".into(),
            ..Default::default()
        }
    }

    fn extract_all(bytes: &[u8]) -> String {
        let doc = Document::load_mem(bytes).unwrap();
        let pages: Vec<u32> = doc.get_pages().keys().cloned().collect();
        doc.extract_text(&pages).unwrap()
    }

    #[test]
    fn additions_require_configuration() {
        let mut generator = DocumentGenerator::new(user());
        assert!(matches!(
            generator.add_content("introduction", "text"),
            Err(GeneratorError::NotConfigured)
        ));
        assert!(matches!(
            generator.add_chart("introduction", "bar", ChartParams::default()),
            Err(GeneratorError::NotConfigured)
        ));
    }

    #[test]
    fn unknown_template_is_a_hard_error() {
        let result = DocumentGenerator::configured(user(), "nonexistent", "professional");
        assert!(matches!(
            result,
            Err(GeneratorError::UnknownTemplate(name)) if name == "nonexistent"
        ));
    }

    #[test]
    fn unknown_scheme_is_a_hard_error() {
        let result = DocumentGenerator::configured(user(), "assignment", "nonexistent");
        assert!(matches!(
            result,
            Err(GeneratorError::UnknownColorScheme(name)) if name == "nonexistent"
        ));
    }

    #[test]
    fn title_page_and_section_heading_appear() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        generator.add_content("introduction", "Intro text").unwrap();
        let bytes = generator.render().unwrap();
        let text = extract_all(&bytes);
        assert!(text.contains("XYZ COLLEGE"));
        assert!(text.contains("Introduction"));
        assert!(text.contains("Intro text"));
        assert!(text.contains("Topic: Algebra"));
    }

    #[test]
    fn sections_without_content_or_artifacts_are_skipped() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        generator.add_content("introduction", "Only this").unwrap();
        let text = extract_all(&generator.render().unwrap());
        assert!(!text.contains("Conclusion"));
        assert!(!text.contains("References"));
    }

    #[test]
    fn unknown_chart_kind_degrades_to_marker() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        generator
            .add_chart("introduction", "funky", ChartParams::default())
            .unwrap();
        let text = extract_all(&generator.render().unwrap());
        assert!(text.contains("Error creating funky chart"));
    }

    #[test]
    fn empty_chart_series_degrades_to_marker() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        generator
            .add_chart("introduction", "bar", ChartParams::default())
            .unwrap();
        let text = extract_all(&generator.render().unwrap());
        assert!(text.contains("Error creating chart: no data points"));
    }

    #[test]
    fn artifacts_embed_without_section_text() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        let rows = vec![
            vec!["Name".to_string(), "Score".to_string()],
            vec!["a".to_string(), "1".to_string()],
        ];
        generator
            .add_table("analysis", TableSpec::new("Scores", rows, false))
            .unwrap();
        let text = extract_all(&generator.render().unwrap());
        assert!(text.contains("Analysis"));
        assert!(text.contains("Scores"));
        assert!(text.contains("Score"));
    }

    #[test]
    fn orphan_artifacts_append_by_default() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        generator
            .add_code_block("extras", CodeBlockSpec::new("python", "x = 1"))
            .unwrap();
        let text = extract_all(&generator.render().unwrap());
        assert!(text.contains("Extras"));
        assert!(text.contains("PYTHON:"));
    }

    #[test]
    fn orphan_artifacts_can_be_dropped() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        generator.set_orphan_policy(OrphanPolicy::Drop);
        generator
            .add_code_block("extras", CodeBlockSpec::new("python", "x = 1"))
            .unwrap();
        let text = extract_all(&generator.render().unwrap());
        assert!(!text.contains("Extras"));
    }

    #[test]
    fn flowcharts_are_programmatic_only_and_render() {
        let mut generator =
            DocumentGenerator::configured(user(), "assignment", "professional").unwrap();
        generator
            .add_flowchart(
                "analysis",
                FlowchartSpec::new(
                    "Process Flow".into(),
                    vec!["Start".into(), "End".into()],
                    vec![("start".into(), "end".into())],
                ),
            )
            .unwrap();
        let text = extract_all(&generator.render().unwrap());
        assert!(text.contains("Process Flow"));
    }

    #[test]
    fn snake_case_sections_become_title_case() {
        assert_eq!(title_case("main_content"), "Main Content");
        assert_eq!(title_case("executive_summary"), "Executive Summary");
        assert_eq!(title_case("results"), "Results");
        assert_eq!(title_case("LITERATURE_review"), "Literature Review");
    }

    #[test]
    fn generate_bridges_a_full_request() {
        let request: DocumentRequest = serde_json::from_value(serde_json::json!({
            "user_data": {
                "student_name": "A", "class": "B", "roll_number": "1",
                "subject": "Math", "subject_teacher": "T",
                "assignment_topic": "Algebra", "college_name": "XYZ College"
            },
            "template": "assignment",
            "color_scheme": "professional",
            "content": {"introduction": "Intro text"},
            "charts": {"analysis": [{"type": "bar", "labels": "Q1,Q2", "values": ["10", "bad"]}]},
            "tables": {"conclusion": [{"title": "Data", "headers": "A,B", "data": [[1, 2]]}]},
            "code_blocks": {"main_content": [{"language": "python", "code": "print(1)"}]}
        }))
        .unwrap();
        let bytes = generate(&request).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let text = extract_all(&bytes);
        assert!(text.contains("Intro text"));
        assert!(text.contains("PYTHON:"));
        assert!(text.contains("Data"));
    }
}
