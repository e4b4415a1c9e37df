// src/template.rs

//! Template catalog.
//!
//! A template fixes the ordered list of sections a document flows through and
//! advertises a feature set to the presentation layer. Section order is
//! significant; features are advisory and never enforced at render time.

use crate::error::GeneratorError;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateDefinition {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub sections: &'static [&'static str],
    pub features: &'static [&'static str],
}

static TEMPLATES: Lazy<BTreeMap<&'static str, TemplateDefinition>> = Lazy::new(|| {
    BTreeMap::from([
        (
            "assignment",
            TemplateDefinition {
                name: "assignment",
                display_name: "Academic Assignment",
                description: "Standard academic assignment with proper formatting and analysis",
                sections: &["introduction", "main_content", "analysis", "conclusion", "references"],
                features: &["tables", "charts", "citations", "references", "code_blocks"],
            },
        ),
        (
            "project_report",
            TemplateDefinition {
                name: "project_report",
                display_name: "Project Report",
                description: "Comprehensive project report with visual elements and analysis",
                sections: &[
                    "project_overview",
                    "objectives",
                    "methodology",
                    "implementation",
                    "results",
                    "conclusion",
                    "appendix",
                ],
                features: &["flowcharts", "tables", "timelines", "charts", "gantt_charts", "code_blocks"],
            },
        ),
        (
            "case_study",
            TemplateDefinition {
                name: "case_study",
                display_name: "Case Study Analysis",
                description: "In-depth case study analysis with solutions and visual aids",
                sections: &[
                    "case_overview",
                    "problem_analysis",
                    "solutions",
                    "implementation",
                    "results",
                    "recommendations",
                ],
                features: &["charts", "tables", "decision_trees", "swot_analysis", "comparison_tables"],
            },
        ),
        (
            "research_paper",
            TemplateDefinition {
                name: "research_paper",
                display_name: "Research Paper",
                description: "Academic research paper with proper formatting and citations",
                sections: &[
                    "abstract",
                    "introduction",
                    "literature_review",
                    "methodology",
                    "results",
                    "discussion",
                    "conclusion",
                    "references",
                ],
                features: &["tables", "charts", "citations", "references", "flowcharts", "code_blocks"],
            },
        ),
        (
            "presentation_report",
            TemplateDefinition {
                name: "presentation_report",
                display_name: "Presentation Report",
                description: "Professional presentation report with key insights and recommendations",
                sections: &["executive_summary", "key_points", "analysis", "findings", "recommendations"],
                features: &["charts", "tables", "bullet_points", "highlighted_text"],
            },
        ),
        (
            "lab_report",
            TemplateDefinition {
                name: "lab_report",
                display_name: "Laboratory Report",
                description: "Scientific laboratory report with data analysis and observations",
                sections: &[
                    "objective",
                    "materials",
                    "procedure",
                    "observations",
                    "calculations",
                    "results",
                    "conclusion",
                ],
                features: &["tables", "charts", "formulas", "data_analysis", "graphs"],
            },
        ),
        (
            "business_plan",
            TemplateDefinition {
                name: "business_plan",
                display_name: "Business Plan",
                description: "Comprehensive business plan with financial analysis and market research",
                sections: &[
                    "executive_summary",
                    "business_overview",
                    "market_analysis",
                    "strategy",
                    "financial_plan",
                    "implementation",
                ],
                features: &["charts", "tables", "financial_projections", "market_charts", "timelines"],
            },
        ),
        (
            "technical_documentation",
            TemplateDefinition {
                name: "technical_documentation",
                display_name: "Technical Documentation",
                description: "Technical documentation with system diagrams and code examples",
                sections: &[
                    "system_overview",
                    "architecture",
                    "implementation",
                    "testing",
                    "deployment",
                    "maintenance",
                ],
                features: &["flowcharts", "diagrams", "code_blocks", "tables", "system_architecture"],
            },
        ),
    ])
});

/// Look up a template by name.
pub fn resolve_template(name: &str) -> Result<&'static TemplateDefinition, GeneratorError> {
    TEMPLATES
        .get(name)
        .ok_or_else(|| GeneratorError::UnknownTemplate(name.to_string()))
}

pub fn template_names() -> Vec<&'static str> {
    TEMPLATES.keys().copied().collect()
}

/// All template definitions, for the presentation layer.
pub fn template_summaries() -> Vec<&'static TemplateDefinition> {
    TEMPLATES.values().collect()
}
