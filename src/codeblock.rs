// src/codeblock.rs

//! Code block preparation: language labelling and whitespace normalization.
//! Line wrapping happens later, during pagination, where the box width is
//! known.

/// Languages surfaced to the presentation layer. Any string is accepted by
/// the renderer; this list only drives discovery.
pub fn code_languages() -> &'static [&'static str] {
    &["python", "javascript", "java", "cpp", "sql"]
}

#[derive(Debug, Clone)]
pub struct CodeBlockSpec {
    pub language: String,
    pub code: String,
}

impl CodeBlockSpec {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            code: code.into(),
        }
    }
}

/// A code block with its display label and normalized source lines.
#[derive(Debug, Clone)]
pub struct StyledBlock {
    pub label: String,
    pub lines: Vec<String>,
}

pub fn style_code_block(spec: &CodeBlockSpec) -> StyledBlock {
    let lines = spec
        .code
        .lines()
        .map(|line| line.replace('\t', "    "))
        .collect();
    StyledBlock {
        label: format!("{}:", spec.language.to_uppercase()),
        lines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_is_uppercased_language() {
        let block = style_code_block(&CodeBlockSpec::new("python", "x = 1"));
        assert_eq!(block.label, "PYTHON:");
    }

    #[test]
    fn tabs_expand_to_spaces() {
        let block = style_code_block(&CodeBlockSpec::new("c", "if (x) {\n\treturn;\n}"));
        assert_eq!(block.lines, vec!["if (x) {", "    return;", "}"]);
    }

    #[test]
    fn empty_code_has_no_lines() {
        let block = style_code_block(&CodeBlockSpec::new("sql", ""));
        assert!(block.lines.is_empty());
    }

    #[test]
    fn advertised_languages() {
        assert_eq!(
            code_languages(),
            &["python", "javascript", "java", "cpp", "sql"]
        );
    }
}
