//! Placeholder substitution rules.
//!
//! A [`SubstitutionTable`] is derived once from a [`Configuration`] and then only read.
//! Every key contributes a `{{key}}` token rule; boolean keys additionally contribute a
//! conditional rule that turns `{{#if key}}` … `{{/if}}` into either nothing or a block
//! comment. Matching is literal and case-sensitive, there is no parser behind it:
//! conditional blocks do not nest and overlapping blocks of two keys are unsupported.

use crate::config::{ConfigValue, Configuration};
use crate::constants::{COMMENT_CLOSE, COMMENT_OPEN, CONDITIONAL_CLOSE, CONDITIONAL_OPEN_PREFIX};

/// One substitution rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Replaces every occurrence of `pattern`.
    Token { pattern: String, replacement: String },
    /// Replaces every `open` marker together with the first `{{/if}}` following it.
    Conditional { open: String, open_replacement: &'static str, close_replacement: &'static str },
}

impl Rule {
    fn token(key: &str, value: &ConfigValue) -> Self {
        Rule::Token { pattern: format!("{{{{{key}}}}}"), replacement: value.to_string() }
    }

    fn conditional(key: &str, enabled: bool) -> Self {
        let (open_replacement, close_replacement) =
            if enabled { ("", "") } else { (COMMENT_OPEN, COMMENT_CLOSE) };
        Rule::Conditional {
            open: format!("{CONDITIONAL_OPEN_PREFIX}{key}}}}}"),
            open_replacement,
            close_replacement,
        }
    }

    /// The marker this rule looks for.
    pub fn pattern(&self) -> &str {
        match self {
            Rule::Token { pattern, .. } => pattern,
            Rule::Conditional { open, .. } => open,
        }
    }

    pub fn apply(&self, content: &str) -> String {
        if !content.contains(self.pattern()) {
            return content.to_string();
        }
        match self {
            Rule::Token { pattern, replacement } => content.replace(pattern.as_str(), replacement),
            Rule::Conditional { open, open_replacement, close_replacement } => {
                replace_blocks(content, open, open_replacement, close_replacement)
            }
        }
    }
}

fn replace_blocks(content: &str, open: &str, open_replacement: &str, close_replacement: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find(open) {
        result.push_str(&rest[..start]);
        result.push_str(open_replacement);
        rest = &rest[start + open.len()..];

        match rest.find(CONDITIONAL_CLOSE) {
            Some(end) => {
                result.push_str(&rest[..end]);
                result.push_str(close_replacement);
                rest = &rest[end + CONDITIONAL_CLOSE.len()..];
            }
            // Unterminated block: only the opening marker is replaced.
            None => break,
        }
    }

    result.push_str(rest);
    result
}

/// Ordered substitution rules, applied in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubstitutionTable {
    rules: Vec<Rule>,
}

impl SubstitutionTable {
    pub fn from_config(config: &Configuration) -> Self {
        let mut rules = Vec::with_capacity(config.len() * 2);
        for (key, value) in config.iter() {
            rules.push(Rule::token(key, value));
            if let Some(enabled) = value.as_bool() {
                rules.push(Rule::conditional(key, enabled));
            }
        }
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Applies every rule to `content`, in table order.
    pub fn apply(&self, content: &str) -> String {
        self.rules.iter().fold(content.to_string(), |content, rule| rule.apply(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartialConfig;

    fn table(values: &[(&str, ConfigValue)]) -> SubstitutionTable {
        let partial: PartialConfig =
            values.iter().map(|(key, value)| (key.to_string(), value.clone())).collect();
        SubstitutionTable::from_config(&Configuration::new(partial))
    }

    #[test]
    fn test_table_layout() {
        let table = table(&[]);
        // Eight tokens plus the conditional for dockerSupport.
        assert_eq!(table.len(), 9);
        assert_eq!(table.rules()[0].pattern(), "{{projectName}}");
        assert_eq!(table.rules()[6].pattern(), "{{dockerSupport}}");
        assert_eq!(table.rules()[7].pattern(), "{{#if dockerSupport}}");
        assert_eq!(table.rules()[8].pattern(), "{{port}}");
    }

    #[test]
    fn test_disabled_block_becomes_comment() {
        let table = table(&[
            ("projectName", "demo".into()),
            ("port", 8080u64.into()),
            ("dockerSupport", false.into()),
        ]);
        let content = "Name: {{projectName}}\n{{#if dockerSupport}}FROM node\n{{/if}}";
        assert_eq!(table.apply(content), "Name: demo\n/*FROM node\n*/");
    }

    #[test]
    fn test_enabled_block_is_unwrapped() {
        let table = table(&[
            ("projectName", "demo".into()),
            ("port", 8080u64.into()),
            ("dockerSupport", true.into()),
        ]);
        let content = "Name: {{projectName}}\n{{#if dockerSupport}}FROM node\n{{/if}}";
        assert_eq!(table.apply(content), "Name: demo\nFROM node\n");
    }

    #[test]
    fn test_blocks_of_different_keys_resolve_independently() {
        let table = table(&[
            ("dockerSupport", false.into()),
            ("typescript", true.into()),
            ("eslint", false.into()),
        ]);
        let content = "{{#if dockerSupport}}A{{/if}}|{{#if typescript}}B{{/if}}|{{#if eslint}}C{{/if}}";
        assert_eq!(table.apply(content), "/*A*/|B|/*C*/");
    }

    #[test]
    fn test_substitution_is_idempotent() {
        let table = table(&[("projectName", "demo".into()), ("dockerSupport", false.into())]);
        let once = table.apply("{{projectName}} {{#if dockerSupport}}x{{/if}} {{port}}");
        assert_eq!(once, "demo /*x*/ 3000");
        assert_eq!(table.apply(&once), once);
    }

    #[test]
    fn test_untouched_content_is_identical() {
        let table = table(&[]);
        let content = "no placeholders {here} or {{ here }}\n";
        assert_eq!(table.apply(content), content);
    }

    #[test]
    fn test_every_occurrence_is_replaced() {
        let table = table(&[("framework", "axum".into())]);
        assert_eq!(table.apply("{{framework}}/{{framework}}{{framework}}"), "axum/axumaxum");
        assert_eq!(table.apply("{{Framework}}"), "{{Framework}}");
    }

    #[test]
    fn test_unbalanced_markers() {
        let table = table(&[("dockerSupport", false.into())]);
        assert_eq!(table.apply("{{#if dockerSupport}}tail"), "/*tail");
        assert_eq!(table.apply("head{{/if}}"), "head{{/if}}");
    }

    #[test]
    fn test_non_boolean_keys_have_no_conditional() {
        let table = table(&[("port", 8080u64.into())]);
        assert_eq!(table.apply("{{#if port}}x{{/if}}"), "{{#if port}}x{{/if}}");
    }
}
