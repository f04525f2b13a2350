//! Template interpolation for catalog statements
//!
//! Handles `{{ variable }}` interpolation in SQL statements.
//! Supports nested access like `{{ cluster.role_arn }}` and `{{ s3.log_data }}`.

use crate::error::{Error, Result};
use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

/// Regex for matching template variables: {{ variable.path }}
static TEMPLATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*\}\}").unwrap()
});

/// Context for template interpolation
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    /// Cluster and connection values
    pub cluster: Value,
    /// Source data locations
    pub s3: Value,
    /// Additional context variables
    pub vars: Value,
}

impl TemplateContext {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Set cluster values
    pub fn set_cluster(&mut self, cluster: Value) -> &mut Self {
        self.cluster = cluster;
        self
    }

    /// Set source location values
    pub fn set_s3(&mut self, s3: Value) -> &mut Self {
        self.s3 = s3;
        self
    }

    /// Set additional variables
    pub fn set_vars(&mut self, vars: Value) -> &mut Self {
        self.vars = vars;
        self
    }

    /// Get a value by path (e.g., "cluster.role_arn")
    pub fn get(&self, path: &str) -> Option<&Value> {
        let parts: Vec<&str> = path.split('.').collect();

        let root = match parts[0] {
            "cluster" => &self.cluster,
            "s3" => &self.s3,
            "vars" => &self.vars,
            // Bare names resolve against vars
            _ => return get_nested_value(&self.vars, &parts),
        };

        if parts.len() == 1 {
            Some(root)
        } else {
            get_nested_value(root, &parts[1..])
        }
    }
}

/// Get a nested value from a JSON value by path
fn get_nested_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for part in path {
        match current {
            Value::Object(map) => {
                current = map.get(*part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Render a template string with the given context
///
/// Substituted values are inserted literally and never expanded again.
/// Every undefined variable is reported in a single error.
pub fn render(template: &str, ctx: &TemplateContext) -> Result<String> {
    let mut missing = Vec::new();

    let rendered = TEMPLATE_REGEX.replace_all(template, |cap: &Captures<'_>| {
        let var_path = &cap[1];
        match ctx.get(var_path) {
            Some(Value::Null) | None => {
                missing.push(var_path.to_string());
                String::new()
            }
            Some(value) => value_to_string(value),
        }
    });

    if missing.is_empty() {
        Ok(rendered.into_owned())
    } else {
        Err(Error::undefined_var(missing.join(", ")))
    }
}

/// Check if a string contains template variables
pub fn has_templates(s: &str) -> bool {
    TEMPLATE_REGEX.is_match(s)
}

/// Extract all variable names from a template
pub fn extract_variables(template: &str) -> Vec<String> {
    TEMPLATE_REGEX
        .captures_iter(template)
        .map(|cap| cap[1].to_string())
        .collect()
}

/// Convert a JSON value to a string for template substitution
fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // For complex types, use JSON serialization
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cluster_context() -> TemplateContext {
        let mut ctx = TemplateContext::new();
        ctx.set_cluster(json!({
            "role_arn": "arn:aws:iam::123:role/dwhRole",
            "db_port": 5439
        }))
        .set_s3(json!({
            "log_data": "s3://udacity-dend/log_data",
            "region": "us-west-2"
        }));
        ctx
    }

    #[test]
    fn test_simple_substitution() {
        let result = render(
            "credentials 'aws_iam_role={{ cluster.role_arn }}'",
            &cluster_context(),
        )
        .unwrap();
        assert_eq!(result, "credentials 'aws_iam_role=arn:aws:iam::123:role/dwhRole'");
    }

    #[test]
    fn test_multiple_substitutions() {
        let result = render(
            "copy t from '{{ s3.log_data }}' region '{{ s3.region }}'",
            &cluster_context(),
        )
        .unwrap();
        assert_eq!(
            result,
            "copy t from 's3://udacity-dend/log_data' region 'us-west-2'"
        );
    }

    #[test]
    fn test_vars_context() {
        let mut ctx = TemplateContext::new();
        ctx.set_vars(json!({"schema": {"name": "analytics"}}));

        assert_eq!(
            render("set search_path to {{ vars.schema.name }}", &ctx).unwrap(),
            "set search_path to analytics"
        );
        assert_eq!(render("{{ schema.name }}", &ctx).unwrap(), "analytics");
    }

    #[test]
    fn test_undefined_variables_reported_together() {
        let ctx = TemplateContext::new();
        let err = render("{{ cluster.role_arn }} {{ s3.song_data }}", &ctx).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cluster.role_arn"));
        assert!(message.contains("s3.song_data"));
    }

    #[test]
    fn test_substituted_values_are_not_expanded_again() {
        let mut ctx = TemplateContext::new();
        ctx.set_s3(json!({"log_data": "s3://b/{{ s3.region }}", "region": "r"}));

        assert_eq!(
            render("from '{{ s3.log_data }}' region '{{ s3.region }}'", &ctx).unwrap(),
            "from 's3://b/{{ s3.region }}' region 'r'"
        );
    }

    #[test]
    fn test_null_is_undefined() {
        let mut ctx = TemplateContext::new();
        ctx.set_cluster(json!({"role_arn": null}));
        assert!(render("{{ cluster.role_arn }}", &ctx).is_err());
    }

    #[test]
    fn test_no_templates() {
        let ctx = TemplateContext::new();
        let result = render("drop table if exists songs", &ctx).unwrap();
        assert_eq!(result, "drop table if exists songs");
    }

    #[test]
    fn test_has_templates() {
        assert!(has_templates("{{ cluster.role_arn }}"));
        assert!(has_templates("prefix {{ var }} suffix"));
        assert!(!has_templates("select * from songs"));
        assert!(!has_templates("{ not a template }"));
    }

    #[test]
    fn test_extract_variables() {
        let vars = extract_variables("{{ cluster.role_arn }} and {{ s3.log_data }}");
        assert_eq!(vars, vec!["cluster.role_arn", "s3.log_data"]);
    }

    #[test]
    fn test_number_substitution() {
        let result = render("port={{ cluster.db_port }}", &cluster_context()).unwrap();
        assert_eq!(result, "port=5439");
    }

    #[test]
    fn test_whitespace_in_template() {
        let ctx = cluster_context();
        assert_eq!(render("{{s3.region}}", &ctx).unwrap(), "us-west-2");
        assert_eq!(render("{{ s3.region }}", &ctx).unwrap(), "us-west-2");
        assert_eq!(render("{{  s3.region  }}", &ctx).unwrap(), "us-west-2");
    }
}
