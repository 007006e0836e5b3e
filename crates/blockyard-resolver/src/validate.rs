//! Post-resolution structural checks.
//!
//! Every block is checked and every violation collected, so an operator sees
//! all problems of a workspace in a single run.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use blockyard_core::block::Block;
use blockyard_core::registry::Registry;
use blockyard_util::errors::BlockyardError;

/// A report of all violations found in a registry.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

/// A single structural problem with one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Block name, or `<unnamed #N>` for a block without one.
    pub block: String,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingName,
    InvalidName,
    Unresolved,
    NoActions,
    UnnamedAction,
    DuplicateAction { action: String },
    EmptyScript { action: String },
    /// The resolved `config` does not satisfy the block's JSON Schema.
    Schema { message: String },
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, block: impl Into<String>, kind: ViolationKind) {
        self.violations.push(Violation {
            block: block.into(),
            kind,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// All violations reported for one block.
    pub fn for_block<'a>(&'a self, block: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations.iter().filter(move |v| v.block == block)
    }

    /// Turn a non-empty report into a [`BlockyardError::Validation`].
    pub fn into_result(self) -> Result<(), BlockyardError> {
        if self.is_empty() {
            return Ok(());
        }
        let report = self
            .violations
            .iter()
            .map(|v| format!("  {v}"))
            .collect::<Vec<_>>()
            .join("\n");
        Err(BlockyardError::Validation {
            count: self.violations.len(),
            report,
        })
    }
}

/// Check every block of a resolved registry.
pub fn validate(registry: &Registry) -> ValidationReport {
    let mut report = ValidationReport::new();
    for id in registry.ids() {
        let block = registry.block(id);
        let label = if block.name.is_empty() {
            format!("<unnamed {id}>")
        } else {
            block.name.clone()
        };
        check_block(block, &label, &mut report);
    }
    tracing::debug!(
        "Validated {} block(s), {} violation(s)",
        registry.len(),
        report.len()
    );
    report
}

fn check_block(block: &Block, label: &str, report: &mut ValidationReport) {
    if block.name.is_empty() {
        report.add(label, ViolationKind::MissingName);
    } else if !is_valid_name(&block.name) {
        report.add(label, ViolationKind::InvalidName);
    }

    if !block.resolved {
        report.add(label, ViolationKind::Unresolved);
    }

    check_schema(block, label, report);

    let mut seen = HashSet::new();
    for action in &block.actions {
        if action.name.is_empty() {
            report.add(label, ViolationKind::UnnamedAction);
        } else if !seen.insert(action.name.as_str()) {
            report.add(
                label,
                ViolationKind::DuplicateAction {
                    action: action.name.clone(),
                },
            );
        }
    }

    if block.template {
        return;
    }

    if block.actions.is_empty() {
        report.add(label, ViolationKind::NoActions);
    }
    for action in &block.actions {
        if action.script.is_empty() {
            report.add(
                label,
                ViolationKind::EmptyScript {
                    action: action.name.clone(),
                },
            );
        }
    }
}

fn check_schema(block: &Block, label: &str, report: &mut ValidationReport) {
    let Some(path) = &block.schema else {
        return;
    };
    tracing::debug!(
        "Validating config of block '{}' against {}",
        block.name,
        path.display()
    );

    let schema = match read_schema(path) {
        Ok(schema) => schema,
        Err(e) => {
            let message = format!("cannot read schema {}: {e}", path.display());
            report.add(label, ViolationKind::Schema { message });
            return;
        }
    };
    let validator = match jsonschema::validator_for(&schema) {
        Ok(validator) => validator,
        Err(e) => {
            let message = format!("invalid schema {}: {e}", path.display());
            report.add(label, ViolationKind::Schema { message });
            return;
        }
    };
    let config = match serde_json::to_value(&block.config) {
        Ok(config) => config,
        Err(e) => {
            let message = format!("config cannot be checked: {e}");
            report.add(label, ViolationKind::Schema { message });
            return;
        }
    };

    for error in validator.iter_errors(&config) {
        let message = format!("config{}: {error}", error.instance_path);
        report.add(label, ViolationKind::Schema { message });
    }
}

fn read_schema(path: &Path) -> Result<serde_json::Value, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content).map_err(|e| e.to_string())
}

/// Block names may only contain ASCII letters, digits, `.`, `-` and `_`.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "No violations.");
        }
        writeln!(f, "Validation violations ({}):", self.violations.len())?;
        for v in &self.violations {
            writeln!(f, "  {v}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block '{}': {}", self.block, self.kind)
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingName => write!(f, "name is required"),
            Self::InvalidName => write!(f, "name may only contain [A-Za-z0-9._-]"),
            Self::Unresolved => write!(f, "block was never resolved"),
            Self::NoActions => write!(f, "non-template block declares no actions"),
            Self::UnnamedAction => write!(f, "action name is required"),
            Self::DuplicateAction { action } => write!(f, "action '{action}' is declared twice"),
            Self::EmptyScript { action } => write!(f, "action '{action}' has an empty script"),
            Self::Schema { message } => write!(f, "schema violation: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockyard_core::block::Action;

    fn resolved(name: &str) -> Block {
        let mut block = Block::new(name);
        block.resolved = true;
        block
    }

    #[test]
    fn empty_report() {
        let report = ValidationReport::new();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "No violations.");
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn valid_names() {
        assert!(is_valid_name("nginx-ingress"));
        assert!(is_valid_name("app.v2_beta"));
        assert!(!is_valid_name("bad name"));
        assert!(!is_valid_name("a/b"));
        assert!(!is_valid_name(""));
    }

    #[test]
    fn template_without_actions_is_fine() {
        let mut registry = Registry::new();
        let mut base = resolved("base");
        base.template = true;
        registry.add(base).unwrap();
        assert!(validate(&registry).is_empty());
    }

    #[test]
    fn concrete_block_needs_actions_with_scripts() {
        let mut registry = Registry::new();
        registry.add(resolved("empty")).unwrap();
        let mut partial = resolved("partial");
        partial.actions.push(Action::new("install", vec![]));
        registry.add(partial).unwrap();

        let report = validate(&registry);
        assert_eq!(report.len(), 2);
        assert_eq!(
            report.for_block("empty").next().unwrap().kind,
            ViolationKind::NoActions
        );
        assert_eq!(
            report.for_block("partial").next().unwrap().kind,
            ViolationKind::EmptyScript {
                action: "install".into()
            }
        );
    }

    #[test]
    fn duplicate_actions_are_reported() {
        let mut registry = Registry::new();
        let mut block = resolved("web");
        block.actions.push(Action::new("install", vec!["a".into()]));
        block.actions.push(Action::new("install", vec!["b".into()]));
        registry.add(block).unwrap();
        let report = validate(&registry);
        assert_eq!(report.len(), 1);
        assert!(report.to_string().contains("action 'install' is declared twice"));
    }

    #[test]
    fn config_is_checked_against_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let schema = tmp.path().join("schema.json");
        std::fs::write(
            &schema,
            r#"{
                "type": "object",
                "properties": { "replicas": { "type": "integer", "minimum": 1 } },
                "required": ["replicas"]
            }"#,
        )
        .unwrap();

        let mut good = resolved("good");
        good.actions.push(Action::new("install", vec!["make".into()]));
        good.config = serde_json::from_str(r#"{"replicas": 2}"#).unwrap();
        good.schema = Some(schema.clone());

        let mut bad = good.clone();
        bad.name = "bad".into();
        bad.config = serde_json::from_str(r#"{"replicas": 0}"#).unwrap();

        let mut registry = Registry::new();
        registry.add(good).unwrap();
        registry.add(bad).unwrap();

        let report = validate(&registry);
        assert_eq!(report.for_block("good").count(), 0);
        let violations: Vec<&Violation> = report.for_block("bad").collect();
        assert_eq!(violations.len(), 1);
        match &violations[0].kind {
            ViolationKind::Schema { message } => {
                assert!(message.starts_with("config/replicas"), "got: {message}")
            }
            other => panic!("unexpected violation: {other}"),
        }
    }

    #[test]
    fn unreadable_schema_is_a_violation() {
        let mut block = resolved("web");
        block.actions.push(Action::new("install", vec!["make".into()]));
        block.schema = Some("/nonexistent/schema.json".into());
        let mut registry = Registry::new();
        registry.add(block).unwrap();

        let report = validate(&registry);
        assert_eq!(report.len(), 1);
        assert!(report.to_string().contains("cannot read schema"));
    }

    #[test]
    fn into_result_aggregates() {
        let mut report = ValidationReport::new();
        report.add("a", ViolationKind::NoActions);
        report.add("b", ViolationKind::MissingName);
        let err = report.into_result().unwrap_err();
        match err {
            BlockyardError::Validation { count, report } => {
                assert_eq!(count, 2);
                assert!(report.contains("block 'a': non-template block declares no actions"));
                assert!(report.contains("block 'b': name is required"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
