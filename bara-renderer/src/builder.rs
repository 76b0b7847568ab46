//! Glob-list literals and transformation clauses.
//!
//! Everything here is a pure string transformation; the outputs are spliced
//! verbatim into the config document by [`crate::engine`].

use std::fmt;

use bara_core::{RuleError, TransformRule, WorkflowMode};

/// Escape a value for use inside a double-quoted Starlark string.
///
/// Line breaks and tabs become escape sequences so a value can never end
/// the string literal early.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

/// Quoted, comma-joined glob list without the surrounding brackets.
///
/// Empty entries are dropped; an all-empty input yields `""`, which the
/// tool reads as "match everything".
pub fn glob_list_literal(entries: &[String]) -> String {
    entries
        .iter()
        .filter(|g| !g.is_empty())
        .map(|g| format!("\"{}\"", escape(g)))
        .collect::<Vec<_>>()
        .join(",")
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

/// The `core.<method>` a clause calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformMethod {
    Move,
    Replace,
}

impl fmt::Display for TransformMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformMethod::Move => write!(f, "move"),
            TransformMethod::Replace => write!(f, "replace"),
        }
    }
}

/// One rendered `core.move` / `core.replace` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformationClause {
    pub method: TransformMethod,
    pub from: String,
    pub to: String,
    pub path: String,
}

impl TransformationClause {
    pub fn from_rule(method: TransformMethod, rule: &TransformRule) -> Self {
        Self {
            method,
            from: rule.from.clone(),
            to: rule.to_or_default().to_owned(),
            path: rule.path_or_default().to_owned(),
        }
    }
}

impl fmt::Display for TransformationClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "core.{}(\"{}\", \"{}\", paths = glob([\"{}\"]))",
            self.method,
            escape(&self.from),
            escape(&self.to),
            escape(&self.path)
        )
    }
}

/// One clause per rule, in input order.
pub fn clauses(method: TransformMethod, rules: &[TransformRule]) -> Vec<TransformationClause> {
    rules
        .iter()
        .map(|rule| TransformationClause::from_rule(method, rule))
        .collect()
}

/// Parse raw rule strings and build the ordered transformation list.
///
/// `push` renames before rewriting contents; every other workflow rewrites
/// first, since it operates on already-renamed destination paths.
pub fn build_transformations(
    moves: &[String],
    replaces: &[String],
    mode: &WorkflowMode,
) -> Result<Vec<TransformationClause>, RuleError> {
    let moves = clauses(TransformMethod::Move, &bara_core::types::parse_rules(moves)?);
    let replaces = clauses(TransformMethod::Replace, &bara_core::types::parse_rules(replaces)?);

    let (first, second) = if mode.moves_first() {
        (moves, replaces)
    } else {
        (replaces, moves)
    };
    Ok(first.into_iter().chain(second).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn glob_literal_drops_empty_and_keeps_order() {
        let out = glob_list_literal(&strings(&["b/**", "", "a.md", ""]));
        assert_eq!(out, "\"b/**\",\"a.md\"");
    }

    #[test]
    fn all_empty_globs_yield_empty_literal() {
        assert_eq!(glob_list_literal(&strings(&["", ""])), "");
        assert_eq!(glob_list_literal(&[]), "");
    }

    #[test]
    fn glob_literal_escapes_quotes() {
        assert_eq!(glob_list_literal(&strings(&["a\"b"])), "\"a\\\"b\"");
    }

    #[test]
    fn escape_neutralizes_control_characters() {
        assert_eq!(escape("a\nb\r\tc"), "a\\nb\\r\\tc");
        assert_eq!(escape("C:\\x \"q\""), "C:\\\\x \\\"q\\\"");
        assert!(!escape("Bot\n<bot@acme.dev>").contains('\n'));
    }

    #[test]
    fn clause_renders_core_call() {
        let rule: TransformRule = "a/b||c/d".parse().unwrap();
        let clause = TransformationClause::from_rule(TransformMethod::Move, &rule);
        assert_eq!(
            clause.to_string(),
            "core.move(\"a/b\", \"c/d\", paths = glob([\"**\"]))"
        );
    }

    #[test]
    fn clause_without_to_renders_empty_string() {
        let rule: TransformRule = "secret".parse().unwrap();
        let clause = TransformationClause::from_rule(TransformMethod::Replace, &rule);
        assert_eq!(
            clause.to_string(),
            "core.replace(\"secret\", \"\", paths = glob([\"**\"]))"
        );
    }

    #[test]
    fn push_moves_before_replaces() {
        let out = build_transformations(
            &strings(&["m1", "m2"]),
            &strings(&["r1"]),
            &WorkflowMode::Push,
        )
        .unwrap();
        let froms: Vec<_> = out.iter().map(|c| c.from.as_str()).collect();
        assert_eq!(froms, ["m1", "m2", "r1"]);
    }

    #[test]
    fn pr_replaces_before_moves() {
        let out = build_transformations(
            &strings(&["m1"]),
            &strings(&["r1", "r2"]),
            &WorkflowMode::Pr,
        )
        .unwrap();
        let froms: Vec<_> = out.iter().map(|c| c.from.as_str()).collect();
        assert_eq!(froms, ["r1", "r2", "m1"]);
    }

    #[test]
    fn malformed_rule_propagates() {
        let err = build_transformations(&strings(&["a||b||c||d"]), &[], &WorkflowMode::Push)
            .unwrap_err();
        assert!(matches!(err, RuleError::TooManySegments { .. }));
    }
}
