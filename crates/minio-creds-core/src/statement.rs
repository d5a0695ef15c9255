//! Creation statement parsing
//!
//! A role carries exactly one creation statement: a JSON object naming the
//! policy to attach to each user issued for it, e.g. `{"policy": "readonly"}`.

use crate::error::StatementError;
use serde::{Deserialize, Serialize};

/// Policy binding for a newly created user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreationStatement {
    pub policy: String,
}

impl CreationStatement {
    /// Decode the single creation statement of a role
    pub fn parse<S: AsRef<str>>(statements: &[S]) -> Result<Self, StatementError> {
        let statement = match statements {
            [] => return Err(StatementError::Empty),
            [single] => single.as_ref(),
            many => return Err(StatementError::TooMany { count: many.len() }),
        };

        let parsed: CreationStatement =
            serde_json::from_str(statement).map_err(|source| StatementError::Decode {
                statement: statement.to_string(),
                source,
            })?;

        if parsed.policy.trim().is_empty() {
            return Err(StatementError::EmptyPolicy);
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_statement() {
        let stmt = CreationStatement::parse(&[r#"{"policy":"readonly"}"#]).unwrap();
        assert_eq!(stmt.policy, "readonly");
    }

    #[test]
    fn test_empty_list() {
        let statements: [&str; 0] = [];
        let err = CreationStatement::parse(&statements).unwrap_err();
        assert!(matches!(err, StatementError::Empty));
    }

    #[test]
    fn test_two_statements() {
        let err = CreationStatement::parse(&[
            r#"{"policy":"readonly"}"#.to_string(),
            r#"{"policy":"writeonly"}"#.to_string(),
        ])
        .unwrap_err();
        assert!(matches!(err, StatementError::TooMany { count: 2 }));
    }

    #[test]
    fn test_not_json() {
        let err = CreationStatement::parse(&["readonly"]).unwrap_err();
        assert!(matches!(err, StatementError::Decode { .. }));
        assert!(err.to_string().contains("readonly"));
    }

    #[test]
    fn test_missing_policy_key() {
        let err = CreationStatement::parse(&[r#"{"role":"readonly"}"#]).unwrap_err();
        assert!(matches!(err, StatementError::Decode { .. }));
    }

    #[test]
    fn test_blank_policy() {
        let err = CreationStatement::parse(&[r#"{"policy":"  "}"#]).unwrap_err();
        assert!(matches!(err, StatementError::EmptyPolicy));
    }
}
