use std::fmt;

use crate::domain::query::{Slot, StatusQuery};

/// The expression issued against the execution index:
/// `(project_name:"…")+(suite_description:"…")`. Values are quote-escaped so
/// user input cannot break out of the field terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryExpression(String);

impl QueryExpression {
    pub fn for_query(query: &StatusQuery) -> Self {
        let project = escape(query.get(Slot::Project).unwrap_or_default());
        let suite = escape(query.get(Slot::Suite).unwrap_or_default());
        QueryExpression(format!("(project_name:\"{project}\")+(suite_description:\"{suite}\")"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        if matches!(character, '"' | '\\') {
            escaped.push('\\');
        }
        escaped.push(character);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::QueryExpression;
    use crate::domain::query::StatusQuery;

    #[test]
    fn expression_matches_the_index_grammar() {
        let query = StatusQuery {
            project: Some("Alpha".to_string()),
            suite: Some("Smoke".to_string()),
            ..StatusQuery::default()
        };

        assert_eq!(
            QueryExpression::for_query(&query).as_str(),
            r#"(project_name:"Alpha")+(suite_description:"Smoke")"#
        );
    }

    #[test]
    fn embedded_quotes_are_escaped() {
        let query = StatusQuery {
            project: Some(r#"Al"pha"#.to_string()),
            suite: Some(r"Smo\ke".to_string()),
            ..StatusQuery::default()
        };

        assert_eq!(
            QueryExpression::for_query(&query).as_str(),
            r#"(project_name:"Al\"pha")+(suite_description:"Smo\\ke")"#
        );
    }
}
