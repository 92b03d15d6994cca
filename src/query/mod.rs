//! Text front-end for a [`KAvlTree`]: a delimited query string in, report lines out.
//!
//! A query string starts with the tolerance `k`, followed by one command per token:
//!
//! ```text
//! 1, insert 5 0, insert 3 0, search 3 0, approx_search 4 0, delete 5 0, in_order, pre_order
//! ```

mod report;

use std::str::FromStr;

use tracing::debug;

use crate::prelude::*;

pub use report::Report;

/// Token separator used when none is configured.
pub const DEFAULT_DELIMITER: &str = ", ";

/// A single command of a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Query {
    Insert(Key),
    Delete(Key),
    Search(Key),
    ApproxSearch(Key),
    InOrder,
    PreOrder,
}

impl FromStr for Query {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        let fields: Vec<&str> = token.split_whitespace().collect();

        match fields.as_slice() {
            ["insert", whole, fraction] => Ok(Query::Insert(parse_key(whole, fraction)?)),
            ["delete", whole, fraction] => Ok(Query::Delete(parse_key(whole, fraction)?)),
            ["search", whole, fraction] => Ok(Query::Search(parse_key(whole, fraction)?)),
            ["approx_search", whole, fraction] => {
                Ok(Query::ApproxSearch(parse_key(whole, fraction)?))
            }
            ["in_order"] => Ok(Query::InOrder),
            ["pre_order"] => Ok(Query::PreOrder),
            [command @ ("insert" | "delete" | "search" | "approx_search"), ..] => Err(
                Error::InvalidQuery(format!("`{command}` takes a whole and a fraction: `{token}`")),
            ),
            [command @ ("in_order" | "pre_order"), ..] => Err(Error::InvalidQuery(format!(
                "`{command}` takes no arguments: `{token}`"
            ))),
            [] => Err(Error::InvalidQuery("empty command".to_string())),
            [command, ..] => Err(Error::InvalidQuery(format!("unknown command `{command}`"))),
        }
    }
}

fn parse_key(whole: &str, fraction: &str) -> Result<Key> {
    Ok(Key::new(whole.parse()?, fraction.parse()?))
}

impl Query {
    /// Runs the command against `tree`.
    ///
    /// Outcomes without a line of their own yield `None`: inserting a key that is already
    /// present, deleting a missing key, and approximate search on an empty tree.
    pub fn apply(&self, tree: &mut KAvlTree) -> Option<Report> {
        match *self {
            Query::Insert(key) => match tree.insert(key) {
                Insertion::Inserted => Some(Report::Inserted(key)),
                Insertion::AlreadyPresent => None,
            },
            Query::Delete(key) => match tree.delete(&key) {
                Removal::Deleted => Some(Report::Deleted(key)),
                Removal::NotFound => None,
            },
            Query::Search(key) => match tree.search(&key) {
                Search::Found(_) => Some(Report::Found(key)),
                Search::NotFound => Some(Report::NotFound(key)),
            },
            Query::ApproxSearch(target) => tree
                .approx_search(&target)
                .map(|closest| Report::Closest { target, closest }),
            Query::InOrder => Some(Report::Traversal(tree.in_order().copied().collect())),
            Query::PreOrder => Some(Report::Traversal(tree.pre_order().copied().collect())),
        }
    }
}

/// A parsed query string: the tree tolerance and the commands to run, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryString {
    pub k: i64,
    pub queries: Vec<Query>,
}

impl QueryString {
    pub fn parse(input: &str, delimiter: &str) -> Result<Self> {
        if delimiter.is_empty() {
            return Err(Error::InvalidQuery("delimiter must not be empty".to_string()));
        }

        let mut tokens = input.split(delimiter).map(str::trim);

        let k = match tokens.next() {
            Some(k) if !k.is_empty() => k.parse()?,
            _ => return Err(Error::InvalidQuery("missing tolerance `k`".to_string())),
        };

        let queries = tokens.map(Query::from_str).collect::<Result<Vec<_>>>()?;

        Ok(Self { k, queries })
    }

    /// Builds a fresh tree and runs every command against it.
    pub fn execute(&self) -> Result<Vec<Report>> {
        let mut tree = KAvlTree::new(self.k)?;

        let reports = self
            .queries
            .iter()
            .filter_map(|query| query.apply(&mut tree))
            .collect::<Vec<_>>();

        debug!(
            k = self.k,
            queries = self.queries.len(),
            reports = reports.len(),
            size = tree.len(),
            "executed query string"
        );

        Ok(reports)
    }
}

impl FromStr for QueryString {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input, DEFAULT_DELIMITER)
    }
}

/// Parses and executes `input` in one go.
pub fn run(input: &str, delimiter: &str) -> Result<Vec<Report>> {
    QueryString::parse(input, delimiter)?.execute()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use proptest::prelude::*;
    use test_strategy::proptest;

    use super::*;

    fn lines(input: &str) -> Vec<String> {
        run(input, DEFAULT_DELIMITER)
            .expect("query string should run")
            .iter()
            .map(Report::to_string)
            .collect()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("insert 5 0".parse::<Query>(), Ok(Query::Insert(Key::new(5, 0))));
        assert_eq!("delete -2 25".parse::<Query>(), Ok(Query::Delete(Key::new(-2, 25))));
        assert_eq!("search 1 1".parse::<Query>(), Ok(Query::Search(Key::new(1, 1))));
        assert_eq!(
            "approx_search 4 0".parse::<Query>(),
            Ok(Query::ApproxSearch(Key::new(4, 0)))
        );
        assert_eq!("in_order".parse::<Query>(), Ok(Query::InOrder));
        assert_eq!("  pre_order ".parse::<Query>(), Ok(Query::PreOrder));
    }

    #[test]
    fn test_parse_rejects_malformed_commands() {
        assert!(matches!(
            "insert 5".parse::<Query>(),
            Err(Error::InvalidQuery(_))
        ));
        assert!(matches!(
            "in_order 1 2".parse::<Query>(),
            Err(Error::InvalidQuery(_))
        ));
        assert!(matches!(
            "upsert 1 2".parse::<Query>(),
            Err(Error::InvalidQuery(_))
        ));
        assert!(matches!(
            "search 1 x".parse::<Query>(),
            Err(Error::FailedDeserialization(_))
        ));
        assert!(matches!("".parse::<Query>(), Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn test_parse_query_string() {
        let parsed: QueryString = "2, insert 1 0, in_order".parse().unwrap();

        assert_eq!(parsed.k, 2);
        assert_eq!(
            parsed.queries,
            vec![Query::Insert(Key::new(1, 0)), Query::InOrder]
        );
    }

    #[test]
    fn test_parse_query_string_with_custom_delimiter() {
        let parsed = QueryString::parse("1;insert 1 0;pre_order", ";").unwrap();
        assert_eq!(parsed.queries.len(), 2);

        assert!(QueryString::parse("1, in_order", "").is_err());
    }

    #[test]
    fn test_missing_or_invalid_k() {
        assert!(matches!(
            QueryString::parse("", DEFAULT_DELIMITER),
            Err(Error::InvalidQuery(_))
        ));
        assert!(matches!(
            QueryString::parse("one, in_order", DEFAULT_DELIMITER),
            Err(Error::FailedDeserialization(_))
        ));
        assert_eq!(
            run("-1, in_order", DEFAULT_DELIMITER),
            Err(Error::InvalidConfiguration { k: -1 })
        );
    }

    #[test]
    fn test_k_only_runs_nothing() {
        assert!(lines("3").is_empty());
    }

    #[test]
    fn test_session_output() {
        let output = lines(
            "1, insert 5 0, insert 3 0, insert 8 0, insert 1 0, insert 4 0, insert 4 0, \
             search 3 0, search 9 0, approx_search 6 0, delete 5 0, delete 7 0, in_order, pre_order",
        );

        assert_eq!(
            output,
            vec![
                "5.0 inserted",
                "3.0 inserted",
                "8.0 inserted",
                "1.0 inserted",
                "4.0 inserted",
                "3.0 found",
                "9.0 not found",
                "closest to 6.0 is 5.0",
                "5.0 deleted",
                "1.0 3.0 4.0 8.0",
                "4.0 3.0 1.0 8.0",
            ]
        );
    }

    #[test]
    fn test_approx_search_on_empty_tree_is_silent() {
        assert!(lines("1, approx_search 4 0").is_empty());
        assert_eq!(lines("1, in_order"), vec![""]);
    }

    #[proptest(fork = false)]
    fn test_in_order_report_matches_tree(
        #[strategy(crate::testing::operations(0..64))] operations: Vec<crate::testing::Operation>,
    ) {
        let mut tree = KAvlTree::default();
        for operation in &operations {
            operation.apply(&mut tree);
        }

        let expected = tree.in_order().map(Key::to_string).join(" ");
        let report = Query::InOrder.apply(&mut tree).map(|report| report.to_string());

        prop_assert_eq!(report, Some(expected));
    }
}
