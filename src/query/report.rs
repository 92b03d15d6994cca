use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::values::Key;

/// One output line produced by running a [`Query`](super::Query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Inserted(Key),
    Deleted(Key),
    Found(Key),
    NotFound(Key),
    Closest { target: Key, closest: Key },
    Traversal(Vec<Key>),
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Inserted(key) => write!(f, "{key} inserted"),
            Report::Deleted(key) => write!(f, "{key} deleted"),
            Report::Found(key) => write!(f, "{key} found"),
            Report::NotFound(key) => write!(f, "{key} not found"),
            Report::Closest { target, closest } => write!(f, "closest to {target} is {closest}"),
            Report::Traversal(keys) => write!(f, "{}", keys.iter().join(" ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_lines() {
        let key = Key::new(5, 25);

        assert_eq!(Report::Inserted(key).to_string(), "5.25 inserted");
        assert_eq!(Report::Deleted(key).to_string(), "5.25 deleted");
        assert_eq!(Report::Found(key).to_string(), "5.25 found");
        assert_eq!(Report::NotFound(key).to_string(), "5.25 not found");
        assert_eq!(
            Report::Closest {
                target: Key::new(4, 0),
                closest: Key::new(3, 0)
            }
            .to_string(),
            "closest to 4.0 is 3.0"
        );
        assert_eq!(
            Report::Traversal(vec![Key::new(1, 0), Key::new(3, 5)]).to_string(),
            "1.0 3.5"
        );
        assert_eq!(Report::Traversal(vec![]).to_string(), "");
    }
}
