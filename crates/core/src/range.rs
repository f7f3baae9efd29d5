use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive `(begin, end)` bound. Either side may be open.
///
/// `begin <= end` is not enforced.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Range<T> {
    #[serde(default)]
    pub begin: Option<T>,
    #[serde(default)]
    pub end: Option<T>,
}

impl<T> Range<T> {
    pub fn new(begin: Option<T>, end: Option<T>) -> Self {
        Self { begin, end }
    }

    pub fn closed(begin: T, end: T) -> Self {
        Self {
            begin: Some(begin),
            end: Some(end),
        }
    }

    pub fn is_open(&self) -> bool {
        self.begin.is_none() || self.end.is_none()
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Range<U> {
        Range {
            begin: self.begin.map(&mut f),
            end: self.end.map(&mut f),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.begin {
            Some(b) => write!(f, "{}", b)?,
            None => f.write_str("*")?,
        }
        f.write_str(" .. ")?;
        match &self.end {
            Some(e) => write!(f, "{}", e),
            None => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_open_sides() {
        assert_eq!(Range::closed(3, 10).to_string(), "3 .. 10");
        assert_eq!(Range::new(None, Some(4)).to_string(), "* .. 4");
    }

    #[test]
    fn open_and_map() {
        let r = Range::new(Some(2), None);
        assert!(r.is_open());
        assert_eq!(r.map(|v| v * 10), Range::new(Some(20), None));
        assert!(!Range::closed(1, 1).is_open());
    }
}
