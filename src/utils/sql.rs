use sqlx::{MySql, QueryBuilder};

/// A value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

/// One filter condition. `clause` only ever contains column names from the
/// fixed tables in `crate::db` and one `?` per bound value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    clause: String,
    values: Vec<SqlValue>,
}

impl Predicate {
    fn new(clause: String, values: Vec<SqlValue>) -> Self {
        debug_assert_eq!(clause.matches('?').count(), values.len());
        Self { clause, values }
    }

    /// Case-insensitive substring match against a text expression
    pub fn contains(expr: &'static str, term: &str) -> Self {
        Self::new(
            format!("LOWER({}) LIKE ? ESCAPE '{}'", expr, LIKE_ESCAPE),
            vec![SqlValue::Text(like_pattern(term))],
        )
    }

    /// Case-insensitive substring match against any of `exprs`
    pub fn contains_any(exprs: &[&'static str], term: &str) -> Self {
        let pattern = like_pattern(term);
        let clause = exprs
            .iter()
            .map(|expr| format!("LOWER({}) LIKE ? ESCAPE '{}'", expr, LIKE_ESCAPE))
            .collect::<Vec<_>>()
            .join(" OR ");
        let values = exprs.iter().map(|_| SqlValue::Text(pattern.clone())).collect();
        Self::new(format!("({})", clause), values)
    }

    pub fn eq_int(expr: &'static str, value: i64) -> Self {
        Self::new(format!("{} = ?", expr), vec![SqlValue::Int(value)])
    }

    pub fn eq_text(expr: &'static str, value: &str) -> Self {
        Self::new(
            format!("{} = ?", expr),
            vec![SqlValue::Text(value.to_string())],
        )
    }

    /// Exact text match against any of `exprs`
    pub fn eq_text_any(exprs: &[&'static str], value: &str) -> Self {
        let clause = exprs
            .iter()
            .map(|expr| format!("{} = ?", expr))
            .collect::<Vec<_>>()
            .join(" OR ");
        let values = exprs
            .iter()
            .map(|_| SqlValue::Text(value.to_string()))
            .collect();
        Self::new(format!("({})", clause), values)
    }

    /// A condition no row satisfies
    pub fn never() -> Self {
        Self::new("1 = 0".to_string(), Vec::new())
    }

    pub fn at_least(expr: &'static str, value: i64) -> Self {
        Self::new(format!("{} >= ?", expr), vec![SqlValue::Int(value)])
    }

    pub fn at_most(expr: &'static str, value: i64) -> Self {
        Self::new(format!("{} <= ?", expr), vec![SqlValue::Int(value)])
    }

    #[cfg(test)]
    pub(crate) fn clause(&self) -> &str {
        &self.clause
    }

    #[cfg(test)]
    pub(crate) fn values(&self) -> &[SqlValue] {
        &self.values
    }
}

/// A conjunction of predicates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause {
    predicates: Vec<Predicate>,
}

impl WhereClause {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// SQL text with `?` placeholders, including the leading ` WHERE `
    #[cfg(test)]
    pub(crate) fn to_sql(&self) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        let joined = self
            .predicates
            .iter()
            .map(Predicate::clause)
            .collect::<Vec<_>>()
            .join(" AND ");
        format!(" WHERE {}", joined)
    }

    /// Bound values in placeholder order
    #[cfg(test)]
    pub(crate) fn values(&self) -> Vec<&SqlValue> {
        self.predicates.iter().flat_map(|p| p.values.iter()).collect()
    }

    /// Append this clause to `builder`, binding every value
    pub fn push_to(&self, builder: &mut QueryBuilder<'_, MySql>) {
        if self.predicates.is_empty() {
            return;
        }
        builder.push(" WHERE ");
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                builder.push(" AND ");
            }
            let mut values = predicate.values.iter();
            let mut parts = predicate.clause.split('?').peekable();
            while let Some(part) = parts.next() {
                builder.push(part);
                if parts.peek().is_none() {
                    break;
                }
                match values.next() {
                    Some(SqlValue::Text(text)) => {
                        builder.push_bind(text.clone());
                    }
                    Some(SqlValue::Int(n)) => {
                        builder.push_bind(*n);
                    }
                    None => {}
                }
            }
        }
    }
}

/// Escape character for every LIKE this module renders. Must not be `\\`,
/// which changes meaning under `NO_BACKSLASH_ESCAPES`.
pub const LIKE_ESCAPE: char = '!';

/// Lowercased `%term%` pattern with LIKE wildcards escaped by [`LIKE_ESCAPE`]
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
