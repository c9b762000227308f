//! Predicate accumulator shared by the top-level WHERE clause and nested groups.

use super::clause::{Binding, PARAM_PREFIX};
use crate::value::Value;

/// An AND-joined list of predicates and their bound values.
///
/// [`QueryBuilder`](crate::QueryBuilder) keeps one of these for its WHERE
/// clause and hands fresh ones to `filter_group` closures. A nested group
/// continues the parent's placeholder counter, so `:paramN` names stay unique
/// across the whole statement.
///
/// The operator string is inserted verbatim. It is not checked against a
/// list of SQL operators; pass only trusted operator text.
#[derive(Clone, Debug, Default)]
pub struct ConditionGroup {
    predicates: Vec<String>,
    bindings: Vec<Binding>,
    next_index: usize,
}

impl ConditionGroup {
    /// Create an empty group numbering placeholders from `:param0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group whose first placeholder is `:param{index}`.
    pub(crate) fn starting_at(index: usize) -> Self {
        Self {
            next_index: index,
            ..Self::default()
        }
    }

    /// Append `field operator :paramN` and bind `value` to `paramN`.
    pub fn filter(
        &mut self,
        field: &str,
        operator: &str,
        value: impl Into<Value>,
    ) -> &mut Self {
        let name = format!("{PARAM_PREFIX}{}", self.next_index);
        self.next_index += 1;
        self.predicates.push(format!("{field} {operator} :{name}"));
        self.bindings.push(Binding::new(name, value.into()));
        self
    }

    pub fn eq(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(field, "=", value)
    }

    pub fn ne(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(field, "!=", value)
    }

    pub fn gt(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(field, ">", value)
    }

    pub fn gte(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(field, ">=", value)
    }

    pub fn lt(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(field, "<", value)
    }

    pub fn lte(&mut self, field: &str, value: impl Into<Value>) -> &mut Self {
        self.filter(field, "<=", value)
    }

    pub fn like(&mut self, field: &str, pattern: impl Into<Value>) -> &mut Self {
        self.filter(field, "LIKE", pattern)
    }

    /// Build a nested group and append it as one parenthesized predicate.
    ///
    /// The nested predicates are joined with AND. A closure that adds
    /// nothing leaves this group unchanged.
    pub fn group(&mut self, build: impl FnOnce(&mut ConditionGroup)) -> &mut Self {
        let mut inner = ConditionGroup::starting_at(self.next_index);
        build(&mut inner);
        self.next_index = inner.next_index;

        if !inner.is_empty() {
            self.predicates.push(format!("({})", inner.render()));
            self.bindings.extend(inner.bindings);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Number of top-level predicates (a nested group counts once).
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn predicates(&self) -> &[String] {
        &self.predicates
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Predicates joined by AND, without a `WHERE` prefix.
    pub fn render(&self) -> String {
        self.predicates.join(" AND ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_placeholders_in_call_order() {
        let mut group = ConditionGroup::new();
        group.eq("status", 1).gt("quantity", 0);
        assert_eq!(group.render(), "status = :param0 AND quantity > :param1");
        let names: Vec<_> = group.bindings().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["param0", "param1"]);
    }

    #[test]
    fn nested_groups_continue_the_counter() {
        let mut group = ConditionGroup::new();
        group.eq("a", 1).group(|g| {
            g.eq("b", 2).group(|inner| {
                inner.eq("c", 3);
            });
        });
        group.eq("d", 4);

        assert_eq!(
            group.render(),
            "a = :param0 AND (b = :param1 AND (c = :param2)) AND d = :param3"
        );
        let values: Vec<_> = group.bindings().iter().map(|b| b.value.clone()).collect();
        assert_eq!(values, [Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
    }

    #[test]
    fn empty_group_adds_nothing() {
        let mut group = ConditionGroup::new();
        group.group(|_| {});
        assert!(group.is_empty());
        assert!(group.bindings().is_empty());
    }

    #[test]
    fn starting_at_offsets_names() {
        let mut group = ConditionGroup::starting_at(5);
        group.lt("price", 10);
        assert_eq!(group.render(), "price < :param5");
    }
}
