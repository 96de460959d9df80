use std::collections::BTreeMap;

use super::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArKind {
    Program,
    Procedure,
}

impl std::fmt::Display for ArKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArKind::Program => write!(f, "PROGRAM"),
            ArKind::Procedure => write!(f, "PROCEDURE"),
        }
    }
}

/// Bindings of one program or procedure invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationRecord {
    pub name: String,
    pub kind: ArKind,
    pub nesting_level: usize,
    pub bindings: BTreeMap<String, Value>,
    pub return_value: Option<Value>,
}

impl ActivationRecord {
    pub fn new(name: impl Into<String>, kind: ArKind, nesting_level: usize) -> Self {
        ActivationRecord {
            name: name.into(),
            kind,
            nesting_level,
            bindings: BTreeMap::new(),
            return_value: None,
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }
}

impl std::fmt::Display for ActivationRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {} {}", self.nesting_level, self.kind, self.name)?;
        for (name, value) in &self.bindings {
            writeln!(f, "   {name:<20}: {value}")?;
        }
        Ok(())
    }
}

/// LIFO stack of activation records, bounded by `max_depth` so runaway
/// recursion in the interpreted program cannot exhaust the host stack.
#[derive(Debug)]
pub struct CallStack {
    records: Vec<ActivationRecord>,
    max_depth: usize,
}

impl CallStack {
    pub fn new(max_depth: usize) -> Self {
        CallStack {
            records: Vec::new(),
            max_depth,
        }
    }

    /// Hands the record back when the stack is already at `max_depth`.
    pub fn push(&mut self, record: ActivationRecord) -> Result<(), ActivationRecord> {
        if self.records.len() >= self.max_depth {
            tracing::debug!(record = %record.name, max_depth = self.max_depth, "call stack full");
            return Err(record);
        }

        tracing::trace!(
            record = %record.name,
            level = record.nesting_level,
            depth = self.records.len() + 1,
            "push activation record"
        );
        self.records.push(record);
        Ok(())
    }

    pub fn pop(&mut self) -> Option<ActivationRecord> {
        let record = self.records.pop();
        if let Some(record) = &record {
            tracing::trace!(record = %record.name, depth = self.records.len(), "pop activation record");
        }
        record
    }

    /// Drops every record, innermost first.
    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    pub fn peek(&self) -> Option<&ActivationRecord> {
        self.records.last()
    }

    pub fn peek_mut(&mut self) -> Option<&mut ActivationRecord> {
        self.records.last_mut()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl std::fmt::Display for CallStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "CALL STACK")?;
        for record in self.records.iter().rev() {
            write!(f, "{record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bindings_overwrite() {
        let mut ar = ActivationRecord::new("program", ArKind::Program, 1);
        assert_eq!(ar.get("x"), None);
        ar.set("x", Value::Int(0));
        ar.set("x", Value::Float(1.5));
        assert_eq!(ar.get("x"), Some(Value::Float(1.5)));
    }

    #[test]
    fn lifo_order() {
        let mut stack = CallStack::new(8);
        stack
            .push(ActivationRecord::new("program", ArKind::Program, 1))
            .unwrap();
        stack
            .push(ActivationRecord::new("f", ArKind::Procedure, 2))
            .unwrap();

        assert_eq!(stack.len(), 2);
        assert_eq!(stack.peek().unwrap().name, "f");
        assert_eq!(stack.pop().unwrap().name, "f");
        assert_eq!(stack.pop().unwrap().name, "program");
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }

    #[test]
    fn push_past_max_depth_is_rejected() {
        let mut stack = CallStack::new(2);
        stack
            .push(ActivationRecord::new("program", ArKind::Program, 1))
            .unwrap();
        stack
            .push(ActivationRecord::new("f", ArKind::Procedure, 2))
            .unwrap();

        let rejected = stack
            .push(ActivationRecord::new("g", ArKind::Procedure, 2))
            .unwrap_err();
        assert_eq!(rejected.name, "g");
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn clear_empties_the_stack() {
        let mut stack = CallStack::new(2);
        stack
            .push(ActivationRecord::new("program", ArKind::Program, 1))
            .unwrap();
        stack
            .push(ActivationRecord::new("f", ArKind::Procedure, 2))
            .unwrap();

        stack.clear();
        assert!(stack.is_empty());
        assert!(
            stack
                .push(ActivationRecord::new("program", ArKind::Program, 1))
                .is_ok()
        );
    }

    #[test]
    fn display() {
        let mut stack = CallStack::new(4);
        let mut program = ActivationRecord::new("program", ArKind::Program, 1);
        program.set("y", Value::Int(9));
        program.set("x", Value::Int(0));
        stack.push(program).unwrap();

        let expected = format!(
            "CALL STACK\n1: PROGRAM program\n   {:<20}: 0\n   {:<20}: 9\n",
            "x", "y"
        );
        assert_eq!(stack.to_string(), expected);
    }
}
