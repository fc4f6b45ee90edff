//! Lexical scope stack for the walker.
//!
//! The file is the implicit bottom frame; class, function, and method
//! declarations push and pop on top of it. Call uses are always recorded
//! into the innermost frame, so nothing recorded inside a method can leak
//! into the class or file buckets.

use crate::classify::CallUse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    File,
    Class,
    Function,
    Method,
}

/// One frame of the scope stack: what declaration we are currently
/// inside, plus everything called while it was on top.
#[derive(Debug)]
pub struct ScopeFrame {
    pub kind: ScopeKind,
    pub name: String,
    pub uses: Vec<CallUse>,
}

impl ScopeFrame {
    fn new(kind: ScopeKind, name: String) -> Self {
        ScopeFrame {
            kind,
            name,
            uses: Vec::new(),
        }
    }
}

/// Stack of scope frames with an implicit file frame at the bottom that
/// can never be popped.
#[derive(Debug)]
pub struct ScopeStack {
    file: ScopeFrame,
    frames: Vec<ScopeFrame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            file: ScopeFrame::new(ScopeKind::File, String::new()),
            frames: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: ScopeKind, name: &str) {
        debug_assert!(kind != ScopeKind::File);
        self.frames.push(ScopeFrame::new(kind, name.to_string()));
    }

    /// Pop the innermost declared frame. Returns `None` when only the
    /// file frame remains; the walker's push/pop calls nest with the AST
    /// so this only happens on a walker bug.
    pub fn pop(&mut self) -> Option<ScopeFrame> {
        self.frames.pop()
    }

    /// The innermost frame, falling back to the file frame.
    pub fn current(&mut self) -> &mut ScopeFrame {
        self.frames.last_mut().unwrap_or(&mut self.file)
    }

    pub fn record_use(&mut self, record: CallUse) {
        self.current().uses.push(record);
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Consume the stack, yielding the file frame's accumulated uses.
    pub fn into_file_frame(self) -> ScopeFrame {
        self.file
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{CallUse, FunctionUse};

    fn function_use(name: &str) -> CallUse {
        CallUse::Function(FunctionUse {
            name: name.to_string(),
            line: 1,
            end_line: 1,
            deprecation_version: None,
        })
    }

    #[test]
    fn test_current_falls_back_to_file_frame() {
        let mut stack = ScopeStack::new();
        assert_eq!(stack.current().kind, ScopeKind::File);
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn test_uses_attach_to_innermost_frame() {
        let mut stack = ScopeStack::new();
        stack.record_use(function_use("at_file"));
        stack.push(ScopeKind::Class, "Widget");
        stack.push(ScopeKind::Method, "render");
        stack.record_use(function_use("at_method"));

        let method = stack.pop().unwrap();
        assert_eq!(method.kind, ScopeKind::Method);
        assert_eq!(method.uses.len(), 1);

        let class = stack.pop().unwrap();
        assert_eq!(class.name, "Widget");
        assert!(class.uses.is_empty());

        let file = stack.into_file_frame();
        assert_eq!(file.uses.len(), 1);
    }

    #[test]
    fn test_pop_never_yields_file_frame() {
        let mut stack = ScopeStack::new();
        assert!(stack.pop().is_none());
        stack.push(ScopeKind::Function, "helper");
        assert!(stack.pop().is_some());
        assert!(stack.pop().is_none());
    }
}
