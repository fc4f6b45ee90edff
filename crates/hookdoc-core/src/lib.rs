//! hookdoc-core: scope-tracked PHP AST walking for hook extraction.
//!
//! The pipeline here is a single pass per file: parse with mago, then
//! [`walker::walk_program`] produces a [`walker::FileWalk`] holding every
//! declaration, call use, and hook invocation with docblocks attached.
//! Higher layers turn that raw output into the document model.

pub mod classify;
pub mod lines;
pub mod scope;
pub mod trivia;
pub mod walker;

pub use classify::{CallKind, CallUse, FunctionUse, HookId, HookKind, MethodUse};
pub use lines::LineMap;
pub use scope::{ScopeFrame, ScopeKind, ScopeStack};
pub use walker::{walk_program, FileWalk, IncludeKind, RawHook, RawPart, Visibility};
