//! Call-site classification.
//!
//! Given a call-like expression, decides whether it is a WordPress hook
//! invocation, a plain function call, or a method call (instance, static,
//! or constructor), and extracts the name parts, argument text, and line
//! range. Everything here is purely syntactic; dynamic callees and class
//! expressions pass through as source text.

use mago_span::{HasSpan, Span};
use mago_syntax::ast::*;
use serde::Serialize;

use crate::lines::LineMap;

const FILTER_CALLEES: [&str; 3] = [
    "apply_filters",
    "apply_filters_ref_array",
    "apply_filters_deprecated",
];

const ACTION_CALLEES: [&str; 3] = [
    "do_action",
    "do_action_ref_array",
    "do_action_deprecated",
];

const DEPRECATION_MARKERS: [&str; 4] = [
    "_deprecated_file",
    "_deprecated_function",
    "_deprecated_argument",
    "_deprecated_hook",
];

/// Whether a hook is an action or a filter. Determined solely by the
/// callee family, never by argument count or content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HookKind {
    Action,
    Filter,
}

/// A plain function call recorded against the enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionUse {
    pub name: String,
    pub line: usize,
    pub end_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation_version: Option<String>,
}

/// A method call recorded against the enclosing scope. `class` holds the
/// receiver as written (`$this`, `self`, `parent`, a class name, or an
/// arbitrary expression's text); placeholders are resolved to the concrete
/// class name when the enclosing class frame pops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodUse {
    pub class: String,
    pub name: String,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub line: usize,
    pub end_line: usize,
}

/// Ordinal into the file-wide hook list.
pub type HookId = usize;

/// A detected hook invocation, before docblock attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookCall {
    pub name: String,
    pub kind: HookKind,
    pub line: usize,
    pub end_line: usize,
    pub args: Vec<String>,
}

/// Classification result for one call-like expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    Hook(HookCall),
    Function(FunctionUse),
    Method(MethodUse),
}

/// One entry in a scope frame's uses bucket, in recording order. Hooks
/// are referenced by ordinal into the file-wide hook list; function and
/// method uses are owned directly.
#[derive(Debug, Clone)]
pub enum CallUse {
    Hook(HookId),
    Function(FunctionUse),
    Method(MethodUse),
}

/// Slice the source text covered by a span.
pub fn snippet<'s>(source: &'s str, span: Span) -> &'s str {
    &source[span.start.offset as usize..span.end.offset as usize]
}

fn line_range(span: Span, lines: &LineMap) -> (usize, usize) {
    (lines.line(span.start.offset), lines.line(span.end.offset))
}

/// Classify a call-like expression. Returns `None` for shapes that are
/// not tracked (dynamic callees, calls with a missing name argument).
pub fn classify(expr: &Expression<'_>, source: &str, lines: &LineMap) -> Option<CallKind> {
    let (line, end_line) = line_range(expr.span(), lines);

    match expr {
        Expression::Call(Call::Function(func_call)) => {
            classify_function_call(func_call, line, end_line, source)
        }
        Expression::Call(Call::Method(call)) => Some(CallKind::Method(MethodUse {
            class: snippet(source, call.object.span()).to_string(),
            name: selector_name(&call.method, source),
            is_static: false,
            line,
            end_line,
        })),
        Expression::Call(Call::NullSafeMethod(call)) => Some(CallKind::Method(MethodUse {
            class: snippet(source, call.object.span()).to_string(),
            name: selector_name(&call.method, source),
            is_static: false,
            line,
            end_line,
        })),
        Expression::Call(Call::StaticMethod(call)) => Some(CallKind::Method(MethodUse {
            class: snippet(source, call.class.span()).to_string(),
            name: selector_name(&call.method, source),
            is_static: true,
            line,
            end_line,
        })),
        Expression::Instantiation(new_expr) => Some(CallKind::Method(MethodUse {
            class: snippet(source, new_expr.class.span()).to_string(),
            name: "__construct".to_string(),
            is_static: true,
            line,
            end_line,
        })),
        _ => None,
    }
}

fn classify_function_call(
    func_call: &FunctionCall<'_>,
    line: usize,
    end_line: usize,
    source: &str,
) -> Option<CallKind> {
    let callee = if let Expression::Identifier(ident) = func_call.function {
        snippet(source, ident.span()).trim_start_matches('\\')
    } else {
        // Dynamic callee, e.g. `$callback()`. Not tracked.
        return None;
    };

    if let Some(kind) = hook_kind(callee) {
        let mut args = func_call.argument_list.arguments.iter();
        let name = hook_name(args.next()?.value(), source);
        let rest = args
            .map(|arg| snippet(source, arg.value().span()).to_string())
            .collect();
        return Some(CallKind::Hook(HookCall {
            name,
            kind,
            line,
            end_line,
            args: rest,
        }));
    }

    if DEPRECATION_MARKERS.contains(&callee) {
        let mut args = func_call.argument_list.arguments.iter();
        let name = args
            .next()
            .map(|arg| strip_quotes(snippet(source, arg.value().span())).to_string())?;
        let deprecation_version = args.next().map(|arg| deprecation_version(arg.value(), source));
        return Some(CallKind::Function(FunctionUse {
            name,
            line,
            end_line,
            deprecation_version,
        }));
    }

    Some(CallKind::Function(FunctionUse {
        name: callee.to_string(),
        line,
        end_line,
        deprecation_version: None,
    }))
}

/// Is this callee a hook invocation, and of which kind?
pub fn hook_kind(callee: &str) -> Option<HookKind> {
    if FILTER_CALLEES.contains(&callee) {
        Some(HookKind::Filter)
    } else if ACTION_CALLEES.contains(&callee) {
        Some(HookKind::Action)
    } else {
        None
    }
}

fn selector_name(selector: &ClassLikeMemberSelector<'_>, source: &str) -> String {
    match selector {
        ClassLikeMemberSelector::Identifier(ident) => ident.value.to_string(),
        // Dynamic selector (`$obj->$name()`): keep the source text.
        _ => snippet(source, selector.span()).to_string(),
    }
}

/// Render a hook-name expression the way it reads in the docs: string
/// literals lose their quotes, concatenation pieces that are not literals
/// become `{...}` placeholders, and interpolated strings keep their
/// interpolation syntax with the outer quotes trimmed.
fn hook_name(expr: &Expression<'_>, source: &str) -> String {
    match expr {
        Expression::Literal(Literal::String(lit)) => match lit.value {
            Some(value) => value.to_string(),
            None => strip_quotes(snippet(source, lit.span())).to_string(),
        },
        Expression::Binary(binary)
            if matches!(binary.operator, BinaryOperator::StringConcat(_)) =>
        {
            format!(
                "{}{}",
                concat_piece(&binary.lhs, source),
                concat_piece(&binary.rhs, source)
            )
        }
        _ => strip_quotes(snippet(source, expr.span())).to_string(),
    }
}

fn concat_piece(expr: &Expression<'_>, source: &str) -> String {
    if let Expression::Binary(binary) = expr {
        if matches!(binary.operator, BinaryOperator::StringConcat(_)) {
            return hook_name(expr, source);
        }
    }
    let text = snippet(source, expr.span());
    let stripped = strip_quotes(text);
    if stripped.len() != text.trim().len() {
        stripped.to_string()
    } else {
        format!("{{{}}}", text)
    }
}

fn strip_quotes(text: &str) -> &str {
    let trimmed = text.trim();
    for quote in ['\'', '"'] {
        if trimmed.len() >= 2 && trimmed.starts_with(quote) && trimmed.ends_with(quote) {
            return &trimmed[1..trimmed.len() - 1];
        }
    }
    trimmed
}

/// Extract the version string from a deprecation marker's second argument,
/// unwrapping nested literal wrappers up to two levels. Falls back to the
/// raw argument text when no literal is found.
fn deprecation_version(expr: &Expression<'_>, source: &str) -> String {
    let mut current = expr;
    for _ in 0..2 {
        match current {
            Expression::Literal(Literal::String(lit)) => {
                if let Some(value) = lit.value {
                    return value.to_string();
                }
                return strip_quotes(snippet(source, lit.span())).to_string();
            }
            Expression::Parenthesized(paren) => current = &paren.expression,
            _ => break,
        }
    }
    snippet(source, current.span()).to_string()
}
