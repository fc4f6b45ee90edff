//! Scope-tracked AST walker.
//!
//! A single recursive pass over one file's AST. Declarations push and pop
//! scope frames; every call-like expression is classified and recorded
//! into the innermost frame's uses bucket; hooks additionally materialize
//! into the file-wide hook list immediately, and scopes keep ordinals into
//! that list. Docblocks attached to non-documentable statements are
//! stashed so the next undocumented hook can pick them up.

use std::collections::HashMap;

use mago_span::{HasSpan, Span};
use mago_syntax::ast::*;
use serde::Serialize;

use crate::classify::{self, snippet, CallKind, CallUse, HookId, HookKind};
use crate::lines::LineMap;
use crate::scope::{ScopeKind, ScopeStack};
use crate::trivia::{docblock_before, first_docblock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IncludeKind {
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
}

/// A detected hook invocation with its resolved docblock text.
#[derive(Debug, Clone)]
pub struct RawHook {
    pub name: String,
    pub kind: HookKind,
    pub line: usize,
    pub end_line: usize,
    pub args: Vec<String>,
    pub doc: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RawInclude {
    pub path: String,
    pub line: usize,
    pub kind: IncludeKind,
}

#[derive(Debug, Clone)]
pub struct RawConstant {
    pub name: String,
    pub line: usize,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct RawParam {
    pub name: String,
    pub default: Option<String>,
    pub type_hint: Option<String>,
}

/// The shape shared by functions and methods.
#[derive(Debug)]
pub struct RawCallable {
    pub name: String,
    pub line: usize,
    pub end_line: usize,
    pub params: Vec<RawParam>,
    pub doc: Option<String>,
    pub uses: Vec<CallUse>,
}

#[derive(Debug)]
pub struct RawFunction {
    pub callable: RawCallable,
}

#[derive(Debug)]
pub struct RawMethod {
    pub callable: RawCallable,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_static: bool,
    pub visibility: Visibility,
}

#[derive(Debug)]
pub struct RawProperty {
    pub name: String,
    pub line: usize,
    pub end_line: usize,
    pub default: Option<String>,
    pub is_static: bool,
    pub visibility: Visibility,
    pub doc: Option<String>,
}

#[derive(Debug)]
pub struct RawClass {
    pub name: String,
    pub line: usize,
    pub end_line: usize,
    pub is_final: bool,
    pub is_abstract: bool,
    pub extends: Option<String>,
    pub implements: Vec<String>,
    pub properties: Vec<RawProperty>,
    pub methods: Vec<RawPart>,
    pub doc: Option<String>,
    pub hooks: Vec<HookId>,
}

/// A declaration produced by the walk, carried loosely so the entity
/// factories can validate the kind they were handed.
#[derive(Debug)]
pub enum RawPart {
    Class(RawClass),
    Function(RawFunction),
    Method(RawMethod),
}

impl RawPart {
    pub fn kind_name(&self) -> &'static str {
        match self {
            RawPart::Class(_) => "class",
            RawPart::Function(_) => "function",
            RawPart::Method(_) => "method",
        }
    }
}

/// Everything extracted from one file in a single pass.
#[derive(Debug, Default)]
pub struct FileWalk {
    pub doc: Option<String>,
    pub namespace: String,
    pub aliases: Vec<String>,
    /// File-frame uses bucket, including `HookId`s for file-scope hooks.
    pub uses: Vec<CallUse>,
    /// Every hook in the file, in source order. Scopes reference these
    /// by ordinal; this list is the single owner.
    pub hooks: Vec<RawHook>,
    pub includes: Vec<RawInclude>,
    pub constants: Vec<RawConstant>,
    pub functions: Vec<RawPart>,
    pub classes: Vec<RawPart>,
}

/// Walk one parsed file and extract its declarations, uses, and hooks.
pub fn walk_program(program: &Program<'_>, source: &str) -> FileWalk {
    let mut walker = Walker {
        source,
        lines: LineMap::new(source),
        trivia: program.trivia.as_slice(),
        scopes: ScopeStack::new(),
        last_orphan_doc: None,
        out: FileWalk::default(),
    };

    for stmt in program.statements.iter() {
        walker.walk_statement(stmt);
    }

    walker.out.doc = file_doc(program, source);
    walker.out.uses = walker.scopes.into_file_frame().uses;
    walker.out
}

/// The file docblock is the first docblock in the file, unless a top-level
/// documentable declaration claims that same comment as its own.
fn file_doc(program: &Program<'_>, source: &str) -> Option<String> {
    let trivia = program.trivia.as_slice();
    let (_, text) = first_docblock(trivia)?;

    let claimed = program.statements.iter().any(|stmt| {
        is_documentable(stmt)
            && docblock_before(trivia, source, stmt.span().start.offset)
                .is_some_and(|doc| doc.as_ptr() == text.as_ptr())
    });

    if claimed {
        None
    } else {
        Some(text.to_string())
    }
}

fn is_documentable(stmt: &Statement<'_>) -> bool {
    matches!(
        stmt,
        Statement::Class(_)
            | Statement::Interface(_)
            | Statement::Trait(_)
            | Statement::Enum(_)
            | Statement::Function(_)
            | Statement::Constant(_)
    )
}

struct Walker<'s, 't, 'a> {
    source: &'s str,
    lines: LineMap,
    trivia: &'t [Trivia<'a>],
    scopes: ScopeStack,
    last_orphan_doc: Option<String>,
    out: FileWalk,
}

impl<'s, 't, 'a> Walker<'s, 't, 'a> {
    fn line_range(&self, span: Span) -> (usize, usize) {
        (
            self.lines.line(span.start.offset),
            self.lines.line(span.end.offset),
        )
    }

    fn doc_for(&self, node_start: u32) -> Option<String> {
        docblock_before(self.trivia, self.source, node_start).map(str::to_string)
    }

    /// Keep the docblock of a statement that cannot own one, so a
    /// following undocumented hook can consume it. Last write wins.
    fn stash_orphan_doc(&mut self, stmt: &Statement<'a>) {
        if let Some(doc) = self.doc_for(stmt.span().start.offset) {
            self.last_orphan_doc = Some(doc);
        }
    }

    // ── Statements ──────────────────────────────────────────────────

    fn walk_statement(&mut self, stmt: &Statement<'a>) {
        match stmt {
            Statement::Namespace(ns) => {
                if self.out.namespace.is_empty() {
                    if let Some(name) = &ns.name {
                        self.out.namespace = name.value().to_string();
                    }
                }
                match &ns.body {
                    NamespaceBody::Implicit(body) => {
                        for inner in body.statements.iter() {
                            self.walk_statement(inner);
                        }
                    }
                    NamespaceBody::BraceDelimited(body) => {
                        for inner in body.statements.iter() {
                            self.walk_statement(inner);
                        }
                    }
                }
            }
            Statement::Use(use_stmt) => {
                self.collect_aliases(&use_stmt.items);
            }
            Statement::Class(class) => self.walk_class(class),
            Statement::Trait(trait_decl) => self.walk_trait(trait_decl),
            Statement::Enum(enum_decl) => self.walk_enum(enum_decl),
            Statement::Function(func) => self.walk_function(func),
            Statement::Constant(constant) => {
                for item in constant.items.iter() {
                    self.out.constants.push(RawConstant {
                        name: snippet(self.source, item.name.span()).to_string(),
                        line: self.lines.line(item.name.span().start.offset),
                        value: snippet(self.source, item.value.span()).to_string(),
                    });
                }
            }
            Statement::Expression(expr_stmt) => {
                // A docblock on a bare hook statement belongs to the hook
                // itself and is picked up during classification.
                if !self.is_hook_call(&expr_stmt.expression) {
                    self.stash_orphan_doc(stmt);
                }
                self.walk_expression(&expr_stmt.expression);
            }
            Statement::Block(block) => {
                self.stash_orphan_doc(stmt);
                for inner in block.statements.iter() {
                    self.walk_statement(inner);
                }
            }
            Statement::If(if_stmt) => {
                self.stash_orphan_doc(stmt);
                self.walk_expression(&if_stmt.condition);
                self.walk_if_body(&if_stmt.body);
            }
            Statement::Foreach(foreach) => {
                self.stash_orphan_doc(stmt);
                self.walk_expression(&foreach.expression);
                match &foreach.body {
                    ForeachBody::Statement(inner) => self.walk_statement(inner),
                    ForeachBody::ColonDelimited(block) => {
                        for inner in block.statements.iter() {
                            self.walk_statement(inner);
                        }
                    }
                }
            }
            Statement::For(for_stmt) => {
                self.stash_orphan_doc(stmt);
                for expr in for_stmt.initializations.iter() {
                    self.walk_expression(expr);
                }
                for expr in for_stmt.conditions.iter() {
                    self.walk_expression(expr);
                }
                for expr in for_stmt.increments.iter() {
                    self.walk_expression(expr);
                }
                match &for_stmt.body {
                    ForBody::Statement(inner) => self.walk_statement(inner),
                    ForBody::ColonDelimited(block) => {
                        for inner in block.statements.iter() {
                            self.walk_statement(inner);
                        }
                    }
                }
            }
            Statement::While(while_stmt) => {
                self.stash_orphan_doc(stmt);
                self.walk_expression(&while_stmt.condition);
                match &while_stmt.body {
                    WhileBody::Statement(inner) => self.walk_statement(inner),
                    WhileBody::ColonDelimited(block) => {
                        for inner in block.statements.iter() {
                            self.walk_statement(inner);
                        }
                    }
                }
            }
            Statement::DoWhile(do_while) => {
                self.stash_orphan_doc(stmt);
                self.walk_statement(&do_while.statement);
                self.walk_expression(&do_while.condition);
            }
            Statement::Switch(switch) => {
                self.stash_orphan_doc(stmt);
                self.walk_expression(&switch.expression);
                self.walk_switch_body(&switch.body);
            }
            Statement::Try(try_stmt) => {
                self.stash_orphan_doc(stmt);
                for inner in try_stmt.block.statements.iter() {
                    self.walk_statement(inner);
                }
                for catch in try_stmt.catch_clauses.iter() {
                    for inner in catch.block.statements.iter() {
                        self.walk_statement(inner);
                    }
                }
                if let Some(finally) = &try_stmt.finally_clause {
                    for inner in finally.block.statements.iter() {
                        self.walk_statement(inner);
                    }
                }
            }
            Statement::Return(ret) => {
                self.stash_orphan_doc(stmt);
                if let Some(expr) = &ret.value {
                    self.walk_expression(expr);
                }
            }
            Statement::Echo(echo) => {
                self.stash_orphan_doc(stmt);
                for expr in echo.values.iter() {
                    self.walk_expression(expr);
                }
            }
            _ => {}
        }
    }

    fn walk_if_body(&mut self, body: &IfBody<'a>) {
        match body {
            IfBody::Statement(stmt_body) => {
                self.walk_statement(stmt_body.statement);
                for else_if in stmt_body.else_if_clauses.iter() {
                    self.walk_expression(&else_if.condition);
                    self.walk_statement(else_if.statement);
                }
                if let Some(else_clause) = &stmt_body.else_clause {
                    self.walk_statement(else_clause.statement);
                }
            }
            IfBody::ColonDelimited(block) => {
                for inner in block.statements.iter() {
                    self.walk_statement(inner);
                }
                for else_if in block.else_if_clauses.iter() {
                    self.walk_expression(&else_if.condition);
                    for inner in else_if.statements.iter() {
                        self.walk_statement(inner);
                    }
                }
                if let Some(else_clause) = &block.else_clause {
                    for inner in else_clause.statements.iter() {
                        self.walk_statement(inner);
                    }
                }
            }
        }
    }

    fn walk_switch_body(&mut self, body: &SwitchBody<'a>) {
        match body {
            SwitchBody::BraceDelimited(block) => {
                for case in block.cases.iter() {
                    for stmt in case.statements().iter() {
                        self.walk_statement(stmt);
                    }
                }
            }
            SwitchBody::ColonDelimited(block) => {
                for case in block.cases.iter() {
                    for stmt in case.statements().iter() {
                        self.walk_statement(stmt);
                    }
                }
            }
        }
    }

    // ── Declarations ────────────────────────────────────────────────

    fn walk_function(&mut self, func: &Function<'a>) {
        let name = func.name.value.to_string();
        self.scopes.push(ScopeKind::Function, &name);
        for inner in func.body.statements.iter() {
            self.walk_statement(inner);
        }
        let frame = self
            .scopes
            .pop()
            .map(|f| f.uses)
            .unwrap_or_default();

        let (line, end_line) = self.line_range(func.span());
        self.out.functions.push(RawPart::Function(RawFunction {
            callable: RawCallable {
                name,
                line,
                end_line,
                params: self.collect_params(&func.parameter_list),
                doc: self.doc_for(func.span().start.offset),
                uses: frame,
            },
        }));
    }

    fn walk_class(&mut self, class: &Class<'a>) {
        let name = class.name.value.to_string();
        let extends = class
            .extends
            .as_ref()
            .and_then(|ext| ext.types.first().map(|ident| ident.value().to_string()));
        let implements = class
            .implements
            .as_ref()
            .map(|imp| {
                imp.types
                    .iter()
                    .map(|ident| ident.value().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let raw = self.walk_class_like(
            &name,
            class.span(),
            class.modifiers.contains_final(),
            class.modifiers.contains_abstract(),
            extends,
            implements,
            class.members.iter(),
        );
        self.out.classes.push(RawPart::Class(raw));
    }

    // Traits get the same treatment as classes so hooks fired inside
    // trait methods are attributed to the trait, not the file.
    fn walk_trait(&mut self, trait_decl: &Trait<'a>) {
        let name = trait_decl.name.value.to_string();
        let raw = self.walk_class_like(
            &name,
            trait_decl.span(),
            false,
            false,
            None,
            Vec::new(),
            trait_decl.members.iter(),
        );
        self.out.classes.push(RawPart::Class(raw));
    }

    // Enums carry methods like classes do. They are implicitly final and
    // cannot extend anything.
    fn walk_enum(&mut self, enum_decl: &Enum<'a>) {
        let name = enum_decl.name.value.to_string();
        let implements = enum_decl
            .implements
            .as_ref()
            .map(|imp| {
                imp.types
                    .iter()
                    .map(|ident| ident.value().to_string())
                    .collect()
            })
            .unwrap_or_default();

        let raw = self.walk_class_like(
            &name,
            enum_decl.span(),
            true,
            false,
            None,
            implements,
            enum_decl.members.iter(),
        );
        self.out.classes.push(RawPart::Class(raw));
    }

    fn walk_class_like<'m>(
        &mut self,
        name: &str,
        span: Span,
        is_final: bool,
        is_abstract: bool,
        extends: Option<String>,
        implements: Vec<String>,
        members: impl Iterator<Item = &'m ClassLikeMember<'a>>,
    ) -> RawClass
    where
        'a: 'm,
    {
        self.scopes.push(ScopeKind::Class, name);

        // Method uses are queued under a per-method ordinal and attached
        // once the whole class has been walked; receiver placeholders
        // ($this, self, static, parent) resolve at that point.
        let mut pending_uses: HashMap<usize, Vec<CallUse>> = HashMap::new();
        let mut methods: Vec<(usize, RawMethod)> = Vec::new();
        let mut properties = Vec::new();
        let mut next_method_id = 0usize;

        for member in members {
            match member {
                ClassLikeMember::Method(method) => {
                    let method_id = next_method_id;
                    next_method_id += 1;

                    let method_name = method.name.value.to_string();
                    self.scopes.push(ScopeKind::Method, &method_name);
                    if let MethodBody::Concrete(body) = &method.body {
                        for inner in body.statements.iter() {
                            self.walk_statement(inner);
                        }
                    }
                    if let Some(frame) = self.scopes.pop() {
                        if !frame.uses.is_empty() {
                            pending_uses.insert(method_id, frame.uses);
                        }
                    }

                    let (line, end_line) = self.line_range(method.span());
                    methods.push((
                        method_id,
                        RawMethod {
                            callable: RawCallable {
                                name: method_name,
                                line,
                                end_line,
                                params: self.collect_params(&method.parameter_list),
                                doc: self.doc_for(method.span().start.offset),
                                uses: Vec::new(),
                            },
                            is_final: method.modifiers.contains_final(),
                            is_abstract: matches!(method.body, MethodBody::Abstract(_)),
                            is_static: method.modifiers.iter().any(|m| m.is_static()),
                            visibility: visibility_of(method.modifiers.iter()),
                        },
                    ));
                }
                ClassLikeMember::Property(property) => {
                    if let Property::Plain(plain) = property {
                        self.collect_properties(plain, &mut properties);
                    }
                }
                _ => {}
            }
        }

        let class_frame = self.scopes.pop();
        let class_hooks = class_frame
            .map(|frame| {
                frame
                    .uses
                    .into_iter()
                    .filter_map(|record| match record {
                        CallUse::Hook(id) => Some(id),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let method_parts = methods
            .into_iter()
            .map(|(id, mut method)| {
                let mut uses = pending_uses.remove(&id).unwrap_or_default();
                resolve_receivers(&mut uses, name, extends.as_deref());
                method.callable.uses = uses;
                RawPart::Method(method)
            })
            .collect();

        let (line, end_line) = self.line_range(span);
        RawClass {
            name: name.to_string(),
            line,
            end_line,
            is_final,
            is_abstract,
            extends,
            implements,
            properties,
            methods: method_parts,
            doc: self.doc_for(span.start.offset),
            hooks: class_hooks,
        }
    }

    fn collect_properties(&self, plain: &PlainProperty<'a>, out: &mut Vec<RawProperty>) {
        let is_static = plain.modifiers.iter().any(|m| m.is_static());
        let visibility = visibility_of(plain.modifiers.iter());
        let doc = self.doc_for(plain.span().start.offset);

        for item in plain.items.iter() {
            let (line, end_line) = self.line_range(item.variable().span());
            let default = match item {
                PropertyItem::Concrete(concrete) => {
                    Some(snippet(self.source, concrete.value.span()).to_string())
                }
                PropertyItem::Abstract(_) => None,
            };
            out.push(RawProperty {
                name: item.variable().name.to_string(),
                line,
                end_line,
                default,
                is_static,
                visibility,
                doc: doc.clone(),
            });
        }
    }

    fn collect_params(&self, parameter_list: &FunctionLikeParameterList<'a>) -> Vec<RawParam> {
        parameter_list
            .parameters
            .iter()
            .map(|param| RawParam {
                name: param.variable.name.to_string(),
                default: param
                    .default_value
                    .as_ref()
                    .map(|d| snippet(self.source, d.value.span()).to_string()),
                type_hint: param
                    .hint
                    .as_ref()
                    .map(|h| snippet(self.source, h.span()).to_string()),
            })
            .collect()
    }

    fn collect_aliases(&mut self, items: &UseItems<'a>) {
        match items {
            UseItems::Sequence(seq) => {
                for item in seq.items.iter() {
                    self.out.aliases.push(item.name.value().to_string());
                }
            }
            UseItems::TypedSequence(seq) => {
                for item in seq.items.iter() {
                    self.out.aliases.push(item.name.value().to_string());
                }
            }
            UseItems::TypedList(list) => {
                let prefix = list.namespace.value();
                for item in list.items.iter() {
                    self.out
                        .aliases
                        .push(format!("{}\\{}", prefix, item.name.value()));
                }
            }
            UseItems::MixedList(list) => {
                let prefix = list.namespace.value();
                for maybe_typed in list.items.iter() {
                    self.out
                        .aliases
                        .push(format!("{}\\{}", prefix, maybe_typed.item.name.value()));
                }
            }
        }
    }

    // ── Expressions ─────────────────────────────────────────────────

    fn is_hook_call(&self, expr: &Expression<'a>) -> bool {
        if let Expression::Call(Call::Function(func_call)) = expr {
            if let Expression::Identifier(ident) = func_call.function {
                let callee = snippet(self.source, ident.span()).trim_start_matches('\\');
                return classify::hook_kind(callee).is_some();
            }
        }
        false
    }

    fn walk_expression(&mut self, expr: &Expression<'a>) {
        match expr {
            Expression::Call(call) => {
                self.record_call(expr);
                match call {
                    Call::Function(func_call) => {
                        self.check_define(func_call);
                        for arg in func_call.argument_list.arguments.iter() {
                            self.walk_expression(arg.value());
                        }
                    }
                    Call::Method(method_call) => {
                        self.walk_expression(method_call.object);
                        for arg in method_call.argument_list.arguments.iter() {
                            self.walk_expression(arg.value());
                        }
                    }
                    Call::NullSafeMethod(method_call) => {
                        self.walk_expression(method_call.object);
                        for arg in method_call.argument_list.arguments.iter() {
                            self.walk_expression(arg.value());
                        }
                    }
                    Call::StaticMethod(static_call) => {
                        for arg in static_call.argument_list.arguments.iter() {
                            self.walk_expression(arg.value());
                        }
                    }
                }
            }
            Expression::Instantiation(new_expr) => {
                self.record_call(expr);
                if let Some(argument_list) = &new_expr.argument_list {
                    for arg in argument_list.arguments.iter() {
                        self.walk_expression(arg.value());
                    }
                }
            }
            Expression::Construct(construct) => match construct {
                Construct::Include(inc) => self.record_include(inc.value, IncludeKind::Include),
                Construct::IncludeOnce(inc) => {
                    self.record_include(inc.value, IncludeKind::IncludeOnce)
                }
                Construct::Require(req) => self.record_include(req.value, IncludeKind::Require),
                Construct::RequireOnce(req) => {
                    self.record_include(req.value, IncludeKind::RequireOnce)
                }
                _ => {}
            },
            Expression::Closure(closure) => {
                // Closures do not open a tracked scope; calls inside them
                // belong to the enclosing function/method/file.
                for inner in closure.body.statements.iter() {
                    self.walk_statement(inner);
                }
            }
            Expression::ArrowFunction(arrow) => {
                self.walk_expression(arrow.expression);
            }
            Expression::Match(match_expr) => {
                self.walk_expression(match_expr.expression);
                for arm in match_expr.arms.iter() {
                    if let MatchArm::Expression(expr_arm) = arm {
                        for condition in expr_arm.conditions.iter() {
                            self.walk_expression(condition);
                        }
                    }
                    self.walk_expression(arm.expression());
                }
            }
            Expression::Throw(throw) => {
                self.walk_expression(throw.exception);
            }
            Expression::UnaryPrefix(unary) => {
                self.walk_expression(&unary.operand);
            }
            Expression::Parenthesized(paren) => {
                self.walk_expression(&paren.expression);
            }
            Expression::Binary(binary) => {
                self.walk_expression(&binary.lhs);
                self.walk_expression(&binary.rhs);
            }
            Expression::Conditional(ternary) => {
                self.walk_expression(&ternary.condition);
                if let Some(then) = &ternary.then {
                    self.walk_expression(then);
                }
                self.walk_expression(&ternary.r#else);
            }
            Expression::Assignment(assign) => {
                self.walk_expression(&assign.lhs);
                self.walk_expression(&assign.rhs);
            }
            Expression::ArrayAccess(access) => {
                self.walk_expression(&access.array);
                self.walk_expression(&access.index);
            }
            Expression::Array(arr) => {
                for elem in arr.elements.iter() {
                    if let ArrayElement::KeyValue(kv) = elem {
                        self.walk_expression(&kv.key);
                        self.walk_expression(&kv.value);
                    } else if let ArrayElement::Value(val) = elem {
                        self.walk_expression(&val.value);
                    }
                }
            }
            _ => {}
        }
    }

    fn record_call(&mut self, expr: &Expression<'a>) {
        let Some(kind) = classify::classify(expr, self.source, &self.lines) else {
            return;
        };
        match kind {
            CallKind::Hook(hook) => {
                let doc = self
                    .doc_for(expr.span().start.offset)
                    .or_else(|| self.last_orphan_doc.take());
                let id: HookId = self.out.hooks.len();
                self.out.hooks.push(RawHook {
                    name: hook.name,
                    kind: hook.kind,
                    line: hook.line,
                    end_line: hook.end_line,
                    args: hook.args,
                    doc,
                });
                self.scopes.record_use(CallUse::Hook(id));
            }
            CallKind::Function(func) => {
                self.scopes.record_use(CallUse::Function(func));
            }
            CallKind::Method(method) => {
                self.scopes.record_use(CallUse::Method(method));
            }
        }
    }

    fn check_define(&mut self, func_call: &FunctionCall<'a>) {
        let Expression::Identifier(ident) = func_call.function else {
            return;
        };
        if snippet(self.source, ident.span()) != "define" {
            return;
        }
        let args: Vec<_> = func_call.argument_list.arguments.iter().collect();
        if args.len() < 2 {
            return;
        }
        let name_span = args[0].value().span();
        let name = snippet(self.source, name_span);
        let name = name.trim_matches(|c| c == '\'' || c == '"');
        self.out.constants.push(RawConstant {
            name: name.to_string(),
            line: self.lines.line(name_span.start.offset),
            value: snippet(self.source, args[1].value().span()).to_string(),
        });
    }

    fn record_include(&mut self, value: &Expression<'a>, kind: IncludeKind) {
        let text = snippet(self.source, value.span());
        self.out.includes.push(RawInclude {
            path: text.trim_matches(|c| c == '\'' || c == '"').to_string(),
            line: self.lines.line(value.span().start.offset),
            kind,
        });
        self.walk_expression(value);
    }
}

fn visibility_of<'a>(modifiers: impl Iterator<Item = &'a Modifier<'a>>) -> Visibility {
    for modifier in modifiers {
        if modifier.is_private() {
            return Visibility::Private;
        }
        if modifier.is_protected() {
            return Visibility::Protected;
        }
    }
    Visibility::Public
}

/// Resolve `$this`/`self`/`static` receivers to the concrete class name,
/// and `parent` to the extended class when known. Runs once per method,
/// after the class frame pops.
fn resolve_receivers(uses: &mut [CallUse], class_name: &str, extends: Option<&str>) {
    for record in uses.iter_mut() {
        if let CallUse::Method(method) = record {
            match method.class.as_str() {
                "$this" => method.class = class_name.to_string(),
                receiver if receiver.eq_ignore_ascii_case("self") => {
                    method.class = class_name.to_string()
                }
                receiver if receiver.eq_ignore_ascii_case("static") => {
                    method.class = class_name.to_string()
                }
                receiver if receiver.eq_ignore_ascii_case("parent") => {
                    if let Some(parent) = extends {
                        method.class = parent.to_string();
                    }
                }
                _ => {}
            }
        }
    }
}
