//! The normalized document model.
//!
//! One `SourceFile` per input file, built once from a single walk and
//! read-only afterwards. Hooks are owned by the file's `hooks` list in
//! source order; callables and classes reference theirs by ordinal into
//! that list, so a hook fired inside a method is the same entity at the
//! file level and at the method level.

use hookdoc_core::{FunctionUse, HookKind, IncludeKind, MethodUse, Visibility};
use serde::Serialize;

use crate::docblock::Docblock;

/// Ordinal of a hook inside its `SourceFile`'s `hooks` list.
pub type HookRef = usize;

#[derive(Debug, Clone, Serialize)]
pub struct HookEntity {
    pub name: String,
    pub line: usize,
    pub end_line: usize,
    #[serde(rename = "type")]
    pub kind: HookKind,
    pub arguments: Vec<String>,
    pub doc: Docblock,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgumentEntity {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_hint: Option<String>,
}

/// Function and method calls recorded while a scope was on top of the
/// stack, split by kind. Hooks live in the parallel `hooks` ref list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Uses {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionUse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodUse>,
}

impl Uses {
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty() && self.methods.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionEntity {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub line: usize,
    pub end_line: usize,
    pub arguments: Vec<ArgumentEntity>,
    pub doc: Docblock,
    #[serde(skip_serializing_if = "Uses::is_empty")]
    pub uses: Uses,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<HookRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodEntity {
    pub name: String,
    pub owning_class: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    pub line: usize,
    pub end_line: usize,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub visibility: Visibility,
    pub arguments: Vec<ArgumentEntity>,
    pub doc: Docblock,
    #[serde(skip_serializing_if = "Uses::is_empty")]
    pub uses: Uses,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<HookRef>,
}

impl MethodEntity {
    /// Display name, e.g. `WP_Query::parse_query`.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.owning_class, self.name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyEntity {
    pub name: String,
    pub line: usize,
    pub end_line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub visibility: Visibility,
    pub doc: Docblock,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassEntity {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    pub line: usize,
    pub end_line: usize,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implements: Vec<String>,
    pub properties: Vec<PropertyEntity>,
    pub methods: Vec<MethodEntity>,
    pub doc: Docblock,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hooks: Vec<HookRef>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConstantEntity {
    pub name: String,
    pub line: usize,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncludeEntity {
    pub name: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub kind: IncludeKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceFile {
    pub path: String,
    pub root: String,
    pub doc: Docblock,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub plugin_name: String,
    #[serde(skip_serializing_if = "Uses::is_empty")]
    pub uses: Uses,
    pub includes: Vec<IncludeEntity>,
    pub constants: Vec<ConstantEntity>,
    /// Every hook in the file, in source order. The single owner; scoped
    /// entities hold ordinals into this list.
    pub hooks: Vec<HookEntity>,
    /// Ordinals of hooks fired at file scope, outside any declaration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_hooks: Vec<HookRef>,
    pub functions: Vec<FunctionEntity>,
    pub classes: Vec<ClassEntity>,
}

impl SourceFile {
    pub fn has_hooks(&self) -> bool {
        !self.hooks.is_empty()
    }
}
