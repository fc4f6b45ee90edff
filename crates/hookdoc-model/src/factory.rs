//! Entity factories.
//!
//! Pure conversion from the walker's raw output into the document model.
//! Factories are composed bottom-up: hooks, constants, and includes are
//! leaf conversions; functions and methods share a callable shape; the
//! class factory maps its members through the method factory. Parts are
//! carried loosely by the walker, so every factory validates the kind it
//! was handed and fails fast on a mismatch.

use hookdoc_core::walker::{FileWalk, RawCallable, RawClass, RawHook, RawPart, RawProperty};
use hookdoc_core::CallUse;
use thiserror::Error;

use crate::docblock::Docblock;
use crate::entity::{
    ArgumentEntity, ClassEntity, ConstantEntity, FunctionEntity, HookEntity, HookRef,
    IncludeEntity, MethodEntity, PropertyEntity, SourceFile, Uses,
};

#[derive(Debug, Error)]
pub enum ModelError {
    /// A factory was handed a part of the wrong kind. This is a
    /// programming error in the walker, not a data error.
    #[error("unknown entity kind: expected {expected}, got {found}")]
    UnknownEntityKind {
        expected: &'static str,
        found: &'static str,
    },
}

/// Build one file's record from its walk output. Consumes the raw walk;
/// the result is read-only from here on.
pub fn source_file(
    walk: FileWalk,
    path: &str,
    root: &str,
    plugin_name: &str,
) -> Result<SourceFile, ModelError> {
    let namespace = walk.namespace;
    let aliases = walk.aliases;

    let (uses, file_hooks) = split_uses(walk.uses);

    let functions = walk
        .functions
        .into_iter()
        .map(|part| function(part, &namespace, &aliases))
        .collect::<Result<Vec<_>, _>>()?;

    let classes = walk
        .classes
        .into_iter()
        .map(|part| class(part, &namespace, &aliases))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SourceFile {
        path: path.to_string(),
        root: root.to_string(),
        doc: parse_doc(walk.doc),
        plugin_name: plugin_name.to_string(),
        uses,
        includes: walk
            .includes
            .into_iter()
            .map(|inc| IncludeEntity {
                name: inc.path,
                line: inc.line,
                kind: inc.kind,
            })
            .collect(),
        constants: walk
            .constants
            .into_iter()
            .map(|c| ConstantEntity {
                name: c.name,
                line: c.line,
                value: c.value,
            })
            .collect(),
        hooks: walk.hooks.into_iter().map(hook).collect(),
        file_hooks,
        functions,
        classes,
    })
}

fn hook(raw: RawHook) -> HookEntity {
    HookEntity {
        name: raw.name,
        line: raw.line,
        end_line: raw.end_line,
        kind: raw.kind,
        arguments: raw.args,
        doc: parse_doc(raw.doc),
    }
}

fn function(part: RawPart, namespace: &str, aliases: &[String]) -> Result<FunctionEntity, ModelError> {
    let raw = match part {
        RawPart::Function(func) => func,
        other => {
            return Err(ModelError::UnknownEntityKind {
                expected: "function",
                found: other.kind_name(),
            })
        }
    };
    let (core, uses, hooks) = callable(raw.callable, namespace, aliases);
    Ok(FunctionEntity {
        name: core.name,
        namespace: core.namespace,
        aliases: core.aliases,
        line: core.line,
        end_line: core.end_line,
        arguments: core.arguments,
        doc: core.doc,
        uses,
        hooks,
    })
}

fn method(
    part: RawPart,
    owning_class: &str,
    namespace: &str,
    aliases: &[String],
) -> Result<MethodEntity, ModelError> {
    let raw = match part {
        RawPart::Method(method) => method,
        other => {
            return Err(ModelError::UnknownEntityKind {
                expected: "method",
                found: other.kind_name(),
            })
        }
    };
    let (core, uses, hooks) = callable(raw.callable, namespace, aliases);
    Ok(MethodEntity {
        name: core.name,
        owning_class: owning_class.to_string(),
        namespace: core.namespace,
        aliases: core.aliases,
        line: core.line,
        end_line: core.end_line,
        is_final: raw.is_final,
        is_abstract: raw.is_abstract,
        is_static: raw.is_static,
        visibility: raw.visibility,
        arguments: core.arguments,
        doc: core.doc,
        uses,
        hooks,
    })
}

fn class(part: RawPart, namespace: &str, aliases: &[String]) -> Result<ClassEntity, ModelError> {
    let raw: RawClass = match part {
        RawPart::Class(class) => class,
        other => {
            return Err(ModelError::UnknownEntityKind {
                expected: "class",
                found: other.kind_name(),
            })
        }
    };

    let methods = raw
        .methods
        .into_iter()
        .map(|part| method(part, &raw.name, namespace, aliases))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ClassEntity {
        name: raw.name,
        namespace: namespace.to_string(),
        line: raw.line,
        end_line: raw.end_line,
        is_final: raw.is_final,
        is_abstract: raw.is_abstract,
        extends: raw.extends,
        implements: raw.implements,
        properties: raw.properties.into_iter().map(property).collect(),
        methods,
        doc: parse_doc(raw.doc),
        hooks: raw.hooks,
    })
}

fn property(raw: RawProperty) -> PropertyEntity {
    PropertyEntity {
        name: raw.name,
        line: raw.line,
        end_line: raw.end_line,
        default: raw.default,
        is_static: raw.is_static,
        visibility: raw.visibility,
        doc: parse_doc(raw.doc),
    }
}

/// The fields shared by function and method entities.
struct CallableCore {
    name: String,
    namespace: String,
    aliases: Vec<String>,
    line: usize,
    end_line: usize,
    arguments: Vec<ArgumentEntity>,
    doc: Docblock,
}

fn callable(
    raw: RawCallable,
    namespace: &str,
    aliases: &[String],
) -> (CallableCore, Uses, Vec<HookRef>) {
    let (uses, hooks) = split_uses(raw.uses);
    (
        CallableCore {
            name: raw.name,
            namespace: namespace.to_string(),
            aliases: aliases.to_vec(),
            line: raw.line,
            end_line: raw.end_line,
            arguments: raw
                .params
                .into_iter()
                .map(|p| ArgumentEntity {
                    name: p.name,
                    default: p.default,
                    type_hint: p.type_hint,
                })
                .collect(),
            doc: parse_doc(raw.doc),
        },
        uses,
        hooks,
    )
}

/// Split a scope's ordered uses bucket into function/method uses and hook
/// ordinals, preserving recording order within each list.
fn split_uses(records: Vec<CallUse>) -> (Uses, Vec<HookRef>) {
    let mut uses = Uses::default();
    let mut hooks = Vec::new();
    for record in records {
        match record {
            CallUse::Hook(id) => hooks.push(id),
            CallUse::Function(func) => uses.functions.push(func),
            CallUse::Method(method) => uses.methods.push(method),
        }
    }
    (uses, hooks)
}

fn parse_doc(raw: Option<String>) -> Docblock {
    raw.map(|text| Docblock::parse(&text)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use hookdoc_core::{walk_program, HookKind, Visibility};
    use mago_database::file::FileId;

    fn build(php: &str) -> SourceFile {
        let arena = Bump::new();
        let file_id = FileId::new("input.php");
        let program = mago_syntax::parser::parse_file_content(&arena, file_id, php);
        let walk = walk_program(program, php);
        source_file(walk, "wp-includes/post.php", "/srv/wp", "Example Plugin").unwrap()
    }

    #[test]
    fn test_method_hook_shares_identity_with_file_list() {
        let file = build(concat!(
            "<?php\n",
            "class Post {\n",
            "    public function title($title) {\n",
            "        return apply_filters('the_title', $title);\n",
            "    }\n",
            "}\n",
        ));
        assert_eq!(file.hooks.len(), 1);
        let method = &file.classes[0].methods[0];
        assert_eq!(method.hooks, vec![0]);

        let hook = &file.hooks[method.hooks[0]];
        assert_eq!(hook.name, "the_title");
        assert_eq!(hook.kind, HookKind::Filter);
        assert!(hook.end_line >= hook.line);
    }

    #[test]
    fn test_file_scope_hooks_keep_their_ordinals() {
        let file = build(concat!(
            "<?php\n",
            "do_action('muplugins_loaded');\n",
            "function boot() {\n",
            "    do_action('boot');\n",
            "}\n",
            "do_action('plugins_loaded');\n",
        ));
        assert_eq!(file.hooks.len(), 3);
        // Only the two top-level firings are file-scope; the one inside
        // boot() belongs to the function.
        assert_eq!(file.file_hooks, vec![0, 2]);
        assert_eq!(file.hooks[file.file_hooks[0]].name, "muplugins_loaded");
        assert_eq!(file.hooks[file.file_hooks[1]].name, "plugins_loaded");
        assert_eq!(file.functions[0].hooks, vec![1]);
    }

    #[test]
    fn test_method_call_inside_method_stays_out_of_file_uses() {
        let file = build(concat!(
            "<?php\n",
            "class Loader {\n",
            "    public function load() {\n",
            "        wp_cache_get('key');\n",
            "    }\n",
            "}\n",
        ));
        assert!(file.uses.is_empty());
        let method = &file.classes[0].methods[0];
        assert_eq!(method.uses.functions.len(), 1);
        assert_eq!(method.uses.functions[0].name, "wp_cache_get");
    }

    #[test]
    fn test_callable_shape_and_qualified_name() {
        let file = build(concat!(
            "<?php\n",
            "namespace Acme;\n",
            "class Widget {\n",
            "    /** Renders the widget. */\n",
            "    protected static function render(string $slot, $args = []) {}\n",
            "}\n",
        ));
        let class = &file.classes[0];
        assert_eq!(class.namespace, "Acme");
        let method = &class.methods[0];
        assert_eq!(method.qualified_name(), "Widget::render");
        assert_eq!(method.visibility, Visibility::Protected);
        assert!(method.is_static);
        assert_eq!(method.doc.description, "Renders the widget.");
        assert_eq!(method.arguments.len(), 2);
        assert_eq!(method.arguments[0].name, "$slot");
        assert_eq!(method.arguments[0].type_hint.as_deref(), Some("string"));
        assert_eq!(method.arguments[1].default.as_deref(), Some("[]"));
    }

    #[test]
    fn test_hook_docblock_is_parsed() {
        let file = build(concat!(
            "<?php\n",
            "/**\n",
            " * Fires my action.\n",
            " *\n",
            " * @since 1.2.0\n",
            " */\n",
            "do_action('my_action');\n",
        ));
        let hook = &file.hooks[0];
        assert_eq!(hook.doc.description, "Fires my action.");
        assert_eq!(hook.doc.tags[0].name, "since");
        assert_eq!(hook.doc.tags[0].content, "1.2.0");
    }

    #[test]
    fn test_plugin_name_and_paths_carried() {
        let file = build("<?php do_action('init');");
        assert_eq!(file.path, "wp-includes/post.php");
        assert_eq!(file.root, "/srv/wp");
        assert_eq!(file.plugin_name, "Example Plugin");
    }

    #[test]
    fn test_abstract_method_has_no_uses() {
        let file = build(concat!(
            "<?php\n",
            "abstract class Base {\n",
            "    abstract public function run();\n",
            "}\n",
        ));
        let class = &file.classes[0];
        assert!(class.is_abstract);
        let method = &class.methods[0];
        assert!(method.is_abstract);
        assert!(method.uses.is_empty());
        assert!(method.hooks.is_empty());
    }

    #[test]
    fn test_serialized_hook_kind_is_lowercase() {
        let file = build("<?php do_action('init');");
        let json = serde_json::to_value(&file.hooks[0]).unwrap();
        assert_eq!(json["type"], "action");
        assert_eq!(json["name"], "init");
    }
}
