//! Docblock lookup from parser trivia.
//!
//! mago keeps comments out of the AST and in the program's trivia list, so
//! attaching a `/** ... */` block to a declaration or call means finding the
//! docblock trivia that immediately precedes the node, with nothing but
//! whitespace and ordinary comments in between.

use mago_syntax::ast::*;

/// Find the docblock text directly preceding `node_start`, if any.
///
/// Walks the trivia list backwards from the node, stepping over whitespace
/// and plain comments; the first docblock reached with no code in any gap
/// is the node's docblock.
pub fn docblock_before<'a>(
    trivia: &'a [Trivia<'a>],
    source: &str,
    node_start: u32,
) -> Option<&'a str> {
    let candidate_idx = trivia.partition_point(|t| t.span.start.offset < node_start);
    if candidate_idx == 0 {
        return None;
    }

    let source_bytes = source.as_bytes();
    let mut covered_from = node_start;

    for i in (0..candidate_idx).rev() {
        let t = &trivia[i];
        let t_end = t.span.end.offset;

        let gap = source_bytes
            .get(t_end as usize..covered_from as usize)
            .unwrap_or(&[]);
        if !gap.iter().all(u8::is_ascii_whitespace) {
            return None;
        }

        match t.kind {
            TriviaKind::DocBlockComment => return Some(t.value),
            TriviaKind::WhiteSpace
            | TriviaKind::SingleLineComment
            | TriviaKind::MultiLineComment
            | TriviaKind::HashComment => {
                covered_from = t.span.start.offset;
            }
        }
    }

    None
}

/// The first docblock in the file, with its start offset. Candidate for
/// the file-level docblock when it does not belong to the first declaration.
pub fn first_docblock<'a>(trivia: &'a [Trivia<'a>]) -> Option<(u32, &'a str)> {
    trivia
        .iter()
        .find(|t| t.kind == TriviaKind::DocBlockComment)
        .map(|t| (t.span.start.offset, t.value))
}
