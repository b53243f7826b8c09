//! Source-location translation into IR form.

use rivet_ast::{AstContext, SourceLocation};
use rivet_ir::SourceLoc;

/// Converts an AST location into `(filename, line, column)`, using spelling
/// positions and trimming a leading `./` from the filename.
pub fn convert_source_location(ctx: &AstContext, loc: SourceLocation) -> SourceLoc {
    let sm = &ctx.source_manager;
    let filename = sm
        .file_of(loc)
        .and_then(|file| sm.filename(file))
        .unwrap_or("");
    let filename = filename.strip_prefix("./").unwrap_or(filename);
    SourceLoc {
        filename: filename.to_string(),
        line: sm.spelling_line(loc) as u64,
        column: sm.spelling_column(loc) as u64,
    }
}
