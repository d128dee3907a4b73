use std::{path::Path, sync::Arc};

use swc_common::{
    FileName, GLOBALS, Globals, SourceMap, Spanned, comments::SingleThreadedComments,
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

pub struct ParsedSource {
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Pick the syntax for a source file from its extension.
///
/// `.ts`/`.mts`/`.cts` are parsed without JSX so that angle-bracket type
/// assertions keep working. Everything else goes through the TSX parser,
/// which is a superset of JS and JSX.
fn syntax_for(file_path: &str) -> Syntax {
    let tsx = !matches!(
        Path::new(file_path).extension().and_then(|e| e.to_str()),
        Some("ts" | "mts" | "cts")
    );
    Syntax::Typescript(TsSyntax {
        tsx,
        decorators: true,
        ..Default::default()
    })
}

/// Parse a JS/TS source string into an AST.
///
/// Each call owns its `SourceMap` and swc globals, so files can be parsed on
/// separate rayon workers.
pub fn parse_source(code: String, file_path: &str) -> Result<ParsedSource, String> {
    let source_map: Arc<SourceMap> = Default::default();

    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.into()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            syntax_for(file_path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| {
                let loc = source_map.lookup_char_pos(e.span().lo);
                format!("{}:{}: {}", loc.line, loc.col_display + 1, e.into_kind().msg())
            })?;

        Ok(ParsedSource {
            module,
            source_map: source_map.clone(),
        })
    })
}
