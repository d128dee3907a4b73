use swc_common::{SourceMap, SourceMapper, Spanned};
use swc_ecma_ast::{BinaryOp, CallExpr, Callee, Expr, ExprOrSpread, Lit, MemberExpr, MemberProp};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::{
    data::SourcePosition,
    extract::call::{CallArgument, CallEnumerator, ParsedCall},
    parsers::jsx::parse_source,
};

/// `CallEnumerator` backed by swc's TypeScript/TSX parser.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwcCallEnumerator;

impl CallEnumerator for SwcCallEnumerator {
    fn signature(&self) -> &str {
        "swc_ecma_parser-33/calls-1"
    }

    fn enumerate(&self, source: String, file_path: &str) -> Result<Vec<ParsedCall>, String> {
        let parsed = parse_source(source, file_path)?;
        let mut collector = CallCollector {
            source_map: &parsed.source_map,
            calls: Vec::new(),
        };
        parsed.module.visit_with(&mut collector);
        Ok(collector.calls)
    }
}

struct CallCollector<'a> {
    source_map: &'a SourceMap,
    calls: Vec<ParsedCall>,
}

impl CallCollector<'_> {
    fn snippet(&self, expr: &Expr) -> String {
        self.source_map
            .span_to_snippet(expr.span())
            .unwrap_or_else(|_| "<expression>".to_string())
    }

    fn classify(&self, arg: &ExprOrSpread) -> CallArgument {
        if arg.spread.is_some() {
            return CallArgument::Other(format!("...{}", self.snippet(&arg.expr)));
        }

        let expr = unwrap_expr(&arg.expr);
        match expr {
            Expr::Lit(Lit::Str(s)) => match s.value.as_str() {
                Some(value) => CallArgument::Literal(value.to_string()),
                None => CallArgument::Other(self.snippet(expr)),
            },
            Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
                let cooked = tpl
                    .quasis
                    .first()
                    .and_then(|q| q.cooked.as_ref())
                    .and_then(|c| c.as_str());
                match cooked {
                    Some(value) => CallArgument::Literal(value.to_string()),
                    None => CallArgument::Template(self.snippet(expr)),
                }
            }
            Expr::Tpl(_) => CallArgument::Template(self.snippet(expr)),
            Expr::Bin(bin) if bin.op == BinaryOp::Add => CallArgument::Binary(self.snippet(expr)),
            _ => CallArgument::Other(self.snippet(expr)),
        }
    }
}

/// Strip parentheses and TypeScript-only wrappers around an expression.
fn unwrap_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unwrap_expr(&paren.expr),
        Expr::TsAs(ts_as) => unwrap_expr(&ts_as.expr),
        Expr::TsConstAssertion(assertion) => unwrap_expr(&assertion.expr),
        Expr::TsSatisfies(satisfies) => unwrap_expr(&satisfies.expr),
        other => other,
    }
}

/// Dotted name of a callee: `t`, `i18n.t`, `this.i18n.t`.
///
/// Computed members (`obj[key]()`) and other callee shapes have no name.
fn callee_name(expr: &Expr) -> Option<String> {
    match unwrap_expr(expr) {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Member(member) => member_name(member),
        _ => None,
    }
}

fn member_name(member: &MemberExpr) -> Option<String> {
    let MemberProp::Ident(prop) = &member.prop else {
        return None;
    };
    let object = callee_name(&member.obj)?;
    Some(format!("{}.{}", object, prop.sym))
}

impl Visit for CallCollector<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(expr) = &node.callee
            && let Some(callee) = callee_name(expr)
        {
            let loc = self.source_map.lookup_char_pos(node.span.lo);
            let argument = node.args.first().map(|arg| self.classify(arg));
            self.calls.push(ParsedCall {
                callee,
                argument,
                position: SourcePosition::new(loc.line, loc.col_display + 1),
            });
        }
        node.visit_children_with(self);
    }
}
