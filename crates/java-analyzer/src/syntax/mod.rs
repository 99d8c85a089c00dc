pub mod ast;
pub mod cst;
pub mod cst_parser;
pub mod helpers;
pub mod kind;
pub mod lexer;

use std::sync::Arc;

use crate::syntax::cst::SyntaxNode;
use crate::syntax::cst_parser::{ParseError, Parser};

/// Immutable syntax snapshot for one submitted text.
#[derive(Clone)]
pub struct SyntaxTree {
    green: rowan::GreenNode,
    source: Arc<str>,
}

impl SyntaxTree {
    pub fn parse(source: Arc<str>) -> (Self, Vec<ParseError>) {
        let parser = Parser::new(&source);
        let output = parser.parse();
        let tree = Self {
            green: output.green,
            source,
        };
        (tree, output.errors)
    }

    pub fn root(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn source(&self) -> &Arc<str> {
        &self.source
    }
}
