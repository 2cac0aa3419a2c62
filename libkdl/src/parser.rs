//! Node parser
//!
//! Recursive-descent driver that assembles nodes from scanner output. A
//! document is a sequence of nodes; a node is
//!
//! ```text
//! (type-hint)? name (argument | property | children)* terminator
//! ```
//!
//! where a terminator is a newline, `;`, the `}` of the enclosing block or
//! end of input. A `/-` slashdash in front of a node, argument, property or
//! children block parses that unit in full but leaves it out of the tree.

use std::io::BufRead;

use log::trace;

use crate::chars::is_newline;
use crate::error::{ErrorKind, ParseContext, Result};
use crate::node::{Document, Node};
use crate::reader::PositionedReader;
use crate::scanner::{
    at_identifier, at_value_terminator, read_identifier, read_scalar, read_type_hint,
    read_value, skip_insignificant, ScannedIdent, StopMode,
};
use crate::value::{Scalar, Value};

/// Parse a whole document.
pub fn parse_document<R: BufRead>(
    r: &mut PositionedReader<R>,
    ctx: &ParseContext,
) -> Result<Document> {
    read_nodes(r, ctx).map(Document::new)
}

/// Read nodes until end of input at the top level, or until the `}` closing
/// the current children block. The `}` itself is left for the caller.
fn read_nodes<R: BufRead>(r: &mut PositionedReader<R>, ctx: &ParseContext) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();

    loop {
        match skip_insignificant(r, false)? {
            None if r.depth() == 0 => return Ok(nodes),
            None => {
                return Err(r.error(
                    ErrorKind::UnexpectedEndOfInput,
                    "unclosed children block",
                ))
            }
            Some(ch) if is_newline(ch) => {
                r.discard_newline()?;
                continue;
            }
            Some(';') => {
                return Err(r.error(
                    ErrorKind::InvalidSyntax,
                    "unexpected ';' not terminating a node",
                ))
            }
            Some('}') if r.depth() == 0 => {
                return Err(r.error(ErrorKind::InvalidSyntax, "unexpected top-level '}'"))
            }
            Some('}') => return Ok(nodes),
            Some('\\') => {
                return Err(r.error(ErrorKind::InvalidSyntax, "unexpected '\\' outside a node"))
            }
            Some(_) => {}
        }

        let slashdash = r.is_next(b"/-")?;
        if slashdash {
            r.discard(2)?;
            match skip_insignificant(r, false)? {
                Some(ch) if !(is_newline(ch) || ch == ';' || ch == '}') => {}
                _ => return Err(r.error(ErrorKind::InvalidSyntax, "unexpected slashdash")),
            }
        }

        let node = read_node(r, ctx)?;
        if slashdash {
            trace!("discarded node {} ending at line {}", node.name, r.line());
        } else {
            nodes.push(node);
        }
    }
}

/// Read one node: header, then arguments, properties and children up to a
/// terminator. A closing `}` ends the node but is not consumed.
fn read_node<R: BufRead>(r: &mut PositionedReader<R>, ctx: &ParseContext) -> Result<Node> {
    let type_hint = read_type_hint(r)?;
    let name = read_identifier(r, StopMode::Freestanding)?.ident;
    if !at_name_terminator(r)? {
        return Err(r.error(ErrorKind::InvalidSyntax, "unexpected token after node name"));
    }

    let mut node = Node {
        type_hint,
        ..Node::named(name)
    };
    trace!("node {} at line {}", node.name, r.line());

    loop {
        let ch = match skip_insignificant(r, true)? {
            Some(ch) => ch,
            None => return Ok(node),
        };

        let slashdash = r.is_next(b"/-")?;
        let ch = if slashdash {
            r.discard(2)?;
            match skip_insignificant(r, true)? {
                Some(ch) => ch,
                None => return Err(r.error(ErrorKind::InvalidSyntax, "unexpected slashdash")),
            }
        } else {
            ch
        };

        if is_newline(ch) || ch == ';' || ch == '}' {
            if slashdash {
                return Err(r.error(ErrorKind::InvalidSyntax, "unexpected slashdash"));
            }
            if ch == ';' {
                r.discard(1)?;
            } else if ch != '}' {
                r.discard_newline()?;
            }
            return Ok(node);
        }

        if ch == '{' {
            r.discard(1)?;
            r.enter_block(ctx)?;
            trace!("children of {} open at line {}", node.name, r.line());
            let children = read_nodes(r, ctx)?;
            r.leave_block();
            r.discard(1)?;
            trace!("children of {} closed at line {}", node.name, r.line());
            if !slashdash {
                node.children.extend(children);
            }
            continue;
        }

        read_arg_or_prop(r, &mut node, slashdash)?;
    }
}

/// Read one argument or property into `node`, or only validate it when
/// `discard` is set.
fn read_arg_or_prop<R: BufRead>(
    r: &mut PositionedReader<R>,
    node: &mut Node,
    discard: bool,
) -> Result<()> {
    let type_hint = read_type_hint(r)?;

    // Only an unhinted token can be a property key.
    if type_hint.is_none() && at_identifier(r)? {
        let ScannedIdent { ident, quoted } = read_identifier(r, StopMode::Equals)?;

        if r.is_next(b"=")? {
            r.discard(1)?;
            let value = read_value(r)?;
            expect_value_end(r)?;
            if !discard {
                node.insert_property(ident, value);
            }
            return Ok(());
        }

        if !at_value_terminator(r)? {
            return Err(r.error(
                ErrorKind::InvalidSyntax,
                "unexpected token after identifier",
            ));
        }
        if !quoted {
            return Err(r.error(
                ErrorKind::InvalidSyntax,
                format!("unexpected bare identifier '{}'", ident),
            ));
        }
        if !discard {
            node.push_arg(Value::new(Scalar::String(ident.into_string())));
        }
        return Ok(());
    }

    let value = Value {
        scalar: read_scalar(r)?,
        type_hint,
    };
    expect_value_end(r)?;
    if !discard {
        node.push_arg(value);
    }
    Ok(())
}

fn expect_value_end<R: BufRead>(r: &mut PositionedReader<R>) -> Result<()> {
    if at_value_terminator(r)? {
        Ok(())
    } else {
        Err(r.error(ErrorKind::InvalidSyntax, "unexpected token after value"))
    }
}

/// A node name may also run straight into a children block.
fn at_name_terminator<R: BufRead>(r: &mut PositionedReader<R>) -> Result<bool> {
    Ok(at_value_terminator(r)? || r.is_next(b"{")?)
}
