//! Block Resolver: the two-pass algorithm that turns a flat statement
//! stream into a [`Block`] tree.
//!
//! Pass 1 disambiguates every `MAYBE_BLOCK_START` statement (`.field`,
//! `.param`) by scanning candidates newest-to-oldest against each
//! `BLOCK_END` terminator's signature. Anything left unresolved becomes
//! `SINGLE_LINE`. Pass 2 walks the now-unambiguous stream with an explicit
//! open-block stack.

use crate::attributes::StatementAttributes;
use crate::block::{Block, Item};
use crate::error::ParseError;
use crate::statement::Statement;

fn disambiguate(statements: &mut [Statement]) {
    let mut maybe_block_indexes: Vec<usize> = Vec::new();

    for idx in 0..statements.len() {
        if statements[idx]
            .attributes
            .contains(StatementAttributes::MAYBE_BLOCK_START)
        {
            maybe_block_indexes.push(idx);
        } else if statements[idx]
            .attributes
            .contains(StatementAttributes::BLOCK_END)
        {
            let signature = statements[idx].terminator_signature();
            if let Some(signature) = signature {
                if let Some(pos) = maybe_block_indexes
                    .iter()
                    .rposition(|&cand| statements[cand].block_ends_with() == Some(signature))
                {
                    let cand = maybe_block_indexes.remove(pos);
                    statements[cand].attributes.insert(StatementAttributes::BLOCK_START);
                    statements[cand]
                        .attributes
                        .remove(StatementAttributes::MAYBE_BLOCK_START);
                }
            }
        }
    }

    for idx in maybe_block_indexes {
        statements[idx].attributes.insert(StatementAttributes::SINGLE_LINE);
        statements[idx]
            .attributes
            .remove(StatementAttributes::MAYBE_BLOCK_START);
    }
}

fn nest(statements: Vec<Statement>) -> Result<Block, ParseError> {
    let mut root = Block::new();
    let mut stack: Vec<Block> = Vec::new();

    for statement in statements {
        if statement.attributes.contains(StatementAttributes::BLOCK_START) {
            let mut block = Block::new();
            block.append(Item::Statement(statement));
            stack.push(block);
        } else if statement.attributes.contains(StatementAttributes::BLOCK_END) {
            let mut finished = stack
                .pop()
                .ok_or_else(|| ParseError::UnexpectedBlockEnd(statement.raw_line.clone()))?;
            let expected = finished.head().and_then(Statement::block_ends_with);
            let found = statement.terminator_signature();
            if expected != found {
                return Err(ParseError::BlockEndMismatch {
                    expected: format!("{expected:?}"),
                    found: format!("{found:?}"),
                });
            }
            finished.append(Item::Statement(statement));
            match stack.last_mut() {
                Some(parent) => parent.append(Item::Block(finished)),
                None => root.append(Item::Block(finished)),
            }
        } else if let Some(open) = stack.last_mut() {
            open.append(Item::Statement(statement));
        } else {
            root.append(Item::Statement(statement));
        }
    }

    if !stack.is_empty() {
        return Err(ParseError::UnbalancedBlocks(stack.len()));
    }

    Ok(root)
}

/// Resolve a flat statement stream (already annotated by
/// [`crate::statement::parse_line`]) into a block tree.
pub fn resolve(mut statements: Vec<Statement>) -> Result<Block, ParseError> {
    disambiguate(&mut statements);
    nest(statements)
}
