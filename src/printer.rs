//! Pretty-Printer: flattens a block tree back into Smali source text,
//! tracking block depth for indentation and gluing statements per their
//! attributes.

use crate::attributes::StatementAttributes;
use crate::block::{Block, INDENT_CHAR, INDENT_SIZE};
use crate::error::FormatError;

/// Render a block tree to source text (no trailing newline).
pub fn print_block(root: &Block) -> Result<String, FormatError> {
    let statements = root.flatten();
    let mut lines: Vec<String> = Vec::new();
    let mut block_level: i64 = 0;

    for (idx, statement) in statements.iter().enumerate() {
        if statement.attributes.contains(StatementAttributes::BLOCK_END) {
            block_level -= 1;
            if block_level < 0 {
                return Err(FormatError::NegativeDepth);
            }
        }

        let indent = if statement.attributes.contains(StatementAttributes::NO_INDENT) {
            String::new()
        } else {
            INDENT_CHAR
                .to_string()
                .repeat(block_level as usize * INDENT_SIZE)
        };

        if statement.attributes.contains(StatementAttributes::ASSIGNMENT_LHS) {
            lines.push(format!("{indent}{}= ", statement.serialize()));
        } else if statement.attributes.contains(StatementAttributes::ASSIGNMENT_RHS) {
            if let Some(last) = lines.last_mut() {
                last.push_str(&statement.serialize());
            }
        } else if statement.attributes.contains(StatementAttributes::NO_BREAK) {
            let glue_directly = statement.attributes.contains(StatementAttributes::BLOCK_END)
                && idx > 0
                && statements[idx - 1]
                    .attributes
                    .contains(StatementAttributes::BLOCK_START);
            if let Some(last) = lines.last_mut() {
                if glue_directly {
                    last.push_str(&statement.serialize());
                } else {
                    last.push(' ');
                    last.push_str(&statement.serialize());
                }
            } else {
                lines.push(statement.serialize());
            }
        } else {
            lines.push(format!("{indent}{}", statement.serialize()));
        }

        if statement.attributes.contains(StatementAttributes::BLOCK_START) {
            block_level += 1;
        }
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;
    use crate::statement::parse_line;

    fn round_trip(source: &str) -> String {
        let statements: Vec<_> = source
            .lines()
            .flat_map(|line| parse_line(line, true).unwrap())
            .collect();
        let root = resolve(statements).unwrap();
        print_block(&root).unwrap()
    }

    #[test]
    fn prints_flat_method() {
        let src = ".method public foo()V\n    return-void\n.end method";
        assert_eq!(round_trip(src), src);
    }

    #[test]
    fn indents_nested_blocks() {
        let src = ".class public LFoo;\n\
.super Ljava/lang/Object;\n\
.method public foo()V\n    .locals 0\n    return-void\n.end method";
        assert_eq!(round_trip(src), src);
    }

    #[test]
    fn glues_double_close_brace() {
        let src = ".method public foo()V\n    .annotation runtime Lx;\n    .end annotation\n.end method";
        assert_eq!(round_trip(src), src);
    }
}
