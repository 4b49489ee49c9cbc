//! `SmaliFile`: parses a complete `.smali` source file into a block tree
//! and exposes structural queries over it.

use std::path::Path;

use crate::block::{Block, Item};
use crate::error::{Error, Result};
use crate::printer::print_block;
use crate::resolver::resolve;
use crate::statement::{self, parse_line, MethodStmt, Statement, VariantTag};
use crate::validate;

/// A fully parsed Smali source file: the original text, and the block tree
/// it resolved into.
#[derive(Debug, Clone)]
pub struct SmaliFile {
    pub raw_code: String,
    pub root: Block,
}

impl SmaliFile {
    /// Parse `smali_code`. Runs statement-level field-exhaustion checks per
    /// [`crate::validate::statement_validation`], and the file-level
    /// round-trip check per [`crate::validate::file_validation`].
    pub fn from_source(smali_code: impl Into<String>) -> Result<Self> {
        let raw_code = smali_code.into();
        let validate_statements = validate::statement_validation();

        let mut statements: Vec<Statement> = Vec::new();
        for line in raw_code.lines() {
            statements.extend(parse_line(line, validate_statements)?);
        }
        let root = resolve(statements)?;
        let file = Self { raw_code, root };

        if validate::file_validation() {
            file.validate()?;
        }
        Ok(file)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let smali_code = std::fs::read_to_string(path)?;
        Self::from_source(smali_code)
    }

    /// Reprint the block tree to source text.
    pub fn to_source_string(&self) -> Result<String> {
        Ok(print_block(&self.root)?)
    }

    /// Run the three-tier round-trip comparison against a fresh reprint of
    /// this file's tree. Returns the non-fatal warnings observed.
    pub fn validate(&self) -> Result<Vec<crate::error::Warning>> {
        let reconstruction = self.to_source_string()?;
        validate::validate(&self.raw_code, &reconstruction)
            .map_err(Error::Validation)
    }

    /// Every block or bare statement of the given tag whose head/statement
    /// satisfies `predicate`, searched recursively.
    pub fn find<F>(&self, tag: VariantTag, predicate: F) -> Vec<&Item>
    where
        F: Fn(&Statement) -> bool,
    {
        self.root.find(tag, &predicate)
    }

    pub fn find_methods(&self, method_name: &str) -> Vec<&Item> {
        self.find(VariantTag::Method, |s| match &s.variant {
            crate::statement::Variant::Method(m) => m.member_name == method_name,
            _ => false,
        })
    }

    /// Find a single method by name and `(params)returnType` prototype.
    pub fn find_method(&self, method_name: &str, method_prototype: &str) -> Result<Option<&Item>> {
        let (method_params, method_result_type) = statement::parse_prototype(method_prototype)
            .ok_or_else(|| {
                Error::Parse(crate::error::ParseError::InvalidPrototype(
                    method_prototype.to_string(),
                ))
            })?;
        let matches = self.find(VariantTag::Method, |s| match &s.variant {
            crate::statement::Variant::Method(MethodStmt {
                member_name,
                method_params: p,
                method_result_type: r,
                ..
            }) => {
                member_name == method_name
                    && *p == method_params
                    && *r == method_result_type
            }
            _ => false,
        });
        Ok(matches.into_iter().next())
    }

    pub fn find_field(&self, field_name: &str) -> Option<&Item> {
        self.find(VariantTag::Field, |s| match &s.variant {
            crate::statement::Variant::Field(f) => f.member_name == field_name,
            _ => false,
        })
        .into_iter()
        .next()
    }
}

impl std::fmt::Display for SmaliFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match print_block(&self.root) {
            Ok(s) => f.write_str(&s),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_class() {
        let src = ".class public LFoo;\n\
.super Ljava/lang/Object;\n\
\n\
.method public foo()V\n    .locals 0\n    return-void\n.end method";
        let file = SmaliFile::from_source(src).unwrap();
        assert_eq!(file.to_source_string().unwrap(), src);
        assert!(file.validate().unwrap().is_empty());
    }

    #[test]
    fn find_methods_by_name() {
        let src = ".method public foo()V\n    return-void\n.end method";
        let file = SmaliFile::from_source(src).unwrap();
        assert_eq!(file.find_methods("foo").len(), 1);
        assert!(file.find_methods("bar").is_empty());
    }

    #[test]
    fn find_method_by_prototype() {
        let src = ".method public foo(I)V\n    return-void\n.end method";
        let file = SmaliFile::from_source(src).unwrap();
        assert!(file.find_method("foo", "(I)V").unwrap().is_some());
        assert!(file.find_method("foo", "(J)V").unwrap().is_none());
    }

    #[test]
    fn find_method_rejects_invalid_prototype() {
        let src = ".method public foo()V\n    return-void\n.end method";
        let file = SmaliFile::from_source(src).unwrap();
        assert!(file.find_method("foo", "nope").is_err());
    }

    #[test]
    fn find_field_by_name() {
        let src = ".field private count:I";
        let file = SmaliFile::from_source(src).unwrap();
        assert!(file.find_field("count").is_some());
        assert!(file.find_field("missing").is_none());
    }
}
