use smali::SmaliFile;

#[test]
fn simple_class_round_trips_clean() {
    let src = include_str!("fixtures/simple_class.smali");
    let file = SmaliFile::from_source(src).unwrap();

    let warnings = file.validate().expect("hash-level validation must pass");
    assert!(
        warnings.is_empty(),
        "unexpected round-trip warnings: {warnings:?}"
    );
    assert_eq!(file.to_source_string().unwrap(), src.trim_end());
}

#[test]
fn simple_class_structural_queries() {
    let src = include_str!("fixtures/simple_class.smali");
    let file = SmaliFile::from_source(src).unwrap();

    assert_eq!(file.find_methods("increment").len(), 1);
    assert!(file.find_method("increment", "()V").unwrap().is_some());
    assert!(file.find_method("increment", "(I)V").unwrap().is_none());
    assert!(file.find_field("count").is_some());
    assert!(file.find_field("missing").is_none());
}

#[test]
fn unbalanced_blocks_fail_to_parse() {
    let src = ".method public foo()V\n    return-void\n";
    let err = SmaliFile::from_source(src).unwrap_err();
    assert!(matches!(err, smali::Error::Parse(smali::ParseError::UnbalancedBlocks(1))));
}

#[test]
fn statement_level_validation_rejects_trailing_garbage() {
    smali::set_statement_validation(true);
    let result = SmaliFile::from_source(".super LFoo; extra");
    smali::set_statement_validation(false);
    assert!(result.is_err());
}
