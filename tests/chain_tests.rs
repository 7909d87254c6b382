#![forbid(unsafe_code)]

//! Integration tests for the chain builder

#[macro_use]
mod common;

use common::{TestResult, builtin_kit, re};
use regex_kit::config::ChainOptions;
use regex_kit::engine::ChainResult;
use regex_kit::{ChainError, PatternError, RegexKit};

#[test]
fn test_chain_redacts_in_sequence() -> TestResult {
    let kit = builtin_kit();
    let chain = kit
        .chain("mail a@b.com or call 13800138000")
        .replace_all("email", "[email]")?
        .replace_all("phone:CN", "[phone]")?;

    assert_eq!(chain.text(), "mail [email] or call [phone]");
    assert_eq!(
        chain.operations(),
        ["replaceAll(email)", "replaceAll(phone:CN)"]
    );
    assert_eq!(chain.to_string(), "mail [email] or call [phone]");
    Ok(())
}

#[test]
fn test_value_operations_return_raw_results() -> TestResult {
    let kit = builtin_kit();
    let mut chain = kit.chain("a@b.com c@d.com");

    assert_eq!(chain.count("email")?, 2);
    let all = chain.find_all("email")?;
    assert_eq!(all.len(), 2);
    let first = assert_some!(chain.find("email")?);
    assert_eq!(first.index, 0);
    assert!(!chain.test("email")?);

    // value operations are logged but leave the text alone
    assert_eq!(chain.text(), "a@b.com c@d.com");
    assert_eq!(chain.operations().len(), 4);
    Ok(())
}

#[test]
fn test_extract_keeps_text_without_match() -> TestResult {
    let kit = builtin_kit();

    let chain = kit.chain("contact: a@b.com").extract("email")?;
    assert_eq!(chain.text(), "a@b.com");

    let chain = kit.chain("no address here").extract("email")?;
    assert_eq!(chain.text(), "no address here");
    Ok(())
}

#[test]
fn test_extract_all_appends_matches() -> TestResult {
    let kit = builtin_kit();
    let chain = kit.chain("a@b.com, c@d.com").extract_all("email", " | ")?;
    assert_eq!(chain.text(), "a@b.com, c@d.com | a@b.com | c@d.com");
    Ok(())
}

#[test]
fn test_conditional_operations() -> TestResult {
    let kit = builtin_kit();

    let chain = kit
        .chain("a@b.com")
        .when(false, |c| c.remove_all("email"))?
        .when_with(|text| text.contains('@'), |c| c.highlight("email"))?;
    assert_eq!(chain.text(), "<mark>a@b.com</mark>");

    let chain = kit.chain("x").branch(
        true,
        |c| c.transform(|t| t.to_uppercase(), Some("upper")),
        |c| c.transform(|t| t.repeat(2), None),
    )?;
    assert_eq!(chain.text(), "X");
    assert_eq!(chain.operations(), ["upper"]);
    Ok(())
}

#[test]
fn test_operation_limit() {
    let kit = builtin_kit();
    let options = ChainOptions {
        max_operations: 2,
        ..ChainOptions::default()
    };

    let chain = kit
        .chain_with("a@b.com", options)
        .remove("email")
        .and_then(|c| c.remove("email"))
        .unwrap();
    let err = chain.remove("email").unwrap_err();

    assert!(matches!(err, ChainError::OperationLimit { limit: 2 }));
    assert_eq!(err.to_string(), "Maximum operations limit (2) exceeded");
}

#[test]
fn test_failure_propagates_by_default() {
    let kit = builtin_kit();
    let err = kit.chain("text").replace_all("nope", "x").unwrap_err();

    match err {
        ChainError::Operation { operation, source } => {
            assert_eq!(operation, "replaceAll(nope)");
            assert!(matches!(source, PatternError::UnknownType(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_failure_swallowed_without_throw() -> TestResult {
    let kit = builtin_kit();
    let options = ChainOptions {
        throw_on_error: false,
        ..ChainOptions::default()
    };

    let mut chain = kit
        .chain_with("call 13800138000", options)
        .replace_all("nope", "x")?
        .replace_all("phone", "[phone]")?;
    assert_eq!(chain.text(), "call [phone]");
    assert_eq!(chain.operations(), ["replaceAll(phone)"]);
    assert_eq!(chain.count("nope")?, 0);
    Ok(())
}

#[test]
fn test_metadata_and_result() -> TestResult {
    let kit = builtin_kit();
    let chain = kit.chain("id 13800138000").remove_all("phone")?;

    let metadata = chain.metadata();
    assert_eq!(metadata.original_length, 14);
    assert_eq!(metadata.current_length, 3);
    assert_eq!(metadata.operation_count, 1);
    assert_eq!(metadata.last_operation, "removeAll(phone)");
    assert_eq!(chain.summary(), "Operations: 1, length change: -11 (14 -> 3)");

    let parsed: ChainResult = serde_json::from_str(&chain.to_json()?)?;
    assert_eq!(parsed, chain.result());
    assert_eq!(parsed.text, "id ");
    Ok(())
}

#[test]
fn test_reset_and_clone() -> TestResult {
    let kit = builtin_kit();
    let chain = kit.chain("a@b.com").highlight("email")?;
    let copy = chain.clone();

    let chain = chain.debug(Some("before reset")).reset();
    assert_eq!(chain.text(), "");
    assert!(chain.operations().is_empty());
    assert_eq!(chain.metadata().last_operation, "none");

    assert_eq!(copy.text(), "<mark>a@b.com</mark>");
    assert_eq!(copy.into_text(), "<mark>a@b.com</mark>");
    Ok(())
}

#[test]
fn test_chain_uses_configured_options() {
    let config = assert_ok!(regex_kit::KitConfig::parse(
        "[chain]\nmax_operations = 1\nthrow_on_error = false\n"
    ));
    let kit = RegexKit::with_config(config);
    assert_ok!(kit.add("digit", re(r"\d")));

    let chain = kit.chain("1 2 3");
    assert_eq!(chain.options().max_operations, 1);

    let chain = assert_ok!(chain.remove("digit").and_then(|c| c.remove("digit")));
    assert_eq!(chain.text(), " 2 3");
}
