//! Integration tests for the public filter API

use infozilla_filters::{
    minimal_set, normalize_newlines, CodePatternDatabase, ExtractOptions, Filter, FilterChain,
    FilterConfig, FilterError, SourceCodeExtractor, TextMask,
};
use infozilla_domain::{CodeRegion, Span};
use proptest::prelude::*;
use std::io::Write;

#[test]
fn test_custom_pattern_database_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[[pattern]]\nkeyword = \"todo\"\nregex = 'TODO:[^\\n]*'\n"
    )
    .unwrap();

    let config = FilterConfig {
        code_patterns: Some(file.path().to_path_buf()),
        ..FilterConfig::default()
    };
    let chain = FilterChain::from_config(&config).unwrap();
    let result = chain.extract("Fix this.\nTODO: later\nBye.", &ExtractOptions::eclipse());

    assert_eq!(result.code_regions.len(), 1);
    assert_eq!(result.code_regions[0].keyword, "todo");
    assert_eq!(result.code_regions[0].text, "TODO: later");
    assert_eq!(result.cleaned_text, "Fix this.\n\nBye.");
}

#[test]
fn test_invalid_config_is_rejected_by_chain() {
    let config = FilterConfig {
        max_concurrency: 0,
        ..FilterConfig::default()
    };
    assert!(matches!(
        FilterChain::from_config(&config),
        Err(FilterError::Config(_))
    ));
}

#[test]
fn test_missing_pattern_file_fails_at_construction() {
    let config = FilterConfig {
        code_patterns: Some("/definitely/not/here.toml".into()),
        ..FilterConfig::default()
    };
    assert!(matches!(
        FilterChain::from_config(&config),
        Err(FilterError::Io(_))
    ));
}

#[test]
fn test_crlf_input_after_normalization() {
    let raw = "Steps:\r\n1. open\r\n2. close\r\n\r\nDone.";
    let text = normalize_newlines(raw);
    let result = FilterChain::java()
        .unwrap()
        .extract(&text, &ExtractOptions::eclipse());

    assert_eq!(result.enumerations.len(), 1);
    assert_eq!(result.cleaned_text, "Steps:\n\nDone.");
}

#[test]
fn test_chain_shared_across_threads() {
    let chain = std::sync::Arc::new(FilterChain::java().unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let chain = chain.clone();
            std::thread::spawn(move || {
                let text = format!("{}. first\n{}. second\n", i + 1, i + 2);
                chain.extract(&text, &ExtractOptions::eclipse()).enumerations.len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}

#[test]
fn test_empty_database_finds_no_code() {
    let extractor = SourceCodeExtractor::new(CodePatternDatabase::default());
    let output = extractor.run("int x = 1;");
    assert!(output.artifacts.is_empty());
    assert_eq!(output.residual, "int x = 1;");
}

fn arb_region(len: usize) -> impl Strategy<Value = (usize, usize)> {
    (0..=len, 0..=len).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
}

proptest! {
    #[test]
    fn prop_cleaned_text_never_grows(
        text in "[a-zA-Z0-9 .:;(){}+\\-@=\\[\\]\n\t]{0,400}",
        patches in any::<bool>(),
        traces in any::<bool>(),
        talkback in any::<bool>(),
        code in any::<bool>(),
        lists in any::<bool>(),
        relaxed in any::<bool>(),
    ) {
        let options = ExtractOptions {
            run_patches: patches,
            run_stack_traces: traces,
            run_talkback: talkback,
            run_source_code: code,
            run_enumerations: lists,
            relaxed_patches: relaxed,
        };
        let result = FilterChain::java().unwrap().extract(&text, &options);
        prop_assert!(result.cleaned_text.len() <= text.len());
    }

    #[test]
    fn prop_code_regions_sorted_and_disjoint(text in "[a-z(){};= \n]{0,300}") {
        let extractor = SourceCodeExtractor::java().unwrap();
        let output = extractor.run(&text);
        for pair in output.artifacts.windows(2) {
            prop_assert!(pair[0].span.end <= pair[1].span.start);
        }
    }

    #[test]
    fn prop_minimal_set_is_disjoint(
        regions in prop::collection::vec(arb_region(50), 0..20)
    ) {
        let text = "x".repeat(50);
        let candidates: Vec<CodeRegion> = regions
            .iter()
            .filter(|(s, e)| s < e)
            .map(|&(s, e)| CodeRegion::new(Span::new(s, e), "k", &text[s..e]))
            .collect();

        let set = minimal_set(&text, candidates.clone());
        for pair in set.windows(2) {
            prop_assert!(pair[0].span.end <= pair[1].span.start);
        }
        // every candidate stays covered by some survivor
        for c in &candidates {
            prop_assert!(set.iter().any(|r| r.span.contains(&c.span)));
        }
    }

    #[test]
    fn prop_mask_removes_exactly_claimed(
        text in "[a-z]{0,60}",
        claims in prop::collection::vec((0usize..70, 0usize..70), 0..8)
    ) {
        let mut mask = TextMask::new(text.as_str());
        for &(start, end) in &claims {
            mask.claim(start, end);
        }
        prop_assert_eq!(mask.materialize().len(), text.len() - mask.claimed_len());
        prop_assert_eq!(mask.requests().len(), claims.len());
    }
}
