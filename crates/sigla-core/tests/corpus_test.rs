//! Tests for the corpus model: loading, tokenization, indexes, and format errors.

use rayon::prelude::*;
use sigla_core::corpus::{
    Corpus, RawInscription, RawSign, RawSignKind, SignKind, TokenClass, TokenPosition,
};
use sigla_core::errors::{CorpusFormatError, SiglaErrorCode};
use sigla_core::traits::{CorpusProvider, JsonCorpusProvider};
use test_fixtures::{load_fixture, load_fixture_text};

fn accounting() -> Corpus {
    let raw: Vec<RawInscription> = load_fixture("corpus/accounting_tablets.json");
    Corpus::load(raw).unwrap()
}

fn make_raw(id: &str, lines: &[&str]) -> RawInscription {
    RawInscription::from_words(id, "HT", lines, &["GRA", "VIN"])
}

// ─── Loading ────────────────────────────────────────────────────────────────

#[test]
fn loads_fixture_with_lines_and_positions() {
    let corpus = accounting();
    assert_eq!(corpus.len(), 5);

    let ht9a = corpus.get("HT 9a").unwrap();
    assert_eq!(ht9a.site, "Hagia Triada");
    assert_eq!(ht9a.lines.len(), 4);

    let first = &ht9a.lines[0].tokens;
    assert_eq!(first.len(), 3);
    assert_eq!(first[0].text, "SA-RA2");
    assert_eq!(first[0].position, TokenPosition::Initial);
    assert_eq!(first[1].class, TokenClass::Logogram);
    assert_eq!(first[1].position, TokenPosition::Medial);
    assert_eq!(first[2].value, Some(3.0));
    assert_eq!(first[2].position, TokenPosition::Final);
}

#[test]
fn alphabet_is_enumerated_once_with_kinds() {
    let corpus = accounting();
    let alphabet = corpus.alphabet();
    assert_eq!(alphabet.get("GRA").unwrap().kind, SignKind::Logogram);
    assert_eq!(alphabet.get("ku").unwrap().kind, SignKind::Syllabogram);
    assert_eq!(alphabet.get("1/2").unwrap().kind, SignKind::Fraction);
    assert!(alphabet.get("QA").is_none());
    assert!(alphabet.count_of(SignKind::Numeral) > 0);

    let signs = alphabet.signs();
    let names: Vec<&str> = signs.iter().map(|s| alphabet.resolve(s.id)).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn fraction_joins_preceding_numeral() {
    let raw: Vec<RawInscription> = load_fixture("corpus/mixed_sites.json");
    let corpus = Corpus::load(raw).unwrap();
    let ht13 = corpus.get("HT 13").unwrap();
    let te_ki = &ht13.lines[3].tokens;
    assert_eq!(te_ki.len(), 2);
    assert_eq!(te_ki[1].value, Some(27.5));
}

#[test]
fn single_token_line_is_initial() {
    let corpus = Corpus::load(vec![make_raw("X 1", &["KU-RO"])]).unwrap();
    let token = corpus.get("X 1").unwrap().tokens().next().unwrap();
    assert_eq!(token.position, TokenPosition::Initial);
}

#[test]
fn illegible_sign_marks_token() {
    let corpus = Corpus::load(vec![make_raw("X 2", &["?-RA-ME SA-SA-RA"])]).unwrap();
    let tokens: Vec<_> = corpus.get("X 2").unwrap().tokens().collect();
    assert!(tokens[0].has_unknown);
    assert!(!tokens[1].has_unknown);
}

// ─── Queries ────────────────────────────────────────────────────────────────

#[test]
fn tokens_by_sign_reports_each_token_once() {
    let corpus = accounting();
    let hits: Vec<_> = corpus.tokens_by_sign("KU").collect();
    // KU-RO x5 plus KU-PA3-NU.
    assert_eq!(hits.len(), 6);
    assert!(hits.iter().all(|(_, t)| t.text.split('-').any(|s| s == "KU")));

    let corpus = Corpus::load(vec![make_raw("X 3", &["SA-SA-RA"])]).unwrap();
    assert_eq!(corpus.tokens_by_sign("SA").count(), 1);
    assert_eq!(corpus.tokens_by_sign("ZZ").count(), 0);
}

#[test]
fn tokens_at_position_filters() {
    let corpus = accounting();
    let finals: Vec<_> = corpus.tokens_at_position(TokenPosition::Final).collect();
    assert!(!finals.is_empty());
    assert!(finals.iter().all(|(_, t)| t.position == TokenPosition::Final));

    let total = corpus.tokens_at_position(TokenPosition::Initial).count()
        + corpus.tokens_at_position(TokenPosition::Medial).count()
        + finals.len();
    assert_eq!(total, corpus.total_tokens());
}

#[test]
fn inscriptions_matching_is_lazy_filter() {
    let corpus = accounting();
    let zakros: Vec<_> = corpus.inscriptions_matching(|i| i.site == "Zakros").collect();
    assert_eq!(zakros.len(), 1);
    assert_eq!(zakros[0].id.as_str(), "ZA 10");

    let with_total = corpus.inscriptions_matching(|i| i.has_word("KU-RO")).count();
    assert_eq!(with_total, 4);
}

#[test]
fn token_refs_resolve_back() {
    let corpus = accounting();
    for (r, token) in corpus.token_refs() {
        assert_eq!(corpus.token(r), Some(token));
    }
}

#[test]
fn concurrent_reads_agree() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Corpus>();

    let corpus = accounting();
    let counts: Vec<usize> = (0..8)
        .into_par_iter()
        .map(|_| corpus.tokens_by_sign("RO").count())
        .collect();
    assert!(counts.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn json_provider_loads() {
    let provider = JsonCorpusProvider::new("libation", load_fixture_text("corpus/libation_three_variants.json"));
    let corpus = provider.load().unwrap();
    assert_eq!(corpus.len(), 3);
}

// ─── Format errors ──────────────────────────────────────────────────────────

#[test]
fn empty_corpus_fails_fast() {
    let err = Corpus::load(Vec::new()).unwrap_err();
    assert_eq!(err, CorpusFormatError::EmptyCorpus);
    assert_eq!(err.error_code(), "EMPTY_CORPUS");
    assert_eq!(err.coded_string(), "[EMPTY_CORPUS] corpus contains no inscriptions");
}

#[test]
fn duplicate_and_empty_ids_rejected() {
    let err = Corpus::load(vec![make_raw("A", &["KU"]), make_raw("A", &["RO"])]).unwrap_err();
    assert!(matches!(err, CorpusFormatError::DuplicateId { .. }));

    let err = Corpus::load(vec![make_raw("  ", &["KU"])]).unwrap_err();
    assert!(matches!(err, CorpusFormatError::EmptyId { index: 0 }));
}

#[test]
fn missing_or_empty_lines_rejected() {
    let none = RawInscription {
        id: "N".into(),
        site: String::new(),
        lines: Vec::new(),
    };
    assert!(matches!(Corpus::load(vec![none]), Err(CorpusFormatError::NoLines { .. })));

    let blank = RawInscription {
        id: "B".into(),
        site: String::new(),
        lines: vec![vec![RawSign::syllabogram("KU")], Vec::new()],
    };
    assert!(matches!(
        Corpus::load(vec![blank]),
        Err(CorpusFormatError::EmptyLine { line: 1, .. })
    ));
}

#[test]
fn inconsistent_sign_kind_rejected() {
    let raw = RawInscription {
        id: "K".into(),
        site: String::new(),
        lines: vec![vec![
            RawSign::syllabogram("NI"),
            RawSign::divider(),
            RawSign::new("NI", RawSignKind::Logogram),
        ]],
    };
    let err = Corpus::load(vec![raw]).unwrap_err();
    assert!(matches!(err, CorpusFormatError::InconsistentSignKind { .. }));
    assert_eq!(err.error_code(), "CORPUS_FORMAT_ERROR");
}

#[test]
fn empty_sign_id_and_bad_json_rejected() {
    let raw = RawInscription {
        id: "E".into(),
        site: String::new(),
        lines: vec![vec![RawSign::syllabogram(" ")]],
    };
    assert!(matches!(
        Corpus::load(vec![raw]),
        Err(CorpusFormatError::EmptySignId { .. })
    ));

    assert!(matches!(
        Corpus::from_json("{\"id\": 1}"),
        Err(CorpusFormatError::Json { .. })
    ));
    assert!(matches!(
        Corpus::from_json(r#"[{"id":"A","lines":[[{"sign_id":"KU","type":"glyph"}]]}]"#),
        Err(CorpusFormatError::Json { .. })
    ));
}
