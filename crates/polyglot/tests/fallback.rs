//! Integration tests for locale and path fallback.

use polyglot::{Locale, MessagePack, Path, RenderError};

fn locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap()
}

// =============================================================================
// Locale Fallback
// =============================================================================

#[test]
fn region_falls_back_to_language() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "greeting", "Hello")
        .build()
        .unwrap();
    let text = pack.render(&locale("en-US"), "greeting", &[]).unwrap();
    assert_eq!(text, "Hello");
}

#[test]
fn variant_falls_back_through_region_and_language() {
    let pack = MessagePack::builder()
        .add_message(locale("pl"), "greeting", "Cześć")
        .build()
        .unwrap();
    let text = pack
        .render(&locale("pl-PL-slang"), "greeting", &[])
        .unwrap();
    assert_eq!(text, "Cześć");
}

#[test]
fn exact_locale_beats_generalization() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "greeting", "Hello")
        .add_message(locale("en-GB"), "greeting", "Good day")
        .build()
        .unwrap();
    assert_eq!(
        pack.render(&locale("en-GB"), "greeting", &[]).unwrap(),
        "Good day"
    );
    assert_eq!(
        pack.render(&locale("en-US"), "greeting", &[]).unwrap(),
        "Hello"
    );
}

#[test]
fn unknown_locale_falls_back_to_default() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "greeting", "Hello")
        .add_message(locale("pl"), "greeting", "Cześć")
        .default_locale(locale("pl"))
        .build()
        .unwrap();
    let text = pack.render(&locale("fr"), "greeting", &[]).unwrap();
    assert_eq!(text, "Cześć");
}

#[test]
fn without_default_an_unknown_locale_is_unresolved() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "greeting", "Hello")
        .build()
        .unwrap();
    let error = pack.render(&locale("fr"), "greeting", &[]).unwrap_err();
    assert!(matches!(error, RenderError::UnresolvedMessage { .. }));
}

#[test]
fn strict_locale_fallback_requires_exact_match() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "greeting", "Hello")
        .strict_locale_fallback()
        .build()
        .unwrap();
    assert!(pack.render(&locale("en"), "greeting", &[]).is_ok());
    let error = pack.render(&locale("en-US"), "greeting", &[]).unwrap_err();
    assert!(matches!(error, RenderError::UnresolvedMessage { .. }));
}

// =============================================================================
// Path Fallback
// =============================================================================

#[test]
fn global_prefix_applies_to_every_lookup() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "common.ok", "OK")
        .add_global_prefix(Path::parse("common").unwrap())
        .build()
        .unwrap();
    let text = pack.render(&locale("en"), "ok", &[]).unwrap();
    assert_eq!(text, "OK");
}

#[test]
fn view_prefix_beats_global_prefix() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "mails.ok", "mails ok")
        .add_message(locale("en"), "common.ok", "common ok")
        .add_global_prefix(Path::parse("common").unwrap())
        .build()
        .unwrap();
    let mails = pack.with_path_prefix(Path::parse("mails").unwrap());
    assert_eq!(mails.render(&locale("en"), "ok", &[]).unwrap(), "mails ok");
    assert_eq!(pack.render(&locale("en"), "ok", &[]).unwrap(), "common ok");
}

#[test]
fn strict_path_fallback_anchors_to_the_prefix() {
    let pack = MessagePack::builder()
        .add_message(locale("en"), "ok", "bare ok")
        .add_message(locale("en"), "home.title", "Home")
        .strict_path_fallback()
        .build()
        .unwrap();
    let home = pack.with_path_prefix(Path::parse("home").unwrap());

    assert_eq!(home.render(&locale("en"), "title", &[]).unwrap(), "Home");

    // The bare path is not tried under a strict anchor.
    let error = home.render(&locale("en"), "ok", &[]).unwrap_err();
    assert!(matches!(error, RenderError::UnresolvedMessage { .. }));
}

#[test]
fn prefixed_match_in_exact_locale_beats_fallback_locale() {
    let pack = MessagePack::builder()
        .add_message(locale("pl"), "mails.ok", "pl mails ok")
        .add_message(locale("en"), "ok", "en bare ok")
        .default_locale(locale("en"))
        .build()
        .unwrap();
    let mails = pack.with_path_prefix(Path::parse("mails").unwrap());
    let text = mails.render(&locale("pl"), "ok", &[]).unwrap();
    assert_eq!(text, "pl mails ok");
}

// =============================================================================
// Locale Normalization
// =============================================================================

#[test]
fn locale_tags_normalize_case_and_separators() {
    let pack = MessagePack::builder()
        .add_message(locale("pl-PL"), "greeting", "Cześć")
        .build()
        .unwrap();
    let text = pack.render(&locale("PL_pl"), "greeting", &[]).unwrap();
    assert_eq!(text, "Cześć");
}
