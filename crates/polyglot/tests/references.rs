//! Integration tests for message references.

use polyglot::{BuildError, Locale, MessageBundle, MessagePack, RenderError, args};

fn en() -> Locale {
    Locale::new("en")
}

// =============================================================================
// Construction-Time Substitution
// =============================================================================

#[test]
fn plain_reference_is_inlined_at_build() {
    let pack = MessagePack::builder()
        .add_message(en(), "app.name", "Quark")
        .add_message(en(), "welcome", "Welcome to $app.name!")
        .build()
        .unwrap();
    let text = pack.render(&en(), "welcome", &[]).unwrap();
    assert_eq!(text, "Welcome to Quark!");
}

#[test]
fn braced_reference_is_inlined_at_build() {
    let pack = MessagePack::builder()
        .add_message(en(), "app.name", "Quark")
        .add_message(en(), "welcome", "Welcome to ${app.name}, again")
        .build()
        .unwrap();
    let text = pack.render(&en(), "welcome", &[]).unwrap();
    assert_eq!(text, "Welcome to Quark, again");
}

#[test]
fn references_chain_across_templates() {
    let pack = MessagePack::builder()
        .add_message(en(), "one", "one")
        .add_message(en(), "two", "$one two")
        .add_message(en(), "three", "$two three")
        .build()
        .unwrap();
    let text = pack.render(&en(), "three", &[]).unwrap();
    assert_eq!(text, "one two three");
}

#[test]
fn referenced_template_keeps_its_arguments() {
    let pack = MessagePack::builder()
        .add_message(en(), "greeting", "Hello {0}")
        .add_message(en(), "full", "$greeting, nice to see you!")
        .build()
        .unwrap();
    let text = pack.render(&en(), "full", &args!["Ann"]).unwrap();
    assert_eq!(text, "Hello Ann, nice to see you!");
}

#[test]
fn escaped_dollar_is_not_a_reference() {
    let pack = MessagePack::builder()
        .add_message(en(), "price", r"costs \$5")
        .build()
        .unwrap();
    let text = pack.render(&en(), "price", &[]).unwrap();
    assert_eq!(text, "costs $5");
}

#[test]
fn bare_dollar_without_path_is_literal() {
    let pack = MessagePack::builder()
        .add_message(en(), "note", "paid in $ only")
        .build()
        .unwrap();
    let text = pack.render(&en(), "note", &[]).unwrap();
    assert_eq!(text, "paid in $ only");
}

#[test]
fn skip_reference_resolution_leaves_text_verbatim() {
    let pack = MessagePack::builder()
        .add_message(en(), "app.name", "Quark")
        .add_message(en(), "welcome", "Welcome to $app.name!")
        .skip_reference_resolution()
        .build()
        .unwrap();
    let text = pack.render(&en(), "welcome", &[]).unwrap();
    assert_eq!(text, "Welcome to $app.name!");
}

// =============================================================================
// Bundle Scoping
// =============================================================================

#[test]
fn references_resolve_inside_their_bundle_first() {
    let bundle = MessageBundle::with_prefix(polyglot::Path::parse("emails").unwrap())
        .add(en(), "title", "Your order")
        .add(en(), "body", "$title is on its way");
    let pack = MessagePack::builder()
        .add_message(en(), "title", "Site title")
        .add_bundle(bundle)
        .build()
        .unwrap();
    let text = pack.render(&en(), "emails.body", &[]).unwrap();
    assert_eq!(text, "Your order is on its way");
}

#[test]
fn bundle_references_fall_back_to_the_bare_path() {
    let bundle = MessageBundle::with_prefix(polyglot::Path::parse("emails").unwrap())
        .add(en(), "body", "sent by $app.name");
    let pack = MessagePack::builder()
        .add_message(en(), "app.name", "Quark")
        .add_bundle(bundle)
        .build()
        .unwrap();
    let text = pack.render(&en(), "emails.body", &[]).unwrap();
    assert_eq!(text, "sent by Quark");
}

// =============================================================================
// Build Failures
// =============================================================================

#[test]
fn missing_reference_fails_the_build() {
    let error = MessagePack::builder()
        .add_message(en(), "welcome", "Welcome to $app.name!")
        .build()
        .unwrap_err();
    assert!(matches!(error, BuildError::MissingReference { .. }));
}

#[test]
fn reference_cycle_fails_the_build() {
    let error = MessagePack::builder()
        .add_message(en(), "a", "$b")
        .add_message(en(), "b", "$a")
        .build()
        .unwrap_err();
    assert!(matches!(error, BuildError::ReferenceCycleDetected { .. }));
}

#[test]
fn self_reference_fails_the_build() {
    let error = MessagePack::builder()
        .add_message(en(), "a", "again: $a")
        .build()
        .unwrap_err();
    assert!(matches!(error, BuildError::ReferenceCycleDetected { .. }));
}

#[test]
fn unterminated_braced_reference_fails_the_build() {
    let error = MessagePack::builder()
        .add_message(en(), "broken", "see ${app.name")
        .build()
        .unwrap_err();
    assert!(matches!(error, BuildError::InvalidReference { .. }));
}

// =============================================================================
// Render-Time References
// =============================================================================

#[test]
fn filtered_reference_resolves_at_render_time() {
    let pack = MessagePack::builder()
        .add_message(en(), "points", "1250")
        .add_message(en(), "score", "score: ${points | number}")
        .build()
        .unwrap();
    let text = pack.render(&en(), "score", &[]).unwrap();
    assert_eq!(text, "score: 1,250");
}

#[test]
fn filtered_reference_to_missing_message_errors_at_render() {
    let pack = MessagePack::builder()
        .add_message(en(), "score", "score: ${nothing.here | number}")
        .build()
        .unwrap();
    let error = pack.render(&en(), "score", &[]).unwrap_err();
    assert!(matches!(error, RenderError::MissingReference { .. }));
}

#[test]
fn render_time_reference_cycle_hits_the_depth_ceiling() {
    let pack = MessagePack::builder()
        .add_message(en(), "a", "${b | number}")
        .add_message(en(), "b", "${a | number}")
        .build()
        .unwrap();
    let error = pack.render(&en(), "a", &[]).unwrap_err();
    assert!(matches!(error, RenderError::MaxReferenceDepth { .. }));
}
