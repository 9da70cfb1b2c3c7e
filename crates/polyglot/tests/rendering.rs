//! Integration tests for message pack rendering.

use polyglot::{
    Locale, MessagePack, Path, RenderError, UnresolvedMessagePolicy, args, named_args,
};

fn en() -> Locale {
    Locale::new("en")
}

// =============================================================================
// Basic Rendering
// =============================================================================

#[test]
fn renders_literal_message() {
    let pack = MessagePack::builder()
        .add_message(en(), "hello", "Hello, world!")
        .build()
        .unwrap();
    let text = pack.render(&en(), "hello", &[]).unwrap();
    assert_eq!(text, "Hello, world!");
}

#[test]
fn renders_positional_arguments() {
    let pack = MessagePack::builder()
        .add_message(en(), "greeting", "Hello {0}!")
        .add_message(en(), "pair", "{0} and {1}")
        .build()
        .unwrap();

    let greeting = pack.render(&en(), "greeting", &args!["World"]).unwrap();
    assert_eq!(greeting, "Hello World!");

    let pair = pack
        .render(&en(), "pair", &args!["salt", "pepper"])
        .unwrap();
    assert_eq!(pair, "salt and pepper");
}

#[test]
fn renders_named_arguments() {
    let pack = MessagePack::builder()
        .add_message(en(), "greeting", "Hello {name}!")
        .build()
        .unwrap();
    let text = pack
        .render_named(&en(), "greeting", &named_args! { "name" => "World" })
        .unwrap();
    assert_eq!(text, "Hello World!");
}

#[test]
fn escaped_metacharacters_render_literally() {
    let pack = MessagePack::builder()
        .add_message(en(), "doc", r"use \{0\} for the first argument, \$5 is money")
        .build()
        .unwrap();
    let text = pack.render(&en(), "doc", &[]).unwrap();
    assert_eq!(text, "use {0} for the first argument, $5 is money");
}

#[test]
fn rendering_is_repeatable() {
    let pack = MessagePack::builder()
        .add_message(en(), "greeting", "Hello {0}!")
        .build()
        .unwrap();
    let first = pack.render(&en(), "greeting", &args!["World"]).unwrap();
    let second = pack.render(&en(), "greeting", &args!["World"]).unwrap();
    assert_eq!(first, second);
}

#[test]
fn integers_format_with_locale_grouping() {
    let pack = MessagePack::builder()
        .add_message(en(), "count", "{0}")
        .add_message(Locale::new("de"), "count", "{0}")
        .build()
        .unwrap();

    let english = pack.render(&en(), "count", &args![1234567]).unwrap();
    assert_eq!(english, "1,234,567");

    let german = pack
        .render(&Locale::new("de"), "count", &args![1234567])
        .unwrap();
    assert_eq!(german, "1.234.567");
}

// =============================================================================
// Missing Arguments
// =============================================================================

#[test]
fn missing_positional_argument_errors() {
    let pack = MessagePack::builder()
        .add_message(en(), "greeting", "Hello {1}!")
        .build()
        .unwrap();
    let error = pack.render(&en(), "greeting", &args!["only one"]).unwrap_err();
    assert_eq!(error, RenderError::MissingArgument { index: 1 });
}

#[test]
fn missing_named_argument_errors() {
    let pack = MessagePack::builder()
        .add_message(en(), "greeting", "Hello {name}!")
        .build()
        .unwrap();
    let error = pack
        .render_named(&en(), "greeting", &named_args! { "other" => 1 })
        .unwrap_err();
    assert_eq!(
        error,
        RenderError::MissingNamedArgument {
            name: "name".to_string()
        }
    );
}

// =============================================================================
// Unresolved Messages
// =============================================================================

#[test]
fn unresolved_message_fails_by_default() {
    let pack = MessagePack::builder()
        .add_message(en(), "hello", "Hello")
        .build()
        .unwrap();
    let error = pack.render(&en(), "missing.path", &[]).unwrap_err();
    assert!(matches!(error, RenderError::UnresolvedMessage { .. }));
}

#[test]
fn find_returns_none_instead_of_failing() {
    let pack = MessagePack::builder()
        .add_message(en(), "hello", "Hello")
        .build()
        .unwrap();
    assert_eq!(pack.find(&en(), "missing.path", &[]).unwrap(), None);
    assert_eq!(
        pack.find(&en(), "hello", &[]).unwrap(),
        Some("Hello".to_string())
    );
}

#[test]
fn path_echo_policy_returns_the_literal_path() {
    let pack = MessagePack::builder()
        .add_message(en(), "hello", "Hello")
        .unresolved_message_policy(UnresolvedMessagePolicy::PathEcho)
        .build()
        .unwrap();

    let bare = pack.render(&en(), "missing.path", &[]).unwrap();
    assert_eq!(bare, "missing.path");

    // Arguments never leak into the echoed path.
    let with_args = pack
        .render(&en(), "missing.path", &args!["a", 2])
        .unwrap();
    assert_eq!(with_args, "missing.path");
}

#[test]
fn pack_debug_output_stays_compact() {
    let pack = MessagePack::builder()
        .add_message(en(), "hello", "Hello")
        .build()
        .unwrap();
    let debug = format!("{pack:?}");
    assert!(debug.contains("MessagePack"));
    assert!(debug.contains("templates: 1"));
}

// =============================================================================
// Locale and Prefix Views
// =============================================================================

#[test]
fn locale_bound_view_renders_without_locale_argument() {
    let pack = MessagePack::builder()
        .add_message(en(), "greeting", "Hello {0}!")
        .build()
        .unwrap();
    let messages = pack.for_locale(en());
    assert_eq!(messages.locale(), &en());
    let text = messages.render("greeting", &args!["World"]).unwrap();
    assert_eq!(text, "Hello World!");
}

#[test]
fn path_prefix_view_resolves_relative_paths() {
    let pack = MessagePack::builder()
        .add_message(en(), "home.title", "Home")
        .add_message(en(), "common.ok", "OK")
        .build()
        .unwrap();
    let home = pack.with_path_prefix(Path::parse("home").unwrap());

    let title = home.render(&en(), "title", &[]).unwrap();
    assert_eq!(title, "Home");

    // Unprefixed paths still resolve through the bare-path fallback.
    let ok = home.render(&en(), "common.ok", &[]).unwrap();
    assert_eq!(ok, "OK");
}

#[test]
fn nested_prefix_views_compose() {
    let pack = MessagePack::builder()
        .add_message(en(), "mails.welcome.subject", "Welcome!")
        .build()
        .unwrap();
    let view = pack
        .with_path_prefix(Path::parse("mails").unwrap())
        .with_path_prefix(Path::parse("welcome").unwrap());
    let subject = view.render(&en(), "subject", &[]).unwrap();
    assert_eq!(subject, "Welcome!");
}

// =============================================================================
// Ad Hoc Expressions
// =============================================================================

#[test]
fn renders_ad_hoc_expression() {
    let pack = MessagePack::builder()
        .add_message(en(), "unused", "x")
        .build()
        .unwrap();
    let text = pack
        .render_expression(&en(), "Hi {0}, you have {1} points", &args!["Ann", 5])
        .unwrap();
    assert_eq!(text, "Hi Ann, you have 5 points");
}

#[test]
fn ad_hoc_expression_uses_pack_filters() {
    let pack = MessagePack::builder()
        .add_message(en(), "unused", "x")
        .build()
        .unwrap();
    let none = pack
        .render_expression(&en(), "{0 | zero (no mail) ({0} mails)}", &args![0])
        .unwrap();
    assert_eq!(none, "no mail");
    let some = pack
        .render_expression(&en(), "{0 | zero (no mail) ({0} mails)}", &args![3])
        .unwrap();
    assert_eq!(some, "3 mails");
}

#[test]
fn ad_hoc_expression_with_named_arguments() {
    let pack = MessagePack::builder()
        .add_message(en(), "unused", "x")
        .build()
        .unwrap();
    let text = pack
        .render_expression_named(&en(), "Hello {name}!", &named_args! { "name" => "Ann" })
        .unwrap();
    assert_eq!(text, "Hello Ann!");
}

// =============================================================================
// Pack Introspection
// =============================================================================

#[test]
fn len_counts_stored_templates() {
    let pack = MessagePack::builder()
        .add_message(en(), "a", "1")
        .add_message(en(), "b", "2")
        .add_message(Locale::new("pl"), "a", "3")
        .build()
        .unwrap();
    assert_eq!(pack.len(), 3);
    assert!(!pack.is_empty());
}
