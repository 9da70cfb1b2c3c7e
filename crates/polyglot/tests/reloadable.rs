//! Integration tests for reloadable message packs.

use polyglot::{Locale, MessageBundle, MessagePack, ReloadableMessagePack};

fn en() -> Locale {
    Locale::new("en")
}

fn bundle(template: &str) -> MessageBundle {
    MessageBundle::new().add(en(), "greeting", template)
}

#[test]
fn serves_the_initial_build() {
    let reloadable = ReloadableMessagePack::new(
        MessagePack::builder().add_bundle(bundle("Hello")),
    )
    .unwrap();
    let text = reloadable.pack().render(&en(), "greeting", &[]).unwrap();
    assert_eq!(text, "Hello");
}

#[test]
fn reload_with_swaps_in_new_bundles() {
    let reloadable = ReloadableMessagePack::new(
        MessagePack::builder().add_bundle(bundle("Hello")),
    )
    .unwrap();

    reloadable.reload_with(vec![bundle("Hi there")]).unwrap();
    let text = reloadable.pack().render(&en(), "greeting", &[]).unwrap();
    assert_eq!(text, "Hi there");
}

#[test]
fn existing_handles_keep_the_old_pack() {
    let reloadable = ReloadableMessagePack::new(
        MessagePack::builder().add_bundle(bundle("Hello")),
    )
    .unwrap();
    let before = reloadable.pack();

    reloadable.reload_with(vec![bundle("Hi there")]).unwrap();

    assert_eq!(before.render(&en(), "greeting", &[]).unwrap(), "Hello");
    assert_eq!(
        reloadable.pack().render(&en(), "greeting", &[]).unwrap(),
        "Hi there"
    );
}

#[test]
fn failed_reload_keeps_the_previous_pack_serving() {
    let reloadable = ReloadableMessagePack::new(
        MessagePack::builder().add_bundle(bundle("Hello")),
    )
    .unwrap();

    let result = reloadable.reload_with(vec![bundle("broken {0")]);
    assert!(result.is_err());

    let text = reloadable.pack().render(&en(), "greeting", &[]).unwrap();
    assert_eq!(text, "Hello");

    // The stored configuration is untouched too, so a plain reload succeeds.
    reloadable.reload().unwrap();
    assert_eq!(
        reloadable.pack().render(&en(), "greeting", &[]).unwrap(),
        "Hello"
    );
}

#[test]
fn configuration_survives_bundle_replacement() {
    let reloadable = ReloadableMessagePack::new(
        MessagePack::builder()
            .add_bundle(bundle("Hello"))
            .default_locale(en()),
    )
    .unwrap();

    reloadable
        .reload_with(vec![bundle("Hi there")])
        .unwrap();

    // The default locale set at construction still applies after a reload.
    let text = reloadable
        .pack()
        .render(&Locale::new("fr"), "greeting", &[])
        .unwrap();
    assert_eq!(text, "Hi there");
}
