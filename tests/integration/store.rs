//! Store operations on a resolved set: get/set/keys/items and lookups by
//! config-file key.

use confit::{builder, Conf, ConfError, Value};

fn sample() -> Conf {
    let mut conf = builder()
        .allow_unset(true)
        .env_source(confit::MockEnv::new())
        .param("action", |p| {
            p.string().default("full").allowed(["full", "test", "partial"]).no_cli()
        })
        .param("quantity", |p| {
            p.int().default(123).range(1, 200).conffile("QUANTITY").no_cli()
        })
        .param("enable", |p| p.boolean().conffile("START_IT").no_cli())
        .build()
        .unwrap();
    conf.acquire::<_, String>([]).unwrap();
    conf
}

#[test]
fn set_then_get_round_trips() {
    let mut conf = sample();
    conf.set("quantity", 199).unwrap();
    assert_eq!(conf.get("quantity").unwrap(), Some(&Value::Int(199)));

    // Raw strings go through the same coercion as any source.
    conf.set("quantity", "42").unwrap();
    assert_eq!(conf.get_int("quantity").unwrap(), Some(42));

    conf.set("enable", true).unwrap();
    assert_eq!(conf.get_bool("enable").unwrap(), Some(true));
}

#[test]
fn rejected_set_reports_the_right_kind() {
    let mut conf = sample();
    assert!(matches!(
        conf.set("quantity", "abc").unwrap_err(),
        ConfError::BadType { .. }
    ));
    assert!(matches!(
        conf.set("quantity", 250).unwrap_err(),
        ConfError::OutOfRange { .. }
    ));
    assert!(matches!(
        conf.set("action", "sideways").unwrap_err(),
        ConfError::NotAllowed { .. }
    ));
}

#[test]
fn keys_and_items_in_definition_order() {
    let conf = sample();
    assert_eq!(
        conf.keys().collect::<Vec<_>>(),
        ["action", "quantity", "enable"]
    );

    let items: Vec<_> = conf.items().collect();
    assert_eq!(items[0], ("action", Some(&Value::Str("full".into()))));
    assert_eq!(items[1], ("quantity", Some(&Value::Int(123))));
    // No default and no source: the unset sentinel.
    assert_eq!(items[2], ("enable", None));
}

#[test]
fn lookup_by_conffile_key() {
    let conf = sample();
    assert_eq!(
        conf.get_by_conffile_name("QUANTITY").unwrap(),
        Some(&Value::Int(123))
    );
    assert!(matches!(
        conf.get_by_conffile_name("NOPE").unwrap_err(),
        ConfError::UnknownParameter { .. }
    ));
}

#[test]
fn typed_getter_on_wrong_type_fails() {
    let conf = sample();
    assert!(matches!(
        conf.get_int("action").unwrap_err(),
        ConfError::BadType { .. }
    ));
}
