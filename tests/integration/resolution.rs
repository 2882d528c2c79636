//! Resolution behavior: the unset policy, per-call overrides, fatal
//! validation errors from any source, and re-running acquire.

use confit::{builder, ConfError, MockEnv, Source};

#[test]
fn unset_mandatory_parameter_fails() {
    let mut conf = builder()
        .param("needed", |p| p.string().no_cli().no_conffile())
        .build()
        .unwrap();
    let err = conf.acquire::<_, String>([]).unwrap_err();
    assert!(matches!(err, ConfError::Unset { name } if name == "needed"));
}

#[test]
fn unset_parameter_allowed_by_policy_reads_as_none() {
    let mut conf = builder()
        .allow_unset(true)
        .param("needed", |p| p.string().no_cli().no_conffile())
        .build()
        .unwrap();
    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get("needed").unwrap(), None);
}

#[test]
fn allow_unset_override_applies_to_one_call_only() {
    let mut conf = builder()
        .param("needed", |p| p.string().no_cli().no_conffile())
        .build()
        .unwrap();

    conf.acquire_with::<_, String>([], confit::Overrides::new().allow_unset(true))
        .unwrap();
    assert_eq!(conf.get("needed").unwrap(), None);

    // Without the override the build-time policy is back in force.
    assert!(conf.acquire::<_, String>([]).is_err());
}

#[test]
fn env_prefix_override() {
    let env = MockEnv::from_pairs([("OTHER_BAZ", "9"), ("MYPROJECT_BAZ", "199")]);
    let mut conf = builder()
        .env(|e| e.prefix("MYPROJECT_"))
        .env_source(env)
        .param("baz", |p| p.int().conffile("BAZ").no_cli())
        .build()
        .unwrap();

    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(199));

    conf.acquire_with::<_, String>([], confit::Overrides::new().env_prefix("OTHER_"))
        .unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(9));
}

#[test]
fn config_file_name_override_and_search_path() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("default.conf"), "BAZ 10\n").unwrap();
    std::fs::write(dir.path().join("other.conf"), "BAZ 20\n").unwrap();
    let location = dir.path().to_str().unwrap().to_string();

    let mut conf = builder()
        .env_source(MockEnv::new())
        .file(|f| f.name("default.conf").locations([location]))
        .param("baz", |p| p.int().conffile("BAZ").no_cli())
        .build()
        .unwrap();

    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(10));

    conf.acquire_with::<_, String>([], confit::Overrides::new().config_file("other.conf"))
        .unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(20));
}

#[test]
fn malformed_file_value_is_fatal() {
    let mut conf = builder()
        .env_source(MockEnv::new())
        .file(|f| f.content("BAZ abc\n"))
        .param("baz", |p| p.int().default(1).conffile("BAZ").no_cli())
        .build()
        .unwrap();
    let err = conf.acquire::<_, String>([]).unwrap_err();
    assert!(matches!(err, ConfError::BadType { .. }));
}

#[test]
fn out_of_range_environment_value_is_fatal() {
    let env = MockEnv::from_pairs([("BAZ", "250")]);
    let mut conf = builder()
        .env_source(env)
        .param("baz", |p| {
            p.int().default(1).range(1, 200).conffile("BAZ").no_cli()
        })
        .build()
        .unwrap();
    let err = conf.acquire::<_, String>([]).unwrap_err();
    assert!(matches!(err, ConfError::OutOfRange { min: 1, max: 200, .. }));
}

#[test]
fn unrecognized_file_key_is_ignored_but_unknown_flag_is_not() {
    // The config file may carry keys for other tools; the command line
    // may not.
    let mut conf = builder()
        .env_source(MockEnv::new())
        .file(|f| f.content("SOMETHING_ELSE here\nBAZ 5\n"))
        .param("baz", |p| p.int().conffile("BAZ").cli('b', "baz"))
        .build()
        .unwrap();

    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(5));

    let err = conf.acquire(["--something-else", "here"]).unwrap_err();
    assert!(matches!(err, ConfError::UnknownArgument { .. }));
}

#[test]
fn reacquire_restarts_from_defaults() {
    let mut conf = builder()
        .param("baz", |p| p.int().default(123).cli('b', "baz").no_conffile())
        .build()
        .unwrap();

    conf.acquire(["-b", "7"]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(7));

    // No command-line value this time: the previous overlay is gone.
    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(123));
    assert_eq!(conf.source("baz").unwrap(), Source::Default);
}

#[test]
fn comment_and_whitespace_handling_in_file_values() {
    let mut conf = builder()
        .env_source(MockEnv::new())
        .file(|f| f.content("# leading comment\nBAZ 188 # trailing comment\n"))
        .param("baz", |p| p.int().range(1, 200).conffile("BAZ").no_cli())
        .build()
        .unwrap();
    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(188));
}

#[test]
fn boolean_flags_from_every_source() {
    let env = MockEnv::from_pairs([("START_IT", "no")]);
    let mut conf = builder()
        .file(|f| f.content("START_IT yes\n"))
        .env_source(env)
        .param("enable", |p| p.boolean().conffile("START_IT").cli('s', "startit"))
        .build()
        .unwrap();

    // Environment "no" beats the file's "yes".
    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_bool("enable").unwrap(), Some(false));

    // The flag's presence beats both.
    conf.acquire(["--startit"]).unwrap();
    assert_eq!(conf.get_bool("enable").unwrap(), Some(true));
}
