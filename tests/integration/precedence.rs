//! Source precedence: command line beats environment beats config file
//! beats default, for the same parameter.

use confit::{builder, ConfBuilder, MockEnv, Source, Value};

fn base(env: MockEnv, with_file: bool) -> ConfBuilder {
    let b = builder()
        .env(|e| e.prefix("MYPROJECT_"))
        .env_source(env)
        .param("baz", |p| {
            p.int().default(123).range(1, 500).conffile("BAZ").cli('b', "baz")
        });
    if with_file {
        b.file(|f| f.content("BAZ 42\n"))
    } else {
        b
    }
}

#[test]
fn command_line_beats_everything() {
    let env = MockEnv::from_pairs([("MYPROJECT_BAZ", "199")]);
    let mut conf = base(env, true).build().unwrap();
    conf.acquire(["-b", "7"]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(7));
    assert_eq!(conf.source("baz").unwrap(), Source::Cli);
}

#[test]
fn environment_beats_file() {
    let env = MockEnv::from_pairs([("MYPROJECT_BAZ", "199")]);
    let mut conf = base(env, true).build().unwrap();
    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(199));
    assert_eq!(conf.source("baz").unwrap(), Source::Env);
}

#[test]
fn file_beats_default() {
    let mut conf = base(MockEnv::new(), true).build().unwrap();
    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(42));
    assert_eq!(conf.source("baz").unwrap(), Source::File);
}

#[test]
fn default_when_no_source_provides_a_value() {
    let mut conf = base(MockEnv::new(), false).build().unwrap();
    conf.acquire::<_, String>([]).unwrap();
    assert_eq!(conf.get_int("baz").unwrap(), Some(123));
    assert_eq!(conf.source("baz").unwrap(), Source::Default);
}

#[test]
fn long_and_short_forms_are_equivalent() {
    for args in [
        vec!["-b", "123"],
        vec!["-b123"],
        vec!["--baz", "123"],
        vec!["--baz=123"],
    ] {
        let mut conf = base(MockEnv::new(), false).build().unwrap();
        conf.acquire(args.clone()).unwrap();
        assert_eq!(conf.get("baz").unwrap(), Some(&Value::Int(123)), "{args:?}");
    }
}
