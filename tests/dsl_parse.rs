use std::collections::BTreeSet;
use std::path::PathBuf;

use condval::{CaseInsensitive, CondvalError, Query, RuleStore};

const CONTRACT_RULES: &str = r#"
# Field visibility for contract screens.
when type = contract and isViewer = true => title
when type = contract and isEditor = true => subject
when type = contract and state = draft and isViewer = true => "due date"
"#;

fn values(store: &RuleStore<String>, query: &Query) -> Vec<String> {
    store.lookup(query).unwrap().iter().cloned().collect()
}

struct TempFile(PathBuf);

impl TempFile {
    fn new(name: &str, contents: &str) -> Self {
        let path = std::env::temp_dir().join(format!("condval-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        Self(path)
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

#[test]
fn dsl_parse_and_lookup() {
    let store = RuleStore::from_dsl(CONTRACT_RULES).unwrap();
    assert_eq!(store.len(), 3);

    let query = Query::new()
        .set("type", "contract")
        .set("state", "draft")
        .set("isViewer", true);
    assert_eq!(values(&store, &query), ["due date"]);

    let query = Query::new()
        .set("type", "contract")
        .set("isViewer", true)
        .set("isEditor", true);
    assert_eq!(values(&store, &query), ["subject", "title"]);
}

#[test]
fn dsl_alternatives_and_universal_fallback() {
    let dsl = r#"
when state in (1, 2, 3) => open
when state in (2, 3) and role = viewer => "read only"
"#;
    let store = RuleStore::from_dsl(dsl).unwrap();
    assert_eq!(store.all_unique_condition_keys().len(), 5);
    assert_eq!(
        values(&store, &Query::new().set("state", 2).set("role", "viewer")),
        ["read only"]
    );
    assert_eq!(
        values(&store, &Query::new().set("state", 1).set("role", "viewer")),
        ["open"]
    );
}

#[test]
fn dsl_with_case_insensitive_predicate() {
    let store = RuleStore::from_dsl_with("when env = PROD => strict", CaseInsensitive).unwrap();
    assert_eq!(values(&store, &Query::new().set("env", "prod")), ["strict"]);
}

#[test]
fn dsl_syntax_error_is_parse_error() {
    let err = RuleStore::from_dsl("when type = contract title").unwrap_err();
    match err {
        CondvalError::Parse(e) => assert!(e.offset() > 0),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn dsl_conflict_is_build_error() {
    let dsl = "when cond1 = val1 and cond2 = val2 => val1\n\
               when cond1 = val1 and cond2 = val2 => val1, val2";
    let err = RuleStore::from_dsl(dsl).unwrap_err();
    assert!(matches!(err, CondvalError::Build(_)));
    assert!(err.to_string().contains("{cond1=val1, cond2=val2}"));
}

#[test]
fn dsl_empty_input_builds_empty_store() {
    let store = RuleStore::from_dsl("# nothing yet\n").unwrap();
    assert!(store.is_empty());
}

#[test]
fn from_file_reads_rules() {
    let file = TempFile::new("contract.rules", CONTRACT_RULES);
    let store = RuleStore::from_file(&file.0).unwrap();
    assert_eq!(store.len(), 3);
    assert_eq!(
        store.all_condition_names(),
        BTreeSet::from(["isEditor", "isViewer", "state", "type"])
    );
}

#[test]
fn from_file_missing_is_io_error() {
    let path = std::env::temp_dir().join("condval-definitely-missing.rules");
    let err = RuleStore::from_file(path).unwrap_err();
    assert!(matches!(err, CondvalError::Io(_)));
}

#[test]
fn parse_module_exposes_rules() {
    let rules = condval::parse::parse("when a = 1 => x\nwhen b in (2, 3) => y, z").unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[1].values("b").map(|v| v.len()), Some(2));
    assert_eq!(rules[1].outputs().len(), 2);
}
