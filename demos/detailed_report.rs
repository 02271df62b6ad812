use condval::{Query, RuleStoreBuilder};

fn main() {
    let store = RuleStoreBuilder::new()
        .rule(|r| r.then("id"))
        .rule(|r| r.when("type", "contract").when("isViewer", true).then("title"))
        .rule(|r| r.when("type", "contract").when("isEditor", true).then("subject"))
        .rule(|r| {
            r.when("type", "contract")
                .when_any("state", ["draft", "review"])
                .when("isViewer", true)
                .then_all(["due date", "owner"])
        })
        .build()
        .expect("failed to build rule store");

    let query = Query::new()
        .set("type", "contract")
        .set("state", "review")
        .set("isViewer", true)
        .set("isEditor", true);

    let report = store.lookup_detailed(&query).expect("equality never fails");

    println!("{report}");
    println!();
    println!("Query: {query}");
    for rule in report.matched() {
        println!("matched:   {rule}");
    }
    for rule in report.discarded() {
        println!("discarded: {rule}");
    }
    println!("Duration: {:?}", report.duration());
}
