use condval::{Query, RuleStoreBuilder};

fn main() {
    // Define rules
    let store = RuleStoreBuilder::new()
        .rule(|r| r.when("type", "contract").when("isViewer", true).then("title"))
        .rule(|r| r.when("type", "contract").when("isEditor", true).then("subject"))
        .rule(|r| {
            r.when("type", "contract")
                .when("state", "draft")
                .when("isViewer", true)
                .then("due date")
        })
        .build()
        .expect("failed to build rule store");

    println!("{store}");

    // Look up the visible fields for a viewer of a draft contract
    let query = Query::new()
        .set("type", "contract")
        .set("state", "draft")
        .set("isViewer", true);

    let result = store.lookup(&query).expect("equality never fails");
    if result.is_empty() {
        println!("No rule matched.");
    } else {
        println!("Result: {result}");
        for value in result.iter() {
            println!("  - {value}");
        }
    }
}
