use condval::{Query, RuleStore};

fn main() {
    let store = RuleStore::from_file("demos/contract.rules").expect("failed to load rules");

    println!("{store}");
    println!("Conditions: {:?}", store.all_condition_names());

    let query = Query::new()
        .set("type", "contract")
        .set("state", "draft")
        .set("isViewer", true);

    let result = store.lookup(&query).expect("equality never fails");
    println!("Fields: {result}");

    match RuleStore::from_dsl("when type = contract => a\nwhen type = contract => b") {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("Rejected: {e}"),
    }
}
