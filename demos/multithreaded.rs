use std::sync::Arc;
use std::thread;

use condval::{Query, RuleStoreBuilder};

fn main() {
    let store = Arc::new(
        RuleStoreBuilder::new()
            .case_insensitive()
            .rule(|r| r.when("tier", "gold").then("priority support"))
            .rule(|r| r.when("tier", "gold").when("region", "eu").then("eu desk"))
            .rule(|r| r.when_any("tier", ["silver", "bronze"]).then("standard support"))
            .build()
            .expect("failed to build rule store"),
    );

    let tiers = ["Gold", "silver", "BRONZE", "gold"];
    let handles: Vec<_> = tiers
        .into_iter()
        .enumerate()
        .map(|(i, tier)| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                let region = if i % 2 == 0 { "us" } else { "EU" };
                let query = Query::new().set("tier", tier).set("region", region);
                let result = store.lookup(&query).expect("equality never fails");
                println!("Thread {i} {query}: {result}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
