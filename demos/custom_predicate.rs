use condval::predicates::{NumericUpperBound, Or, Prefix};
use condval::{CaseInsensitive, CondvalError, Query, Rule, RuleStore, RuleStoreBuilder};

fn main() -> Result<(), CondvalError> {
    // Routes match on path prefix.
    let routes = RuleStoreBuilder::new()
        .predicate(Prefix)
        .rule(|r| r.when("path", "/").then("public"))
        .rule(|r| r.when("path", "/admin").when("method", "GET").then("audit"))
        .rule(|r| r.when("path", "/api").then("rate limited"))
        .build()?;

    for path in ["/index.html", "/api/users", "/admin/settings"] {
        let query = Query::new().set("path", path).set("method", "GET");
        println!("{path}: {}", routes.lookup(&query)?);
    }

    // Age bands: the query age must not exceed the declared bound.
    let bands = RuleStore::with_predicate(
        NumericUpperBound,
        [
            Rule::builder().when("age", 12).then("child").build()?,
            Rule::builder()
                .when("age", 17)
                .when("student", 1)
                .then("teen")
                .build()?,
        ],
    )?;
    let query = Query::new().set("age", 10).set("student", 1);
    println!("age 10: {}", bands.lookup(&query)?);

    match bands.lookup(&Query::new().set("age", "ten")) {
        Ok(result) => println!("age ten: {result}"),
        Err(e) => println!("age ten: {e}"),
    }

    // Either exact or prefix, with the callback form.
    let combined =
        RuleStore::from_dsl_with("when lang = en => english", Or(CaseInsensitive, Prefix))?;
    combined.lookup_each(&Query::new().set("lang", "en-GB"), |value| {
        println!("en-GB: {value}");
        Ok::<_, CondvalError>(())
    })?;

    Ok(())
}
