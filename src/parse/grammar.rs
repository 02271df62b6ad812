use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use winnow::ascii::till_line_ending;
use winnow::combinator::{alt, cut_err, preceded, repeat, separated};
use winnow::error::{ErrMode, FromExternalError, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::Rule;

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

// -- Identifiers & keywords -------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_alphanumeric() || c == '_' || c == '.' || c == '-'
        }),
    )
        .take()
        .parse_next(input)
}

/// A whole-word keyword, so `and` does not match the start of `android`.
fn keyword(input: &mut &str, kw: &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    let checkpoint = input.checkpoint();
    let word = ident.parse_next(input)?;
    if word == kw {
        Ok(())
    } else {
        input.reset(&checkpoint);
        Err(ErrMode::from_input(input))
    }
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn bare_value<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '+' | ':' | '/' | '@')
    })
    .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<String> {
    ws.parse_next(input)?;
    alt((string_literal, bare_value.map(str::to_owned)))
        .context(StrContext::Expected(StrContextValue::Description("value")))
        .parse_next(input)
}

fn value_list(input: &mut &str) -> ModalResult<Vec<String>> {
    ws.parse_next(input)?;
    '('.parse_next(input)?;
    let values: Vec<String> = separated(1.., value, (ws, ',')).parse_next(input)?;
    (ws, cut_err(')'))
        .context(StrContext::Expected(StrContextValue::CharLiteral(')')))
        .parse_next(input)?;
    Ok(values)
}

// -- Conditions -------------------------------------------------------------

fn condition(input: &mut &str) -> ModalResult<(String, Vec<String>)> {
    ws.parse_next(input)?;
    let name = ident
        .context(StrContext::Expected(StrContextValue::Description(
            "condition name",
        )))
        .parse_next(input)?;
    ws.parse_next(input)?;

    let values = alt((
        preceded(alt(("==", "=")), cut_err(value)).map(|v| vec![v]),
        preceded(|i: &mut &str| keyword(i, "in"), cut_err(value_list)),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "'=' or 'in'",
    )))
    .parse_next(input)?;

    Ok((name.to_owned(), values))
}

fn conditions(input: &mut &str) -> ModalResult<BTreeMap<String, BTreeSet<String>>> {
    let pairs: Vec<(String, Vec<String>)> =
        separated(1.., condition, |i: &mut &str| keyword(i, "and")).parse_next(input)?;

    let mut conditions: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for (name, values) in pairs {
        match conditions.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(values.into_iter().collect());
            }
            Entry::Occupied(slot) => {
                let err = RepeatedCondition(slot.key().clone());
                return Err(ErrMode::from_external_error(input, err).cut());
            }
        }
    }
    Ok(conditions)
}

/// `a = 1 and a = 2` can never hold; alternatives are written `a in (1, 2)`.
#[derive(Debug, thiserror::Error)]
#[error("condition '{0}' repeated in one rule, use `{0} in (...)` for alternatives")]
struct RepeatedCondition(String);

fn outputs(input: &mut &str) -> ModalResult<Vec<String>> {
    separated(1.., value, (ws, ',')).parse_next(input)
}

// -- Rule definitions -------------------------------------------------------

fn rule_def(input: &mut &str) -> ModalResult<Rule<String>> {
    keyword(input, "when")?;

    let conditions = cut_err(conditions).parse_next(input)?;

    ws.parse_next(input)?;
    cut_err("=>")
        .context(StrContext::Expected(StrContextValue::StringLiteral("=>")))
        .parse_next(input)?;

    let outputs = cut_err(outputs)
        .context(StrContext::Expected(StrContextValue::Description(
            "output value",
        )))
        .parse_next(input)?;

    Rule::new(conditions, outputs).map_err(|_| ErrMode::from_input(input).cut())
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_rules(input: &mut &str) -> ModalResult<Vec<Rule<String>>> {
    let rules: Vec<Rule<String>> = repeat(0.., rule_def).parse_next(input)?;
    ws.parse_next(input)?;
    Ok(rules)
}
