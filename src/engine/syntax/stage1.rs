//! The stage 1 representation is just the raw output from Pest
use pest::iterators::Pairs;
use pest::Parser;
use pest_derive::Parser;

/// Pest parser
///
/// Pest will autogenerate all of the code needed, and will also give an enum called "Rule" that
/// will have all the rule names from the builder.pest file.
#[derive(Parser)]
#[grammar = "engine/syntax/builder.pest"]
struct Stage1Parser;

pub fn parse_stage1(input: &str) -> Result<Stage1Rep<'_>, crate::Error> {
    let pest = Stage1Parser::parse(
        // we've constructed our grammar to always start with a Rule:root node.
        Rule::root,
        input,
    )?; // "?" turns Pest errors into crate::Error

    Ok(Stage1Rep { pest })
}

/// Pest pair holder
///
/// Pairs only point into the input, nothing is copied until the commands are built.
#[derive(Debug)]
pub struct Stage1Rep<'a> {
    pub pest: Pairs<'a, Rule>,
}
