use colored::Colorize;
use std::path::Path;
use visual_query::context::Context;
use visual_query::{render_outline, run_script, Catalog, Dialect, Error, Output, Session};

pub fn apply(script: &str) -> Result<(), Error> {
    let context = Context::current()?;
    let mut session = context.open_session()?;

    run_script(&mut session, script)?;
    context.save_session(&session)?;

    print_output(session.output());

    Ok(())
}

pub fn show(outline: bool, json: bool) -> Result<(), Error> {
    let context = Context::current()?;
    let session = context.open_session()?;

    if json {
        println!("{}", serde_json::to_string_pretty(session.output())?);

        return Ok(());
    }

    print_output(session.output());

    if outline {
        println!("{}", render_outline(session.state(), session.catalog()));
    }

    Ok(())
}

pub fn reset() -> Result<(), Error> {
    let context = Context::current()?;
    let mut session = context.open_session()?;

    session.reset();
    context.save_session(&session)?;

    println!("Query of context \x1b[1m{}\x1b[0m cleared.", context.name);

    Ok(())
}

pub fn translate_one(script: &str, catalog: &Path, dialect: Dialect) -> Result<(), Error> {
    let mut session = Session::new(Catalog::load(catalog)?, dialect);

    run_script(&mut session, script)?;

    println!("{}", session.output().sql);

    Ok(())
}

fn print_output(output: &Output) {
    println!("{}", output.sql);
    println!("{}", format!("-- {}", output.statistics).dimmed());
}
