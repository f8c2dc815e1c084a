mod args;
mod commands;

use crate::args::{Command, ContextParams};
use args::Args;
use clap::Parser;
use colored::Colorize;
use std::process::exit;
use visual_query::cache;
use visual_query::context::{Context, ContextName};
use visual_query::Catalog;

fn main() {
    env_logger::init();

    let args = Args::parse();

    let result = match args.command {
        Command::CreateContext(context) => create_context(context),
        Command::UseContext { name } => use_context(name),
        Command::ListContexts => list_contexts(),
        Command::Apply { script } => commands::apply(&script),
        Command::Show { outline, json } => commands::show(outline, json),
        Command::Reset => commands::reset(),
        Command::Translate {
            script,
            catalog,
            dialect,
        } => commands::translate_one(&script, &catalog, dialect.into()),
    };

    if let Err(error) = result {
        eprintln!("{intro}: {error}", intro = "error".bold().red());
        exit(1);
    }
}

fn create_context(params: ContextParams) -> Result<(), visual_query::Error> {
    let use_it = params.use_it;
    let mut new_context: Context = params.into();
    new_context.name.validate()?;

    // Commands can run from any folder, the catalog path has to work from all of them.
    new_context.catalog = std::fs::canonicalize(&new_context.catalog)?;
    let catalog = Catalog::load(&new_context.catalog)?;

    cache::write(&new_context)?;

    println!(
        "Create new context \x1b[1m{}\x1b[0m with {} tables.",
        new_context.name,
        catalog.tables().len()
    );

    if use_it {
        use_context(new_context.name.into())?;
    } else {
        println!(
            "Switch to it by running \x1b[1mvq use-context {}\x1b[0m.",
            new_context.name
        );
    }

    Ok(())
}

fn use_context(name: String) -> Result<(), visual_query::Error> {
    let context_name: ContextName = name.into();
    context_name.validate()?;
    let _: Context = cache::read(&context_name)?;

    cache::write(&context_name)?;

    println!("Switched to context \x1b[1m{}\x1b[0m.", context_name);

    Ok(())
}

fn list_contexts() -> Result<(), visual_query::Error> {
    let current_context: Option<ContextName> = ContextName::current().ok();
    let known_contexts: Vec<Context> = cache::read_all()?;

    println!("Available contexts:");
    for context in &known_contexts {
        println!(
            "{}{}: {} ({})",
            if current_context.as_ref() == Some(&context.name) {
                " * ".bold()
            } else {
                "   ".into()
            },
            context.name.to_string().bold(),
            context.catalog.display(),
            context.dialect
        )
    }

    Ok(())
}
