//! decree-demo - example application built on decree

use std::process;

use anyhow::Result;
use decree::{commands, logging, output, App, AppConfig, Dispatched};

fn main() {
    if let Err(err) = run() {
        #[allow(clippy::print_stderr)]
        {
            eprintln!("Error: {err:#}");
        }

        let code = err
            .downcast_ref::<decree::Error>()
            .map(decree::Error::exit_code)
            .or_else(|| {
                err.downcast_ref::<decree_core::Error>()
                    .map(decree_core::Error::exit_code)
            })
            .unwrap_or(1);

        #[allow(clippy::exit)]
        process::exit(code);
    }
}

fn run() -> Result<()> {
    let config = AppConfig::load_or_default(None)?;
    logging::init(&config.log_filter)?;

    let mut app = App::new(config);
    commands::register_all(&mut app)?;

    if let Dispatched::Completed(value) = app.run()? {
        if let Some(text) = output::render(&value, app.config().output)? {
            #[allow(clippy::print_stdout)]
            {
                println!("{text}");
            }
        }
    }
    Ok(())
}
