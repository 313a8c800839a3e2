mod cli;
mod commands;
mod hooks;

use app::{AppBuilder, Application};
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::cli::Cli;

struct EmploymentFormApp;

impl Application for EmploymentFormApp {
    const APP_ID: &'static str = "employment_form";
}

#[tokio::main]
pub async fn main() -> Result<()> {
    hooks::init()?;
    let args = Cli::parse();
    let ctx = AppBuilder::<EmploymentFormApp>::new(env!("CARGO_PKG_VERSION"))
        .map_err(|err| eyre!("initialisation failed: {err}"))?
        .build();
    commands::dispatch(args, &ctx).await
}
