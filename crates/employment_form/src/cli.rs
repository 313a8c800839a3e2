// src/cli.rs
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "employment-form",
    version,
    about = "Employment application form (headless driver)"
)]
pub struct Cli {
    /// Workflow endpoint for this run (overrides the stored setting)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Citizenship value treated as the home country for this run
    #[arg(long, global = true)]
    pub home_country: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Print sections, fields and groups
    Schema,
    /// Replay a JSON array of form events through the form loop
    Run {
        #[arg(long)]
        script: PathBuf,
        /// Sign in as this email without contacting the identity provider
        #[arg(long, conflicts_with = "user")]
        email: Option<String>,
        /// Identifier for the password sign-in
        #[arg(long, requires = "password")]
        user: Option<String>,
        #[arg(long, env = "EMPLOYMENT_FORM_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored signed-in email
    SignOut,
    /// Inspect or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    SetEndpoint { url: String },
    SetHomeCountry { country: String },
    SetAuthUrl { url: String },
}
