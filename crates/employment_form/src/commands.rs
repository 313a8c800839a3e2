//! Command implementations of the `employment-form` binary.

use std::fs;
use std::path::Path;

use app::AppContext;
use auth::{
    FileSessionStore, IdentityProvider, PasswordFlowConfig, PasswordFlowProvider, SessionStore,
    StaticIdentityProvider,
};
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use employment_form::config::{open_store, AuthCfg, FormCfg};
use employment_form::{
    employment_application, FormEvent, FormLoop, FormSchema, FormState, HttpTransport, Phase,
    TaskExecutor, TracingRenderer,
};
use settings::SettingsStore;
use tokio::sync::mpsc;
use tracing::info;

use crate::cli::{Cli, Cmd, ConfigAction};

pub async fn dispatch(cli: Cli, ctx: &AppContext) -> Result<()> {
    let Cli {
        endpoint,
        home_country,
        cmd,
    } = cli;
    let store = open_store(ctx.path_context().settings_file())?;
    let form_cfg = store.get::<FormCfg>()?;
    let home_country = home_country.unwrap_or_else(|| form_cfg.home_country.clone());

    match cmd {
        Cmd::Schema => {
            print_schema(&employment_application(&home_country));
            Ok(())
        }
        Cmd::Run {
            script,
            email,
            user,
            password,
        } => {
            let endpoint = endpoint.unwrap_or_else(|| form_cfg.endpoint_url.clone());
            if endpoint.trim().is_empty() {
                bail!("no workflow endpoint configured; pass --endpoint or run `config set-endpoint <url>`");
            }
            let run = ScriptRun {
                events: read_script(&script)?,
                state: FormState::new(employment_application(&home_country)),
                transport: HttpTransport::new(endpoint)?,
                session: FileSessionStore::new(
                    ctx.path_context().session_file(),
                    form_cfg.session_key.clone(),
                ),
                confirmation_page: form_cfg.confirmation_page.clone(),
            };

            match (email, user, password) {
                (Some(email), _, _) => run.drive(StaticIdentityProvider::signed_in(email)).await,
                (None, Some(identifier), Some(password)) => {
                    let auth_cfg = store.get::<AuthCfg>()?;
                    let provider = PasswordFlowProvider::new(PasswordFlowConfig {
                        base_url: auth_cfg.base_url.clone(),
                        identifier,
                        password,
                        accept_invalid_certs: auth_cfg.accept_invalid_certs,
                    })?;
                    run.drive(provider).await
                }
                _ => {
                    run.drive(StaticIdentityProvider::failing("no credentials supplied"))
                        .await
                }
            }
        }
        Cmd::SignOut => {
            FileSessionStore::new(ctx.path_context().session_file(), form_cfg.session_key.clone())
                .clear()?;
            println!("Signed out.");
            Ok(())
        }
        Cmd::Config { action } => configure(&store, action),
    }
}

fn read_script(path: &Path) -> Result<Vec<FormEvent>> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read event script {}", path.display()))?;
    let events: Vec<FormEvent> = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("invalid event script {}", path.display()))?;
    info!(events = events.len(), script = %path.display(), "event script loaded");
    Ok(events)
}

struct ScriptRun {
    events: Vec<FormEvent>,
    state: FormState,
    transport: HttpTransport,
    session: FileSessionStore,
    confirmation_page: String,
}

impl ScriptRun {
    async fn drive<I: IdentityProvider>(self, provider: I) -> Result<()> {
        let mut form = FormLoop::new(
            self.state,
            TaskExecutor::new(provider, self.transport),
            self.session,
            TracingRenderer::default(),
        );
        form.restore_session().await?;

        let (tx, rx) = mpsc::unbounded_channel();
        for event in self.events {
            tx.send(event)?;
        }
        drop(tx);

        let form = form.run(rx).await;
        let state = form.state();
        match state.phase() {
            Phase::Confirmed => println!("Application submitted -> {}", self.confirmation_page),
            phase => println!(
                "Application not submitted (phase: {phase}, section {}/{}, {} UI effects)",
                state.current_index() + 1,
                state.section_count(),
                form.renderer().applied()
            ),
        }
        Ok(())
    }
}

fn print_schema(schema: &FormSchema) {
    println!("{}", schema.title);
    for (index, section) in schema.sections.iter().enumerate() {
        println!("\n{}. {}", index + 1, section.title);
        for field in &section.fields {
            let state = match (field.required, field.hidden) {
                (_, true) => "conditional",
                (true, false) => "required",
                (false, false) => "",
            };
            println!("   {:<26} {:<9} {}", field.name, field.kind.label(), state);
        }
        for group in &section.groups {
            let names: Vec<&str> = group.fields.iter().map(|f| f.name).collect();
            println!("   [{}] {}", group.id, names.join(", "));
        }
    }
    println!("\nRules:");
    for rule in &schema.rules {
        let mut dependents: Vec<&str> = rule.dependents().collect();
        dependents.sort_unstable();
        dependents.dedup();
        println!("   {} -> {}", rule.controller(), dependents.join(", "));
    }
}

fn configure(store: &SettingsStore, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("# {}", store.file_path().display());
            println!("{:#?}", store.get::<FormCfg>()?);
            println!("{:#?}", store.get::<AuthCfg>()?);
        }
        ConfigAction::SetEndpoint { url } => {
            store.update::<FormCfg, _>(|cfg| cfg.endpoint_url = url)?;
            println!("Endpoint stored.");
        }
        ConfigAction::SetHomeCountry { country } => {
            store.update::<FormCfg, _>(|cfg| cfg.home_country = country)?;
            println!("Home country stored.");
        }
        ConfigAction::SetAuthUrl { url } => {
            store.update::<AuthCfg, _>(|cfg| cfg.base_url = url)?;
            println!("Identity provider URL stored.");
        }
    }
    Ok(())
}
