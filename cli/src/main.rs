use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use recetario_core::{
    AuthContext, ClientConfig, FormConfig, HttpApi, Recipe, RecipeDraft, RecipeStore,
    RecipeWizard, TagCatalog, ValidationRules, ValidationState, WizardError, WizardStep,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "recetario")]
#[command(about = "Recipe draft tools", long_about = None)]
struct Cli {
    /// API base URL (overrides RECETARIO_API_URL)
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a draft JSON file
    Validate {
        /// Path to the draft
        draft: PathBuf,
        /// Only validate one wizard step (basic_info, ingredients, steps)
        #[arg(long)]
        step: Option<String>,
    },
    /// Walk a draft through the wizard and create the recipe
    Submit {
        /// Path to the draft
        draft: PathBuf,
        #[command(flatten)]
        auth: AuthArgs,
        /// Print the payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// List saved recipes
    List,
    /// Print one recipe as JSON
    Show {
        /// Recipe id
        id: String,
    },
    /// Delete a recipe
    Delete {
        /// Recipe id
        id: String,
        #[command(flatten)]
        auth: AuthArgs,
    },
    /// List the tag catalog
    Tags {
        /// Language for tag names (overrides RECETARIO_LANGUAGE)
        #[arg(long)]
        lang: Option<String>,
    },
}

#[derive(Args)]
struct AuthArgs {
    /// Id of the acting user
    #[arg(long, env = "RECETARIO_USER_ID")]
    user_id: Uuid,
    /// Bearer token for the API
    #[arg(long, env = "RECETARIO_TOKEN")]
    token: Option<String>,
}

impl AuthArgs {
    fn context(&self) -> AuthContext {
        let auth = AuthContext::new(self.user_id);
        match &self.token {
            Some(token) => auth.with_token(token),
            None => auth,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { draft, step } => {
            validate(&draft, step.as_deref())?;
        }
        Commands::Submit {
            draft,
            auth,
            dry_run,
        } => {
            submit(&draft, cli.server, &auth.context(), dry_run).await?;
        }
        Commands::List => {
            list(cli.server).await?;
        }
        Commands::Show { id } => {
            show(cli.server, &id).await?;
        }
        Commands::Delete { id, auth } => {
            delete(cli.server, &id, &auth.context()).await?;
        }
        Commands::Tags { lang } => {
            tags(cli.server, lang).await?;
        }
    }

    Ok(())
}

fn load_draft(path: &Path) -> Result<RecipeDraft> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn client_config(server: Option<String>) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(server) = server {
        config.api_url = server;
    }
    tracing::debug!(api_url = %config.api_url, timeout = ?config.timeout, "client config loaded");
    Ok(config)
}

fn client(server: Option<String>) -> Result<HttpApi> {
    let config = client_config(server)?;
    HttpApi::new(&config).with_context(|| format!("Invalid API URL {}", config.api_url))
}

fn print_errors(errors: &ValidationState) {
    for (field, error) in errors {
        eprintln!("  {}: {} [{}]", field, error, error.message_key(field.as_str()));
    }
}

fn validate(path: &Path, step: Option<&str>) -> Result<()> {
    let draft = load_draft(path)?;
    let rules = ValidationRules::standard(&FormConfig::from_env()?);

    let errors = match step {
        Some(name) => {
            let Some(step) = WizardStep::from_str(name) else {
                bail!("Unknown step '{}'", name);
            };
            recetario_core::validate_step(step, &draft, &rules)
        }
        None => recetario_core::validate_draft(&draft, &rules),
    };

    if errors.is_empty() {
        println!("{}: valid", path.display());
        return Ok(());
    }

    eprintln!("{}: {} invalid field(s)", path.display(), errors.len());
    print_errors(&errors);
    bail!("Validation failed")
}

async fn submit(path: &Path, server: Option<String>, auth: &AuthContext, dry_run: bool) -> Result<()> {
    let mut wizard = RecipeWizard::from_draft(FormConfig::from_env()?, load_draft(path)?);

    while !wizard.step().is_last() {
        if let Err(e) = wizard.next() {
            eprintln!("{}", e);
            print_errors(wizard.errors());
            return Err(e.into());
        }
    }

    if dry_run {
        let pending = wizard
            .begin_submit(Some(auth), chrono::Utc::now())
            .inspect_err(report)?;
        println!("{}", serde_json::to_string_pretty(&pending.recipe)?);
        return Ok(());
    }

    let api = client(server)?;
    let recipe = wizard.submit(&api, Some(auth)).await.inspect_err(report)?;
    tracing::info!(id = %recipe.id, "recipe submitted");
    println!("Created recipe '{}' ({})", recipe.name, recipe.id);

    Ok(())
}

fn report(error: &WizardError) {
    if let WizardError::DraftInvalid(errors) = error {
        eprintln!("{}", error);
        print_errors(errors);
    }
}

fn summary(recipe: &Recipe) -> String {
    let mut line = format!("{}\t{}", recipe.id, recipe.name);
    if let Some(minutes) = recipe.prep_time {
        line.push_str(&format!("\t{} min", minutes));
    }
    line
}

async fn list(server: Option<String>) -> Result<()> {
    let recipes = client(server)?.list_recipes().await?;
    tracing::info!(count = recipes.len(), "recipes listed");
    for recipe in &recipes {
        println!("{}", summary(recipe));
    }
    Ok(())
}

async fn show(server: Option<String>, id: &str) -> Result<()> {
    let recipe = client(server)?.get_recipe(id).await?;
    println!("{}", serde_json::to_string_pretty(&recipe)?);
    Ok(())
}

async fn delete(server: Option<String>, id: &str, auth: &AuthContext) -> Result<()> {
    client(server)?.delete_recipe(id, auth).await?;
    tracing::info!(id, user = %auth.user_id, "recipe deleted");
    println!("Deleted recipe {}", id);
    Ok(())
}

async fn tags(server: Option<String>, lang: Option<String>) -> Result<()> {
    let config = client_config(server)?;
    let api = HttpApi::new(&config)?;
    let language = lang.or(config.language);
    tracing::debug!(language = ?language, "listing tags");

    for tag in api.list_tags(language.as_deref()).await? {
        match tag.color {
            Some(color) => println!("{}\t{}\t{}", tag.id, tag.name, color),
            None => println!("{}\t{}", tag.id, tag.name),
        }
    }

    Ok(())
}
