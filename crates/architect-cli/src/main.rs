use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use architect_core::config::PLACEHOLDER_ACCESS_KEY;
use architect_core::site::{self, GREETING};
use architect_core::{
    ChatApiClient, Config, DialogueController, DialogueSession, KnowledgeBase,
    SubmissionController, SubmissionState, Web3FormsClient,
};
use clap::{Parser, Subcommand};
use colored::*;

mod chat;
mod contact;
mod icons;
mod logging;

use contact::ContactRequest;
use icons::glyph;

#[derive(Parser)]
#[command(name = "architect")]
#[command(about = "ARCHITECT studio assistant: FAQ chat and project requests")]
struct Cli {
    /// Config file to use instead of the default one
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the studio assistant (interactive)
    Chat,
    /// Ask a single question
    Ask {
        /// Your question
        question: String,
    },
    /// Send a project request through the contact form
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// One of: house, apartment, office, other
        #[arg(long)]
        project_type: Option<String>,
        #[arg(long)]
        message: String,
        /// Additional form field as key=value (repeatable)
        #[arg(long = "field", value_parser = contact::parse_field)]
        fields: Vec<(String, String)>,
    },
    /// List the frequently asked questions
    Faq,
    /// Show studio contact details
    Contact,
    /// Print the office map view as JSON
    Map,
}

/// Endpoint settings after env overrides are applied.
struct Settings {
    chat_url: String,
    intake_url: String,
    access_key: String,
    config: Config,
}

impl Settings {
    fn load(path: Option<&PathBuf>) -> Result<Self> {
        let config = match path {
            Some(path) => Config::load_from(path)?,
            None => Config::load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "using default config");
                Config::new()
            }),
        };

        // Environment wins over the config file
        let chat_url = std::env::var("ARCHITECT_CHAT_URL")
            .unwrap_or_else(|_| config.chat_url().to_string());
        let intake_url = std::env::var("ARCHITECT_INTAKE_URL")
            .unwrap_or_else(|_| config.intake_url().to_string());
        let access_key = std::env::var("ARCHITECT_ACCESS_KEY")
            .unwrap_or_else(|_| config.access_key().to_string());

        Ok(Self {
            chat_url,
            intake_url,
            access_key,
            config,
        })
    }

    fn dialogue(&self, session: DialogueSession) -> Result<DialogueController> {
        let completion = Arc::new(ChatApiClient::new(&self.chat_url));
        let knowledge = Arc::new(KnowledgeBase::studio_faq()?);
        Ok(DialogueController::new(knowledge, completion)
            .with_session(session)
            .with_reply_delay(self.config.reply_delay()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::configure_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_ref())?;

    match cli.command {
        Commands::Chat => {
            let chat = settings.dialogue(DialogueSession::with_greeting(GREETING))?;
            chat::run_repl(chat).await?;
        }
        Commands::Ask { question } => {
            let mut chat = settings.dialogue(DialogueSession::new())?;
            let reply = chat::ask(&mut chat, &question).await?;
            println!("{}", reply);
        }
        Commands::Submit {
            name,
            email,
            project_type,
            message,
            fields,
        } => {
            let request = ContactRequest {
                name,
                email,
                project_type,
                message,
                extra: fields,
            };
            if !submit_request(&settings, &request).await? {
                std::process::exit(1);
            }
        }
        Commands::Faq => list_faq()?,
        Commands::Contact => show_contact(),
        Commands::Map => println!("{}", serde_json::to_string_pretty(&site::studio_map())?),
    }

    Ok(())
}

async fn submit_request(settings: &Settings, request: &ContactRequest) -> Result<bool> {
    let form = contact::build_form(request)?;

    if settings.access_key == PLACEHOLDER_ACCESS_KEY {
        tracing::warn!("no access key configured; set ARCHITECT_ACCESS_KEY or access_key in config");
    }

    let intake = Arc::new(Web3FormsClient::new(&settings.intake_url, &settings.access_key));
    let mut controller = SubmissionController::new(intake);
    *controller.form_mut() = form;

    controller.submit()?;
    println!("{} {}", glyph("send"), "Отправка...".dimmed());

    match controller.wait().await {
        SubmissionState::Succeeded => {
            println!("{} {}", glyph("check-circle").green(), "Заявка отправлена!".bold().green());
            println!("Спасибо за обращение. Мы свяжемся с вами в ближайшее время.");
            Ok(true)
        }
        SubmissionState::Failed(message) => {
            eprintln!("{} {}", glyph("x").red(), message.red());
            Ok(false)
        }
        SubmissionState::Idle | SubmissionState::Submitting => Ok(false),
    }
}

fn list_faq() -> Result<()> {
    let kb = KnowledgeBase::studio_faq()?;
    println!("\n{}", "Частые вопросы".bold().blue());
    println!("{}", "=".repeat(40).dimmed());

    for entry in kb.entries() {
        println!("\n{} {}", glyph("arrow-right"), entry.question.bold().yellow());
        println!("  {}", entry.answer);
    }
    Ok(())
}

fn show_contact() {
    println!("\n{}", "Контакты".bold().blue());
    println!("{}", "=".repeat(40).dimmed());
    println!("{} {}", glyph("map-pin"), site::ADDRESS);
    println!("{} {}", glyph("phone"), site::PHONE);
    println!("{} {}", glyph("mail"), site::EMAIL);
}
