use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sentimen::{cli, config, events, web};

#[derive(Debug, Parser)]
#[command(name = "sentimen")]
#[command(about = "Sentiment analysis client: classify text, files and YouTube comments")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Log in and keep the session token in the data directory
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Classify one piece of text
    Classify {
        /// The text to classify (at most 500 characters)
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
    },
    /// Show analysis history and statistics
    History,
    /// Correct the sentiment of a stored analysis
    Feedback {
        /// Analysis id as shown by `history`
        id: i64,
        /// Positif, Negatif or Netral
        correction: String,
    },
    /// Classify every row of a CSV or Excel file
    Batch {
        file: PathBuf,
        /// Also write the results as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Classify the comments of a YouTube video
    Scrape {
        url: String,
        /// Save the analysis under this label (requires login)
        #[arg(long)]
        save: Option<String>,
    },
    /// Compare the comment sentiment of two videos
    Battle { url_a: String, url_b: String },
    /// Show dashboard statistics (requires login)
    Dashboard,
    /// Show recent actions from the activity log
    Activity {
        /// Number of entries to show
        #[arg(long, default_value = "20")]
        limit: usize,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Serve the web page
    Serve {
        /// Override the configured listen address
        #[arg(long)]
        listen: Option<String>,
        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write an annotated default config file
    Init {
        #[arg(long)]
        force: bool,
    },
    /// Set one value, e.g. `backend.base_url http://localhost:5000`
    Set { key: String, value: String },
}

fn main() -> Result<()> {
    let app = App::parse();
    let cfg = config::load();
    events::init_logging(&cfg.logging.level);

    match app.command {
        Commands::Login { username, password } => cli::run_login(&cfg, &username, password),
        Commands::Logout => cli::run_logout(&cfg),
        Commands::Whoami => cli::run_whoami(&cfg),
        Commands::Classify { text } => cli::run_classify(&cfg, &text.join(" ")),
        Commands::History => cli::run_history(&cfg),
        Commands::Feedback { id, correction } => cli::run_feedback(&cfg, id, &correction),
        Commands::Batch { file, csv } => cli::run_batch(&cfg, &file, csv.as_deref()),
        Commands::Scrape { url, save } => cli::run_scrape(&cfg, &url, save.as_deref()),
        Commands::Battle { url_a, url_b } => cli::run_battle(&cfg, &url_a, &url_b),
        Commands::Dashboard => cli::run_dashboard(&cfg),
        Commands::Activity { limit, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_activity(&cfg, limit, fmt)
        }
        Commands::Serve { listen, no_open } => {
            let addr = listen.unwrap_or_else(|| cfg.ui.listen.clone());
            let controller = cli::open_controller(&cfg)?;
            web::serve(controller, &addr, cfg.ui.open_browser && !no_open)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
        },
    }
}
