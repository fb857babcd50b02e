#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use huntboard_core::config::load_config;
use huntboard_store::{Scope, Store, open_scoped};
use output::OutputMode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "hb: local-first job application tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Act as this signed-in identity instead of the guest scope.
    #[arg(long, global = true)]
    account: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }

    fn scope(&self) -> Scope {
        match &self.account {
            Some(identity) => Scope::Account(identity.clone()),
            None => Scope::Guest,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Maintenance",
        about = "Create the local data directory and database",
        after_help = "EXAMPLES:\n    # Set up the guest database\n    hb init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Board",
        about = "Track a new application",
        after_help = "EXAMPLES:\n    # Save a posting for later\n    hb add \"Stripe\" \"Backend Engineer\" --url https://stripe.com/jobs/1\n\n    # Already applied elsewhere\n    hb add \"Figma\" \"PM\" --status applied --platform referral"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Board",
        about = "List tracked applications",
        after_help = "EXAMPLES:\n    # The active board\n    hb list\n\n    # One pipeline column\n    hb list --status applied\n\n    # Machine-readable\n    hb list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(next_help_heading = "Board", about = "Show one application in full")]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Board",
        about = "Move an application to another status",
        after_help = "EXAMPLES:\n    # First application marks the applied date\n    hb move 3 applied\n\n    # Later stages\n    hb move 3 interview1"
    )]
    Move(cmd::advance::MoveArgs),

    #[command(
        next_help_heading = "Records",
        about = "Append a timeline event",
        after_help = "EXAMPLES:\n    # A scheduled phone screen\n    hb log 3 phone-screen \"Intro call\" --date 2025-06-10\n\n    # A follow-up nudge (touches the application)\n    hb log 3 follow-up \"Checked in with recruiter\""
    )]
    Log(cmd::log::LogArgs),

    #[command(next_help_heading = "Records", about = "Attach a contact")]
    Contact(cmd::contact::ContactArgs),

    #[command(next_help_heading = "Records", about = "Attach a dated reminder")]
    Remind(cmd::remind::RemindArgs),

    #[command(next_help_heading = "Board", about = "Edit application fields")]
    Edit(cmd::edit::EditArgs),

    #[command(next_help_heading = "Board", about = "Delete an application and its records")]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Insight",
        about = "Suggested next actions",
        after_help = "EXAMPLES:\n    # What to do today\n    hb next\n\n    # Feed an agent\n    hb next --json"
    )]
    Next(cmd::next::NextArgs),

    #[command(next_help_heading = "Insight", about = "Funnel analytics")]
    Stats(cmd::stats::StatsArgs),

    #[command(next_help_heading = "Insight", about = "XP, level, streak, and badges")]
    Progress(cmd::progress::ProgressArgs),

    #[command(next_help_heading = "Maintenance", about = "Show or change settings")]
    Settings(cmd::settings::SettingsArgs),

    #[command(next_help_heading = "Interoperability", about = "Export the board as CSV")]
    Export(cmd::export::ExportArgs),

    #[command(next_help_heading = "Interoperability", about = "Import applications from CSV")]
    Import(cmd::import::ImportArgs),

    #[command(
        next_help_heading = "Maintenance",
        about = "Move guest data into a signed-in account",
        after_help = "EXAMPLES:\n    # Runs at most once per identity per device\n    hb migrate --identity u_123"
    )]
    Migrate(cmd::migrate::MigrateArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config()?;
    let output = cli.output_mode();
    let scope = cli.scope();

    if cli.verbose {
        info!(%scope, "scope resolved");
    }

    // Init and migration manage backends themselves; everything else goes
    // through the scoped store.
    if let Commands::Init(args) = &cli.command {
        return cmd::init::run_init(args, output, &config);
    }
    if let Commands::Migrate(args) = &cli.command {
        return cmd::migrate::run_migrate(args, output, &config);
    }

    let mut store = match open_scoped(&config, &scope) {
        Ok(store) => store,
        Err(err) => {
            cmd::report_store_error(output, &err)?;
            return Err(err.into());
        }
    };
    let store: &mut dyn Store = &mut store;

    match &cli.command {
        Commands::Add(args) => cmd::add::run_add(args, output, store),
        Commands::List(args) => cmd::list::run_list(args, output, store),
        Commands::Show(args) => cmd::show::run_show(args, output, store),
        Commands::Move(args) => cmd::advance::run_move(args, output, store),
        Commands::Log(args) => cmd::log::run_log(args, output, store),
        Commands::Contact(args) => cmd::contact::run_contact(args, output, store),
        Commands::Remind(args) => cmd::remind::run_remind(args, output, store),
        Commands::Edit(args) => cmd::edit::run_edit(args, output, store),
        Commands::Delete(args) => cmd::delete::run_delete(args, output, store),
        Commands::Next(args) => cmd::next::run_next(args, output, store),
        Commands::Stats(args) => cmd::stats::run_stats(args, output, store),
        Commands::Progress(args) => cmd::progress::run_progress(args, output, store),
        Commands::Settings(args) => cmd::settings::run_settings(args, output, store),
        Commands::Export(args) => cmd::export::run_export(args, output, store),
        Commands::Import(args) => cmd::import::run_import(args, output, store),
        Commands::Init(_) | Commands::Migrate(_) => unreachable!("handled above"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["hb", "--json", "list"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn json_flag_after_subcommand() {
        let cli = Cli::parse_from(["hb", "list", "--json"]);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn default_scope_is_guest() {
        let cli = Cli::parse_from(["hb", "list"]);
        assert_eq!(cli.scope(), Scope::Guest);
    }

    #[test]
    fn account_flag_switches_scope() {
        let cli = Cli::parse_from(["hb", "--account", "u_123", "list"]);
        assert_eq!(cli.scope(), Scope::Account("u_123".to_string()));
    }

    #[test]
    fn move_subcommand_parses() {
        let cli = Cli::parse_from(["hb", "move", "3", "applied"]);
        assert!(matches!(cli.command, Commands::Move(_)));
    }

    #[test]
    fn all_subcommands_parse() {
        let subcommands = [
            vec!["hb", "init"],
            vec!["hb", "add", "Stripe", "SWE"],
            vec!["hb", "list"],
            vec!["hb", "show", "1"],
            vec!["hb", "move", "1", "applied"],
            vec!["hb", "log", "1", "note", "Referral intro"],
            vec!["hb", "contact", "1", "Ana"],
            vec!["hb", "remind", "1", "Nudge recruiter", "--due", "2025-06-10"],
            vec!["hb", "edit", "1", "--priority", "high"],
            vec!["hb", "delete", "1"],
            vec!["hb", "next"],
            vec!["hb", "stats"],
            vec!["hb", "progress"],
            vec!["hb", "settings"],
            vec!["hb", "export"],
            vec!["hb", "import", "board.csv"],
            vec!["hb", "migrate", "--identity", "u_1"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(result.is_ok(), "failed to parse {args:?}: {:?}", result.err());
        }
    }
}
