use anyhow::Result;

use dict_cli::config::Config;
use dict_cli::logging;
use dict_cli::tui_app;

fn main() -> Result<()> {
    let initial_term = std::env::args().nth(1);
    if matches!(initial_term.as_deref(), Some("--help" | "-h")) {
        print_help();
        return Ok(());
    }

    let config = Config::load()?;
    logging::init_logging()?;

    // A term on the command line plays the part of a shared link: the app
    // opens with that search already applied.
    tui_app::run_tui_app(&config, initial_term.as_deref())
}

fn print_help() {
    println!("dict-cli - terminal dictionary client");
    println!();
    println!("Usage: dict-cli [WORD]");
    println!();
    println!("  WORD          open with this word already searched");
    println!();
    println!("Environment:");
    println!("  DICT_API_URL  override the dictionary backend URL");
    println!("  RUST_LOG      log filter (logs go to ~/.dict-cli/dict-cli.log)");
    println!();
    println!("Config: ~/.dict-cli/config.toml");
}
