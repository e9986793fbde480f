use ai_scientist_launcher::host::HostDefaults;
use ai_scientist_launcher::text_summary::build_text_summary;
use ai_scientist_launcher::wizard::{self, Outcome, TerminalPrompter, WizardError};
use ai_scientist_launcher::{logging, storage};

fn main() {
    logging::init(false);

    let path = storage::default_config_path();
    let defaults = HostDefaults::probe();
    let mut prompter = TerminalPrompter;

    match wizard::run(&mut prompter, &path, &defaults) {
        Ok(Outcome::Reused(_)) => {
            println!("\nUsing existing configuration at {}", path.display());
        }
        Ok(Outcome::Saved(config)) => {
            println!();
            for line in build_text_summary(&config).lines {
                println!("  {line}");
            }
            println!("\nConfiguration saved to {}", path.display());
        }
        Err(WizardError::Cancelled) => {
            eprintln!("\nConfiguration cancelled.");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("\nError: {e:#}");
            std::process::exit(1);
        }
    }
}
