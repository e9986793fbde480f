use ai_scientist_launcher::{cli::Cli, logging, orchestrator};
use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Cli::parse();
    logging::init(args.debug);

    println!("\nAI Scientist Launcher");
    println!("====================\n");

    if let Err(e) = orchestrator::run(&args).await {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
