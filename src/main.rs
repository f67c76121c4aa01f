use ark::cli::{
    chat::handle_chat, generate::handle_generate, handle_completions, handle_config_init,
    status::handle_status, Cli, Commands, ConfigCommands,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => ark::cli::serve::run_serve(args).await,
        Commands::Status(args) => handle_status(&args).await,
        Commands::Generate(args) => handle_generate(&args).await,
        Commands::Chat(args) => handle_chat(&args).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
