use crate::commands::{
    run_broadcast, run_categories, run_forms, run_inject, run_publish, run_rank, BroadcastArgs,
    InjectArgs, PublishArgs, RankArgs,
};
use clap::{Parser, Subcommand};
use wealth_automation::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "wealth-publisher",
    about = "Match affiliate offers to content and publish it to WordPress or ConvertKit",
    version
)]
struct Cli {
    /// Seed the random source so template and fallback picks repeat
    #[arg(long, global = true)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inspect the offer catalog
    Offers {
        #[command(subcommand)]
        command: OffersCommand,
    },
    /// Inject the best-matching CTA into a content file and print the result
    Inject(InjectArgs),
    /// Inject a CTA and publish the article to WordPress
    Publish(PublishArgs),
    /// Inject a CTA and send the content as a ConvertKit broadcast
    Broadcast(BroadcastArgs),
    /// List the ConvertKit forms on the account
    Forms,
}

#[derive(Subcommand, Debug)]
enum OffersCommand {
    /// Print every category in the catalog
    Categories,
    /// Score every offer against a piece of content
    Rank(RankArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    dispatch(cli)
}

fn dispatch(cli: Cli) -> Result<(), AppError> {
    let seed = cli.seed;
    match cli.command {
        Command::Offers {
            command: OffersCommand::Categories,
        } => run_categories(),
        Command::Offers {
            command: OffersCommand::Rank(args),
        } => run_rank(args),
        Command::Inject(args) => run_inject(args, seed),
        Command::Publish(args) => run_publish(args, seed),
        Command::Broadcast(args) => run_broadcast(args, seed),
        Command::Forms => run_forms(),
    }
}
