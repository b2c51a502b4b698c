use crate::infra::{bootstrap, offer_library, parse_position, read_content};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use wealth_automation::error::AppError;
use wealth_automation::offers::{rank, Position, ScoredOffer};
use wealth_automation::publishing::{
    ContentDraft, ConvertKitClient, Form, PublishingWorkflow, WordPressClient,
};

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Content title
    #[arg(long)]
    pub(crate) title: String,
    /// HTML body to score against
    #[arg(long)]
    pub(crate) content_file: PathBuf,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct InjectArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long)]
    pub(crate) content_file: PathBuf,
    /// start, middle or end
    #[arg(long, default_value = "end", value_parser = parse_position)]
    pub(crate) position: Position,
    /// Content type written to the usage log
    #[arg(long, default_value = "blog")]
    pub(crate) content_type: String,
    /// Append a row to the usage log when a CTA was injected
    #[arg(long)]
    pub(crate) record: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PublishArgs {
    #[arg(long)]
    pub(crate) title: String,
    #[arg(long)]
    pub(crate) content_file: PathBuf,
    #[arg(long, default_value = "end", value_parser = parse_position)]
    pub(crate) position: Position,
}

#[derive(Args, Debug)]
pub(crate) struct BroadcastArgs {
    #[arg(long)]
    pub(crate) subject: String,
    #[arg(long)]
    pub(crate) content_file: PathBuf,
    #[arg(long, default_value = "start", value_parser = parse_position)]
    pub(crate) position: Position,
}

#[derive(Debug, Serialize)]
struct RankRow<'a> {
    id: Option<&'a str>,
    name: &'a str,
    score: i64,
}

impl<'a> From<&ScoredOffer<'a>> for RankRow<'a> {
    fn from(scored: &ScoredOffer<'a>) -> Self {
        Self {
            id: scored.offer.id.as_deref(),
            name: scored.offer.display_name(),
            score: scored.score,
        }
    }
}

pub(crate) fn run_categories() -> Result<(), AppError> {
    let config = bootstrap()?;
    let library = offer_library(&config, None);
    let categories = library.categories();
    if categories.is_empty() {
        println!("No categories found in {}", config.offers.catalog_path.display());
    }
    for category in categories {
        println!("{category}");
    }
    Ok(())
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let config = bootstrap()?;
    let library = offer_library(&config, None);
    let body = read_content(&args.content_file)?;

    let ranked = rank(library.catalog().offers(), &body, &args.title);
    let rows: Vec<RankRow<'_>> = ranked.iter().map(RankRow::from).collect();
    if args.json {
        let rendered = serde_json::to_string_pretty(&rows).map_err(std::io::Error::other)?;
        println!("{rendered}");
    } else {
        print!("{}", render_rank_table(&rows));
    }
    Ok(())
}

pub(crate) fn run_inject(args: InjectArgs, seed: Option<u64>) -> Result<(), AppError> {
    let config = bootstrap()?;
    let mut library = offer_library(&config, seed);
    let body = read_content(&args.content_file)?;

    let (offer, content) = library.enrich(&body, &args.title, args.position);
    match &offer {
        Some(offer) if content != body => {
            eprintln!(
                "Injected CTA for {} ({}) at {}",
                offer.display_name(),
                offer.id.as_deref().unwrap_or("N/A"),
                args.position
            );
            if args.record {
                library.record_usage(offer, &args.title, &args.content_type);
            }
        }
        Some(offer) => eprintln!("{} has no CTA to inject", offer.display_name()),
        None => eprintln!("No offers available; content unchanged"),
    }
    println!("{content}");
    Ok(())
}

pub(crate) fn run_publish(args: PublishArgs, seed: Option<u64>) -> Result<(), AppError> {
    let mut workflow = workflow(seed)?;
    let body = read_content(&args.content_file)?;

    let report = workflow.publish_article(ContentDraft {
        title: args.title,
        body,
        position: args.position,
    });

    println!(
        "Offer: {}",
        report.offer_id.as_deref().unwrap_or("none")
    );
    match (&report.outcome.post_id, &report.outcome.fallback_path) {
        (Some(post_id), _) => println!(
            "Published post {post_id}: {}",
            report.outcome.url.as_deref().unwrap_or("")
        ),
        (None, Some(path)) => println!("Publishing failed; draft saved to {}", path.display()),
        (None, None) => println!("Publishing failed and no draft could be saved"),
    }
    Ok(())
}

pub(crate) fn run_broadcast(args: BroadcastArgs, seed: Option<u64>) -> Result<(), AppError> {
    let mut workflow = workflow(seed)?;
    let body = read_content(&args.content_file)?;

    let report = workflow.send_newsletter(ContentDraft {
        title: args.subject,
        body,
        position: args.position,
    });

    println!(
        "Offer: {}",
        report.offer_id.as_deref().unwrap_or("none")
    );
    match (&report.outcome.broadcast_id, &report.outcome.fallback_path) {
        (Some(id), _) => println!("Sent broadcast {id}"),
        (None, Some(path)) => println!("Broadcast failed; content saved to {}", path.display()),
        (None, None) => println!("Broadcast failed and no copy could be saved"),
    }
    Ok(())
}

pub(crate) fn run_forms() -> Result<(), AppError> {
    let config = bootstrap()?;
    let client = ConvertKitClient::new(config.convertkit, config.http_timeout)?;
    print!("{}", render_forms(&client.list_forms()));
    Ok(())
}

fn workflow(seed: Option<u64>) -> Result<PublishingWorkflow, AppError> {
    let config = bootstrap()?;
    let library = offer_library(&config, seed);
    let cms = WordPressClient::new(config.wordpress, config.http_timeout)?;
    let email = ConvertKitClient::new(config.convertkit, config.http_timeout)?;
    Ok(PublishingWorkflow::new(
        library,
        Box::new(cms),
        Box::new(email),
    ))
}

fn render_rank_table(rows: &[RankRow<'_>]) -> String {
    let mut table = String::new();
    for row in rows {
        table.push_str(&format!(
            "{:>5}  {:<20}  {}\n",
            row.score,
            row.id.unwrap_or("N/A"),
            row.name
        ));
    }
    table
}

fn render_forms(forms: &[Form]) -> String {
    if forms.is_empty() {
        return "No forms found\n".to_string();
    }
    forms
        .iter()
        .map(|form| {
            format!(
                "{}\t{}\n",
                form.id,
                form.name.as_deref().unwrap_or("(untitled)")
            )
        })
        .collect()
}
