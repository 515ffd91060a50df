use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use follow_overlap::config::Cli;
use follow_overlap::source::resolve_handles;
use follow_overlap::{
    Analysis, CsvFollowSource, Error, FollowSource, TwitterClient, account, render,
    report,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut out = io::stdout().lock();

    // 1. Connect
    let source: Box<dyn FollowSource> = match (&cli.follows_csv, &cli.bearer_token) {
        (Some(path), _) => {
            let source = CsvFollowSource::from_path(path)
                .with_context(|| format!("loading follow lists from {}", path.display()))?;
            writeln!(out, "Loaded follow lists from {}.", path.display())?;
            Box::new(source)
        }
        (None, Some(token)) => {
            let client = TwitterClient::with_base_url(&cli.api_base, token, cli.retry_policy())?;
            writeln!(out, "Established Twitter connection.")?;
            Box::new(client)
        }
        (None, None) => return Err(Error::MissingCredentials.into()),
    };

    // 2. Collect accounts and their follow lists
    let handles = account::read_handles(&cli.input)?;
    writeln!(out, "Read screen names: {:?}", handles)?;

    let analysis = Analysis::collect(source.as_ref(), &handles, cli.reference_pair())
        .context("analysing follow lists")?;
    writeln!(
        out,
        "found {} users with screen_names {:?}",
        analysis.accounts.len(),
        analysis.accounts.iter().map(|a| &a.handle).collect::<Vec<_>>()
    )?;

    // 3. Report
    report::print_friend_counts(&mut out, &analysis.accounts)?;
    report::print_most_common(&mut out, &analysis.counts.most_common(cli.top))?;
    report::print_overlaps(&mut out, &analysis.overlaps)?;

    let (handle_a, handle_b) = cli.reference_pair();
    let names = resolve_handles(source.as_ref(), analysis.common.ids())
        .context("resolving shared friends")?;
    report::print_common_follows(&mut out, handle_a, handle_b, &analysis.common, &names)?;

    if let Some(path) = &cli.overlap_csv {
        report::write_overlap_csv(path, &analysis.overlaps)?;
        info!("overlap table written to {}", path.display());
    }

    // 4. Draw
    report::print_graph_summary(&mut out, &analysis.graph)?;
    render::save_graph_to_dot(&analysis.graph, &cli.dot)?;
    render::render_png(&cli.layout, &cli.dot, &cli.output)?;
    writeln!(out, "network drawn to {}", cli.output.display())?;

    if cli.open {
        render::open_image(&cli.output)?;
    }

    Ok(())
}
