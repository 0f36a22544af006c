use clap::Parser;
use formscan::cli::commands::{cmd_generate, cmd_reconcile, cmd_scan};
use formscan::cli::config::{build_crawl_config, load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    // Resolve API settings: CLI > config file > defaults
    let publish_host = cli
        .publish_host
        .as_deref()
        .unwrap_or(&config.scan.publish_host);
    let inventory_endpoint = cli
        .inventory_endpoint
        .as_deref()
        .unwrap_or(&config.api.inventory_endpoint);
    let api_token = cli.api_token.as_deref().or(config.api.token.as_deref());

    match cli.command {
        Commands::Scan {
            site,
            max_pages,
            homepage,
            json,
            trace,
        } => {
            let homepage = homepage.or(config.scan.homepage_url.clone());
            let crawl = build_crawl_config(max_pages, publish_host, homepage.as_deref());
            cmd_scan(
                &site,
                &crawl,
                inventory_endpoint,
                api_token,
                json,
                trace.as_deref(),
                cli.verbose,
            )?;
        }
        Commands::Reconcile {
            site,
            fields,
            form,
            cross_form,
            max_pages,
            homepage,
            trace,
        } => {
            let homepage = homepage.or(config.scan.homepage_url.clone());
            let crawl = build_crawl_config(max_pages, publish_host, homepage.as_deref());
            let all_resolved = cmd_reconcile(
                &site,
                &fields,
                form.as_deref(),
                cross_form,
                &crawl,
                inventory_endpoint,
                api_token,
                trace.as_deref(),
                cli.verbose,
            )?;
            if !all_resolved {
                std::process::exit(1);
            }
        }
        Commands::Generate {
            rules,
            site,
            output,
        } => {
            cmd_generate(&rules, &site, output.as_deref(), cli.verbose)?;
        }
    }

    Ok(())
}
