use clap::ArgMatches;
use colored::Colorize;
use commands::command_argument_builder;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use sitecheck_core::report::{self, ReportFormat};
use sitecheck_core::{Severity, audit};
use sitecheck_crawler::Crawler;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use url::Url;

mod commands;

fn print_banner() {
    println!(
        "\nsitecheck v{} - single-site SEO audit\n",
        env!("CARGO_PKG_VERSION")
    );
}

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    if !quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        Some(("audit", primary_command)) => handle_audit(primary_command, quiet).await,
        None => {}
        _ => unreachable!("clap should ensure we don't get here"),
    }
}

async fn handle_audit(sub_matches: &ArgMatches, quiet: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let url = sub_matches.get_one::<Url>("URL").unwrap();
    let max_pages = *sub_matches.get_one::<usize>("max-pages").unwrap();
    // Mirror the crawler's clamp so the spinner count matches the pool
    let threads =
        (*sub_matches.get_one::<usize>("threads").unwrap()).clamp(1, Crawler::MAX_WORKERS);
    let rate = *sub_matches.get_one::<f64>("rate").unwrap();
    let user_agent = sub_matches.get_one::<String>("user-agent");
    let output_path = sub_matches.get_one::<std::path::PathBuf>("output");
    let format = sub_matches
        .get_one::<String>("format")
        .and_then(|f| ReportFormat::from_str(f))
        .unwrap_or(ReportFormat::Text);

    if !quiet {
        println!("Auditing {}", url.host_str().unwrap_or("unknown"));
        println!("Page budget: {}", max_pages);
        println!("Workers: {}\n", threads);
    }

    // One spinner per worker, updated from the crawl progress callback
    let m = Arc::new(MultiProgress::new());
    let worker_bars: Arc<Mutex<HashMap<usize, ProgressBar>>> = Arc::new(Mutex::new(HashMap::new()));
    for i in 0..threads {
        let pb = m.add(ProgressBar::new_spinner());
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} Worker {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("{}: idle", i));
        worker_bars.lock().await.insert(i, pb);
    }

    let worker_bars_clone = worker_bars.clone();
    let progress_callback = Arc::new(move |worker_id: usize, url: String| {
        let path = Url::parse(&url)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| url.clone());
        // try_lock so a busy bar map never blocks a worker
        if let Ok(bars) = worker_bars_clone.try_lock() {
            if let Some(pb) = bars.get(&worker_id) {
                pb.set_message(format!("{}: {}", worker_id, path));
            }
        }
    });

    let mut crawler = Crawler::new()
        .with_max_pages(max_pages)
        .with_workers(threads)
        .with_requests_per_second(rate)
        .with_progress_callback(progress_callback);
    if let Some(ua) = user_agent {
        crawler = crawler.with_user_agent(ua.clone());
    }

    let outcome = match crawler.crawl(url.as_str()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            for (_, pb) in worker_bars.lock().await.iter() {
                pb.finish_and_clear();
            }
            m.clear().unwrap();
            eprintln!("{} {}", "✗ Audit failed:".red(), e);
            std::process::exit(1);
        }
    };

    for (_, pb) in worker_bars.lock().await.iter() {
        pb.finish_and_clear();
    }
    m.clear().unwrap();

    let output = audit(&outcome);

    if !quiet {
        print_terminal_summary(&output);
    }

    let rendered = match format {
        ReportFormat::Text => report::generate_text_report(&output),
        ReportFormat::Json => match report::generate_json_report(&output) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("{} {}", "✗ Failed to render JSON report:".red(), e);
                std::process::exit(1);
            }
        },
    };

    match output_path {
        Some(path) => {
            if let Err(e) = report::save_report(&rendered, path) {
                eprintln!("{} {}", "✗ Failed to save report:".red(), e);
                std::process::exit(1);
            }
            if !quiet {
                println!("Report saved to {}", path.display());
            }
        }
        None => print!("{}", rendered),
    }
}

fn print_terminal_summary(output: &sitecheck_core::AuditOutput) {
    let result = &output.result;

    let score_line = format!("{}/100 (grade {})", result.health_score, result.grade);
    let score_colored = match result.health_score {
        90..=100 => score_line.green(),
        70..=89 => score_line.yellow(),
        _ => score_line.red(),
    };
    println!("\n{}", "✓ Audit complete!".green());
    println!("  Pages scanned: {}", result.pages_scanned);
    println!("  Health score:  {}", score_colored);

    for issue in &result.issues {
        let tag = match issue.severity {
            Severity::Critical => "[CRITICAL]".red().bold(),
            Severity::Warning => "[WARNING] ".yellow(),
            Severity::Info => "[INFO]    ".cyan(),
        };
        println!(
            "  {} {} ({} page{})",
            tag,
            issue.title,
            issue.affected_pages.len(),
            if issue.affected_pages.len() == 1 { "" } else { "s" }
        );
    }
    if !output.skipped_checks.is_empty() {
        println!(
            "  {} {}",
            "Skipped checks:".yellow(),
            output.skipped_checks.join(", ")
        );
    }
    println!();
}
