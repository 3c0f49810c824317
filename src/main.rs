use anyhow::bail;
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use content_studio::cli::{Args, Command};
use content_studio::config::Config;
use content_studio::provider::{self, GenerationClient};
use content_studio::session::Session;
use content_studio::{export, ux};

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("content_studio=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let mut cfg = Config::load(args.config.as_deref())?;
    args.apply_to(&mut cfg);
    let registry = cfg.registry()?;

    let Some(requests) = args.requests()? else {
        if let Command::Options { dimension } = &args.command {
            ux::show_options(&registry, dimension.as_deref())?;
        }
        return Ok(());
    };
    let batch = matches!(args.command, Command::Batch { .. });

    let mut session = Session::new(&registry, cfg.company_context()?, cfg.credentials(), cfg.limits());
    if let Some(key) = &args.api_key {
        session.override_api_key(key.clone());
    }

    if args.prompt_only {
        let mut invalid = 0usize;
        for req in &requests {
            match session.compose(req) {
                Ok(p) => ux::show_prompt(&p),
                Err(e) => {
                    ux::show_compose_error(&e);
                    invalid += 1;
                }
            }
        }
        if invalid > 0 && !batch {
            bail!("request is invalid");
        }
        return Ok(());
    }

    let client = GenerationClient::new(provider::make_provider(cfg.provider, &cfg)?);
    tracing::info!(
        provider = client.provider_name(),
        company = session.company().display_name(),
        requests = requests.len(),
        "session started"
    );

    let mut failed = 0usize;
    for req in &requests {
        let s = req.summary();
        let pb = ux::spinner(format!("Creating {} for {}...", s.kind.label(), s.platform));
        let outcome = session.submit(&client, req).await;
        pb.finish_and_clear();

        match outcome {
            Ok(entry) => {
                ux::show_entry(entry);
                if !entry.result.is_success() {
                    failed += 1;
                } else if args.save {
                    if let Some(path) = export::save_result(&cfg.out_dir, entry)? {
                        println!("saved: {}", path.display());
                    }
                }
            }
            Err(e) => {
                ux::show_compose_error(&e);
                failed += 1;
            }
        }
    }

    if batch {
        ux::show_history(session.history());
    }
    if args.export_history {
        let path = export::save_history(&cfg.out_dir, session.history(), Local::now())?;
        println!("history saved: {}", path.display());
    }

    if failed > 0 && !batch {
        bail!("generation did not succeed");
    }
    Ok(())
}
