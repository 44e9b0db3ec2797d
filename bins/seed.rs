use std::{sync::Arc, time::{Duration, Instant}};

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{info, warn};

use service::signature::{
    domain::NewSignature,
    repository::{SeaOrmSignatureRepository, SignatureRepository},
};

const FIRST_NAMES: &[&str] = &[
    "Anna", "Guðrún", "Sigríður", "Kristín", "Margrét", "Helga", "Sara", "Katrín",
    "Jón", "Sigurður", "Guðmundur", "Gunnar", "Ólafur", "Einar", "Kristján", "Magnús",
];

const LAST_NAMES: &[&str] = &[
    "Jónsdóttir", "Sigurðardóttir", "Guðmundsdóttir", "Einarsdóttir",
    "Jónsson", "Sigurðsson", "Guðmundsson", "Einarsson", "Magnússon", "Ólafsson",
];

const COMMENTS: &[&str] = &[
    "Styð þetta heilshugar.",
    "Loksins!",
    "Þetta skiptir máli fyrir alla.",
    "Vonandi verður hlustað.",
    "Áfram með þetta.",
    "",
];

#[derive(Parser)]
#[command(name = "seed")]
#[command(about = "Fill the signature store with synthetic signatures")]
struct Args {
    #[arg(long, default_value = "510")]
    count: usize,

    /// Fixed RNG seed for reproducible data.
    #[arg(long)]
    seed: Option<u64>,

    /// Overrides the configured database url.
    #[arg(long)]
    database_url: Option<String>,
}

fn synthetic(rng: &mut StdRng) -> NewSignature {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Anna");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Jónsdóttir");
    NewSignature {
        name: format!("{first} {last}"),
        national_id: format!("{:010}", rng.gen_range(0..10_000_000_000u64)),
        comment: COMMENTS.choose(rng).copied().unwrap_or_default().to_string(),
        anonymous: rng.gen_bool(0.1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    let args = Args::parse();

    let mut cfg = configs::AppConfig::load_or_env().context("failed to load configuration")?;
    if let Some(url) = args.database_url {
        cfg.database.url = url;
    }

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .context("failed to connect to database")?;
    models::db::ensure_schema(&db).await.context("failed to create schema")?;
    let repo: Arc<dyn SignatureRepository> = Arc::new(SeaOrmSignatureRepository::new(
        db.clone(),
        Duration::from_secs(cfg.database.statement_timeout_secs),
    ));

    let mut rng = match args.seed {
        Some(seed) => {
            info!(seed, "using fixed seed");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let start = Instant::now();
    let mut inserted = 0usize;
    for _ in 0..args.count {
        let new = synthetic(&mut rng);
        // a colliding random id is skipped, not retried
        match repo.insert(new).await {
            Ok(_) => inserted += 1,
            Err(e) => warn!(kind = e.kind(), error = %e, "seed_insert_skipped"),
        }
    }

    info!(
        requested = args.count,
        inserted,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "seeding completed"
    );
    db.close().await.context("failed to close database")?;
    Ok(())
}
