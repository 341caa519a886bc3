use crate::server::config::{AppConfig, ProviderConfig, StorageBackend};
use crate::server::{build_engine, load_config, validate_config};
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    println!("🏥 Floorgate Doctor\n");

    print!("Loading configuration... ");
    let config = match load_config(config_path) {
        Ok(config) => {
            println!("✅");
            config
        }
        Err(e) => {
            println!("❌ {e:#}");
            std::process::exit(1);
        }
    };

    let mut all_ok = true;
    all_ok &= check_config(&config);
    all_ok &= check_providers(&config);
    check_rule_sets(&config);
    all_ok &= check_storage(&config).await;

    println!();
    if all_ok {
        println!("✅ All checks passed! Ready to run Floorgate.");
    } else {
        println!("⚠️  Some checks failed. Please fix the issues above.");
        std::process::exit(1);
    }

    Ok(())
}

fn check_config(config: &AppConfig) -> bool {
    print!("Checking configuration values... ");
    match validate_config(config) {
        Ok(()) => {
            println!("✅");
            true
        }
        Err(e) => {
            println!("❌ {e}");
            false
        }
    }
}

fn check_providers(config: &AppConfig) -> bool {
    print!("Checking providers... ");
    if config.providers.is_empty() {
        println!("⚠️  none configured; every request will use the fallback generator");
        return true;
    }
    println!("{}", config.providers.len());

    let mut ok = true;
    for provider in &config.providers {
        match provider {
            ProviderConfig::Fixture { name, path } if !Path::new(path).exists() => {
                println!("  ❌ {name}: fixture {path} not found");
                ok = false;
            }
            ProviderConfig::Fixture { name, path } => println!("  ✅ {name}: fixture {path}"),
            ProviderConfig::Mock { name, mode } => println!("  ⚠️  {name}: mock ({mode:?})"),
        }
    }
    ok
}

fn check_rule_sets(config: &AppConfig) {
    print!("Checking rule sets... ");
    if config.rule_sets.is_empty() {
        println!("⚠️  none configured; every request will fail regulatory checks");
    } else {
        let regions: Vec<&str> = config.rule_sets.iter().map(|r| r.region.as_str()).collect();
        println!("✅ {}", regions.join(", "));
    }
}

async fn check_storage(config: &AppConfig) -> bool {
    print!("Checking audit store... ");
    if config.storage.backend == StorageBackend::Memory {
        println!("⚠️  in-memory; nothing survives a restart");
    }
    match build_engine(config).await {
        Ok(engine) => {
            println!(
                "✅ {} ({} pending reviews)",
                engine.store_name(),
                engine.review_queue().pending_count().await
            );
            true
        }
        Err(e) => {
            println!("❌ {e:#}");
            false
        }
    }
}
