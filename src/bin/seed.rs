// src/bin/seed.rs
// Loads a JSON array of razors and posts each one to a running server.
//
// Usage: cargo run --bin seed -- [path/to/razors.json]
// Auth: SEED_TOKEN, or SEED_USERNAME + SEED_PASSWORD to sign in first.
use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::env;
use std::time::{Duration, Instant};

// --- ANSI colours ---
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

const DEFAULT_FILE: &str = "data/razors.json";

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Default)]
struct SeedStats {
    created: u32,
    skipped: u32,
    failed: u32,
}

enum Outcome {
    Created,
    Duplicate,
    Failed(String),
}

struct RazorSeeder {
    base_url: String,
    token: String,
    client: Client,
    stats: SeedStats,
}

impl RazorSeeder {
    async fn connect(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let health = client
            .get(format!("{}/health", base_url))
            .send()
            .await
            .with_context(|| format!("Service unavailable at {}", base_url))?;
        if !health.status().is_success() {
            bail!("Health check returned {}", health.status());
        }

        let token = match env::var("SEED_TOKEN") {
            Ok(token) => token,
            Err(_) => sign_in(&client, &base_url).await?,
        };

        Ok(Self {
            base_url,
            token,
            client,
            stats: SeedStats::default(),
        })
    }

    async fn post_razor(&self, razor: &Value) -> Outcome {
        let response = self
            .client
            .post(format!("{}/razors", self.base_url))
            .bearer_auth(&self.token)
            .json(razor)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == StatusCode::CREATED => Outcome::Created,
            Ok(resp) if resp.status() == StatusCode::CONFLICT => Outcome::Duplicate,
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                Outcome::Failed(format!("HTTP {} - {}", status, body))
            }
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }

    async fn run(&mut self, razors: &[Value]) {
        println!("\n{}Seeding {} razors...{}\n", BOLD, razors.len(), RESET);

        for (i, razor) in razors.iter().enumerate() {
            let label = format!(
                "{} {}",
                razor["manufacturer"].as_str().unwrap_or("?"),
                razor["model"].as_str().unwrap_or("?")
            );

            match self.post_razor(razor).await {
                Outcome::Created => {
                    self.stats.created += 1;
                    println!("{}[{}/{}] created {}{}", GREEN, i + 1, razors.len(), label, RESET);
                }
                Outcome::Duplicate => {
                    self.stats.skipped += 1;
                    println!("{}[{}/{}] skipped {} (already exists){}", YELLOW, i + 1, razors.len(), label, RESET);
                }
                Outcome::Failed(err) => {
                    self.stats.failed += 1;
                    println!("{}[{}/{}] failed {}: {}{}", RED, i + 1, razors.len(), label, err, RESET);
                }
            }
        }
    }

    fn print_summary(&self, elapsed: Duration) {
        println!("\n{}Summary{}", BOLD, RESET);
        println!("  Created: {}{}{}", GREEN, self.stats.created, RESET);
        println!("  Skipped: {}{}{}", YELLOW, self.stats.skipped, RESET);
        println!("  Failed:  {}{}{}", RED, self.stats.failed, RESET);
        println!("  Duration: {:.1}s", elapsed.as_secs_f64());
    }
}

async fn sign_in(client: &Client, base_url: &str) -> Result<String> {
    let username = env::var("SEED_USERNAME").context("Set SEED_TOKEN or SEED_USERNAME")?;
    let password = env::var("SEED_PASSWORD").context("SEED_PASSWORD must be set")?;

    let response = client
        .post(format!("{}/auth/signin", base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .context("Sign-in request failed")?;

    if !response.status().is_success() {
        bail!("Sign-in rejected: HTTP {}", response.status());
    }

    let body: TokenResponse = response.json().await.context("Unreadable sign-in response")?;
    Ok(body.token)
}

fn load_razors(path: &str) -> Result<Vec<Value>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path))?;
    let razors: Vec<Value> =
        serde_json::from_str(&raw).with_context(|| format!("{} is not a JSON array", path))?;
    Ok(razors)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_FILE.to_string());
    let base_url = env::var("RELIFE_API_URL").unwrap_or_else(|_| "http://localhost:8003".to_string());

    println!("{}Checking service at {}...{}", CYAN, base_url, RESET);
    let razors = load_razors(&path)?;
    let mut seeder = RazorSeeder::connect(base_url).await?;

    let start = Instant::now();
    seeder.run(&razors).await;
    seeder.print_summary(start.elapsed());

    if seeder.stats.failed > 0 {
        bail!("{} razors failed to import", seeder.stats.failed);
    }
    Ok(())
}
