//! Issue a bearer token for local development.
//!
//! Usage: `issue-token <user-id> [days]`. Reads `JWT_SECRET` from the
//! environment or `.env`.

use anyhow::{bail, Context, Result};

use spendwise_api::jwt::JwtService;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let Some(user_id) = args.next() else {
        bail!("usage: issue-token <user-id> [days]");
    };
    let days: i64 = args
        .next()
        .map(|d| d.parse())
        .transpose()
        .context("days must be a number")?
        .unwrap_or(30);

    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET environment variable is required")?;
    let token = JwtService::new(&secret).create_token(&user_id, chrono::Duration::days(days))?;
    println!("{token}");
    Ok(())
}
