use anyhow::Context;
use clap::Args;

use crate::auth::{issue_token, TokenIssue, UserId};
use crate::config::AppConfig;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "User identifier to embed (numeric ids are encoded as numbers)")]
    pub user_id: String,

    #[arg(long, help = "Username claim")]
    pub username: Option<String>,

    #[arg(long, help = "Role claim")]
    pub role: Option<String>,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_TOKEN_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs) -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    config.validate().context("invalid configuration")?;

    let user_id = match args.user_id.parse::<i64>() {
        Ok(n) => UserId::Number(n),
        Err(_) => UserId::Text(args.user_id),
    };
    let hours = args.hours.unwrap_or(config.security.token_expiry_hours);
    let ttl = token_ttl(hours)?;

    let issue = TokenIssue {
        user_id,
        username: args.username,
        role: args.role,
    };
    let token = issue_token(&issue, &config.security.jwt_secret, ttl)?;

    println!("{}", token);
    Ok(())
}

fn token_ttl(hours: u64) -> anyhow::Result<chrono::Duration> {
    i64::try_from(hours)
        .ok()
        .and_then(chrono::Duration::try_hours)
        .ok_or_else(|| anyhow::anyhow!("token lifetime of {} hours is out of range", hours))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_within_range() {
        assert_eq!(token_ttl(24).unwrap(), chrono::Duration::hours(24));
    }

    #[test]
    fn oversized_ttl_is_an_error() {
        assert!(token_ttl(u64::MAX).is_err());
        assert!(token_ttl(i64::MAX as u64).is_err());
    }
}
