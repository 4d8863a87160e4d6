//! Token command - Prints a signed bearer token.

use crate::cli::args::TokenArgs;
use crate::config::Config;
use crate::domain::Principal;
use crate::errors::AppResult;
use crate::services::issue_token;

/// Execute the token command
pub async fn execute(args: TokenArgs, config: Config) -> AppResult<()> {
    let subject = args.subject.unwrap_or_else(|| args.name.clone());
    let principal = Principal::new(subject, args.name, args.role);

    let token = issue_token(&principal, &config)?;
    tracing::info!(
        role = %principal.role,
        expires_in = token.expires_in,
        "Issued token for {}",
        principal.name
    );
    println!("{}", token.access_token);

    Ok(())
}
