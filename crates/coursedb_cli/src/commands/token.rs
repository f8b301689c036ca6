//! Token minting command implementation.

use coursedb_server::TokenValidator;
use std::time::Duration;

const DEFAULT_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

/// Runs the token command.
pub fn run(subject: &str, secret: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    let validator = TokenValidator::new(secret, DEFAULT_EXPIRY);
    let token = validator.mint(subject)?;

    let hex: String = token.iter().map(|b| format!("{b:02x}")).collect();
    println!("{hex}");
    Ok(())
}
