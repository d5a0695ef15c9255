//! Username template preview

use anyhow::{Context, Result};
use minio_creds_core::{UsernameMetadata, UsernameTemplate, DEFAULT_USERNAME_TEMPLATE};
use tracing::debug;

use crate::cli::UsernameArgs;
use crate::output;

pub fn run(args: UsernameArgs) -> Result<()> {
    let usernames = generate(&args)?;

    output::header(&format!("Generated {} username(s)", usernames.len()));
    for username in &usernames {
        println!("  {} ({} chars)", username, username.chars().count());
    }
    Ok(())
}

/// Compile and check the template, then render `count` usernames
fn generate(args: &UsernameArgs) -> Result<Vec<String>> {
    let source = args
        .template
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_USERNAME_TEMPLATE);
    debug!(template = source, "Compiling username template");

    let template = UsernameTemplate::compile_checked(source)?;

    let metadata = UsernameMetadata::new(&args.display_name, &args.role_name);
    (0..args.count)
        .map(|_| {
            template
                .generate(&metadata)
                .context("failed to generate username")
        })
        .collect()
}
