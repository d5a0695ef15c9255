//! Creation statement check

use anyhow::Result;
use minio_creds_core::CreationStatement;

use crate::cli::StatementArgs;
use crate::output;

pub fn run(args: StatementArgs) -> Result<()> {
    match CreationStatement::parse(&args.statements) {
        Ok(statement) => {
            output::success("Creation statement is valid");
            output::kv("policy", &statement.policy);
            Ok(())
        }
        Err(e) => {
            output::error("Creation statement is invalid");
            Err(e.into())
        }
    }
}
