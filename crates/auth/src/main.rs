//! `expensa-roles` — inspect the role registry from the command line.
//!
//! ```text
//! expensa-roles                           # print the role catalog as JSON
//! expensa-roles ROLE PERMISSION [COMPANY] # explain one decision
//! ```

use anyhow::{Context, Result};
use clap::Parser;

use expensa_auth::{PermissionDecision, Role, User, catalog, explain_permission};
use expensa_core::{CompanyId, UserId};

/// Inspect Expensa roles and permission decisions
#[derive(Parser, Debug)]
#[command(name = "expensa-roles")]
#[command(version, about, long_about = None)]
struct Args {
    /// Effective role to evaluate (e.g. COMPANY_ADMIN)
    #[arg(requires = "permission")]
    role: Option<String>,

    /// Permission name, matched exactly (e.g. MANAGE_EXPENSES or canManageExpenses)
    permission: Option<String>,

    /// Company to scope the check to
    company: Option<String>,
}

fn main() -> Result<()> {
    expensa_observability::init();
    let args = Args::parse();

    match (args.role, args.permission) {
        (Some(role), Some(permission)) => {
            let decision = explain(&role, &permission, args.company.as_deref())?;
            print_json(&decision)
        }
        _ => print_json(&catalog()),
    }
}

fn explain(role: &str, permission: &str, company: Option<&str>) -> Result<PermissionDecision> {
    let role: Role = role
        .parse()
        .with_context(|| format!("failed to parse role '{role}'"))?;
    let company: Option<CompanyId> = company
        .map(str::parse)
        .transpose()
        .context("failed to parse company id")?;

    let user = User::new(UserId::new("cli"), role);
    Ok(explain_permission(Some(&user), permission, company.as_ref()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{json}");
    Ok(())
}
