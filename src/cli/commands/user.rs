//! User management command handlers

use crate::cli::UserCommands;
use crate::config::Config;
use crate::services::{ActionOutcome, CreateUser};
use crate::state::SharedState;

pub async fn cmd_user(config: &Config, command: UserCommands) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let auth = &state.auth_service;

    match command {
        UserCommands::Add {
            username,
            password,
            admin,
            superadmin,
        } => {
            let password = password_or_prompt(password, "Password")?;
            let result = auth
                .create_user(CreateUser {
                    username,
                    password,
                    is_admin: admin,
                    is_superadmin: superadmin,
                })
                .await;
            report_outcome(&ActionOutcome::from_result(&result, "User created successfully"))?;
        }

        UserCommands::List => {
            let users = auth.list_users().await?;

            if users.is_empty() {
                println!("No users found");
                return Ok(());
            }

            println!("Users ({} total)", users.len());
            println!("{:-<50}", "");

            for user in users {
                println!("{:<30} {}", user.username, user.role());
            }
        }

        UserCommands::Delete { username } => {
            let result = auth.delete_user(&username).await;
            report_outcome(&ActionOutcome::from_result(&result, "User deleted successfully"))?;
        }

        UserCommands::Passwd { username, password } => {
            let password = password_or_prompt(password, "New password")?;
            let result = auth.update_password(&username, &password).await;
            report_outcome(&ActionOutcome::from_result(
                &result,
                "Password updated successfully",
            ))?;
        }

        UserCommands::Check { username, password } => {
            let password = password_or_prompt(password, "Password")?;
            let result = auth.authenticate(&username, &password).await;

            if result.authenticated {
                println!(
                    "✓ Valid credentials (admin: {}, super admin: {})",
                    result.is_admin, result.is_superadmin
                );
            } else {
                anyhow::bail!("Invalid credentials");
            }
        }
    }

    Ok(())
}

/// Prints a success line, or turns a failure into an error so the process
/// exits non-zero.
fn report_outcome(outcome: &ActionOutcome) -> anyhow::Result<()> {
    if !outcome.success {
        anyhow::bail!("{}", outcome.message);
    }

    println!("✓ {}", outcome.message);
    Ok(())
}

fn password_or_prompt(password: Option<String>, label: &str) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    println!("{label}:");
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
