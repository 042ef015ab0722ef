use vetsync_core::util::normalize_text_option;

use crate::cli::AuthCommands;
use crate::error::CliError;
use crate::session::{Profile, TokenStore};

pub fn run_auth(command: AuthCommands) -> Result<(), CliError> {
    match command {
        AuthCommands::Login {
            token,
            user_id,
            name,
            role,
        } => {
            let token = normalize_text_option(Some(token))
                .ok_or_else(|| CliError::Config("Token must not be empty".to_string()))?;
            TokenStore::default().save(&token)?;

            let profile = Profile {
                user_id: normalize_text_option(user_id),
                user_name: normalize_text_option(name),
                user_role: normalize_text_option(role),
            };
            let path = profile.save()?;
            println!("Logged in; profile saved to {}", path.display());
            Ok(())
        }
        AuthCommands::Status => {
            let has_token = TokenStore::default().load()?.is_some();
            let profile = Profile::load()?;

            if has_token {
                let name = profile.user_name.as_deref().unwrap_or("(no name)");
                let role = profile.user_role.as_deref().unwrap_or("user");
                println!("Logged in as {name} ({role})");
            } else {
                println!("Not logged in.");
            }
            Ok(())
        }
        AuthCommands::Logout => {
            TokenStore::default().clear()?;
            Profile::clear()?;
            println!("Logged out");
            Ok(())
        }
    }
}
