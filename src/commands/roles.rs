//! Roles command - Create roles and grant them from the shell.

use crate::cli::args::{RolesAction, RolesArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Persistence};

/// Execute the roles command
pub async fn execute(args: RolesArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await?;
    let persistence = Persistence::new(db.get_connection());

    match args.action {
        RolesAction::Create { name } => {
            let role_name = name.clone();
            persistence
                .transaction(move |uow| {
                    Box::pin(async move {
                        if uow.users().find_role(&role_name).await?.is_some() {
                            return Err(AppError::bad_request("Role already exist."));
                        }
                        uow.users().create_role(&role_name).await
                    })
                })
                .await?;
            println!("Role {} added successfully", name);
        }
        RolesAction::Grant { username, role } => {
            let uow = persistence.begin().await?;
            let user = uow
                .users()
                .find_by_username(&username)
                .await?
                .ok_or_else(|| AppError::bad_request("Unable to find user"))?;
            let found = uow
                .users()
                .find_role(&role)
                .await?
                .ok_or_else(|| AppError::bad_request(format!("Unknown role {}", role)))?;

            let added = uow.users().add_to_role(user.id, &found).await?;
            uow.commit().await?;

            if added {
                println!("User {} added to the {} role", username, role);
            } else {
                println!("User {} already holds the {} role", username, role);
            }
        }
    }

    Ok(())
}
