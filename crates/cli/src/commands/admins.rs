//! Admin account commands. Main admins only.

use clap::Subcommand;
use meract_admin::api::{AdminUpdate, NewAdmin};
use meract_admin::views::AdminsView;
use meract_core::AdminId;
use secrecy::SecretString;

use super::{CliError, Console};
use crate::output;

#[derive(Subcommand)]
pub enum AdminsAction {
    /// List admin accounts
    List,
    /// Create an admin account
    Create {
        #[arg(short, long)]
        login: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "MERACT_NEW_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Edit an admin account; omitted fields keep their current value
    Update {
        admin_id: AdminId,

        #[arg(short, long)]
        login: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(long, env = "MERACT_OLD_PASSWORD", hide_env_values = true)]
        old_password: Option<String>,

        #[arg(long, env = "MERACT_NEW_PASSWORD", hide_env_values = true)]
        new_password: Option<String>,
    },
    /// Delete an admin account
    Delete { admin_id: AdminId },
}

pub async fn run(console: &Console, action: AdminsAction) -> Result<(), CliError> {
    console.require_main_admin("Managing admins")?;

    let mut view = AdminsView::new(console.ctx());
    match action {
        AdminsAction::List => {
            view.load().await?;
            let admins = view.admins().items();
            console.print(admins, || {
                let rows: Vec<Vec<String>> = admins
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.login.clone(),
                            a.email.clone(),
                            a.role_name().to_string(),
                        ]
                    })
                    .collect();
                output::table(&["ID", "LOGIN", "EMAIL", "ROLE"], &rows)
            })
        }
        AdminsAction::Create {
            login,
            email,
            password,
        } => {
            let admin = NewAdmin {
                login,
                email,
                password: SecretString::from(password),
            };
            view.create(&admin).await?;
            console.print_line(&format!("Admin {} created", admin.login))
        }
        AdminsAction::Update {
            admin_id,
            login,
            email,
            old_password,
            new_password,
        } => {
            view.load().await?;
            let current = view
                .admins()
                .items()
                .iter()
                .find(|a| a.id == admin_id)
                .ok_or_else(|| CliError::Invalid(format!("no admin with id {admin_id}")))?;

            let mut update = AdminUpdate::for_admin(current);
            if let Some(login) = login {
                update.login = login;
            }
            if let Some(email) = email {
                update.email = email;
            }
            if let Some(old) = old_password {
                update.old_password = SecretString::from(old);
            }
            if let Some(new) = new_password {
                update.new_password = SecretString::from(new);
            }
            view.update(admin_id, &update).await?;
            console.print_line(&format!("Admin {admin_id} updated"))
        }
        AdminsAction::Delete { admin_id } => {
            view.delete(admin_id).await?;
            console.print_line(&format!("Admin {admin_id} deleted"))
        }
    }
}
