//! Session commands: sign-in, sign-out, whoami, check, menu.

use meract_admin::auth::{self, AuthGate, GateOutcome, menu_for};
use meract_core::Email;
use secrecy::SecretString;
use serde::Serialize;

use super::{CliError, Console};
use crate::output;

pub async fn sign_in(console: &Console, email: &str, password: String) -> Result<(), CliError> {
    let email = Email::parse(email)?;
    let password = SecretString::from(password);
    let profile = auth::sign_in(console.client(), &email, &password).await?;
    console.print(&profile, || {
        output::line(&format!(
            "Signed in as {} ({})",
            profile.display_name(),
            profile.admin_role()
        ))
    })
}

pub fn sign_out(console: &Console) -> Result<(), CliError> {
    auth::sign_out(console.client())?;
    console.print_line("Signed out")
}

pub fn whoami(console: &Console) -> Result<(), CliError> {
    let profile = console.client().session().profile().ok_or(CliError::NotSignedIn)?;
    console.print(&profile, || {
        output::line(&format!("{} ({})", profile.display_name(), profile.admin_role()))
    })
}

pub async fn check(console: &Console) -> Result<(), CliError> {
    match AuthGate::new(console.client().clone()).check().await {
        GateOutcome::Authorized => console.print_line("Session valid"),
        GateOutcome::RedirectToSignIn => Err(CliError::NotSignedIn),
    }
}

#[derive(Serialize)]
struct MenuEntry {
    label: &'static str,
    path: &'static str,
}

pub fn menu(console: &Console) -> Result<(), CliError> {
    let profile = console.client().session().profile();
    let entries: Vec<MenuEntry> = menu_for(profile.as_ref())
        .into_iter()
        .map(|section| MenuEntry {
            label: section.label(),
            path: section.path(),
        })
        .collect();
    console.print(&entries, || {
        let rows: Vec<Vec<String>> = entries
            .iter()
            .map(|e| vec![e.label.to_string(), e.path.to_string()])
            .collect();
        output::table(&["SECTION", "PATH"], &rows)
    })
}
