//! Guild commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use meract_admin::api::{GuildFilter, GuildForm};
use meract_admin::gateway::FilePart;
use meract_admin::views::GuildsView;
use meract_core::{GuildId, UserId};

use super::{CliError, Console, opt};
use crate::output;

#[derive(Subcommand)]
pub enum GuildsAction {
    /// List guilds
    List {
        #[arg(long)]
        region: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Show a guild with its members
    Show { guild_id: GuildId },
    /// Create a guild
    Create {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Logo image to upload
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Replace a guild's name, description and optionally its logo
    Update {
        guild_id: GuildId,

        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,

        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Delete a guild
    Delete { guild_id: GuildId },
    /// Invite a user into a guild
    Invite { guild_id: GuildId, user_id: UserId },
    /// Remove a user from a guild
    Kick { guild_id: GuildId, user_id: UserId },
}

pub async fn run(console: &Console, action: GuildsAction) -> Result<(), CliError> {
    let mut view = GuildsView::new(console.ctx());
    match action {
        GuildsAction::List { region, kind } => {
            view.load().await?;
            view.set_filter(GuildFilter { region, kind });
            let guilds = view.visible();
            console.print(&guilds, || {
                let rows: Vec<Vec<String>> = guilds
                    .iter()
                    .map(|g| {
                        vec![
                            g.id.to_string(),
                            g.name.clone(),
                            opt(g.region.as_deref()),
                            opt(g.kind.as_deref()),
                            opt(Some(view.logo_url(g).as_str())),
                        ]
                    })
                    .collect();
                output::table(&["ID", "NAME", "REGION", "TYPE", "LOGO"], &rows)
            })
        }
        GuildsAction::Show { guild_id } => {
            let guild = console.api().guild(guild_id).await?;
            console.print(&guild, || {
                output::line(&format!("{} ({})", guild.name, guild.id))?;
                output::line(&opt(guild.description.as_deref()))?;
                for member in &guild.members {
                    output::line(&format!("  {} {}", member.id, member.display_name()))?;
                }
                Ok(())
            })
        }
        GuildsAction::Create {
            name,
            description,
            photo,
        } => {
            let form = form(name, description, photo.as_deref()).await?;
            view.create(form).await?;
            console.print_line("Guild created")
        }
        GuildsAction::Update {
            guild_id,
            name,
            description,
            photo,
        } => {
            let form = form(name, description, photo.as_deref()).await?;
            view.update(guild_id, form).await?;
            console.print_line("Guild updated")
        }
        GuildsAction::Delete { guild_id } => {
            view.delete(guild_id).await?;
            console.print_line("Guild deleted")
        }
        GuildsAction::Invite { guild_id, user_id } => {
            view.invite(guild_id, user_id).await?;
            console.print_line(&format!("User {user_id} invited to guild {guild_id}"))
        }
        GuildsAction::Kick { guild_id, user_id } => {
            view.kick(guild_id, user_id).await?;
            console.print_line(&format!("User {user_id} removed from guild {guild_id}"))
        }
    }
}

async fn form(name: String, description: String, photo: Option<&Path>) -> Result<GuildForm, CliError> {
    let photo = match photo {
        Some(path) => Some(read_photo(path).await?),
        None => None,
    };
    Ok(GuildForm {
        name,
        description,
        photo,
    })
}

async fn read_photo(path: &Path) -> Result<FilePart, CliError> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::Invalid(format!("bad photo path: {}", path.display())))?
        .to_string();
    let mime = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    };
    Ok(FilePart {
        name: "photo".to_string(),
        file_name,
        mime: mime.to_string(),
        bytes,
    })
}
