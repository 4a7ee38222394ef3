//! Achievement commands.

use clap::{Args, Subcommand};
use meract_admin::api::AchievementForm;
use meract_admin::views::AchievementsView;
use meract_core::{AchievementId, Rarity, UserId};

use super::{CliError, Console, opt};
use crate::output;

#[derive(Args)]
pub struct AchievementArgs {
    #[arg(short, long)]
    name: String,

    #[arg(short, long, default_value = "")]
    description: String,

    /// Emoji or short text; empty falls back to the default trophy
    #[arg(short, long, default_value = "")]
    icon: String,

    /// `common`, `rare`, `epic` or `legendary`
    #[arg(short, long, default_value = "common")]
    rarity: Rarity,
}

impl AchievementArgs {
    fn into_form(self) -> Result<AchievementForm, CliError> {
        if self.name.trim().is_empty() {
            return Err(CliError::Invalid("achievement name is empty".to_string()));
        }
        Ok(AchievementForm {
            name: self.name.trim().to_string(),
            description: self.description,
            icon: self.icon,
            rarity: self.rarity,
        })
    }
}

#[derive(Subcommand)]
pub enum AchievementsAction {
    /// List achievements
    List,
    /// Create an achievement
    Create(AchievementArgs),
    /// Replace an achievement
    Update {
        achievement_id: AchievementId,

        #[command(flatten)]
        args: AchievementArgs,
    },
    /// Delete an achievement
    Delete { achievement_id: AchievementId },
    /// Give an achievement to a user
    Award {
        user_id: UserId,
        achievement_id: AchievementId,
    },
}

pub async fn run(console: &Console, action: AchievementsAction) -> Result<(), CliError> {
    let mut view = AchievementsView::new(console.ctx());
    match action {
        AchievementsAction::List => {
            view.load().await?;
            let items = view.achievements().items();
            console.print(items, || {
                let rows: Vec<Vec<String>> = items
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.icon().to_string(),
                            a.name.clone(),
                            a.rarity.unwrap_or_default().to_string(),
                            opt(a.description.as_deref()),
                        ]
                    })
                    .collect();
                output::table(&["ID", "", "NAME", "RARITY", "DESCRIPTION"], &rows)
            })
        }
        AchievementsAction::Create(args) => {
            let form = args.into_form()?;
            view.create(&form).await?;
            console.print_line(&format!("Achievement \"{}\" created", form.name))
        }
        AchievementsAction::Update {
            achievement_id,
            args,
        } => {
            view.update(achievement_id, &args.into_form()?).await?;
            console.print_line(&format!("Achievement {achievement_id} updated"))
        }
        AchievementsAction::Delete { achievement_id } => {
            view.delete(achievement_id).await?;
            console.print_line(&format!("Achievement {achievement_id} deleted"))
        }
        AchievementsAction::Award {
            user_id,
            achievement_id,
        } => {
            view.award(user_id, achievement_id).await?;
            console.print_line(&format!(
                "Achievement {achievement_id} awarded to user {user_id}"
            ))
        }
    }
}
