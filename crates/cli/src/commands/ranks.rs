//! Rank commands.

use clap::Subcommand;
use meract_admin::api::Rank;
use meract_admin::views::RanksView;
use meract_core::{RankId, UserId};

use super::{CliError, Console};
use crate::output;

#[derive(Subcommand)]
pub enum RanksAction {
    /// List ranks
    List,
    /// Create a rank
    Create { name: String },
    /// Rename a rank
    Update { rank_id: RankId, name: String },
    /// Delete a rank
    Delete { rank_id: RankId },
    /// Give a rank to a user
    Award { user_id: UserId, rank_id: RankId },
    /// Take a rank away from a user
    Revoke { user_id: UserId, rank_id: RankId },
    /// Ranks a user holds
    User { user_id: UserId },
}

pub async fn run(console: &Console, action: RanksAction) -> Result<(), CliError> {
    let mut view = RanksView::new(console.ctx());
    match action {
        RanksAction::List => {
            view.load().await?;
            print_ranks(console, view.ranks().items())
        }
        RanksAction::Create { name } => {
            let name = non_blank(name)?;
            view.create(&name).await?;
            console.print_line(&format!("Rank \"{name}\" created"))
        }
        RanksAction::Update { rank_id, name } => {
            let name = non_blank(name)?;
            view.update(rank_id, &name).await?;
            console.print_line(&format!("Rank {rank_id} renamed to \"{name}\""))
        }
        RanksAction::Delete { rank_id } => {
            view.delete(rank_id).await?;
            console.print_line(&format!("Rank {rank_id} deleted"))
        }
        RanksAction::Award { user_id, rank_id } => {
            view.award(user_id, rank_id).await?;
            console.print_line(&format!("Rank {rank_id} awarded to user {user_id}"))
        }
        RanksAction::Revoke { user_id, rank_id } => {
            view.revoke(user_id, rank_id).await?;
            console.print_line(&format!("Rank {rank_id} revoked from user {user_id}"))
        }
        RanksAction::User { user_id } => {
            let ranks = view.held_by(user_id).await?;
            print_ranks(console, &ranks)
        }
    }
}

fn non_blank(name: String) -> Result<String, CliError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        Err(CliError::Invalid("rank name is empty".to_string()))
    } else {
        Ok(trimmed.to_string())
    }
}

fn print_ranks(console: &Console, ranks: &[Rank]) -> Result<(), CliError> {
    console.print(ranks, || {
        let rows: Vec<Vec<String>> = ranks
            .iter()
            .map(|r| vec![r.id.to_string(), r.name.clone()])
            .collect();
        output::table(&["ID", "NAME"], &rows)
    })
}
