use clap::Args;
use serde::Serialize;
use sugarlog_core::{Classifier, CleanTransition, StreakEngine, StreakState};

use super::OutputFormat;
use crate::db::{EntryRepository, RewardRepository};
use crate::render::{format_reward, format_streak};

#[derive(Args)]
pub struct StreakCommand {
    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct StreakReport<'a> {
    #[serde(flatten)]
    state: &'a StreakState,
    new_rewards: &'a [CleanTransition],
}

impl StreakCommand {
    pub async fn run(
        &self,
        entries: &EntryRepository,
        rewards: &RewardRepository,
        classifier: &Classifier,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let days = entries.get_all_days().await?;
        let state = StreakEngine::new(*classifier).compute(&days);

        let shown = rewards.shown_dates().await?;
        let mut new_rewards = Vec::new();
        for transition in &state.transitions {
            if shown.contains(&transition.date) {
                continue;
            }
            if rewards.mark_shown(transition).await? {
                new_rewards.push(*transition);
            }
        }
        tracing::debug!(
            "{} transitions, {} newly announced",
            state.transitions.len(),
            new_rewards.len()
        );

        match self.format {
            OutputFormat::Json => {
                let report = StreakReport {
                    state: &state,
                    new_rewards: &new_rewards,
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                println!("{}", format_streak(&state));
                if !new_rewards.is_empty() {
                    println!();
                    for reward in &new_rewards {
                        println!("{}", format_reward(reward));
                    }
                }
            }
        }

        Ok(())
    }
}
