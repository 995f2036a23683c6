// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::utils::users::UserData;
use crate::store::SettingsStore;
use chrono::{DateTime, Utc};
use miette::{Diagnostic, IntoDiagnostic};
use std::collections::HashSet;
use std::fmt;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::client::Client;
use twilight_http::request::channel::reaction::RequestReactionType;
use twilight_model::channel::message::embed::Embed;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};
use twilight_util::builder::embed::image_source::ImageSourceUrlError;
use twilight_util::builder::embed::{EmbedAuthorBuilder, EmbedBuilder, EmbedFooterBuilder, ImageSource};
use twilight_validate::embed::EmbedValidationError;

/// The accent color of suggestion cards.
pub const SUGGESTION_COLOR: u32 = 0x9b59b6;

const UPVOTE_REACTION: RequestReactionType<'static> = RequestReactionType::Unicode { name: "⬆️" };
const DOWNVOTE_REACTION: RequestReactionType<'static> = RequestReactionType::Unicode { name: "⬇️" };

/// An accepted suggestion, ready to be rendered and posted.
pub struct SuggestionSubmission {
	pub guild: Id<GuildMarker>,
	pub author: Id<UserMarker>,
	pub author_display: UserData,
	/// The guild's ticket counter value after accepting this suggestion.
	pub ticket_number: u64,
	pub text: String,
	pub submitted_at: DateTime<Utc>,
}

/// Error data for rendering a suggestion card
#[derive(Debug, Diagnostic)]
pub enum CardError {
	Image(ImageSourceUrlError),
	Validation(EmbedValidationError),
}

impl From<ImageSourceUrlError> for CardError {
	fn from(error: ImageSourceUrlError) -> Self {
		Self::Image(error)
	}
}

impl From<EmbedValidationError> for CardError {
	fn from(error: EmbedValidationError) -> Self {
		Self::Validation(error)
	}
}

impl std::error::Error for CardError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Image(error) => Some(error),
			Self::Validation(error) => Some(error),
		}
	}
}

impl fmt::Display for CardError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Image(error) => write!(f, "image source error: {}", error),
			Self::Validation(error) => write!(f, "embed validation error: {}", error),
		}
	}
}

/// Renders the display card for a suggestion.
pub fn suggestion_card(submission: &SuggestionSubmission) -> Result<Embed, CardError> {
	let author = EmbedAuthorBuilder::new(format!("Suggestion from {}", submission.author_display.display_name))
		.icon_url(ImageSource::url(&submission.author_display.avatar_url)?)
		.build();
	let footer = EmbedFooterBuilder::new(format!(
		"Suggestion made at {} UTC",
		submission.submitted_at.format("%Y-%m-%d %H:%M")
	))
	.build();
	let embed = EmbedBuilder::new()
		.title(format!("Suggestion # {}", submission.ticket_number))
		.description(&submission.text)
		.color(SUGGESTION_COLOR)
		.author(author)
		.footer(footer)
		.validate()?
		.build();
	Ok(embed)
}

/// Posts a suggestion card to every configured output channel that still belongs to the guild,
/// attaching the vote reactions to each posted card.
///
/// Output channel IDs that no longer resolve are skipped. After dispatch, the author's pending
/// entry in the guild's user cache is removed if one is present.
pub async fn post_suggestion(
	submission: SuggestionSubmission,
	http_client: &Client,
	cache: &DefaultInMemoryCache,
	settings: &SettingsStore,
) -> miette::Result<()> {
	let card = suggestion_card(&submission).into_diagnostic()?;

	let outputs = match settings.guild(submission.guild).await {
		Some(guild_settings) => guild_settings.output,
		None => Vec::new(),
	};
	let guild_channels: Option<HashSet<Id<ChannelMarker>>> = cache
		.guild_channels(submission.guild)
		.map(|channels| channels.value().clone());

	for channel_id in outputs {
		let resolves = guild_channels
			.as_ref()
			.is_some_and(|channels| channels.contains(&channel_id));
		if !resolves {
			tracing::debug!(channel = %channel_id, guild = %submission.guild, "Skipping an output channel that no longer exists");
			continue;
		}

		let send_result = http_client.create_message(channel_id).embeds(&[card.clone()]).await;
		let message = match send_result {
			Ok(response) => response.model().await.into_diagnostic()?,
			Err(error) => {
				tracing::warn!(source = ?error, channel = %channel_id, "Failed to post a suggestion card");
				continue;
			}
		};
		for reaction in [UPVOTE_REACTION, DOWNVOTE_REACTION] {
			if let Err(error) = http_client.create_reaction(channel_id, message.id, &reaction).await {
				tracing::warn!(source = ?error, channel = %channel_id, "Failed to add a vote reaction to a suggestion card");
			}
		}
	}

	settings
		.update(submission.guild, |guild_settings| {
			guild_settings.usercache.retain(|user| *user != submission.author);
		})
		.await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn test_submission() -> SuggestionSubmission {
		SuggestionSubmission {
			guild: Id::new(5000),
			author: Id::new(6000),
			author_display: UserData {
				display_name: String::from("Sam"),
				avatar_url: String::from("https://cdn.discordapp.com/embed/avatars/3.png"),
			},
			ticket_number: 6,
			text: String::from("add dark mode"),
			submitted_at: Utc.with_ymd_and_hms(2024, 3, 9, 21, 5, 42).unwrap(),
		}
	}

	#[test]
	fn card_carries_the_ticket_number_and_text() {
		let card = suggestion_card(&test_submission()).unwrap();
		assert_eq!(card.title.as_deref(), Some("Suggestion # 6"));
		assert_eq!(card.description.as_deref(), Some("add dark mode"));
		assert_eq!(card.color, Some(SUGGESTION_COLOR));
	}

	#[test]
	fn card_credits_the_author_with_avatar() {
		let card = suggestion_card(&test_submission()).unwrap();
		let author = card.author.unwrap();
		assert_eq!(author.name, "Suggestion from Sam");
		assert_eq!(
			author.icon_url.as_deref(),
			Some("https://cdn.discordapp.com/embed/avatars/3.png")
		);
	}

	#[test]
	fn card_footer_is_the_submission_time_in_utc() {
		let card = suggestion_card(&test_submission()).unwrap();
		let footer = card.footer.unwrap();
		assert_eq!(footer.text, "Suggestion made at 2024-03-09 21:05 UTC");
	}
}
