// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::state::prompt::{PendingSuggestions, PromptOutcome, await_reply};
use crate::discord::utils::responses::{
	COLLECTING_BY_DM, DM_PROMPT, NOT_CONFIGURED_FOR_GUILD, PRIOR_SUGGESTION_UNFINISHED, PROMPT_TIMED_OUT,
	SUGGESTION_SUBMITTED, SUGGESTIONS_NOT_ENABLED,
};
use crate::discord::utils::suggestions::{SuggestionSubmission, post_suggestion};
use crate::discord::utils::timestamp::datetime_from_id;
use crate::discord::utils::users::{UserData, get_member_data};
use crate::store::SettingsStore;
use chrono::{DateTime, Utc};
use miette::{IntoDiagnostic, bail, ensure};
use std::sync::Arc;
use tokio::sync::RwLock;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::client::Client;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::InteractionContextType;
use twilight_model::application::interaction::application_command::{CommandData, CommandOptionValue};
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, ChannelMarker, GuildMarker, UserMarker};
use twilight_util::builder::InteractionResponseDataBuilder;
use twilight_util::builder::command::{CommandBuilder, StringBuilder};
use type_map::concurrent::TypeMap;

pub fn command_definition() -> Command {
	let suggestion_option = StringBuilder::new("suggestion", "Your suggestion, if you'd rather not be asked over DM");
	CommandBuilder::new(
		"suggest",
		"Make a suggestion by following the prompts",
		CommandType::ChatInput,
	)
	.contexts([InteractionContextType::Guild])
	.option(suggestion_option)
	.build()
}

/// Runs the suggestion submission flow: gate checks, collection (inline or over DM), ticket
/// assignment, and dispatch to the guild's output channels.
pub async fn handle_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	http_client: &Arc<Client>,
	application_id: Id<ApplicationMarker>,
	settings: Arc<SettingsStore>,
	cache: Arc<DefaultInMemoryCache>,
	bot_state: Arc<RwLock<TypeMap>>,
) -> miette::Result<()> {
	let Some(guild_id) = interaction.guild_id else {
		bail!("Suggest command was used outside of a guild");
	};
	let Some(author) = interaction.author() else {
		bail!("Suggest command interaction carried no invoking user");
	};
	let author_id = author.id;

	let suggestion_text = match command_data.options.first() {
		Some(option) => {
			ensure!(
				option.name.as_str() == "suggestion",
				"The only option for `/suggest` should be `suggestion`"
			);
			let CommandOptionValue::String(text) = &option.value else {
				bail!("Command data is malformed; expected `suggestion` option of `/suggest` to be a string");
			};
			Some(text.clone())
		}
		None => None,
	};

	let interaction_client = http_client.interaction(application_id);

	let guild_settings = settings.guild(guild_id).await;
	let refusal = match &guild_settings {
		None => Some(NOT_CONFIGURED_FOR_GUILD),
		Some(guild_settings) if guild_settings.inactive => Some(SUGGESTIONS_NOT_ENABLED),
		Some(guild_settings) if guild_settings.usercache.contains(&author_id) => Some(PRIOR_SUGGESTION_UNFINISHED),
		Some(_) => None,
	};
	if let Some(content) = refusal {
		let response = InteractionResponseDataBuilder::new().content(content).build();
		let response = InteractionResponse {
			kind: InteractionResponseType::ChannelMessageWithSource,
			data: Some(response),
		};
		interaction_client
			.create_response(interaction.id, &interaction.token, &response)
			.await
			.into_diagnostic()?;
		return Ok(());
	}

	// Inline path: the suggestion came with the command, so it can be accepted right away and
	// the interaction reply doubles as the submission confirmation.
	if let Some(text) = suggestion_text {
		let response = InteractionResponseDataBuilder::new()
			.content(SUGGESTION_SUBMITTED)
			.build();
		let response = InteractionResponse {
			kind: InteractionResponseType::ChannelMessageWithSource,
			data: Some(response),
		};
		interaction_client
			.create_response(interaction.id, &interaction.token, &response)
			.await
			.into_diagnostic()?;

		let author_display = get_member_data(http_client, guild_id, author_id).await.into_diagnostic()?;
		let submitted_at = datetime_from_id(interaction.id).unwrap_or_else(Utc::now);
		return accept_suggestion(
			guild_id,
			author_id,
			author_display,
			text,
			submitted_at,
			http_client,
			&cache,
			&settings,
		)
		.await;
	}

	// Prompt path: mark the author pending, collect the suggestion over DM, and wait out the
	// reply window.
	let response = InteractionResponseDataBuilder::new().content(COLLECTING_BY_DM).build();
	let response = InteractionResponse {
		kind: InteractionResponseType::ChannelMessageWithSource,
		data: Some(response),
	};
	interaction_client
		.create_response(interaction.id, &interaction.token, &response)
		.await
		.into_diagnostic()?;

	settings
		.update(guild_id, |guild_settings| guild_settings.usercache.push(author_id))
		.await?;

	let dm_channel = match create_dm_channel(http_client, author_id).await {
		Ok(channel) => channel,
		Err(error) => {
			release_user(&settings, guild_id, author_id).await?;
			return Err(error);
		}
	};

	let receiver = {
		let mut states = bot_state.write().await;
		let pending = states.entry().or_insert_with(PendingSuggestions::default);
		pending.register(dm_channel, author_id, guild_id)
	};

	if let Err(error) = http_client.create_message(dm_channel).content(DM_PROMPT).await {
		let mut states = bot_state.write().await;
		if let Some(pending) = states.get_mut::<PendingSuggestions>() {
			pending.remove(dm_channel, author_id);
		}
		drop(states);
		release_user(&settings, guild_id, author_id).await?;
		return Err(error).into_diagnostic();
	}

	match await_reply(receiver).await {
		PromptOutcome::Collected(reply) => {
			let author_display = get_member_data(http_client, guild_id, author_id).await.into_diagnostic()?;
			let submitted_at = reply.submitted_at.unwrap_or_else(Utc::now);
			accept_suggestion(
				guild_id,
				author_id,
				author_display,
				reply.text,
				submitted_at,
				http_client,
				&cache,
				&settings,
			)
			.await?;
			if let Err(error) = http_client.create_message(dm_channel).content(SUGGESTION_SUBMITTED).await {
				tracing::warn!(source = ?error, user = %author_id, "Failed to confirm a submitted suggestion over DM");
			}
		}
		PromptOutcome::TimedOut => {
			{
				let mut states = bot_state.write().await;
				if let Some(pending) = states.get_mut::<PendingSuggestions>() {
					pending.remove(dm_channel, author_id);
				}
			}
			if let Err(error) = http_client.create_message(dm_channel).content(PROMPT_TIMED_OUT).await {
				tracing::warn!(source = ?error, user = %author_id, "Failed to notify a user their suggestion prompt timed out");
			}
			release_user(&settings, guild_id, author_id).await?;
		}
		PromptOutcome::Cancelled => {
			tracing::debug!(user = %author_id, guild = %guild_id, "A newer prompt superseded this one; abandoning the wait");
			release_user(&settings, guild_id, author_id).await?;
		}
	}

	Ok(())
}

/// Assigns the next ticket number and dispatches the suggestion card.
async fn accept_suggestion(
	guild_id: Id<GuildMarker>,
	author: Id<UserMarker>,
	author_display: UserData,
	text: String,
	submitted_at: DateTime<Utc>,
	http_client: &Client,
	cache: &DefaultInMemoryCache,
	settings: &SettingsStore,
) -> miette::Result<()> {
	let updated = settings
		.update(guild_id, |guild_settings| guild_settings.tickets += 1)
		.await?;
	let Some(updated) = updated else {
		bail!("Guild settings record disappeared while accepting a suggestion");
	};

	let submission = SuggestionSubmission {
		guild: guild_id,
		author,
		author_display,
		ticket_number: updated.tickets,
		text,
		submitted_at,
	};
	post_suggestion(submission, http_client, cache, settings).await
}

async fn create_dm_channel(http_client: &Client, user: Id<UserMarker>) -> miette::Result<Id<ChannelMarker>> {
	let channel_response = http_client.create_private_channel(user).await.into_diagnostic()?;
	let channel = channel_response.model().await.into_diagnostic()?;
	Ok(channel.id)
}

/// Takes the author back out of the guild's pending-user list after a prompt ends without a
/// posted suggestion.
async fn release_user(settings: &SettingsStore, guild_id: Id<GuildMarker>, author: Id<UserMarker>) -> miette::Result<()> {
	settings
		.update(guild_id, |guild_settings| {
			guild_settings.usercache.retain(|user| *user != author);
		})
		.await?;
	Ok(())
}
