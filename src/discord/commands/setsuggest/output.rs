// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::utils::responses::{
	CHANNEL_ADDED_TO_OUTPUTS, CHANNEL_ALREADY_OUTPUT, CHANNEL_NOT_FOUND, CHANNEL_SET_AS_OUTPUT,
};
use crate::store::SettingsStore;
use miette::{IntoDiagnostic, bail, ensure};
use std::sync::Arc;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::client::Client;
use twilight_model::application::interaction::application_command::CommandOptionValue;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, ChannelMarker, GuildMarker};
use twilight_util::builder::InteractionResponseDataBuilder;

/// Sets or adds an output channel for posted suggestions.
///
/// The target guild defaults to the invoking guild; administrators may pass another guild's id
/// to configure a server the bot shares with them. Channel ids are only accepted if they belong
/// to the target guild at the time of the command.
pub async fn handle_subcommand(
	interaction: &InteractionCreate,
	guild_id: Id<GuildMarker>,
	subcommand_value: &CommandOptionValue,
	http_client: &Arc<Client>,
	application_id: Id<ApplicationMarker>,
	settings: Arc<SettingsStore>,
	cache: Arc<DefaultInMemoryCache>,
) -> miette::Result<()> {
	let CommandOptionValue::SubCommand(values) = subcommand_value else {
		bail!("Command data is malformed; expected `/setsuggest output` to get subcommand data");
	};
	let Some(channel_value) = values.first() else {
		bail!("Command data is malformed; expected `/setsuggest output` to have required option `channel`");
	};
	ensure!(
		channel_value.name.as_str() == "channel",
		"The first option for `/setsuggest output` should be `channel`"
	);
	let CommandOptionValue::String(channel_argument) = &channel_value.value else {
		bail!("Command data is malformed; expected `channel` option of `/setsuggest output` to be a string");
	};

	let server_argument = match values.get(1) {
		Some(server_value) => {
			ensure!(
				server_value.name.as_str() == "server",
				"The second option for `/setsuggest output` should be `server`"
			);
			let CommandOptionValue::String(server_argument) = &server_value.value else {
				bail!("Command data is malformed; expected `server` option of `/setsuggest output` to be a string");
			};
			Some(server_argument.clone())
		}
		None => None,
	};

	let interaction_client = http_client.interaction(application_id);

	// A server argument naming a guild the bot isn't in falls through to the channel lookup
	// below, which can't succeed; an unparseable one gets the same answer.
	let target_guild = match server_argument {
		Some(raw_id) => raw_id.trim().parse::<u64>().ok().and_then(Id::new_checked),
		None => Some(guild_id),
	};
	let parsed_channel: Option<Id<ChannelMarker>> = channel_argument.trim().parse::<u64>().ok().and_then(Id::new_checked);

	let (Some(target_guild), Some(channel)) = (target_guild, parsed_channel) else {
		let response = InteractionResponseDataBuilder::new().content(CHANNEL_NOT_FOUND).build();
		let response = InteractionResponse {
			kind: InteractionResponseType::ChannelMessageWithSource,
			data: Some(response),
		};
		interaction_client
			.create_response(interaction.id, &interaction.token, &response)
			.await
			.into_diagnostic()?;
		return Ok(());
	};

	let guild_settings = settings.ensure(target_guild).await?;

	if guild_settings.output.contains(&channel) {
		let response = InteractionResponseDataBuilder::new()
			.content(CHANNEL_ALREADY_OUTPUT)
			.build();
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

	let channel_belongs_to_guild = cache
		.guild_channels(target_guild)
		.is_some_and(|channels| channels.contains(&channel));
	if !channel_belongs_to_guild {
		let response = InteractionResponseDataBuilder::new().content(CHANNEL_NOT_FOUND).build();
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

	let updated = settings
		.update(target_guild, |guild_settings| guild_settings.add_output(channel))
		.await?;
	let Some(updated) = updated else {
		bail!("Guild settings record disappeared while setting the output channel");
	};

	let content = if updated.multiout {
		CHANNEL_ADDED_TO_OUTPUTS
	} else {
		CHANNEL_SET_AS_OUTPUT
	};
	let response = InteractionResponseDataBuilder::new().content(content).build();
	let response = InteractionResponse {
		kind: InteractionResponseType::ChannelMessageWithSource,
		data: Some(response),
	};
	interaction_client
		.create_response(interaction.id, &interaction.token, &response)
		.await
		.into_diagnostic()?;

	Ok(())
}
