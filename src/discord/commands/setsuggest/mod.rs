// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::store::SettingsStore;
use miette::bail;
use std::sync::Arc;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::client::Client;
use twilight_model::application::command::{Command, CommandType};
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::guild::Permissions;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use twilight_util::builder::command::{CommandBuilder, IntegerBuilder, StringBuilder, SubCommandBuilder};

mod fixcache;
mod output;
mod reset;
mod toggleactive;

pub fn command_definition() -> Command {
	let toggleactive_subcommand =
		SubCommandBuilder::new("toggleactive", "Toggles whether the suggestion box is enabled or not");

	let channel_option = StringBuilder::new("channel", "The id of the channel to post suggestions to").required(true);
	let server_option = StringBuilder::new("server", "The id of the server to configure, if not this one");
	let output_subcommand = SubCommandBuilder::new("output", "Sets the output channel(s) by id")
		.option(channel_option)
		.option(server_option);

	let value_option = IntegerBuilder::new("value", "The value to reset the ticket counter to");
	let reset_subcommand =
		SubCommandBuilder::new("reset", "Resets the ticket counter for this server").option(value_option);

	let fixcache_subcommand = SubCommandBuilder::new(
		"fixcache",
		"Use this if the bot gets stuck not recording your response",
	);

	CommandBuilder::new(
		"setsuggest",
		"Configure the suggestion box for your server",
		CommandType::ChatInput,
	)
	.dm_permission(false)
	.default_member_permissions(Permissions::MANAGE_GUILD)
	.option(toggleactive_subcommand)
	.option(output_subcommand)
	.option(reset_subcommand)
	.option(fixcache_subcommand)
	.build()
}

pub async fn handle_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	http_client: &Arc<Client>,
	application_id: Id<ApplicationMarker>,
	settings: Arc<SettingsStore>,
	cache: Arc<DefaultInMemoryCache>,
) -> miette::Result<()> {
	let Some(guild_id) = interaction.guild_id else {
		bail!("Suggestion box configuration was used outside of a guild");
	};
	let Some(subcommand_data) = command_data.options.first() else {
		bail!("Setsuggest command invoked with no subcommand");
	};

	match subcommand_data.name.as_str() {
		"toggleactive" => {
			toggleactive::handle_subcommand(interaction, guild_id, http_client, application_id, settings).await
		}
		"output" => {
			output::handle_subcommand(
				interaction,
				guild_id,
				&subcommand_data.value,
				http_client,
				application_id,
				settings,
				cache,
			)
			.await
		}
		"reset" => {
			reset::handle_subcommand(
				interaction,
				guild_id,
				&subcommand_data.value,
				http_client,
				application_id,
				settings,
			)
			.await
		}
		"fixcache" => fixcache::handle_subcommand(interaction, guild_id, http_client, application_id, settings).await,
		_ => bail!(
			"Unknown setsuggest subcommand encountered: {}\n{:?}",
			subcommand_data.name,
			command_data
		),
	}
}
