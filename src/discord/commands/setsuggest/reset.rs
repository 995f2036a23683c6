// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::discord::utils::responses::NOT_CONFIGURED_FOR_GUILD;
use crate::store::SettingsStore;
use miette::{IntoDiagnostic, bail, ensure};
use std::sync::Arc;
use twilight_http::client::Client;
use twilight_model::application::interaction::application_command::CommandOptionValue;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, GuildMarker};
use twilight_util::builder::InteractionResponseDataBuilder;

/// Resets the guild's ticket counter, to zero or to the passed value. The counter can't go
/// negative, so negative values are clamped to zero. Guilds that were never configured are left
/// without a settings record.
pub async fn handle_subcommand(
	interaction: &InteractionCreate,
	guild_id: Id<GuildMarker>,
	subcommand_value: &CommandOptionValue,
	http_client: &Arc<Client>,
	application_id: Id<ApplicationMarker>,
	settings: Arc<SettingsStore>,
) -> miette::Result<()> {
	let CommandOptionValue::SubCommand(values) = subcommand_value else {
		bail!("Command data is malformed; expected `/setsuggest reset` to get subcommand data");
	};
	let value = match values.first() {
		Some(value_option) => {
			ensure!(
				value_option.name.as_str() == "value",
				"The only option for `/setsuggest reset` should be `value`"
			);
			let CommandOptionValue::Integer(value) = value_option.value else {
				bail!("Command data is malformed; expected `value` option of `/setsuggest reset` to be an integer");
			};
			value
		}
		None => 0,
	};
	let new_count = u64::try_from(value).unwrap_or(0);

	let updated = settings
		.update(guild_id, |guild_settings| guild_settings.tickets = new_count)
		.await?;

	let content = match updated {
		Some(_) => format!("Suggestion counter reset to {}.", new_count),
		None => String::from(NOT_CONFIGURED_FOR_GUILD),
	};

	let interaction_client = http_client.interaction(application_id);
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
