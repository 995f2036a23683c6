// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::store::SettingsStore;
use miette::{IntoDiagnostic, bail};
use std::sync::Arc;
use twilight_http::client::Client;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::http::interaction::{InteractionResponse, InteractionResponseType};
use twilight_model::id::Id;
use twilight_model::id::marker::{ApplicationMarker, GuildMarker};
use twilight_util::builder::InteractionResponseDataBuilder;

/// Clears the guild's pending-user list so members whose DM prompt got stuck can suggest again.
pub async fn handle_subcommand(
	interaction: &InteractionCreate,
	guild_id: Id<GuildMarker>,
	http_client: &Arc<Client>,
	application_id: Id<ApplicationMarker>,
	settings: Arc<SettingsStore>,
) -> miette::Result<()> {
	settings.ensure(guild_id).await?;
	let updated = settings
		.update(guild_id, |guild_settings| guild_settings.usercache.clear())
		.await?;
	if updated.is_none() {
		bail!("Guild settings record disappeared while clearing the pending-user cache");
	}

	let interaction_client = http_client.interaction(application_id);
	let response = InteractionResponseDataBuilder::new()
		.content("Cleared the pending suggestion cache for this server.")
		.build();
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
