// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::store::SettingsStore;
use miette::bail;
use std::sync::Arc;
use tokio::sync::RwLock;
use twilight_cache_inmemory::DefaultInMemoryCache;
use twilight_http::client::Client;
use twilight_model::application::command::Command;
use twilight_model::application::interaction::application_command::CommandData;
use twilight_model::gateway::payload::incoming::InteractionCreate;
use twilight_model::id::Id;
use twilight_model::id::marker::ApplicationMarker;
use type_map::concurrent::TypeMap;

mod setsuggest;
mod suggest;

pub fn command_definitions() -> Vec<Command> {
	vec![setsuggest::command_definition(), suggest::command_definition()]
}

pub async fn route_command(
	interaction: &InteractionCreate,
	command_data: &CommandData,
	http_client: &Arc<Client>,
	application_id: Id<ApplicationMarker>,
	settings: Arc<SettingsStore>,
	cache: Arc<DefaultInMemoryCache>,
	bot_state: Arc<RwLock<TypeMap>>,
) -> miette::Result<()> {
	match command_data.name.as_str() {
		"setsuggest" => {
			setsuggest::handle_command(
				interaction,
				command_data,
				http_client,
				application_id,
				settings,
				cache,
			)
			.await
		}
		"suggest" => {
			suggest::handle_command(
				interaction,
				command_data,
				http_client,
				application_id,
				settings,
				cache,
				bot_state,
			)
			.await
		}
		_ => bail!("Unknown command encountered: {}\n{:?}", command_data.name, command_data),
	}
}
