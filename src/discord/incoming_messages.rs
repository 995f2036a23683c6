// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use super::state::prompt::{CollectedSuggestion, PendingSuggestions};
use super::utils::timestamp::datetime_from_timestamp;
use std::sync::Arc;
use tokio::sync::RwLock;
use twilight_model::channel::message::Message;
use type_map::concurrent::TypeMap;

/// Routes an incoming message to the DM prompt waiting on it, if any.
///
/// Only direct messages can match a pending prompt; everything else (guild chatter, other users'
/// DMs, the bot's own prompt messages) falls through without effect.
pub async fn handle_message(message: &Message, bot_state: Arc<RwLock<TypeMap>>) -> miette::Result<()> {
	if message.author.bot || message.guild_id.is_some() {
		return Ok(());
	}

	let mut states = bot_state.write().await;
	let Some(pending) = states.get_mut::<PendingSuggestions>() else {
		return Ok(());
	};

	let reply = CollectedSuggestion {
		text: message.content.clone(),
		submitted_at: datetime_from_timestamp(&message.timestamp),
	};
	if pending.complete(message.channel_id, message.author.id, reply) {
		tracing::debug!(user = %message.author.id, "Collected a suggestion from a DM reply");
	}

	Ok(())
}
