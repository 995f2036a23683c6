// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::timeout;
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, GuildMarker, UserMarker};

/// How long a prompted user has to reply with their suggestion before the prompt is abandoned.
pub const PROMPT_WAIT_TIME: Duration = Duration::from_secs(120);

/// The reply collected from a prompted user's DM.
#[derive(Debug)]
pub struct CollectedSuggestion {
	pub text: String,
	pub submitted_at: Option<DateTime<Utc>>,
}

/// All DM prompts currently waiting on a user's reply, keyed by the DM channel and the prompted
/// user. Entries are made and removed while holding the bot state write lock.
#[derive(Debug, Default)]
pub struct PendingSuggestions {
	pub states: HashMap<(Id<ChannelMarker>, Id<UserMarker>), PendingSuggestion>,
}

#[derive(Debug)]
pub struct PendingSuggestion {
	pub guild: Id<GuildMarker>,
	pub respond: oneshot::Sender<CollectedSuggestion>,
}

impl PendingSuggestions {
	/// Registers a new pending prompt and returns the receiver its flow should wait on.
	///
	/// A prompt already pending for the same user on the same DM channel (possible when the user
	/// was prompted from another guild) is superseded; its waiter observes a cancellation.
	pub fn register(
		&mut self,
		channel: Id<ChannelMarker>,
		user: Id<UserMarker>,
		guild: Id<GuildMarker>,
	) -> oneshot::Receiver<CollectedSuggestion> {
		let (respond, receiver) = oneshot::channel();
		self.states.insert((channel, user), PendingSuggestion { guild, respond });
		receiver
	}

	/// Completes the pending prompt matching an incoming DM, handing the reply to its waiter.
	/// Returns whether a waiting prompt was matched.
	pub fn complete(&mut self, channel: Id<ChannelMarker>, user: Id<UserMarker>, reply: CollectedSuggestion) -> bool {
		let Some(pending) = self.states.remove(&(channel, user)) else {
			return false;
		};
		pending.respond.send(reply).is_ok()
	}

	/// Drops the pending prompt for a user, if one is still registered. Used by the waiter after
	/// a timeout so the entry can't complete later.
	pub fn remove(&mut self, channel: Id<ChannelMarker>, user: Id<UserMarker>) {
		self.states.remove(&(channel, user));
	}
}

/// What became of a DM prompt.
#[derive(Debug)]
pub enum PromptOutcome {
	/// The user replied within the window.
	Collected(CollectedSuggestion),
	/// The prompt was superseded or dropped; nobody will answer it.
	Cancelled,
	/// The reply window elapsed.
	TimedOut,
}

/// Waits for the prompt's reply, bounding the wait to [PROMPT_WAIT_TIME].
pub async fn await_reply(receiver: oneshot::Receiver<CollectedSuggestion>) -> PromptOutcome {
	match timeout(PROMPT_WAIT_TIME, receiver).await {
		Ok(Ok(reply)) => PromptOutcome::Collected(reply),
		Ok(Err(_)) => PromptOutcome::Cancelled,
		Err(_) => PromptOutcome::TimedOut,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const CHANNEL: Id<ChannelMarker> = Id::new(100);
	const USER: Id<UserMarker> = Id::new(200);
	const GUILD: Id<GuildMarker> = Id::new(300);

	fn reply(text: &str) -> CollectedSuggestion {
		CollectedSuggestion {
			text: String::from(text),
			submitted_at: None,
		}
	}

	#[tokio::test]
	async fn a_matching_reply_completes_the_prompt() {
		let mut pending = PendingSuggestions::default();
		let receiver = pending.register(CHANNEL, USER, GUILD);

		assert!(pending.complete(CHANNEL, USER, reply("add dark mode")));
		assert!(pending.states.is_empty());

		let outcome = await_reply(receiver).await;
		let PromptOutcome::Collected(collected) = outcome else {
			panic!("expected the prompt to collect the reply, got {:?}", outcome);
		};
		assert_eq!(collected.text, "add dark mode");
	}

	#[test]
	fn a_non_matching_message_completes_nothing() {
		let mut pending = PendingSuggestions::default();
		let _receiver = pending.register(CHANNEL, USER, GUILD);

		assert!(!pending.complete(CHANNEL, Id::new(201), reply("not for you")));
		assert!(!pending.complete(Id::new(101), USER, reply("wrong channel")));
		assert_eq!(pending.states.len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn the_wait_times_out_without_a_reply() {
		let mut pending = PendingSuggestions::default();
		let receiver = pending.register(CHANNEL, USER, GUILD);

		let outcome = await_reply(receiver).await;
		assert!(matches!(outcome, PromptOutcome::TimedOut));

		pending.remove(CHANNEL, USER);
		assert!(pending.states.is_empty());
	}

	#[tokio::test]
	async fn a_superseding_prompt_cancels_the_old_waiter() {
		let mut pending = PendingSuggestions::default();
		let first_receiver = pending.register(CHANNEL, USER, GUILD);
		let _second_receiver = pending.register(CHANNEL, USER, Id::new(301));

		let outcome = await_reply(first_receiver).await;
		assert!(matches!(outcome, PromptOutcome::Cancelled));
		assert_eq!(pending.states.len(), 1);
	}
}
