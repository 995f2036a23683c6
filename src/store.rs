// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::model::GuildSettings;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;
use twilight_model::id::Id;
use twilight_model::id::marker::GuildMarker;

type SettingsMap = HashMap<Id<GuildMarker>, GuildSettings>;

/// The per-guild settings, backed by a JSON file.
///
/// The file is read once at startup and treated as the in-memory source of truth afterwards;
/// every mutation writes the whole mapping back out. No cross-process coordination is attempted.
pub struct SettingsStore {
	path: PathBuf,
	guilds: RwLock<SettingsMap>,
}

impl SettingsStore {
	/// Loads the settings mapping from the given file.
	///
	/// A missing or unparseable file yields an empty mapping. The `usercache` of every loaded
	/// record is reset; pending DM prompts do not survive a restart.
	pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		if let Some(parent) = path.parent()
			&& !parent.as_os_str().is_empty()
		{
			fs::create_dir_all(parent).await.into_diagnostic()?;
		}

		let guilds = match fs::read_to_string(&path).await {
			Ok(contents) => match serde_json::from_str::<SettingsMap>(&contents) {
				Ok(mut guilds) => {
					for settings in guilds.values_mut() {
						settings.usercache.clear();
					}
					guilds
				}
				Err(error) => {
					tracing::warn!(source = ?error, path = %path.display(), "Settings file is not valid JSON; starting with empty settings");
					SettingsMap::new()
				}
			},
			Err(error) if error.kind() == ErrorKind::NotFound => SettingsMap::new(),
			Err(error) => return Err(error).into_diagnostic(),
		};

		Ok(Self {
			path,
			guilds: RwLock::new(guilds),
		})
	}

	/// Gets a copy of a guild's settings record, if the guild has one.
	pub async fn guild(&self, guild: Id<GuildMarker>) -> Option<GuildSettings> {
		let guilds = self.guilds.read().await;
		guilds.get(&guild).cloned()
	}

	/// Gets a guild's settings record, creating and persisting the default record first if the
	/// guild doesn't have one yet.
	pub async fn ensure(&self, guild: Id<GuildMarker>) -> Result<GuildSettings> {
		let mut guilds = self.guilds.write().await;
		if let Some(existing) = guilds.get(&guild) {
			return Ok(existing.clone());
		}
		let settings = GuildSettings::default();
		guilds.insert(guild, settings.clone());
		self.save(&guilds).await?;
		Ok(settings)
	}

	/// Applies a mutation to a guild's settings record and persists the result, returning the
	/// updated copy. Guilds with no record are left alone and `None` is returned.
	pub async fn update<F>(&self, guild: Id<GuildMarker>, mutate: F) -> Result<Option<GuildSettings>>
	where
		F: FnOnce(&mut GuildSettings),
	{
		let mut guilds = self.guilds.write().await;
		let Some(settings) = guilds.get_mut(&guild) else {
			return Ok(None);
		};
		mutate(settings);
		let updated = settings.clone();
		self.save(&guilds).await?;
		Ok(Some(updated))
	}

	async fn save(&self, guilds: &SettingsMap) -> Result<()> {
		let contents = serde_json::to_string_pretty(guilds).into_diagnostic()?;
		fs::write(&self.path, contents).await.into_diagnostic()?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use twilight_model::id::marker::UserMarker;

	fn temp_settings_path(name: &str) -> PathBuf {
		let mut path = std::env::temp_dir();
		path.push(format!("wishing-well-{}-{}.json", std::process::id(), name));
		path
	}

	const GUILD: Id<GuildMarker> = Id::new(987654321);
	const USER: Id<UserMarker> = Id::new(123456789);

	#[tokio::test]
	async fn missing_file_loads_as_empty() {
		let path = temp_settings_path("missing");
		let _ = std::fs::remove_file(&path);

		let store = SettingsStore::load(&path).await.unwrap();
		assert!(store.guild(GUILD).await.is_none());
	}

	#[tokio::test]
	async fn corrupt_file_loads_as_empty() {
		let path = temp_settings_path("corrupt");
		std::fs::write(&path, "this is not json {").unwrap();

		let store = SettingsStore::load(&path).await.unwrap();
		assert!(store.guild(GUILD).await.is_none());

		let _ = std::fs::remove_file(&path);
	}

	#[tokio::test]
	async fn ensure_creates_and_persists_the_default_record() {
		let path = temp_settings_path("ensure");
		let _ = std::fs::remove_file(&path);

		let store = SettingsStore::load(&path).await.unwrap();
		let settings = store.ensure(GUILD).await.unwrap();
		assert!(settings.inactive);
		assert_eq!(settings.tickets, 0);

		let reloaded = SettingsStore::load(&path).await.unwrap();
		let settings = reloaded.guild(GUILD).await.unwrap();
		assert!(settings.inactive);
		assert!(settings.output.is_empty());

		let _ = std::fs::remove_file(&path);
	}

	#[tokio::test]
	async fn ensure_leaves_an_existing_record_alone() {
		let path = temp_settings_path("ensure-existing");
		let _ = std::fs::remove_file(&path);

		let store = SettingsStore::load(&path).await.unwrap();
		store.ensure(GUILD).await.unwrap();
		store
			.update(GUILD, |settings| {
				settings.inactive = false;
				settings.tickets = 4;
			})
			.await
			.unwrap();

		let settings = store.ensure(GUILD).await.unwrap();
		assert!(!settings.inactive);
		assert_eq!(settings.tickets, 4);

		let _ = std::fs::remove_file(&path);
	}

	#[tokio::test]
	async fn usercache_does_not_survive_a_reload() {
		let path = temp_settings_path("usercache");
		let _ = std::fs::remove_file(&path);

		let store = SettingsStore::load(&path).await.unwrap();
		store.ensure(GUILD).await.unwrap();
		store
			.update(GUILD, |settings| {
				settings.usercache.push(USER);
				settings.tickets = 9;
			})
			.await
			.unwrap();

		let reloaded = SettingsStore::load(&path).await.unwrap();
		let settings = reloaded.guild(GUILD).await.unwrap();
		assert!(settings.usercache.is_empty());
		assert_eq!(settings.tickets, 9);

		let _ = std::fs::remove_file(&path);
	}

	#[tokio::test]
	async fn update_of_an_unknown_guild_is_a_no_op() {
		let path = temp_settings_path("unknown-update");
		let _ = std::fs::remove_file(&path);

		let store = SettingsStore::load(&path).await.unwrap();
		let updated = store.update(GUILD, |settings| settings.tickets = 100).await.unwrap();
		assert!(updated.is_none());
		assert!(store.guild(GUILD).await.is_none());
	}
}
