// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use twilight_model::id::Id;
use twilight_model::id::marker::{ChannelMarker, UserMarker};

/// The suggestion box settings for a single guild.
///
/// Records are persisted as a JSON mapping from guild ID to this structure. Fields missing from
/// an older settings file take the defaults listed on each field.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GuildSettings {
	/// Whether suggestion intake is turned off. New guilds start disabled until an administrator
	/// runs `/setsuggest toggleactive`.
	#[serde(default = "default_inactive")]
	pub inactive: bool,
	/// The channels suggestion cards are posted to, in the order they were added.
	#[serde(default)]
	pub output: Vec<Id<ChannelMarker>>,
	/// Reserved. No behavior is currently attached to this flag; it is carried in the settings
	/// file for forward compatibility.
	#[serde(default)]
	pub cleanup: bool,
	/// When set, adding an output channel appends to the list; when unset, it replaces it.
	#[serde(default)]
	pub multiout: bool,
	/// The ticket counter. Incremented once per accepted suggestion.
	#[serde(default)]
	pub tickets: u64,
	/// Users who have been sent a DM prompt and haven't replied or timed out yet.
	///
	/// This list is ephemeral; it is written out with the rest of the record but reset to empty
	/// whenever the settings file is loaded.
	#[serde(default)]
	pub usercache: Vec<Id<UserMarker>>,
}

impl GuildSettings {
	/// Records a new output channel, appending when multiple outputs are enabled and replacing
	/// the whole list otherwise.
	pub fn add_output(&mut self, channel: Id<ChannelMarker>) {
		if self.multiout {
			self.output.push(channel);
		} else {
			self.output = vec![channel];
		}
	}
}

fn default_inactive() -> bool {
	true
}

impl Default for GuildSettings {
	fn default() -> Self {
		Self {
			inactive: true,
			output: Vec::new(),
			cleanup: false,
			multiout: false,
			tickets: 0,
			usercache: Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_guilds_start_disabled_with_no_outputs() {
		let settings = GuildSettings::default();
		assert!(settings.inactive);
		assert!(settings.output.is_empty());
		assert!(!settings.cleanup);
		assert!(!settings.multiout);
		assert_eq!(settings.tickets, 0);
		assert!(settings.usercache.is_empty());
	}

	#[test]
	fn records_survive_a_json_round_trip() {
		let settings = GuildSettings {
			inactive: false,
			output: vec![Id::new(1001), Id::new(1002)],
			cleanup: false,
			multiout: true,
			tickets: 17,
			usercache: vec![Id::new(2001)],
		};
		let serialized = serde_json::to_string(&settings).unwrap();
		let restored: GuildSettings = serde_json::from_str(&serialized).unwrap();
		assert!(!restored.inactive);
		assert_eq!(restored.output, settings.output);
		assert!(restored.multiout);
		assert_eq!(restored.tickets, 17);
		assert_eq!(restored.usercache, settings.usercache);
	}

	#[test]
	fn missing_fields_default_deterministically() {
		let restored: GuildSettings = serde_json::from_str("{}").unwrap();
		assert!(restored.inactive);
		assert!(restored.output.is_empty());
		assert_eq!(restored.tickets, 0);
		assert!(restored.usercache.is_empty());
	}

	#[test]
	fn single_output_mode_replaces_the_list() {
		let mut settings = GuildSettings::default();
		settings.add_output(Id::new(10));
		settings.add_output(Id::new(20));
		assert_eq!(settings.output, vec![Id::new(20)]);
	}

	#[test]
	fn multiple_output_mode_appends_in_order() {
		let mut settings = GuildSettings {
			multiout: true,
			..GuildSettings::default()
		};
		settings.add_output(Id::new(10));
		settings.add_output(Id::new(20));
		assert_eq!(settings.output, vec![Id::new(10), Id::new(20)]);
	}

	#[test]
	fn channel_ids_serialize_as_strings() {
		let settings = GuildSettings {
			output: vec![Id::new(123)],
			..GuildSettings::default()
		};
		let serialized = serde_json::to_string(&settings).unwrap();
		assert!(serialized.contains("\"123\""));
	}
}
