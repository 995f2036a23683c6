// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use chrono::{DateTime, TimeZone, Utc};
use twilight_model::util::datetime::Timestamp;
use twilight_util::snowflake::Snowflake;

/// Gets the timestamp from the ID snowflake. If any failures occur in the conversion, returns `None`.
pub fn datetime_from_id(id: impl Snowflake) -> Option<DateTime<Utc>> {
	let timestamp = id.timestamp();
	Utc.timestamp_millis_opt(timestamp).single()
}

/// Gets the [DateTime] object for a timestamp from Discord. If any failures occur in the conversion, returns `None`.
pub fn datetime_from_timestamp(timestamp: &Timestamp) -> Option<DateTime<Utc>> {
	let micros = timestamp.as_micros();
	Utc.timestamp_micros(micros).single()
}

#[cfg(test)]
mod tests {
	use super::*;
	use twilight_model::id::Id;
	use twilight_model::id::marker::UserMarker;

	#[test]
	fn snowflake_conversion_matches_the_documented_example() {
		// The worked example from Discord's snowflake documentation.
		let id: Id<UserMarker> = Id::new(175928847299117063);
		let datetime = datetime_from_id(id).unwrap();
		assert_eq!(datetime.format("%Y-%m-%d %H:%M").to_string(), "2016-04-30 11:18");
	}

	#[test]
	fn message_timestamps_convert_without_loss() {
		let timestamp = Timestamp::from_secs(1462015105).unwrap();
		let datetime = datetime_from_timestamp(&timestamp).unwrap();
		assert_eq!(datetime, Utc.timestamp_opt(1462015105, 0).single().unwrap());
	}
}
