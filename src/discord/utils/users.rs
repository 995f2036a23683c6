// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use miette::Diagnostic;
use std::fmt;
use twilight_http::client::Client;
use twilight_http::error::Error;
use twilight_http::response::DeserializeBodyError;
use twilight_model::id::Id;
use twilight_model::id::marker::{GuildMarker, UserMarker};
use twilight_model::util::ImageHash;

/// User data obtained from guild member data, falling back to the user data if the guild member data is not available.
#[derive(Debug)]
pub struct UserData {
	pub display_name: String,
	pub avatar_url: String,
}

/// Error data for getting user/member data
#[derive(Debug, Diagnostic)]
pub enum UserDataError {
	Http(Error),
	Deserialize(DeserializeBodyError),
}

impl From<Error> for UserDataError {
	fn from(error: Error) -> Self {
		Self::Http(error)
	}
}

impl From<DeserializeBodyError> for UserDataError {
	fn from(error: DeserializeBodyError) -> Self {
		Self::Deserialize(error)
	}
}

impl std::error::Error for UserDataError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Http(error) => Some(error),
			Self::Deserialize(error) => Some(error),
		}
	}
}

impl fmt::Display for UserDataError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Http(error) => write!(f, "HTTP error: {}", error),
			Self::Deserialize(error) => write!(f, "deserialization error: {}", error),
		}
	}
}

/// Gets member data with a fallback to user data
pub async fn get_member_data(
	http_client: &Client,
	guild_id: Id<GuildMarker>,
	user_id: Id<UserMarker>,
) -> Result<UserData, UserDataError> {
	let member = get_member_data_only(http_client, guild_id, user_id).await;
	match member {
		Ok(member) => Ok(member),
		Err(_) => get_user_data_only(http_client, user_id).await,
	}
}

async fn get_member_data_only(
	http_client: &Client,
	guild_id: Id<GuildMarker>,
	user_id: Id<UserMarker>,
) -> Result<UserData, UserDataError> {
	let member_response = http_client.guild_member(guild_id, user_id).await?;
	let member = member_response.model().await?;

	let avatar_url = avatar_url(member.user.id, member.user.avatar, member.user.discriminator);
	let display_name = member.nick.or(member.user.global_name).unwrap_or(member.user.name);
	Ok(UserData {
		display_name,
		avatar_url,
	})
}

async fn get_user_data_only(http_client: &Client, user_id: Id<UserMarker>) -> Result<UserData, UserDataError> {
	let user_response = http_client.user(user_id).await?;
	let user = user_response.model().await?;

	let avatar_url = avatar_url(user.id, user.avatar, user.discriminator);
	let display_name = user.global_name.unwrap_or(user.name);
	Ok(UserData {
		display_name,
		avatar_url,
	})
}

/// The CDN URL for a user's avatar, falling back to the applicable default avatar for users with
/// no avatar set.
pub fn avatar_url(user_id: Id<UserMarker>, avatar: Option<ImageHash>, discriminator: u16) -> String {
	match avatar {
		Some(avatar) => format!("https://cdn.discordapp.com/avatars/{}/{}.png", user_id, avatar),
		None => format!(
			"https://cdn.discordapp.com/embed/avatars/{}.png",
			default_avatar_index(user_id, discriminator)
		),
	}
}

// Legacy users keep the discriminator-derived default avatar; users on the current username
// system get one of the six ID-derived defaults.
fn default_avatar_index(user_id: Id<UserMarker>, discriminator: u16) -> u64 {
	if discriminator == 0 {
		(user_id.get() >> 22) % 6
	} else {
		u64::from(discriminator) % 5
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn avatar_url_uses_the_set_avatar() {
		let hash = ImageHash::parse(b"1234567890abcdef1234567890abcdef").unwrap();
		let url = avatar_url(Id::new(80351110224678912), Some(hash), 0);
		assert_eq!(
			url,
			"https://cdn.discordapp.com/avatars/80351110224678912/1234567890abcdef1234567890abcdef.png"
		);
	}

	#[test]
	fn legacy_users_fall_back_by_discriminator() {
		let url = avatar_url(Id::new(80351110224678912), None, 1337);
		assert_eq!(url, "https://cdn.discordapp.com/embed/avatars/2.png");
	}

	#[test]
	fn migrated_users_fall_back_by_id() {
		let user_id: Id<UserMarker> = Id::new(80351110224678912);
		let expected_index = (user_id.get() >> 22) % 6;
		let url = avatar_url(user_id, None, 0);
		assert_eq!(
			url,
			format!("https://cdn.discordapp.com/embed/avatars/{}.png", expected_index)
		);
	}
}
