// © 2024 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;
use wishing_well::config::parse_config;
use wishing_well::discord::{run_bot, set_up_client};
use wishing_well::store::SettingsStore;

#[tokio::main]
async fn main() -> miette::Result<()> {
	tracing_subscriber::fmt::init();

	let config_path = std::env::args().nth(1).unwrap_or_else(|| String::from("config.kdl"));
	let config = Arc::new(parse_config(&config_path).await?);

	let settings = Arc::new(SettingsStore::load(config.settings_file()).await?);
	let http_client = set_up_client(&config);

	run_bot(settings, config, http_client).await
}
