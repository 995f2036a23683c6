// © 2024-2025 ElementalAlchemist and the Dainsleif Mains Development Team
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

pub const NOT_CONFIGURED_FOR_GUILD: &str = "Suggestion submissions have not been configured for this server.";

pub const SUGGESTIONS_NOT_ENABLED: &str = "Suggestion submission is not currently enabled on this server.";

pub const PRIOR_SUGGESTION_UNFINISHED: &str =
	"Finish making your prior suggestion before making an additional one.";

pub const COLLECTING_BY_DM: &str = "I will message you to collect your suggestion.";

pub const DM_PROMPT: &str =
	"Please respond to this message with your suggestion.\nYour suggestion should be a single message.";

pub const PROMPT_TIMED_OUT: &str = "I can't wait forever, try again when ready";

pub const SUGGESTION_SUBMITTED: &str = "Your suggestion was submitted.";

pub const CHANNEL_ALREADY_OUTPUT: &str = "Channel already set as output";

pub const CHANNEL_ADDED_TO_OUTPUTS: &str = "Channel added to output list";

pub const CHANNEL_SET_AS_OUTPUT: &str = "Channel set as output";

pub const CHANNEL_NOT_FOUND: &str = "I couldn't find a channel with that id";

pub const INTERNAL_ERROR: &str = "An internal error occurred handling this command.";
