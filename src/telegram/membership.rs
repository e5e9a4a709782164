//! Required-channel membership gate

use teloxide::types::{ChatId, UserId};

use crate::core::config::channels::RequiredChannel;
use crate::telegram::transport::Transport;

/// Returns true only if the user is present in every required channel.
///
/// Channels are checked in order and the first left, banned or failed lookup
/// decides: a lookup error counts as "not a member". No channels means
/// everyone is admitted.
pub async fn is_member(transport: &dyn Transport, channels: &[RequiredChannel], user_id: UserId) -> bool {
    for channel in channels {
        match transport.member_status(ChatId(channel.chat_id), user_id).await {
            Ok(status) if status.is_present() => continue,
            Ok(status) => {
                log::debug!("User {} is {:?} in channel {}", user_id.0, status, channel.chat_id);
                return false;
            }
            Err(e) => {
                log::warn!(
                    "Error checking membership of user {} in channel {}: {}",
                    user_id.0,
                    channel.chat_id,
                    e
                );
                return false;
            }
        }
    }
    true
}
