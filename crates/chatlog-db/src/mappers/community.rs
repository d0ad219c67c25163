//! Community, channel and thread entity <-> model mappers

use chatlog_core::entities::{Channel, Community, Thread};
use chatlog_core::value_objects::Snowflake;

use crate::models::{ChannelModel, CommunityModel, ThreadModel};

/// Convert CommunityModel to Community entity
impl From<CommunityModel> for Community {
    fn from(model: CommunityModel) -> Self {
        Community {
            id: Snowflake::new(model.community_id),
            name: model.name,
            disabled: model.disabled,
            created_at: model.created_at,
        }
    }
}

/// Convert ChannelModel to Channel entity
impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.channel_id),
            community_id: Snowflake::new(model.community_id),
            name: model.name,
            disabled: model.disabled,
            created_at: model.created_at,
        }
    }
}

/// Convert ThreadModel to Thread entity
impl From<ThreadModel> for Thread {
    fn from(model: ThreadModel) -> Self {
        Thread {
            id: Snowflake::new(model.thread_id),
            community_id: Snowflake::new(model.community_id),
            channel_id: Snowflake::new(model.channel_id),
            name: model.name,
            disabled: model.disabled,
            created_at: model.created_at,
        }
    }
}
