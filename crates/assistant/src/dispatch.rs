//! Outbound dispatch — a cleaned reply turned into channel sends.

use dealerbot_catalog::AssetLibrary;
use dealerbot_core::channel::Channel;
use dealerbot_core::error::ChannelError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::reply::{extract_marker, Marker};

/// What will be sent for one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundPlan {
    Text(String),
    /// The text, then every image without caption
    TextThenImages { text: String, images: Vec<PathBuf> },
    /// The text as the caption of one attachment
    Captioned { caption: String, attachment: PathBuf },
}

/// Resolve a reply's marker against the asset library.
///
/// A marker whose asset cannot be found degrades to the stripped text alone.
pub fn plan_reply(reply: &str, assets: &AssetLibrary) -> OutboundPlan {
    let (marker, text) = extract_marker(reply);
    let Some(marker) = marker else {
        return OutboundPlan::Text(text);
    };

    let plan = match &marker {
        Marker::AllColors(name) => assets
            .motor_images(name)
            .map(|images| OutboundPlan::TextThenImages { text: text.clone(), images }),
        Marker::PriceList(name) => assets.price_list(name).map(|attachment| OutboundPlan::Captioned {
            caption: text.clone(),
            attachment,
        }),
        Marker::Image(name) => assets.motor_image(name).map(|attachment| OutboundPlan::Captioned {
            caption: text.clone(),
            attachment,
        }),
    };

    plan.unwrap_or_else(|| {
        warn!(marker = ?marker, "Requested asset not found; sending text only");
        OutboundPlan::Text(text)
    })
}

/// [`plan_reply`] on the blocking pool; asset lookups read directories.
pub async fn plan_reply_blocking(reply: String, assets: Arc<AssetLibrary>) -> OutboundPlan {
    let fallback = extract_marker(&reply).1;
    match tokio::task::spawn_blocking(move || plan_reply(&reply, &assets)).await {
        Ok(plan) => plan,
        Err(e) => {
            warn!(error = %e, "Asset lookup task failed; sending text only");
            OutboundPlan::Text(fallback)
        }
    }
}

/// Send an attachment, falling back to the caption alone when that fails.
async fn send_attachment_or_text(
    channel: &dyn Channel,
    destination: &str,
    caption: &str,
    attachment: &std::path::Path,
) -> Result<(), ChannelError> {
    match channel.send_attachment(destination, caption, attachment).await {
        Ok(()) => Ok(()),
        Err(e) => {
            warn!(channel = channel.name(), error = %e, "Attachment failed; sending text only");
            if caption.is_empty() {
                Ok(())
            } else {
                channel.send_text(destination, caption).await
            }
        }
    }
}

/// Carry out a plan, pausing `delay` after each image of a colour set.
pub async fn deliver(
    channel: &dyn Channel,
    destination: &str,
    plan: &OutboundPlan,
    delay: Duration,
) -> Result<(), ChannelError> {
    match plan {
        OutboundPlan::Text(text) => channel.send_text(destination, text).await,
        OutboundPlan::TextThenImages { text, images } => {
            channel.send_text(destination, text).await?;
            for image in images {
                send_attachment_or_text(channel, destination, "", image).await?;
                tokio::time::sleep(delay).await;
            }
            info!(destination, count = images.len(), "Colour images sent");
            Ok(())
        }
        OutboundPlan::Captioned { caption, attachment } => {
            send_attachment_or_text(channel, destination, caption, attachment).await
        }
    }
}
