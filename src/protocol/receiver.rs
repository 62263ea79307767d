//! Wearable-side handling of league updates.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::data_map::{DataEvent, DataEventKind, DataItem};
use super::league_data;
use super::paths;
use super::transport::{DataListener, WearTransport};
use crate::yahoo::Matchup;

/// Score summary shown for one league
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreNotification {
    pub title: String,
    pub text: String,
}

impl ScoreNotification {
    pub fn from_matchup(matchup: &Matchup) -> Self {
        let score = &matchup.my_team.score;
        let opponent_score = &matchup.opponent_team.score;
        let opponent = &matchup.opponent_team.name;
        let text = match (score.parse::<f64>(), opponent_score.parse::<f64>()) {
            (Ok(mine), Ok(theirs)) if mine == theirs => format!("Tied with {opponent}"),
            (Ok(mine), Ok(theirs)) if mine > theirs => format!("Beating {opponent}"),
            (Ok(_), Ok(_)) => format!("Losing to {opponent}"),
            _ => format!("Playing {opponent}"),
        };
        Self {
            title: format!("{score} - {opponent_score}"),
            text,
        }
    }
}

/// Shows and clears per-league notifications, keyed by tag
pub trait NotificationSink: Send + Sync {
    fn show(&self, tag: &str, notification: ScoreNotification);
    fn cancel(&self, tag: &str);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotificationSink;

impl NotificationSink for LogNotificationSink {
    fn show(&self, tag: &str, notification: ScoreNotification) {
        info!(tag, title = %notification.title, text = %notification.text, "Score update");
    }

    fn cancel(&self, tag: &str) {
        info!(tag, "League removed");
    }
}

/// Receives league updates on the wearable, acknowledging forced ones.
pub struct WearReceiver {
    transport: Arc<dyn WearTransport>,
    notifications: Arc<dyn NotificationSink>,
}

impl WearReceiver {
    pub fn new(transport: Arc<dyn WearTransport>, notifications: Arc<dyn NotificationSink>) -> Self {
        Self {
            transport,
            notifications,
        }
    }

    async fn on_league_changed(&self, tag: &str, item: &DataItem) {
        debug!(tag, "Got league change event");
        if league_data::is_manual_sync(&item.data_map) {
            if let Err(e) = self
                .transport
                .send_message(paths::ACK, item.path.as_bytes())
                .await
            {
                error!(error = %e, path = %item.path, "Failed to send ACK");
            }
        }

        match league_data::matchup(&item.data_map) {
            Some(matchup) => self
                .notifications
                .show(tag, ScoreNotification::from_matchup(&matchup)),
            None => error!(tag, "League update has no readable matchup"),
        }
    }
}

#[async_trait]
impl DataListener for WearReceiver {
    async fn on_data_changed(&self, events: Vec<DataEvent>) {
        for event in events {
            let Some(tag) = league_data::tag_if_matches(&event.item.path) else {
                error!(path = %event.item.path, "Unrecognized data item path");
                continue;
            };
            match event.kind {
                DataEventKind::Changed => self.on_league_changed(&tag, &event.item).await,
                DataEventKind::Deleted => {
                    debug!(tag, "Got league deleted event");
                    self.notifications.cancel(&tag);
                }
            }
        }
    }
}
