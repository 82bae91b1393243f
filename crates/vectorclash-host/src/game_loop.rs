use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use vectorclash_core::game_trait::DuelGame;
use vectorclash_core::time::DEFAULT_TICK_RATE_HZ;

use crate::config::HostConfig;
use crate::error::SessionError;
use crate::session::{MatchSession, SessionBroadcast, SessionCommand};

/// Spawn a match tick loop as a tokio task.
/// Returns the command sender, broadcast receiver, and task handle.
pub fn spawn_match_session(
    game: Box<dyn DuelGame>,
    config: HostConfig,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<SessionBroadcast>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (broadcast_tx, broadcast_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        match run_match_loop(game, &config, cmd_rx, &broadcast_tx).await {
            Ok(()) => {},
            Err(e @ SessionError::Encode(_)) => {
                tracing::error!(error = %e, "Match session ended early");
            },
            Err(e) => tracing::warn!(error = %e, "Match session ended early"),
        }
        let _ = broadcast_tx.send(SessionBroadcast::Ended);
    });

    (cmd_tx, broadcast_rx, handle)
}

/// Frame-driven match loop. Commands are applied between frames.
async fn run_match_loop(
    game: Box<dyn DuelGame>,
    config: &HostConfig,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    broadcast_tx: &mpsc::UnboundedSender<SessionBroadcast>,
) -> Result<(), SessionError> {
    let mut session = MatchSession::new(game, config);

    let mut tick_rate = session.game().tick_rate();
    if !(tick_rate.is_finite() && tick_rate > 0.0) {
        tracing::warn!(tick_rate, "Invalid game tick rate, using {DEFAULT_TICK_RATE_HZ}");
        tick_rate = DEFAULT_TICK_RATE_HZ;
    }
    let tick_interval = Duration::from_secs_f32(1.0 / tick_rate);
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    tracing::info!(tick_rate, win_score = config.win_score, "Match session started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                for broadcast in session.frame(Instant::now())? {
                    broadcast_tx
                        .send(broadcast)
                        .map_err(|_| SessionError::ChannelClosed)?;
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::Control(event)) => session.apply_control(event),
                    Some(SessionCommand::Activate(active)) => session.set_active(active),
                    Some(SessionCommand::Rematch) => session.restart(config),
                    Some(SessionCommand::Stop) | None => break,
                }
            }
        }
    }

    tracing::info!("Match session stopped");
    Ok(())
}
